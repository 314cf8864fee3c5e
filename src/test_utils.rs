//! Shared test utilities.
//!
//! This module provides helpers for setting up test databases and building records
//! with sensible defaults.

use crate::{
    core::{
        category::{CategoryInput, ExpenseCategory, IncomeCategory},
        transaction::NewTransaction,
    },
    entities::{TransactionType, budget, transaction},
    errors::Result,
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a valid calendar date. Panics on invalid input, tests only.
#[allow(clippy::unwrap_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn fixed_timestamp() -> DateTime<Utc> {
    date(2024, 1, 1).and_hms_opt(12, 0, 0).unwrap_or_default().and_utc()
}

/// Builds an expense input for `create_transaction`.
pub fn new_expense(
    user_id: &str,
    category: ExpenseCategory,
    amount: f64,
    (year, month, day): (i32, u32, u32),
) -> NewTransaction {
    NewTransaction {
        user_id: user_id.to_string(),
        transaction_type: TransactionType::Expense,
        amount,
        category: CategoryInput::Expense(category),
        description: "Test expense".to_string(),
        date: date(year, month, day),
    }
}

/// Builds an income input for `create_transaction`.
pub fn new_income(
    user_id: &str,
    category: IncomeCategory,
    amount: f64,
    (year, month, day): (i32, u32, u32),
) -> NewTransaction {
    NewTransaction {
        user_id: user_id.to_string(),
        transaction_type: TransactionType::Income,
        amount,
        category: CategoryInput::Income(category),
        description: "Test income".to_string(),
        date: date(year, month, day),
    }
}

/// Builds a transaction record directly, bypassing validation.
///
/// # Defaults
/// * `user_id`: `"test_user"`
/// * `description`: empty
/// * `created_at`: 2024-01-01 12:00 UTC
pub fn transaction_record(
    id: &str,
    transaction_type: TransactionType,
    category: &str,
    amount: f64,
    (year, month, day): (i32, u32, u32),
) -> transaction::Model {
    transaction::Model {
        id: id.to_string(),
        user_id: "test_user".to_string(),
        transaction_type,
        amount,
        category: category.to_string(),
        description: String::new(),
        date: date(year, month, day),
        created_at: fixed_timestamp(),
    }
}

/// Builds a budget record directly, bypassing validation.
///
/// # Defaults
/// * `user_id`: `"test_user"`
/// * `created_at` / `updated_at`: 2024-01-01 12:00 UTC
pub fn budget_record(
    id: &str,
    category: &str,
    amount: f64,
    month: i32,
    year: i32,
) -> budget::Model {
    budget::Model {
        id: id.to_string(),
        user_id: "test_user".to_string(),
        category: category.to_string(),
        amount,
        month,
        year,
        created_at: fixed_timestamp(),
        updated_at: fixed_timestamp(),
    }
}
