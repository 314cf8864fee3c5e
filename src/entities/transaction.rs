//! Transaction entity - Represents a single income or expense record.
//!
//! Each transaction belongs to a user, carries a non-negative `amount`, a resolved
//! `category` string and an attribution `date` that is distinct from `created_at`.
//! Transactions are never edited after creation; they are only added or deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether money left (`Expense`) or entered (`Income`) the user's pocket.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Spending, counted against budgets
    #[sea_orm(string_value = "EXPENSE")]
    Expense,
    /// Earnings, never counted against budgets
    #[sea_orm(string_value = "INCOME")]
    Income,
}

impl TransactionType {
    /// Stable upper-case name, matching the stored value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "EXPENSE",
            Self::Income => "INCOME",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// UUID assigned at creation
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Expense or income
    pub transaction_type: TransactionType,
    /// Non-negative amount in currency units
    pub amount: f64,
    /// Resolved category name (known category or custom label)
    pub category: String,
    /// Free-form note
    pub description: String,
    /// Calendar date the transaction is attributed to
    pub date: Date,
    /// When the record was created
    pub created_at: DateTimeUtc,
}

/// Transactions have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
