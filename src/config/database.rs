//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. The budgets table additionally gets a
//! unique index over `(user_id, category, month, year)`.

use crate::entities::{Budget, BudgetColumn, DeletedRecord, Transaction};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema, sea_query::Index};
use std::path::Path;
use tracing::debug;

/// Fallback used when neither `DATABASE_URL` nor the config file names a database.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/budget_tracker.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable, then the
/// configured value, then [`DEFAULT_DATABASE_URL`].
#[must_use]
pub fn get_database_url(configured: Option<&str>) -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| {
        configured.map_or_else(|| DEFAULT_DATABASE_URL.to_string(), ToString::to_string)
    })
}

/// Creates the parent directory of a file-backed `SQLite` URL if it is missing.
fn ensure_sqlite_parent_dir(database_url: &str) -> Result<()> {
    let Some(path) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or_default();
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Establishes a connection to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    ensure_sqlite_parent_dir(database_url)?;
    debug!("Connecting to database at {database_url}");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates the transactions, budgets and deleted-records tables plus the budget
/// uniqueness index.
///
/// Safe to call on every start-up; existing tables are left untouched.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut transaction_table = schema.create_table_from_entity(Transaction);
    let mut budget_table = schema.create_table_from_entity(Budget);
    let mut deleted_table = schema.create_table_from_entity(DeletedRecord);
    transaction_table.if_not_exists();
    budget_table.if_not_exists();
    deleted_table.if_not_exists();

    let budget_period_index = Index::create()
        .name("idx_budgets_user_category_period")
        .table(Budget)
        .col(BudgetColumn::UserId)
        .col(BudgetColumn::Category)
        .col(BudgetColumn::Month)
        .col(BudgetColumn::Year)
        .unique()
        .if_not_exists()
        .to_owned();

    db.execute(builder.build(&transaction_table)).await?;
    db.execute(builder.build(&budget_table)).await?;
    db.execute(builder.build(&budget_period_index)).await?;
    db.execute(builder.build(&deleted_table)).await?;

    Ok(())
}
