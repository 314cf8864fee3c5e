//! Unified error types for the budget tracker.
//!
//! Every fallible operation in the crate returns [`Result`], which wraps [`Error`].
//! Database, I/O and configuration parsing errors convert automatically through `?`.

use thiserror::Error;

/// Errors produced by the budget tracker.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// Underlying `SeaORM` database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML could not be parsed
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Amount is negative, NaN or infinite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// Month outside 1-12
    #[error("Invalid period: month {month} of year {year}")]
    InvalidPeriod {
        /// The rejected month
        month: i64,
        /// The year it was paired with
        year: i32,
    },

    /// Category does not belong to the set for the transaction type, or is blank
    #[error("Invalid category '{category}' for {kind} transactions")]
    InvalidCategory {
        /// The rejected category
        category: String,
        /// Transaction type the category was checked against
        kind: String,
    },

    /// No budget with the given id
    #[error("Budget not found: {id}")]
    BudgetNotFound {
        /// Budget id that was looked up
        id: String,
    },

    /// No transaction with the given id
    #[error("Transaction not found: {id}")]
    TransactionNotFound {
        /// Transaction id that was looked up
        id: String,
    },

    /// Remote store rejected or failed a request
    #[error("Remote sync error: {message}")]
    Remote {
        /// Description of the remote failure
        message: String,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
