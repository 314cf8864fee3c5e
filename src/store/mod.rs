//! Repositories - the seams through which the service reads and writes records.
//!
//! The traits here are what [`crate::service::BudgetProgressService`] is built on.
//! [`SyncedStore`] implements both on top of the local `SQLite` cache, optionally
//! mirroring writes to a [`RemoteStore`] in the background.

/// Remote store abstraction and an in-memory implementation
pub mod remote;
/// Local store with best-effort remote mirroring
pub mod synced;

use crate::{
    core::transaction::NewTransaction,
    entities::{budget, transaction},
    errors::Result,
};
use async_trait::async_trait;

pub use remote::{MemoryRemote, RemoteStore};
pub use synced::SyncedStore;

/// Source of a user's transactions
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// All transactions of `user_id`, newest attribution date first
    async fn get_transactions(&self, user_id: &str) -> Result<Vec<transaction::Model>>;
    /// Validates and records a new transaction
    async fn add_transaction(&self, new: NewTransaction) -> Result<transaction::Model>;
    /// Removes a transaction by id
    async fn delete_transaction(&self, id: &str) -> Result<()>;
}

/// Source of a user's budgets
#[async_trait]
pub trait BudgetRepository: Send + Sync {
    /// All budgets of `user_id`, across every period
    async fn get_budgets(&self, user_id: &str) -> Result<Vec<budget::Model>>;
    /// Creates or updates the budget for `(user_id, category, month, year)`
    async fn upsert_budget(
        &self,
        user_id: &str,
        category: &str,
        month: u32,
        year: i32,
        amount: f64,
    ) -> Result<budget::Model>;
    /// Removes a budget by id
    async fn delete_budget(&self, id: &str) -> Result<()>;
}
