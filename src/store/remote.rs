//! Remote store abstraction.
//!
//! A remote store is the optional cloud copy of a user's records. It is only ever
//! used best-effort: local writes never wait on it and read failures fall back to
//! the local cache.

use crate::{
    entities::{budget, transaction},
    errors::{Error, Result},
};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, Ordering},
};
use tokio::sync::RwLock;

/// Cloud-side storage for transactions and budgets
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Every transaction of `user_id` held remotely
    async fn fetch_transactions(&self, user_id: &str) -> Result<Vec<transaction::Model>>;
    /// Stores or replaces a transaction
    async fn push_transaction(&self, record: transaction::Model) -> Result<()>;
    /// Removes a transaction; unknown ids are not an error
    async fn remove_transaction(&self, id: &str) -> Result<()>;
    /// Every budget of `user_id` held remotely
    async fn fetch_budgets(&self, user_id: &str) -> Result<Vec<budget::Model>>;
    /// Stores or replaces a budget
    async fn push_budget(&self, record: budget::Model) -> Result<()>;
    /// Removes a budget; unknown ids are not an error
    async fn remove_budget(&self, id: &str) -> Result<()>;
}

/// In-process [`RemoteStore`] keyed by record id.
///
/// Can be switched offline to exercise the local fallback paths.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    transactions: RwLock<HashMap<String, transaction::Model>>,
    budgets: RwLock<HashMap<String, budget::Model>>,
    offline: AtomicBool,
}

impl MemoryRemote {
    /// Creates an empty, online remote.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail (`true`) or succeed (`false`).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::Remote {
                message: "remote store is offline".to_string(),
            });
        }
        Ok(())
    }

    /// Looks up a transaction without the online check.
    pub async fn transaction(&self, id: &str) -> Option<transaction::Model> {
        self.transactions.read().await.get(id).cloned()
    }

    /// Looks up a budget without the online check.
    pub async fn budget(&self, id: &str) -> Option<budget::Model> {
        self.budgets.read().await.get(id).cloned()
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn fetch_transactions(&self, user_id: &str) -> Result<Vec<transaction::Model>> {
        self.ensure_online()?;
        Ok(self
            .transactions
            .read()
            .await
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn push_transaction(&self, record: transaction::Model) -> Result<()> {
        self.ensure_online()?;
        self.transactions
            .write()
            .await
            .insert(record.id.clone(), record);
        Ok(())
    }

    async fn remove_transaction(&self, id: &str) -> Result<()> {
        self.ensure_online()?;
        self.transactions.write().await.remove(id);
        Ok(())
    }

    async fn fetch_budgets(&self, user_id: &str) -> Result<Vec<budget::Model>> {
        self.ensure_online()?;
        Ok(self
            .budgets
            .read()
            .await
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn push_budget(&self, record: budget::Model) -> Result<()> {
        self.ensure_online()?;
        self.budgets.write().await.insert(record.id.clone(), record);
        Ok(())
    }

    async fn remove_budget(&self, id: &str) -> Result<()> {
        self.ensure_online()?;
        self.budgets.write().await.remove(id);
        Ok(())
    }
}
