//! Local store with optional best-effort remote mirroring.
//!
//! Every write goes to the local `SQLite` cache first and is awaited (`write_local`).
//! If a remote store is configured, the same change is then queued for the remote
//! (`sync_remote`). One background task drains the queue, so remote operations run
//! in the order the local writes happened; a failed operation is logged and otherwise
//! ignored. Reads return the local records after importing any remote-only records
//! into the cache. Local data wins when both sides know the same id, and records
//! deleted locally stay deleted.

use crate::{
    core::{
        budget as budget_ops, tombstone::ImportOutcome, transaction as transaction_ops,
        transaction::NewTransaction,
    },
    entities::{budget, transaction},
    errors::Result,
    store::{BudgetRepository, RemoteStore, TransactionRepository},
};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::{future::Future, pin::Pin, sync::Arc};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

type SyncJob = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

enum SyncMessage {
    Run { what: String, job: SyncJob },
    Flush(oneshot::Sender<()>),
}

struct RemoteLink {
    store: Arc<dyn RemoteStore>,
    queue: mpsc::UnboundedSender<SyncMessage>,
}

/// Runs queued remote operations one at a time until every sender is gone.
async fn drain_sync_queue(mut queue: mpsc::UnboundedReceiver<SyncMessage>) {
    while let Some(message) = queue.recv().await {
        match message {
            SyncMessage::Run { what, job } => match job.await {
                Ok(()) => debug!("Remote sync of {what} succeeded"),
                Err(e) => warn!("Remote sync of {what} failed: {e}"),
            },
            SyncMessage::Flush(done) => {
                if done.send(()).is_err() {
                    debug!("Flush requester went away");
                }
            }
        }
    }
    debug!("Remote sync queue closed");
}

/// Repository implementation backed by the local database and an optional remote.
pub struct SyncedStore {
    db: DatabaseConnection,
    remote: Option<RemoteLink>,
}

impl SyncedStore {
    /// Store that only uses the local database.
    #[must_use]
    pub fn local(db: DatabaseConnection) -> Self {
        Self { db, remote: None }
    }

    /// Store that mirrors writes to `remote`.
    ///
    /// Spawns the task that applies queued remote operations, so this must be called
    /// from within a Tokio runtime.
    #[must_use]
    pub fn with_remote(db: DatabaseConnection, remote: Arc<dyn RemoteStore>) -> Self {
        let (queue, pending) = mpsc::unbounded_channel();
        tokio::spawn(drain_sync_queue(pending));
        Self {
            db,
            remote: Some(RemoteLink {
                store: remote,
                queue,
            }),
        }
    }

    /// The local database connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Queues `op` against the remote, if any. Failures are logged, never returned.
    fn sync_remote<F, Fut>(&self, what: String, op: F)
    where
        F: FnOnce(Arc<dyn RemoteStore>) -> Fut,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let Some(link) = &self.remote else {
            return;
        };

        let job: SyncJob = Box::pin(op(Arc::clone(&link.store)));
        if let Err(mpsc::error::SendError(SyncMessage::Run { what, .. })) =
            link.queue.send(SyncMessage::Run { what, job })
        {
            warn!("Remote sync worker has stopped, {what} was not mirrored");
        }
    }

    /// Waits until every remote operation queued so far has been attempted.
    pub async fn flush_pending_sync(&self) {
        let Some(link) = &self.remote else {
            return;
        };

        let (done, finished) = oneshot::channel();
        if link.queue.send(SyncMessage::Flush(done)).is_err() || finished.await.is_err() {
            warn!("Remote sync worker stopped before the queue was flushed");
        }
    }

    async fn reconcile_transactions(&self, user_id: &str) -> Result<()> {
        let Some(link) = &self.remote else {
            return Ok(());
        };

        match link.store.fetch_transactions(user_id).await {
            Ok(records) => {
                let mut imported = 0usize;
                for record in records.into_iter().filter(|r| r.user_id == user_id) {
                    let id = record.id.clone();
                    match transaction_ops::import_transaction(&self.db, record).await? {
                        ImportOutcome::Imported => imported += 1,
                        ImportOutcome::Deleted => {
                            debug!("Remote still holds deleted transaction {id}");
                            self.sync_remote(
                                format!("deletion of transaction {id}"),
                                move |remote| async move { remote.remove_transaction(&id).await },
                            );
                        }
                        ImportOutcome::AlreadyKnown | ImportOutcome::Invalid => {}
                    }
                }
                if imported > 0 {
                    info!("Imported {imported} remote transaction(s) for {user_id}");
                }
            }
            Err(e) => warn!("Could not fetch remote transactions, using local cache: {e}"),
        }
        Ok(())
    }

    async fn reconcile_budgets(&self, user_id: &str) -> Result<()> {
        let Some(link) = &self.remote else {
            return Ok(());
        };

        match link.store.fetch_budgets(user_id).await {
            Ok(records) => {
                let mut imported = 0usize;
                for record in records.into_iter().filter(|r| r.user_id == user_id) {
                    let id = record.id.clone();
                    match budget_ops::import_budget(&self.db, record).await? {
                        ImportOutcome::Imported => imported += 1,
                        ImportOutcome::Deleted => {
                            debug!("Remote still holds deleted budget {id}");
                            self.sync_remote(
                                format!("deletion of budget {id}"),
                                move |remote| async move { remote.remove_budget(&id).await },
                            );
                        }
                        ImportOutcome::AlreadyKnown | ImportOutcome::Invalid => {}
                    }
                }
                if imported > 0 {
                    info!("Imported {imported} remote budget(s) for {user_id}");
                }
            }
            Err(e) => warn!("Could not fetch remote budgets, using local cache: {e}"),
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionRepository for SyncedStore {
    async fn get_transactions(&self, user_id: &str) -> Result<Vec<transaction::Model>> {
        self.reconcile_transactions(user_id).await?;
        transaction_ops::get_transactions_for_user(&self.db, user_id).await
    }

    async fn add_transaction(&self, new: NewTransaction) -> Result<transaction::Model> {
        let created = transaction_ops::create_transaction(&self.db, new).await?;

        let record = created.clone();
        self.sync_remote(format!("transaction {}", created.id), move |remote| async move {
            remote.push_transaction(record).await
        });

        Ok(created)
    }

    async fn delete_transaction(&self, id: &str) -> Result<()> {
        transaction_ops::delete_transaction(&self.db, id).await?;

        let id = id.to_string();
        self.sync_remote(format!("deletion of transaction {id}"), move |remote| async move {
            remote.remove_transaction(&id).await
        });

        Ok(())
    }
}

#[async_trait]
impl BudgetRepository for SyncedStore {
    async fn get_budgets(&self, user_id: &str) -> Result<Vec<budget::Model>> {
        self.reconcile_budgets(user_id).await?;
        budget_ops::get_budgets_for_user(&self.db, user_id).await
    }

    async fn upsert_budget(
        &self,
        user_id: &str,
        category: &str,
        month: u32,
        year: i32,
        amount: f64,
    ) -> Result<budget::Model> {
        let saved =
            budget_ops::upsert_budget(&self.db, user_id, category, month, year, amount).await?;

        let record = saved.clone();
        self.sync_remote(format!("budget {}", saved.id), move |remote| async move {
            remote.push_budget(record).await
        });

        Ok(saved)
    }

    async fn delete_budget(&self, id: &str) -> Result<()> {
        budget_ops::delete_budget(&self.db, id).await?;

        let id = id.to_string();
        self.sync_remote(format!("deletion of budget {id}"), move |remote| async move {
            remote.remove_budget(&id).await
        });

        Ok(())
    }
}
