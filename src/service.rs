//! Budget progress service - the stateful wrapper around [`compute_progress`].
//!
//! The service is constructed with injected repositories. [`BudgetProgressService::refresh`]
//! loads a user's budgets and transactions, recomputes progress for a period, caches the
//! result as the current snapshot and, when it differs materially from the previous
//! one, broadcasts it to subscribers. Each refresh takes a generation number when it
//! starts; a refresh that finishes after a later one has stored its snapshot is dropped.

use crate::{
    core::{
        period::Period,
        progress::{BudgetProgress, compute_progress, has_progress_changed},
        transaction::NewTransaction,
    },
    entities::{budget, transaction},
    errors::Result,
    store::{BudgetRepository, TransactionRepository},
};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info};

/// Number of updates a slow subscriber may fall behind before skipping ahead.
const UPDATE_CHANNEL_CAPACITY: usize = 16;

/// Progress computed for one user and period.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressSnapshot {
    /// User the progress belongs to
    pub user_id: String,
    /// Period the progress was computed for
    pub period: Period,
    /// One entry per budget of the period
    pub progress: Vec<BudgetProgress>,
}

/// Message sent to subscribers whenever the snapshot changes materially
pub type ProgressUpdate = Arc<ProgressSnapshot>;

struct StoredSnapshot {
    generation: u64,
    snapshot: Arc<ProgressSnapshot>,
}

/// Caches budget progress and notifies subscribers of changes.
pub struct BudgetProgressService {
    transactions: Arc<dyn TransactionRepository>,
    budgets: Arc<dyn BudgetRepository>,
    generation: AtomicU64,
    snapshot: RwLock<Option<StoredSnapshot>>,
    updates: broadcast::Sender<ProgressUpdate>,
}

impl BudgetProgressService {
    /// Creates a service over the given repositories with an empty snapshot.
    #[must_use]
    pub fn new(
        transactions: Arc<dyn TransactionRepository>,
        budgets: Arc<dyn BudgetRepository>,
    ) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            transactions,
            budgets,
            generation: AtomicU64::new(0),
            snapshot: RwLock::new(None),
            updates,
        }
    }

    /// Receives every materially different snapshot produced after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressUpdate> {
        self.updates.subscribe()
    }

    /// The last computed snapshot, if any.
    pub async fn get_snapshot(&self) -> Option<Arc<ProgressSnapshot>> {
        self.snapshot
            .read()
            .await
            .as_ref()
            .map(|stored| Arc::clone(&stored.snapshot))
    }

    /// Recomputes progress for `user_id` in `period` (default: current month).
    ///
    /// Both lists are loaded completely before computing. Subscribers are notified
    /// only when the user or period changed, or [`has_progress_changed`] reports a
    /// difference from the previous snapshot. When a refresh started later has already
    /// stored its snapshot, the result is returned but neither stored nor broadcast.
    pub async fn refresh(
        &self,
        user_id: &str,
        period: Option<Period>,
    ) -> Result<Arc<ProgressSnapshot>> {
        let period = period.unwrap_or_else(Period::current);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let (budgets, transactions) = tokio::try_join!(
            self.budgets.get_budgets(user_id),
            self.transactions.get_transactions(user_id),
        )?;

        let progress = compute_progress(
            &budgets,
            &transactions,
            Some(period.month),
            Some(period.year),
        );
        let snapshot = Arc::new(ProgressSnapshot {
            user_id: user_id.to_string(),
            period,
            progress,
        });

        let changed = {
            let mut current = self.snapshot.write().await;
            if current.as_ref().is_some_and(|stored| stored.generation > generation) {
                debug!("Discarding outdated budget progress for {user_id} in {period}");
                return Ok(snapshot);
            }
            let changed = current.as_ref().is_none_or(|stored| {
                let previous = &stored.snapshot;
                previous.user_id != snapshot.user_id
                    || previous.period != snapshot.period
                    || has_progress_changed(&previous.progress, &snapshot.progress)
            });
            *current = Some(StoredSnapshot {
                generation,
                snapshot: Arc::clone(&snapshot),
            });
            changed
        };

        if changed {
            info!(
                "Budget progress for {user_id} in {period} updated ({} budget(s))",
                snapshot.progress.len()
            );
            if self.updates.send(Arc::clone(&snapshot)).is_err() {
                debug!("No progress subscribers to notify");
            }
        } else {
            debug!("Budget progress for {user_id} in {period} unchanged");
        }

        Ok(snapshot)
    }

    /// Period of the current snapshot when it belongs to `user_id`.
    async fn tracked_period(&self, user_id: &str) -> Option<Period> {
        self.snapshot
            .read()
            .await
            .as_ref()
            .map(|stored| &stored.snapshot)
            .filter(|s| s.user_id == user_id)
            .map(|s| s.period)
    }

    /// Sets the budget for a category and period, then refreshes.
    ///
    /// The refresh keeps the currently tracked period for this user, or uses the
    /// budget's period when nothing is tracked yet.
    pub async fn set_budget(
        &self,
        user_id: &str,
        category: &str,
        period: Period,
        amount: f64,
    ) -> Result<budget::Model> {
        let saved = self
            .budgets
            .upsert_budget(user_id, category, period.month, period.year, amount)
            .await?;
        let tracked = self.tracked_period(user_id).await.unwrap_or(period);
        self.refresh(user_id, Some(tracked)).await?;
        Ok(saved)
    }

    /// Deletes a budget, then refreshes the tracked period of `user_id`.
    pub async fn remove_budget(&self, user_id: &str, budget_id: &str) -> Result<()> {
        self.budgets.delete_budget(budget_id).await?;
        let tracked = self.tracked_period(user_id).await;
        self.refresh(user_id, tracked).await?;
        Ok(())
    }

    /// Records a transaction, then refreshes.
    ///
    /// The refresh keeps the currently tracked period for the user, or uses the
    /// transaction's month when nothing is tracked yet.
    pub async fn add_transaction(&self, new: NewTransaction) -> Result<transaction::Model> {
        let user_id = new.user_id.clone();
        let fallback = Period::of(new.date);
        let created = self.transactions.add_transaction(new).await?;
        let tracked = self.tracked_period(&user_id).await.unwrap_or(fallback);
        self.refresh(&user_id, Some(tracked)).await?;
        Ok(created)
    }

    /// Deletes a transaction, then refreshes the tracked period of `user_id`.
    pub async fn remove_transaction(&self, user_id: &str, transaction_id: &str) -> Result<()> {
        self.transactions.delete_transaction(transaction_id).await?;
        let tracked = self.tracked_period(user_id).await;
        self.refresh(user_id, tracked).await?;
        Ok(())
    }
}
