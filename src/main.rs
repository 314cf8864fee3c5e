use budget_tracker::{
    config::{database, settings},
    core::{period::Period, progress::ProgressStatus, report},
    errors::Result,
    service::BudgetProgressService,
    store::{BudgetRepository, MemoryRemote, RemoteStore, SyncedStore, TransactionRepository},
};
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env file (as early as possible)
    let dotenv_loaded = dotenv().is_ok(); // Non-fatal, env vars can be set externally

    // 2. Load the application configuration
    let app_config = settings::load_default_config()?;

    // 3. Initialize tracing, RUST_LOG wins over the configured filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&app_config.log_filter)),
        )
        .init();
    info!("Loaded configuration (.env found: {dotenv_loaded})");

    // 4. Initialize database
    let database_url = database::get_database_url(app_config.database_url.as_deref());
    let db = database::create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Build the store, mirrored to an in-process remote when configured
    let store = if app_config.sync.mirror_to_memory_remote {
        info!("Mirroring writes to in-memory remote store");
        let remote: Arc<dyn RemoteStore> = Arc::new(MemoryRemote::new());
        Arc::new(SyncedStore::with_remote(db, remote))
    } else {
        Arc::new(SyncedStore::local(db))
    };

    // 6. Seed configured budgets
    let user_id = app_config.user_id.as_str();
    for seed in &app_config.budgets {
        let period = Period::resolve(seed.month, seed.year);
        match store
            .upsert_budget(user_id, &seed.category, period.month, period.year, seed.amount)
            .await
        {
            Ok(budget) => info!(
                "Seeded budget {} for {} in {period}: {}",
                budget.id,
                budget.category,
                report::format_amount(budget.amount)
            ),
            Err(e) => warn!("Skipping budget seed for '{}': {e}", seed.category),
        }
    }

    // 7. Report progress for the current month
    let service = BudgetProgressService::new(
        Arc::clone(&store) as Arc<dyn TransactionRepository>,
        Arc::clone(&store) as Arc<dyn BudgetRepository>,
    );
    let snapshot = service.refresh(user_id, None).await?;

    if snapshot.progress.is_empty() {
        info!("No budgets set for {} in {}", user_id, snapshot.period);
    }
    for progress in &snapshot.progress {
        let line = report::format_progress_line(progress);
        match progress.status(app_config.near_limit_percent) {
            ProgressStatus::OverBudget => warn!("{line} OVER BUDGET"),
            ProgressStatus::NearLimit => warn!("{line} near limit"),
            ProgressStatus::OnTrack => info!("{line}"),
        }
    }

    let transactions = store.get_transactions(user_id).await?;
    let summary = report::summarize(&transactions, Some(snapshot.period));
    info!(
        "{}: income {}, expenses {}, balance {} across {} transaction(s)",
        snapshot.period,
        report::format_amount(summary.total_income),
        report::format_amount(summary.total_expenses),
        report::format_amount(summary.balance),
        summary.transaction_count
    );

    // 8. Let background remote writes finish before exiting
    store.flush_pending_sync().await;

    Ok(())
}
