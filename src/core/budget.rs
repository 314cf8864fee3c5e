//! Budget business logic - Setting, listing and removing monthly budgets.
//!
//! Setting a budget is an upsert keyed on `(user_id, category, month, year)`: the first
//! call creates the record, later calls for the same tuple only change its amount and
//! `updated_at`. The lookup and write run in one database transaction. Categories are
//! resolved like expense categories, so `"food"` and `"FOOD"` name the same budget.

use crate::{
    core::{
        category::CategoryInput,
        period::Period,
        tombstone::{self, ImportOutcome, RecordKind},
        transaction::validate_amount,
    },
    entities::{Budget, TransactionType, budget},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::debug;
use uuid::Uuid;

/// Finds the budget for an exact `(user, category, period)` tuple.
pub async fn find_budget<C>(
    db: &C,
    user_id: &str,
    category: &str,
    period: Period,
) -> Result<Option<budget::Model>>
where
    C: ConnectionTrait,
{
    Budget::find()
        .filter(budget::Column::UserId.eq(user_id))
        .filter(budget::Column::Category.eq(category))
        .filter(budget::Column::Month.eq(period.month_i32()))
        .filter(budget::Column::Year.eq(period.year))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates or updates the budget for `(user_id, category, month, year)`.
///
/// # Errors
/// * [`Error::InvalidAmount`] for negative or non-finite amounts
/// * [`Error::InvalidPeriod`] when `month` is outside 1-12
/// * [`Error::InvalidCategory`] for a blank category or an income category
pub async fn upsert_budget<C>(
    db: &C,
    user_id: &str,
    category: &str,
    month: u32,
    year: i32,
    amount: f64,
) -> Result<budget::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    validate_amount(amount)?;
    let period = Period::new(month, year)?;
    let category = CategoryInput::parse(TransactionType::Expense, category)
        .resolve(TransactionType::Expense)?;

    let txn = db.begin().await?;
    let now = chrono::Utc::now();

    let result = if let Some(existing) = find_budget(&txn, user_id, &category, period).await? {
        debug!("Updating budget {} for {category} in {period}", existing.id);
        let mut active_model: budget::ActiveModel = existing.into();
        active_model.amount = Set(amount);
        active_model.updated_at = Set(now);
        active_model.update(&txn).await?
    } else {
        debug!("Creating budget for {category} in {period}");
        let new_budget = budget::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_string()),
            category: Set(category),
            amount: Set(amount),
            month: Set(period.month_i32()),
            year: Set(period.year),
            created_at: Set(now),
            updated_at: Set(now),
        };
        new_budget.insert(&txn).await?
    };

    txn.commit().await?;
    Ok(result)
}

/// Retrieves every budget of a user, newest period first, then by category.
pub async fn get_budgets_for_user<C>(db: &C, user_id: &str) -> Result<Vec<budget::Model>>
where
    C: ConnectionTrait,
{
    Budget::find()
        .filter(budget::Column::UserId.eq(user_id))
        .order_by_desc(budget::Column::Year)
        .order_by_desc(budget::Column::Month)
        .order_by_asc(budget::Column::Category)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the budgets of a user for one period, ordered by category.
pub async fn get_budgets_for_period<C>(
    db: &C,
    user_id: &str,
    period: Period,
) -> Result<Vec<budget::Model>>
where
    C: ConnectionTrait,
{
    Budget::find()
        .filter(budget::Column::UserId.eq(user_id))
        .filter(budget::Column::Month.eq(period.month_i32()))
        .filter(budget::Column::Year.eq(period.year))
        .order_by_asc(budget::Column::Category)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a budget by id.
pub async fn get_budget_by_id<C>(db: &C, budget_id: &str) -> Result<Option<budget::Model>>
where
    C: ConnectionTrait,
{
    Budget::find_by_id(budget_id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Deletes a budget by id and leaves a tombstone for it.
///
/// # Errors
/// Returns [`Error::BudgetNotFound`] when no budget has this id.
pub async fn delete_budget<C>(db: &C, budget_id: &str) -> Result<()>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let result = Budget::delete_by_id(budget_id.to_string()).exec(&txn).await?;

    if result.rows_affected == 0 {
        return Err(Error::BudgetNotFound {
            id: budget_id.to_string(),
        });
    }
    tombstone::record_deletion(&txn, RecordKind::Budget, budget_id).await?;
    txn.commit().await?;
    Ok(())
}

/// Stores a budget received from elsewhere as-is.
///
/// Nothing is written when the id is already known or was deleted here, when the
/// `(user, category, month, year)` tuple is already budgeted locally, or when the
/// month is outside 1-12.
pub async fn import_budget<C>(db: &C, record: budget::Model) -> Result<ImportOutcome>
where
    C: ConnectionTrait,
{
    if tombstone::is_deleted(db, RecordKind::Budget, &record.id).await? {
        return Ok(ImportOutcome::Deleted);
    }
    if get_budget_by_id(db, &record.id).await?.is_some() {
        return Ok(ImportOutcome::AlreadyKnown);
    }

    let Some(period) = u32::try_from(record.month)
        .ok()
        .and_then(|month| Period::new(month, record.year).ok())
    else {
        debug!("Ignoring budget {} with invalid period", record.id);
        return Ok(ImportOutcome::Invalid);
    };
    if find_budget(db, &record.user_id, &record.category, period)
        .await?
        .is_some()
    {
        return Ok(ImportOutcome::AlreadyKnown);
    }

    let model = budget::ActiveModel {
        id: Set(record.id),
        user_id: Set(record.user_id),
        category: Set(record.category),
        amount: Set(record.amount),
        month: Set(record.month),
        year: Set(record.year),
        created_at: Set(record.created_at),
        updated_at: Set(record.updated_at),
    };
    model.insert(db).await?;
    Ok(ImportOutcome::Imported)
}
