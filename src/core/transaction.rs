//! Transaction business logic - Handles transaction records in the local store.
//!
//! Transactions are validated at this boundary: the amount must be finite and
//! non-negative and the category must fit the transaction type (or be a non-blank
//! custom label). Once stored, a transaction is never modified; it can only be deleted.

use crate::{
    core::{
        category::CategoryInput,
        tombstone::{self, ImportOutcome, RecordKind},
    },
    entities::{Transaction, TransactionType, transaction},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::debug;
use uuid::Uuid;

/// Input for recording a new transaction
#[derive(Clone, Debug)]
pub struct NewTransaction {
    /// Owning user
    pub user_id: String,
    /// Expense or income
    pub transaction_type: TransactionType,
    /// Non-negative amount
    pub amount: f64,
    /// Category as chosen at data entry
    pub category: CategoryInput,
    /// Free-form note
    pub description: String,
    /// Date the transaction is attributed to
    pub date: NaiveDate,
}

/// Checks that an amount is finite and non-negative.
pub(crate) fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

/// Creates a new transaction with a fresh UUID and creation timestamp.
///
/// # Errors
/// * [`Error::InvalidAmount`] for negative or non-finite amounts
/// * [`Error::InvalidCategory`] when the category does not fit the transaction type
pub async fn create_transaction<C>(db: &C, new: NewTransaction) -> Result<transaction::Model>
where
    C: ConnectionTrait,
{
    validate_amount(new.amount)?;
    let category = new.category.resolve(new.transaction_type)?;

    let model = transaction::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        user_id: Set(new.user_id),
        transaction_type: Set(new.transaction_type),
        amount: Set(new.amount),
        category: Set(category),
        description: Set(new.description.trim().to_string()),
        date: Set(new.date),
        created_at: Set(chrono::Utc::now()),
    };

    let result = model.insert(db).await?;
    debug!(
        "Created {} transaction {} of {} in {}",
        result.transaction_type, result.id, result.amount, result.category
    );
    Ok(result)
}

/// Retrieves all transactions of a user, newest attribution date first.
pub async fn get_transactions_for_user<C>(db: &C, user_id: &str) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .order_by_desc(transaction::Column::Date)
        .order_by_desc(transaction::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific transaction by its id.
pub async fn get_transaction_by_id<C>(
    db: &C,
    transaction_id: &str,
) -> Result<Option<transaction::Model>>
where
    C: ConnectionTrait,
{
    Transaction::find_by_id(transaction_id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Deletes a transaction by id and leaves a tombstone for it.
///
/// # Errors
/// Returns [`Error::TransactionNotFound`] when no transaction has this id.
pub async fn delete_transaction<C>(db: &C, transaction_id: &str) -> Result<()>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let result = Transaction::delete_by_id(transaction_id.to_string())
        .exec(&txn)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::TransactionNotFound {
            id: transaction_id.to_string(),
        });
    }
    tombstone::record_deletion(&txn, RecordKind::Transaction, transaction_id).await?;
    txn.commit().await?;
    Ok(())
}

/// Stores a transaction received from elsewhere (e.g. a remote store) as-is.
///
/// Nothing is written when a transaction with the same id exists or was deleted here.
pub async fn import_transaction<C>(db: &C, record: transaction::Model) -> Result<ImportOutcome>
where
    C: ConnectionTrait,
{
    if tombstone::is_deleted(db, RecordKind::Transaction, &record.id).await? {
        return Ok(ImportOutcome::Deleted);
    }
    if get_transaction_by_id(db, &record.id).await?.is_some() {
        return Ok(ImportOutcome::AlreadyKnown);
    }

    let model = transaction::ActiveModel {
        id: Set(record.id),
        user_id: Set(record.user_id),
        transaction_type: Set(record.transaction_type),
        amount: Set(record.amount),
        category: Set(record.category),
        description: Set(record.description),
        date: Set(record.date),
        created_at: Set(record.created_at),
    };
    model.insert(db).await?;
    Ok(ImportOutcome::Imported)
}
