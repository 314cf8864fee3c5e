//! Deletion tombstones - Remembering which records were deleted locally.
//!
//! A delete in [`crate::core::transaction`] or [`crate::core::budget`] writes a tombstone in
//! the same database transaction. Imports consult it, so a remote copy that survived
//! the delete is reported as [`ImportOutcome::Deleted`] instead of being restored.

use crate::{
    entities::{DeletedRecord, deleted_record},
    errors::Result,
};
use sea_orm::{Set, prelude::*};
use std::fmt;

/// Kind of record a tombstone refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    /// A row of the transactions table
    Transaction,
    /// A row of the budgets table
    Budget,
}

impl RecordKind {
    /// Value stored in `deleted_records.record_type`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transaction => "transaction",
            Self::Budget => "budget",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of importing a record received from elsewhere
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Written to the local cache
    Imported,
    /// Nothing written; the local cache already holds this record or an equivalent one
    AlreadyKnown,
    /// Nothing written; the record was deleted locally
    Deleted,
    /// Nothing written; the record is not valid locally
    Invalid,
}

/// Writes the tombstone for a deleted record.
pub async fn record_deletion<C>(db: &C, kind: RecordKind, record_id: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let tombstone = deleted_record::ActiveModel {
        record_type: Set(kind.as_str().to_string()),
        record_id: Set(record_id.to_string()),
        deleted_at: Set(chrono::Utc::now()),
    };
    tombstone.insert(db).await?;
    Ok(())
}

/// Whether a record of `kind` with this id was deleted locally.
pub async fn is_deleted<C>(db: &C, kind: RecordKind, record_id: &str) -> Result<bool>
where
    C: ConnectionTrait,
{
    let found = DeletedRecord::find_by_id((kind.as_str().to_string(), record_id.to_string()))
        .one(db)
        .await?;
    Ok(found.is_some())
}
