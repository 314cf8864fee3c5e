//! Deleted record entity - A tombstone left behind when a transaction or budget is deleted.
//!
//! Remote copies may outlive a local delete (the remote removal can fail or still be
//! queued). Tombstones keep such copies from being imported back into the local cache.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tombstone database model, keyed on `(record_type, record_id)`
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deleted_records")]
pub struct Model {
    /// `transaction` or `budget`
    #[sea_orm(primary_key, auto_increment = false)]
    pub record_type: String,
    /// Id of the deleted record
    #[sea_orm(primary_key, auto_increment = false)]
    pub record_id: String,
    /// When the local delete happened
    pub deleted_at: DateTimeUtc,
}

/// Tombstones have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
