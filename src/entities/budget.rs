//! Budget entity - A per-category spending ceiling for one calendar month.
//!
//! At most one budget exists per `(user_id, category, month, year)`; the unique
//! index is created alongside the table in [`crate::config::database::create_tables`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    /// UUID assigned at creation
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Expense category this ceiling applies to
    pub category: String,
    /// Ceiling for the period in currency units
    pub amount: f64,
    /// Month of the period (1-12)
    pub month: i32,
    /// Year of the period
    pub year: i32,
    /// When the budget was first set
    pub created_at: DateTimeUtc,
    /// When the amount was last changed
    pub updated_at: DateTimeUtc,
}

/// Budgets have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
