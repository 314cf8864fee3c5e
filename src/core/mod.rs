//! Core business logic - framework-agnostic budget, transaction and reporting operations.

/// Expense and income category sets, custom category resolution
pub mod category;
/// Budget upsert, listing and deletion
pub mod budget;
/// Target month/year handling
pub mod period;
/// Budget progress calculation and change detection
pub mod progress;
/// Dashboard totals, filtering, sorting and formatting
pub mod report;
/// Tombstones for locally deleted records
pub mod tombstone;
/// Transaction creation, listing and deletion
pub mod transaction;
