//! Report generation business logic.
//!
//! This module provides dashboard totals, per-category spending, transaction filtering
//! and sorting, and text formatting helpers. All functions are pure and work on slices
//! of already-loaded records, so any front end can format the structured results.

use crate::{
    core::{period::Period, progress::BudgetProgress},
    entities::{TransactionType, transaction},
};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::HashMap};

/// Income and expense totals for the dashboard.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Sum of income
    pub total_income: f64,
    /// Sum of expenses
    pub total_expenses: f64,
    /// `total_income - total_expenses`
    pub balance: f64,
    /// Number of transactions counted
    pub transaction_count: usize,
}

/// Totals over `transactions`, optionally restricted to one period by attribution date.
#[must_use]
pub fn summarize(transactions: &[transaction::Model], period: Option<Period>) -> DashboardSummary {
    let mut summary = DashboardSummary::default();

    for t in transactions
        .iter()
        .filter(|t| period.is_none_or(|p| p.contains(t.date)))
    {
        match t.transaction_type {
            TransactionType::Income => summary.total_income += t.amount,
            TransactionType::Expense => summary.total_expenses += t.amount,
        }
        summary.transaction_count += 1;
    }

    summary.balance = summary.total_income - summary.total_expenses;
    summary
}

/// Expense totals per category for `period`, largest first, ties by name.
#[must_use]
pub fn spending_by_category(
    transactions: &[transaction::Model],
    period: Option<Period>,
) -> Vec<(String, f64)> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for t in transactions.iter().filter(|t| {
        t.transaction_type == TransactionType::Expense && period.is_none_or(|p| p.contains(t.date))
    }) {
        *totals.entry(t.category.as_str()).or_insert(0.0) += t.amount;
    }

    let mut sorted: Vec<(String, f64)> = totals
        .into_iter()
        .map(|(category, total)| (category.to_string(), total))
        .collect();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

/// Criteria for narrowing the transaction list. `None` fields match everything.
#[derive(Clone, Debug, Default)]
pub struct TransactionFilter {
    /// Only this type
    pub transaction_type: Option<TransactionType>,
    /// Only this category (exact match)
    pub category: Option<String>,
    /// Only transactions attributed to this period
    pub period: Option<Period>,
    /// Case-insensitive substring of description or category
    pub search: Option<String>,
}

impl TransactionFilter {
    /// Whether `t` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, t: &transaction::Model) -> bool {
        if self.transaction_type.is_some_and(|kind| kind != t.transaction_type) {
            return false;
        }
        if self.category.as_ref().is_some_and(|c| *c != t.category) {
            return false;
        }
        if self.period.is_some_and(|p| !p.contains(t.date)) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                t.description.to_lowercase().contains(&needle)
                    || t.category.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }
}

/// Ordering of the transaction list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Newest attribution date first
    #[default]
    DateDesc,
    /// Oldest attribution date first
    DateAsc,
    /// Largest amount first
    AmountDesc,
    /// Smallest amount first
    AmountAsc,
}

impl SortOrder {
    fn compare(self, a: &transaction::Model, b: &transaction::Model) -> Ordering {
        match self {
            Self::DateDesc => b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)),
            Self::DateAsc => a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)),
            Self::AmountDesc => b.amount.total_cmp(&a.amount),
            Self::AmountAsc => a.amount.total_cmp(&b.amount),
        }
    }
}

/// Returns the transactions matching `filter`, sorted by `order`.
#[must_use]
pub fn filter_transactions(
    transactions: &[transaction::Model],
    filter: &TransactionFilter,
    order: SortOrder,
) -> Vec<transaction::Model> {
    let mut matching: Vec<transaction::Model> = transactions
        .iter()
        .filter(|t| filter.matches(t))
        .cloned()
        .collect();
    matching.sort_by(|a, b| order.compare(a, b));
    matching
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80%`. The bar is clamped to
/// 0-100 but the printed percentage is the true value.
#[must_use]
pub fn format_progress_bar(percentage_used: i64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped = percentage_used.clamp(0, 100);

    // Cast safety: clamped ∈ [0, 100], length is small (10-20).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped as f64 / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    let filled_str = "█".repeat(filled);
    let empty_str = "░".repeat(empty);

    format!("[{filled_str}{empty_str}] {percentage_used}%")
}

/// Formats an amount with a sign and two decimals, e.g. `-$25.50`.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    if amount >= 0.0 {
        format!("${amount:.2}")
    } else {
        format!("-${:.2}", amount.abs())
    }
}

/// One-line summary of a progress entry.
#[must_use]
pub fn format_progress_line(progress: &BudgetProgress) -> String {
    format!(
        "{:<16} {} spent {} of {} ({} left)",
        progress.category,
        format_progress_bar(progress.percentage_used, None),
        format_amount(progress.spent_amount),
        format_amount(progress.budget_amount),
        format_amount(progress.remaining_amount),
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::transaction_record;

    fn sample() -> Vec<transaction::Model> {
        let mut coffee =
            transaction_record("t1", TransactionType::Expense, "FOOD", 4.5, (2024, 6, 3));
        coffee.description = "Morning coffee".to_string();
        vec![
            coffee,
            transaction_record("t2", TransactionType::Income, "SALARY", 3000.0, (2024, 6, 1)),
            transaction_record("t3", TransactionType::Expense, "HOUSING", 1200.0, (2024, 6, 1)),
            transaction_record("t4", TransactionType::Expense, "FOOD", 60.0, (2024, 5, 28)),
        ]
    }

    #[test]
    fn test_summarize_all_time() {
        let summary = summarize(&sample(), None);
        assert_eq!(summary.total_income, 3000.0);
        assert_eq!(summary.total_expenses, 1264.5);
        assert_eq!(summary.balance, 1735.5);
        assert_eq!(summary.transaction_count, 4);
    }

    #[test]
    fn test_summarize_for_period() {
        let june = Period { year: 2024, month: 6 };
        let summary = summarize(&sample(), Some(june));
        assert_eq!(summary.total_expenses, 1204.5);
        assert_eq!(summary.transaction_count, 3);
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[], None), DashboardSummary::default());
    }

    #[test]
    fn test_spending_by_category_sorted() {
        let totals = spending_by_category(&sample(), None);
        assert_eq!(
            totals,
            vec![("HOUSING".to_string(), 1200.0), ("FOOD".to_string(), 64.5)]
        );
    }

    #[test]
    fn test_filter_by_type_and_period() {
        let filter = TransactionFilter {
            transaction_type: Some(TransactionType::Expense),
            period: Some(Period { year: 2024, month: 6 }),
            ..TransactionFilter::default()
        };
        let ids: Vec<String> = filter_transactions(&sample(), &filter, SortOrder::AmountDesc)
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["t3", "t1"]);
    }

    #[test]
    fn test_filter_search_matches_description_case_insensitively() {
        let filter = TransactionFilter {
            search: Some("COFFEE".to_string()),
            ..TransactionFilter::default()
        };
        let found = filter_transactions(&sample(), &filter, SortOrder::DateDesc);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "t1");
    }

    #[test]
    fn test_filter_by_category() {
        let filter = TransactionFilter {
            category: Some("FOOD".to_string()),
            ..TransactionFilter::default()
        };
        let ids: Vec<String> = filter_transactions(&sample(), &filter, SortOrder::DateAsc)
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["t4", "t1"]);
    }

    #[test]
    fn test_format_progress_bar_half() {
        assert_eq!(format_progress_bar(50, Some(10)), "[█████░░░░░] 50%");
    }

    #[test]
    fn test_format_progress_bar_overspent_shows_true_value() {
        assert_eq!(format_progress_bar(125, Some(10)), "[██████████] 125%");
    }

    #[test]
    fn test_format_progress_bar_zero() {
        assert_eq!(format_progress_bar(0, Some(4)), "[░░░░] 0%");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(50.0), "$50.00");
        assert_eq!(format_amount(-25.5), "-$25.50");
        assert_eq!(format_amount(0.0), "$0.00");
    }
}
