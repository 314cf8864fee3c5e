//! Budget progress calculation.
//!
//! Given a user's budgets and transactions, [`compute_progress`] reports how much of
//! each budget for a target month has been spent. The computation is pure: inputs are
//! read-only snapshots, there is no I/O, and identical inputs always give identical
//! output. [`has_progress_changed`] lets callers skip redundant downstream updates.

use crate::{
    core::period::Period,
    entities::{TransactionType, budget, transaction},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Percentage at which a budget is reported as near its limit, unless configured otherwise.
pub const DEFAULT_NEAR_LIMIT_PERCENT: i64 = 80;

/// Spending-versus-budget for one category in the target period.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    /// Id of the budget this entry was derived from
    pub budget_id: String,
    /// Category the budget applies to
    pub category: String,
    /// Budget ceiling
    pub budget_amount: f64,
    /// Expenses in the category during the period
    pub spent_amount: f64,
    /// `budget_amount - spent_amount`; negative when over budget
    pub remaining_amount: f64,
    /// Rounded share of the budget spent; not clamped, may exceed 100
    pub percentage_used: i64,
    /// `spent_amount > budget_amount`
    pub is_over_budget: bool,
}

/// Coarse state of a budget, for highlighting in the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    /// Below the near-limit threshold
    OnTrack,
    /// At or above the threshold but not over
    NearLimit,
    /// Spending exceeds the budget
    OverBudget,
}

impl BudgetProgress {
    /// Classifies this entry using `near_limit_percent` as the warning threshold.
    #[must_use]
    pub const fn status(&self, near_limit_percent: i64) -> ProgressStatus {
        if self.is_over_budget {
            ProgressStatus::OverBudget
        } else if self.percentage_used >= near_limit_percent {
            ProgressStatus::NearLimit
        } else {
            ProgressStatus::OnTrack
        }
    }
}

/// Rounded percentage of `budget` that `spent` represents, or 0 for a non-positive budget.
#[must_use]
pub fn calculate_percentage(spent: f64, budget: f64) -> i64 {
    if budget <= 0.0 {
        return 0;
    }

    // Cast safety: display value, realistic amounts stay far inside i64.
    #[allow(clippy::cast_possible_truncation)]
    let percentage = (spent / budget * 100.0).round() as i64;
    percentage
}

/// Computes per-category progress for the budgets of the target period.
///
/// Missing `target_month`/`target_year` default to the current month/year. Only
/// budgets whose `(month, year)` equal the target are reported, in input order.
/// Spending is the sum of `EXPENSE` transactions whose attribution `date` falls in
/// the target month, grouped by the raw category string. Neither list is filtered
/// by user; callers pass one user's records.
#[must_use]
pub fn compute_progress(
    budgets: &[budget::Model],
    transactions: &[transaction::Model],
    target_month: Option<u32>,
    target_year: Option<i32>,
) -> Vec<BudgetProgress> {
    let period = Period::resolve(target_month, target_year);

    let period_budgets: Vec<&budget::Model> = budgets
        .iter()
        .filter(|b| period.matches(b.month, b.year))
        .collect();

    if period_budgets.is_empty() {
        return Vec::new();
    }

    let spent_by_category = spending_by_category(transactions, period);

    period_budgets
        .into_iter()
        .map(|b| {
            let spent_amount = spent_by_category
                .get(b.category.as_str())
                .copied()
                .unwrap_or(0.0);

            BudgetProgress {
                budget_id: b.id.clone(),
                category: b.category.clone(),
                budget_amount: b.amount,
                spent_amount,
                remaining_amount: b.amount - spent_amount,
                percentage_used: calculate_percentage(spent_amount, b.amount),
                is_over_budget: spent_amount > b.amount,
            }
        })
        .collect()
}

/// Single pass over `transactions` summing expenses in `period` per category.
fn spending_by_category(
    transactions: &[transaction::Model],
    period: Period,
) -> HashMap<&str, f64> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for t in transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Expense && period.contains(t.date))
    {
        *totals.entry(t.category.as_str()).or_insert(0.0) += t.amount;
    }
    totals
}

/// Whether `next` differs materially from `previous`.
///
/// Only the list length and, per index, `percentage_used`, `spent_amount` and
/// `is_over_budget` are compared.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn has_progress_changed(previous: &[BudgetProgress], next: &[BudgetProgress]) -> bool {
    previous.len() != next.len()
        || previous.iter().zip(next).any(|(old, new)| {
            old.percentage_used != new.percentage_used
                || old.spent_amount != new.spent_amount
                || old.is_over_budget != new.is_over_budget
        })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{budget_record, transaction_record};
    use chrono::Datelike;

    fn june_food_budget() -> budget::Model {
        budget_record("b1", "FOOD", 200.0, 6, 2024)
    }

    #[test]
    fn test_sums_expenses_in_period() {
        let budgets = vec![june_food_budget()];
        let transactions = vec![
            transaction_record("t1", TransactionType::Expense, "FOOD", 50.0, (2024, 6, 5)),
            transaction_record("t2", TransactionType::Expense, "FOOD", 30.0, (2024, 6, 10)),
        ];

        let progress = compute_progress(&budgets, &transactions, Some(6), Some(2024));

        assert_eq!(
            progress,
            vec![BudgetProgress {
                budget_id: "b1".to_string(),
                category: "FOOD".to_string(),
                budget_amount: 200.0,
                spent_amount: 80.0,
                remaining_amount: 120.0,
                percentage_used: 40,
                is_over_budget: false,
            }]
        );
    }

    #[test]
    fn test_over_budget_is_not_clamped() {
        let budgets = vec![june_food_budget()];
        let transactions = vec![transaction_record(
            "t1",
            TransactionType::Expense,
            "FOOD",
            250.0,
            (2024, 6, 1),
        )];

        let progress = compute_progress(&budgets, &transactions, Some(6), Some(2024));

        assert_eq!(progress[0].spent_amount, 250.0);
        assert_eq!(progress[0].remaining_amount, -50.0);
        assert_eq!(progress[0].percentage_used, 125);
        assert!(progress[0].is_over_budget);
    }

    #[test]
    fn test_zero_budget_reports_zero_percent_but_over_budget() {
        let budgets = vec![budget_record("b1", "TRANSPORTATION", 0.0, 6, 2024)];
        let transactions = vec![transaction_record(
            "t1",
            TransactionType::Expense,
            "TRANSPORTATION",
            40.0,
            (2024, 6, 3),
        )];

        let progress = compute_progress(&budgets, &transactions, Some(6), Some(2024));

        assert_eq!(progress[0].percentage_used, 0);
        assert!(progress[0].is_over_budget);
        assert_eq!(progress[0].remaining_amount, -40.0);
    }

    #[test]
    fn test_no_budgets_for_period_yields_empty() {
        let budgets = vec![budget_record("b1", "FOOD", 200.0, 5, 2024)];
        let transactions = vec![transaction_record(
            "t1",
            TransactionType::Expense,
            "FOOD",
            10.0,
            (2024, 6, 3),
        )];

        assert!(compute_progress(&budgets, &transactions, Some(6), Some(2024)).is_empty());
        assert!(compute_progress(&[], &transactions, Some(6), Some(2024)).is_empty());
    }

    #[test]
    fn test_transactions_outside_period_are_excluded() {
        let budgets = vec![june_food_budget()];
        let transactions = vec![
            transaction_record("t1", TransactionType::Expense, "FOOD", 10.0, (2024, 5, 31)),
            transaction_record("t2", TransactionType::Expense, "FOOD", 10.0, (2024, 7, 1)),
            transaction_record("t3", TransactionType::Expense, "FOOD", 10.0, (2023, 6, 15)),
        ];

        let progress = compute_progress(&budgets, &transactions, Some(6), Some(2024));

        assert_eq!(progress[0].spent_amount, 0.0);
        assert_eq!(progress[0].percentage_used, 0);
        assert!(!progress[0].is_over_budget);
    }

    #[test]
    fn test_period_uses_attribution_date_not_created_at() {
        let budgets = vec![june_food_budget()];
        let mut t = transaction_record("t1", TransactionType::Expense, "FOOD", 20.0, (2024, 6, 30));
        // Recorded a month later, still attributed to June
        t.created_at = chrono::DateTime::parse_from_rfc3339("2024-07-15T09:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);

        let progress = compute_progress(&budgets, &[t], Some(6), Some(2024));
        assert_eq!(progress[0].spent_amount, 20.0);
    }

    #[test]
    fn test_income_never_counts_as_spending() {
        let budgets = vec![june_food_budget()];
        let transactions = vec![
            transaction_record("t1", TransactionType::Income, "FOOD", 500.0, (2024, 6, 5)),
            transaction_record("t2", TransactionType::Expense, "FOOD", 25.0, (2024, 6, 5)),
        ];

        let progress = compute_progress(&budgets, &transactions, Some(6), Some(2024));
        assert_eq!(progress[0].spent_amount, 25.0);
    }

    #[test]
    fn test_spending_exactly_at_budget_is_not_over() {
        let budgets = vec![june_food_budget()];
        let transactions = vec![transaction_record(
            "t1",
            TransactionType::Expense,
            "FOOD",
            200.0,
            (2024, 6, 5),
        )];

        let progress = compute_progress(&budgets, &transactions, Some(6), Some(2024));
        assert_eq!(progress[0].percentage_used, 100);
        assert_eq!(progress[0].remaining_amount, 0.0);
        assert!(!progress[0].is_over_budget);
    }

    #[test]
    fn test_keeps_budget_order_and_skips_other_periods() {
        let budgets = vec![
            budget_record("b1", "SHOPPING", 50.0, 6, 2024),
            budget_record("b2", "FOOD", 200.0, 7, 2024),
            budget_record("b3", "ENTERTAINMENT", 75.0, 6, 2024),
            budget_record("b4", "FOOD", 100.0, 6, 2024),
        ];

        let progress = compute_progress(&budgets, &[], Some(6), Some(2024));
        let ids: Vec<&str> = progress.iter().map(|p| p.budget_id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b3", "b4"]);
    }

    #[test]
    fn test_unknown_categories_are_grouped_verbatim() {
        let budgets = vec![budget_record("b1", "Pet supplies", 40.0, 6, 2024)];
        let transactions = vec![
            transaction_record("t1", TransactionType::Expense, "Pet supplies", 15.0, (2024, 6, 2)),
            transaction_record("t2", TransactionType::Expense, "pet supplies", 99.0, (2024, 6, 2)),
        ];

        let progress = compute_progress(&budgets, &transactions, Some(6), Some(2024));
        assert_eq!(progress[0].spent_amount, 15.0);
    }

    #[test]
    fn test_summation_is_order_independent() {
        let budgets = vec![june_food_budget()];
        let mut transactions = vec![
            transaction_record("t1", TransactionType::Expense, "FOOD", 12.5, (2024, 6, 1)),
            transaction_record("t2", TransactionType::Expense, "FOOD", 7.25, (2024, 6, 2)),
            transaction_record("t3", TransactionType::Expense, "FOOD", 30.0, (2024, 6, 3)),
        ];

        let forward = compute_progress(&budgets, &transactions, Some(6), Some(2024));
        transactions.reverse();
        let backward = compute_progress(&budgets, &transactions, Some(6), Some(2024));

        assert_eq!(forward[0].spent_amount, 49.75);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_is_idempotent_across_fresh_inputs() {
        let make = || {
            (
                vec![june_food_budget()],
                vec![transaction_record(
                    "t1",
                    TransactionType::Expense,
                    "FOOD",
                    66.0,
                    (2024, 6, 9),
                )],
            )
        };
        let (b1, t1) = make();
        let (b2, t2) = make();

        assert_eq!(
            compute_progress(&b1, &t1, Some(6), Some(2024)),
            compute_progress(&b2, &t2, Some(6), Some(2024))
        );
    }

    #[test]
    fn test_defaults_to_current_period() {
        let now = Period::current();
        let budgets = vec![budget_record(
            "b1",
            "FOOD",
            100.0,
            now.month_i32(),
            now.year,
        )];
        let today = chrono::Local::now().date_naive();
        let transactions = vec![transaction_record(
            "t1",
            TransactionType::Expense,
            "FOOD",
            10.0,
            (today.year(), today.month(), today.day()),
        )];

        let progress = compute_progress(&budgets, &transactions, None, None);
        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].spent_amount, 10.0);
    }

    #[test]
    fn test_calculate_percentage_rounds() {
        assert_eq!(calculate_percentage(1.0, 3.0), 33);
        assert_eq!(calculate_percentage(2.0, 3.0), 67);
        assert_eq!(calculate_percentage(1.0, 200.0), 1);
        assert_eq!(calculate_percentage(50.0, 0.0), 0);
    }

    #[test]
    fn test_status_thresholds() {
        let mut entry = compute_progress(
            &[june_food_budget()],
            &[transaction_record(
                "t1",
                TransactionType::Expense,
                "FOOD",
                100.0,
                (2024, 6, 1),
            )],
            Some(6),
            Some(2024),
        )
        .remove(0);
        assert_eq!(entry.status(DEFAULT_NEAR_LIMIT_PERCENT), ProgressStatus::OnTrack);

        entry.percentage_used = 80;
        assert_eq!(entry.status(DEFAULT_NEAR_LIMIT_PERCENT), ProgressStatus::NearLimit);

        entry.is_over_budget = true;
        assert_eq!(entry.status(DEFAULT_NEAR_LIMIT_PERCENT), ProgressStatus::OverBudget);
    }

    #[test]
    fn test_has_progress_changed_ignores_remaining_only_differences() {
        let base = compute_progress(&[june_food_budget()], &[], Some(6), Some(2024));
        let mut other = base.clone();
        other[0].remaining_amount = 1.0;
        other[0].budget_amount = 999.0;
        assert!(!has_progress_changed(&base, &other));
    }

    #[test]
    fn test_has_progress_changed_detects_material_differences() {
        let base = compute_progress(&[june_food_budget()], &[], Some(6), Some(2024));

        let mut spent = base.clone();
        spent[0].spent_amount = 1.0;
        assert!(has_progress_changed(&base, &spent));

        let mut percent = base.clone();
        percent[0].percentage_used = 1;
        assert!(has_progress_changed(&base, &percent));

        let mut over = base.clone();
        over[0].is_over_budget = true;
        assert!(has_progress_changed(&base, &over));

        assert!(has_progress_changed(&base, &[]));
        assert!(!has_progress_changed(&[], &[]));
    }
}
