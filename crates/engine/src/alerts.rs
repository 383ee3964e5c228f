//! Budget threshold evaluation.
//!
//! [`evaluate`] compares what was spent in each budget's category with the
//! budget limit and reports the budgets that reached 90% (warning) or 100%
//! (critical) of it. The result is a pure function of its inputs and is meant
//! to replace any previous alert list wholesale.

use crate::{Budget, MoneyCents, Transaction, aggregate::aggregate};

const WARNING_PERCENT: i64 = 90;
const CRITICAL_PERCENT: i64 = 100;
const WATCH_PERCENT: i64 = 80;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BudgetAlert {
    pub budget_id: i64,
    pub category: String,
    pub spent: MoneyCents,
    pub limit: MoneyCents,
    pub percentage: f64,
    pub severity: Severity,
}

impl BudgetAlert {
    /// Amount left before the limit is hit (negative once exceeded).
    pub fn remaining(&self) -> MoneyCents {
        self.limit - self.spent
    }
}

/// Alerts for every budget at or above the warning threshold, in budget
/// order. Budgets without a positive limit are skipped.
pub fn evaluate(budgets: &[Budget], transactions: &[Transaction]) -> Vec<BudgetAlert> {
    budgets
        .iter()
        .filter_map(|budget| {
            let spent = aggregate(transactions, &budget.category.name);
            let percentage = spent.percent_of(budget.limit)?;

            let severity = if spent.reaches_percent_of(budget.limit, CRITICAL_PERCENT) {
                Severity::Critical
            } else if spent.reaches_percent_of(budget.limit, WARNING_PERCENT) {
                Severity::Warning
            } else {
                return None;
            };

            Some(BudgetAlert {
                budget_id: budget.id,
                category: budget.category.name.clone(),
                spent,
                limit: budget.limit,
                percentage,
                severity,
            })
        })
        .collect()
}

/// Alerts of `current` whose budget is not among `seen_budget_ids`.
pub fn newly_raised<'a>(seen_budget_ids: &[i64], current: &'a [BudgetAlert]) -> Vec<&'a BudgetAlert> {
    current
        .iter()
        .filter(|alert| !seen_budget_ids.contains(&alert.budget_id))
        .collect()
}

/// Whether the dashboard should flag new alerts, given how many it showed.
pub fn has_new_alert(previous_count: usize, current: &[BudgetAlert]) -> bool {
    current.len() > previous_count
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BudgetStatus {
    Ok,
    Watch,
    Warning,
    Critical,
}

impl BudgetStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Watch => "watch",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

/// One row of the budgets table.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetProgress {
    pub budget_id: i64,
    pub category: String,
    pub spent: MoneyCents,
    pub limit: MoneyCents,
    /// Capped at 100 for progress bars; 0 when no limit is set.
    pub percentage: f64,
    pub status: BudgetStatus,
}

/// Progress of every budget, including the ones without alerts.
pub fn progress(budgets: &[Budget], transactions: &[Transaction]) -> Vec<BudgetProgress> {
    budgets
        .iter()
        .map(|budget| {
            let spent = aggregate(transactions, &budget.category.name);
            let (percentage, status) = match spent.percent_of(budget.limit) {
                None => (0.0, BudgetStatus::Ok),
                Some(percentage) => {
                    let status = if spent.reaches_percent_of(budget.limit, CRITICAL_PERCENT) {
                        BudgetStatus::Critical
                    } else if spent.reaches_percent_of(budget.limit, WARNING_PERCENT) {
                        BudgetStatus::Warning
                    } else if spent.reaches_percent_of(budget.limit, WATCH_PERCENT) {
                        BudgetStatus::Watch
                    } else {
                        BudgetStatus::Ok
                    };
                    (percentage.min(100.0), status)
                }
            };
            BudgetProgress {
                budget_id: budget.id,
                category: budget.category.name.clone(),
                spent,
                limit: budget.limit,
                percentage,
                status,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Period, ResolvedCategory, aggregate::tests::tx};

    fn budget(id: i64, category: &str, limit_cents: i64) -> Budget {
        Budget {
            id,
            user_id: 1,
            category: ResolvedCategory {
                id: None,
                name: category.to_string(),
            },
            limit: MoneyCents::new(limit_cents),
            period: Period::Monthly,
        }
    }

    #[test]
    fn empty_inputs_yield_no_alerts() {
        let budgets = vec![budget(1, "Shopping", 100_00)];
        let txs = vec![tx(1, 500_00, "Shopping")];
        assert!(evaluate(&[], &txs).is_empty());
        assert!(evaluate(&budgets, &[]).is_empty());
    }

    #[test]
    fn exactly_ninety_percent_is_a_warning() {
        let budgets = vec![budget(1, "Shopping", 100_00)];
        let alerts = evaluate(&budgets, &[tx(1, 90_00, "Shopping")]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Warning);
        assert_eq!(alerts[0].percentage, 90.0);
    }

    #[test]
    fn exactly_one_hundred_percent_is_critical() {
        let budgets = vec![budget(1, "Shopping", 100_00)];
        let alerts = evaluate(&budgets, &[tx(1, 100_00, "Shopping")]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Critical);
        assert_eq!(alerts[0].percentage, 100.0);
    }

    #[test]
    fn just_below_ninety_percent_is_quiet() {
        let budgets = vec![budget(1, "Shopping", 100_00)];
        assert!(evaluate(&budgets, &[tx(1, 89_99, "Shopping")]).is_empty());
    }

    #[test]
    fn zero_limit_budget_never_alerts() {
        let budgets = vec![budget(1, "Shopping", 0), budget(2, "Shopping", 10_00)];
        let alerts = evaluate(&budgets, &[tx(1, 1_000_00, "Shopping")]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].budget_id, 2);
    }

    #[test]
    fn income_is_excluded_from_the_food_budget() {
        let budgets = vec![budget(1, "Food & Dining", 500_00)];
        let txs = vec![tx(1, 450_00, "Food & Dining"), tx(2, 50_00, "Income")];
        let alerts = evaluate(&budgets, &txs);
        assert_eq!(
            alerts,
            vec![BudgetAlert {
                budget_id: 1,
                category: "Food & Dining".to_string(),
                spent: MoneyCents::new(450_00),
                limit: MoneyCents::new(500_00),
                percentage: 90.0,
                severity: Severity::Warning,
            }]
        );
        assert_eq!(alerts[0].remaining(), MoneyCents::new(50_00));
    }

    #[test]
    fn alerts_keep_budget_order_and_are_idempotent() {
        let budgets = vec![
            budget(3, "Transportation", 50_00),
            budget(1, "Food & Dining", 100_00),
            budget(2, "Shopping", 100_00),
        ];
        let txs = vec![
            tx(1, 95_00, "Food & Dining"),
            tx(2, 60_00, "Transportation"),
            tx(3, 10_00, "Shopping"),
        ];
        let first = evaluate(&budgets, &txs);
        let second = evaluate(&budgets, &txs);
        assert_eq!(first, second);
        let ids: Vec<i64> = first.iter().map(|a| a.budget_id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(first[0].severity, Severity::Critical);
        assert_eq!(first[1].severity, Severity::Warning);
    }

    #[test]
    fn newly_raised_skips_already_seen_budgets() {
        let budgets = vec![budget(1, "Shopping", 10_00), budget(2, "Other", 10_00)];
        let txs = vec![tx(1, 10_00, "Shopping"), tx(2, 9_50, "Other")];
        let alerts = evaluate(&budgets, &txs);
        let fresh = newly_raised(&[1], &alerts);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].budget_id, 2);
        assert!(has_new_alert(1, &alerts));
        assert!(!has_new_alert(2, &alerts));
    }

    #[test]
    fn progress_caps_percentage_and_grades_status() {
        let budgets = vec![
            budget(1, "Shopping", 100_00),
            budget(2, "Food & Dining", 100_00),
            budget(3, "Other", 0),
            budget(4, "Transportation", 100_00),
        ];
        let txs = vec![
            tx(1, 150_00, "Shopping"),
            tx(2, 85_00, "Food & Dining"),
            tx(3, 5_00, "Other"),
            tx(4, 10_00, "Transportation"),
        ];
        let rows = progress(&budgets, &txs);
        assert_eq!(rows[0].percentage, 100.0);
        assert_eq!(rows[0].status, BudgetStatus::Critical);
        assert_eq!(rows[1].status, BudgetStatus::Watch);
        assert_eq!(rows[2].percentage, 0.0);
        assert_eq!(rows[2].status, BudgetStatus::Ok);
        assert_eq!(rows[3].status, BudgetStatus::Ok);
    }

    #[test]
    fn huge_amounts_saturate_into_a_critical_alert() {
        let budgets = vec![budget(1, "Shopping", 100_00)];
        let txs = vec![
            tx(1, i64::MAX / 2 + 1, "Shopping"),
            tx(2, i64::MAX / 2 + 1, "Shopping"),
        ];
        let alerts = evaluate(&budgets, &txs);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Critical);
        assert_eq!(alerts[0].spent, MoneyCents::new(i64::MAX));

        let rows = progress(&budgets, &txs);
        assert_eq!(rows[0].percentage, 100.0);
        assert_eq!(rows[0].status, BudgetStatus::Critical);
    }
}
