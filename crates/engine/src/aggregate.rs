//! Spend aggregation over already-loaded transactions.

use crate::{
    MoneyCents, Transaction,
    resolver::{DEFAULT_CATEGORIES, INCOME, OTHER},
};

/// Total spent in `category_name`.
///
/// Income is never spend, so asking for `"Income"` always yields zero.
pub fn aggregate(transactions: &[Transaction], category_name: &str) -> MoneyCents {
    if category_name == INCOME {
        return MoneyCents::ZERO;
    }
    transactions
        .iter()
        .filter(|tx| !tx.is_income() && tx.category.name == category_name)
        .map(|tx| tx.amount)
        .sum()
}

/// Total of every income transaction.
pub fn total_income(transactions: &[Transaction]) -> MoneyCents {
    transactions
        .iter()
        .filter(|tx| tx.is_income())
        .map(|tx| tx.amount)
        .sum()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategorySpend {
    pub name: String,
    pub spent: MoneyCents,
}

/// Dashboard summary of non-income spending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpendingOverview {
    pub total_spent: MoneyCents,
    pub transaction_count: usize,
    /// Built-in spend categories in table order; names outside the table are
    /// folded into `"Other"`, empty buckets are omitted.
    pub by_category: Vec<CategorySpend>,
}

pub fn spending_overview(transactions: &[Transaction]) -> SpendingOverview {
    let mut buckets: Vec<CategorySpend> = DEFAULT_CATEGORIES
        .iter()
        .filter(|(_, name)| *name != INCOME)
        .map(|(_, name)| CategorySpend {
            name: (*name).to_string(),
            spent: MoneyCents::ZERO,
        })
        .collect();

    let mut overview = SpendingOverview::default();
    for tx in transactions.iter().filter(|tx| !tx.is_income()) {
        overview.total_spent += tx.amount;
        overview.transaction_count += 1;

        let index = buckets
            .iter()
            .position(|bucket| bucket.name == tx.category.name)
            .or_else(|| buckets.iter().position(|bucket| bucket.name == OTHER));
        if let Some(index) = index {
            buckets[index].spent += tx.amount;
        }
    }

    overview.by_category = buckets
        .into_iter()
        .filter(|bucket| !bucket.spent.is_zero())
        .collect();
    overview
}
