//! Read-side views combining the stores with the pure budget engine.

use crate::{
    BudgetAlert, BudgetProgress, ResultEngine, SpendingOverview,
    aggregate::spending_overview,
    alerts::{evaluate, progress},
};

use super::{Engine, TransactionListFilter};

impl Engine {
    /// Current alerts of `user_id`, recomputed from scratch.
    pub async fn budget_alerts(&self, user_id: i64) -> ResultEngine<Vec<BudgetAlert>> {
        let budgets = self.list_budgets(user_id).await?;
        let transactions = self
            .list_transactions(user_id, &TransactionListFilter::default())
            .await?;
        Ok(evaluate(&budgets, &transactions))
    }

    pub async fn budget_progress(&self, user_id: i64) -> ResultEngine<Vec<BudgetProgress>> {
        let budgets = self.list_budgets(user_id).await?;
        let transactions = self
            .list_transactions(user_id, &TransactionListFilter::default())
            .await?;
        Ok(progress(&budgets, &transactions))
    }

    pub async fn spending_overview(&self, user_id: i64) -> ResultEngine<SpendingOverview> {
        let transactions = self
            .list_transactions(user_id, &TransactionListFilter::default())
            .await?;
        Ok(spending_overview(&transactions))
    }
}
