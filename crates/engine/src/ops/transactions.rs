use chrono::{DateTime, Utc};
use sea_orm::{QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, Transaction, TransactionDraft, categories, transactions,
    util::{ensure_positive, normalize_optional_text},
};

use super::{Engine, categories::category_resolver, with_tx};

/// Filters for listing transactions.
///
/// `from` is inclusive and `to` is exclusive (`[from, to)`), both in UTC.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<u64>,
}

fn validate_list_filter(filter: &TransactionListFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from >= to
    {
        return Err(EngineError::InvalidFilter(
            "from must be < to".to_string(),
        ));
    }
    if filter.limit == Some(0) {
        return Err(EngineError::InvalidFilter(
            "limit must be > 0".to_string(),
        ));
    }
    Ok(())
}

impl Engine {
    /// Transactions of `user_id`, newest first.
    ///
    /// Rows whose category relation is gone come back as `"Uncategorized"`.
    pub async fn list_transactions(
        &self,
        user_id: i64,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        validate_list_filter(filter)?;

        let mut query = transactions::Entity::find()
            .find_also_related(categories::Entity)
            .filter(transactions::Column::UserId.eq(user_id));
        if let Some(from) = filter.from {
            query = query.filter(transactions::Column::OccurredAt.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(transactions::Column::OccurredAt.lt(to));
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        let rows = query
            .order_by_desc(transactions::Column::OccurredAt)
            .order_by_desc(transactions::Column::Id)
            .all(&self.database)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(model, category)| Transaction::from_row(model, category))
            .collect())
    }

    /// Store a new transaction; its category is resolved once, here.
    pub async fn create_transaction(
        &self,
        user_id: i64,
        draft: TransactionDraft,
    ) -> ResultEngine<Transaction> {
        ensure_positive(draft.amount, "amount")?;
        let draft = TransactionDraft {
            merchant: normalize_optional_text(draft.merchant.as_deref()),
            raw_text: normalize_optional_text(draft.raw_text.as_deref()),
            ..draft
        };

        with_tx!(self, |db_tx| {
            let resolver = category_resolver(&db_tx).await?;
            let category_id = resolver.storage_id(draft.category.as_ref());
            let model = transactions::ActiveModel::new(user_id, category_id, &draft)
                .insert(&db_tx)
                .await?;
            let category = categories::Entity::find_by_id(category_id).one(&db_tx).await?;
            Ok::<_, EngineError>(Transaction::from_row(model, category))
        })
    }
}
