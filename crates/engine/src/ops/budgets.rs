use sea_orm::{
    ConnectionTrait, QueryFilter, QueryOrder, Statement, TransactionTrait, Value, prelude::*,
};

use crate::{
    Budget, BudgetDraft, EngineError, Period, ResultEngine, budgets, budgets::DEFAULT_BUDGETS,
    categories, util::ensure_positive,
};

use super::{Engine, categories::category_resolver, with_tx};

impl Engine {
    /// Budgets of `user_id`, oldest first.
    ///
    /// A user without any budget gets [`DEFAULT_BUDGETS`] created on this
    /// first access.
    pub async fn list_budgets(&self, user_id: i64) -> ResultEngine<Vec<Budget>> {
        with_tx!(self, |db_tx| {
            seed_default_budgets(&db_tx, user_id).await?;
            load_budgets(&db_tx, user_id).await
        })
    }

    pub async fn create_budget(&self, user_id: i64, draft: BudgetDraft) -> ResultEngine<Budget> {
        ensure_positive(draft.limit, "limit")?;

        with_tx!(self, |db_tx| {
            let category = categories::Entity::find_by_id(draft.category_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("category".to_string()))?;
            let model = budgets::ActiveModel::new(user_id, &draft)
                .insert(&db_tx)
                .await?;
            let resolver = category_resolver(&db_tx).await?;
            Budget::from_row(model, Some(category), &resolver)
        })
    }
}

/// Inserts [`DEFAULT_BUDGETS`] unless `user_id` already has a budget.
///
/// The existence check and the insert are one statement, so the transaction
/// takes the write lock up front. Two first accesses racing on the same file
/// database queue on that lock instead of both reading and then failing to
/// upgrade with `SQLITE_BUSY`.
async fn seed_default_budgets<C: ConnectionTrait>(db: &C, user_id: i64) -> ResultEngine<()> {
    let rows = vec!["(?, ?)"; DEFAULT_BUDGETS.len()].join(", ");
    let sql = format!(
        "INSERT INTO budgets (user_id, category_id, limit_minor, period) \
         SELECT ?, defaults.column1, defaults.column2, ? \
         FROM (VALUES {rows}) AS defaults \
         WHERE NOT EXISTS (SELECT 1 FROM budgets WHERE user_id = ?);"
    );

    let mut values: Vec<Value> = vec![user_id.into(), Period::Monthly.as_str().into()];
    for (category_id, limit_cents) in DEFAULT_BUDGETS {
        values.push(category_id.into());
        values.push(limit_cents.into());
    }
    values.push(user_id.into());

    db.execute(Statement::from_sql_and_values(
        db.get_database_backend(),
        sql,
        values,
    ))
    .await?;
    Ok(())
}

async fn load_budgets<C: ConnectionTrait>(db: &C, user_id: i64) -> ResultEngine<Vec<Budget>> {
    let resolver = category_resolver(db).await?;
    budgets::Entity::find()
        .find_also_related(categories::Entity)
        .filter(budgets::Column::UserId.eq(user_id))
        .order_by_asc(budgets::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(|(model, category)| Budget::from_row(model, category, &resolver))
        .collect()
}
