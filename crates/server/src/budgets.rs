//! Budgets API endpoints.

use api_types::budget::{
    BudgetListResponse, BudgetNew, BudgetProgressResponse, BudgetProgressView, BudgetView,
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::{BudgetDraft, Period};

use crate::{ServerError, money_field, server::ServerState, server::UserId};

fn map_budget(budget: engine::Budget) -> BudgetView {
    BudgetView {
        id: budget.id,
        category_id: budget.category.id,
        category: budget.category.name,
        limit_minor: budget.limit.cents(),
        period: budget.period.as_str().to_string(),
    }
}

fn map_progress(row: engine::BudgetProgress) -> BudgetProgressView {
    BudgetProgressView {
        budget_id: row.budget_id,
        category: row.category,
        spent_minor: row.spent.cents(),
        limit_minor: row.limit.cents(),
        percentage: row.percentage,
        status: row.status.as_str().to_string(),
    }
}

pub async fn list(
    Extension(UserId(user_id)): Extension<UserId>,
    State(state): State<ServerState>,
) -> Result<Json<BudgetListResponse>, ServerError> {
    let budgets = state
        .engine
        .list_budgets(user_id)
        .await?
        .into_iter()
        .map(map_budget)
        .collect();

    Ok(Json(BudgetListResponse { budgets }))
}

pub async fn create(
    Extension(UserId(user_id)): Extension<UserId>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetNew>,
) -> Result<(StatusCode, Json<BudgetView>), ServerError> {
    let period = match payload.period.as_deref() {
        Some(period) => Period::try_from(period)?,
        None => Period::Monthly,
    };
    let draft = BudgetDraft {
        category_id: payload.category_id,
        limit: money_field(payload.limit_minor, payload.limit.as_deref(), "limit")?,
        period,
    };
    let budget = state.engine.create_budget(user_id, draft).await?;
    Ok((StatusCode::CREATED, Json(map_budget(budget))))
}

pub async fn progress(
    Extension(UserId(user_id)): Extension<UserId>,
    State(state): State<ServerState>,
) -> Result<Json<BudgetProgressResponse>, ServerError> {
    let budgets = state
        .engine
        .budget_progress(user_id)
        .await?
        .into_iter()
        .map(map_progress)
        .collect();

    Ok(Json(BudgetProgressResponse { budgets }))
}
