//! Budget alert endpoints.

use api_types::alert::{AlertPreview, AlertView, AlertsQuery, AlertsResponse};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::Utc;
use engine::{Budget, Fallback, MoneyCents, Period, Transaction, evaluate, has_new_alert};

use crate::{ServerError, category_ref, server::ServerState, server::UserId};

fn map_alert(alert: &engine::BudgetAlert) -> AlertView {
    AlertView {
        budget_id: alert.budget_id,
        category: alert.category.clone(),
        spent_minor: alert.spent.cents(),
        limit_minor: alert.limit.cents(),
        percentage: alert.percentage,
        severity: alert.severity.as_str().to_string(),
    }
}

pub async fn list(
    Extension(UserId(user_id)): Extension<UserId>,
    State(state): State<ServerState>,
    Query(query): Query<AlertsQuery>,
) -> Result<Json<AlertsResponse>, ServerError> {
    let alerts = state.engine.budget_alerts(user_id).await?;
    let has_new_alert = query.known.map(|known| has_new_alert(known, &alerts));

    Ok(Json(AlertsResponse {
        alerts: alerts.iter().map(map_alert).collect(),
        has_new_alert,
    }))
}

/// Evaluate records sent by the client instead of the stored ones.
///
/// Categories may arrive as a name, an id or an object; records without one
/// are counted under `"Unknown"`.
pub async fn preview(
    Extension(UserId(user_id)): Extension<UserId>,
    State(state): State<ServerState>,
    Json(payload): Json<AlertPreview>,
) -> Result<Json<AlertsResponse>, ServerError> {
    let resolver = state.engine.category_resolver().await?;
    let now = Utc::now();

    let budgets: Vec<Budget> = payload
        .budgets
        .into_iter()
        .map(|raw| Budget {
            id: raw.id,
            user_id,
            category: resolver.resolve(
                raw.category.map(category_ref).as_ref(),
                Fallback::Unknown,
            ),
            limit: MoneyCents::new(raw.limit_minor),
            period: Period::Monthly,
        })
        .collect();
    let transactions: Vec<Transaction> = payload
        .transactions
        .into_iter()
        .map(|raw| Transaction {
            id: raw.id,
            user_id,
            amount: MoneyCents::new(raw.amount_minor),
            category: resolver.resolve(
                raw.category.map(category_ref).as_ref(),
                Fallback::Unknown,
            ),
            merchant: None,
            occurred_at: now,
            raw_text: None,
        })
        .collect();

    let alerts = evaluate(&budgets, &transactions);
    Ok(Json(AlertsResponse {
        alerts: alerts.iter().map(map_alert).collect(),
        has_new_alert: None,
    }))
}
