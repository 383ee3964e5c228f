//! Transactions API endpoints.

use api_types::transaction::{
    TransactionListQuery, TransactionListResponse, TransactionNew, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{TransactionDraft, TransactionListFilter};

use crate::{ServerError, category_ref, money_field, server::ServerState, server::UserId};

pub(crate) fn map_transaction(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        amount_minor: tx.amount.cents(),
        category_id: tx.category.id,
        category: tx.category.name,
        merchant: tx.merchant,
        occurred_at: tx.occurred_at,
        raw_text: tx.raw_text,
    }
}

pub async fn list(
    Extension(UserId(user_id)): Extension<UserId>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let filter = TransactionListFilter {
        from: query.from,
        to: query.to,
        limit: query.limit,
    };
    let transactions = state
        .engine
        .list_transactions(user_id, &filter)
        .await?
        .into_iter()
        .map(map_transaction)
        .collect();

    Ok(Json(TransactionListResponse { transactions }))
}

pub async fn create(
    Extension(UserId(user_id)): Extension<UserId>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let amount = money_field(payload.amount_minor, payload.amount.as_deref(), "amount")?;
    let draft = TransactionDraft {
        amount,
        category: payload.category.map(category_ref),
        merchant: payload.merchant,
        occurred_at: payload.occurred_at.unwrap_or_else(Utc::now),
        raw_text: payload.raw_text,
    };
    let tx = state.engine.create_transaction(user_id, draft).await?;
    Ok((StatusCode::CREATED, Json(map_transaction(tx))))
}
