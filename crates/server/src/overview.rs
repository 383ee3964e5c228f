//! Dashboard overview endpoint.

use api_types::overview::{CategorySpendView, OverviewResponse};
use axum::{Extension, Json, extract::State};

use crate::{ServerError, server::ServerState, server::UserId};

pub async fn get(
    Extension(UserId(user_id)): Extension<UserId>,
    State(state): State<ServerState>,
) -> Result<Json<OverviewResponse>, ServerError> {
    let overview = state.engine.spending_overview(user_id).await?;

    Ok(Json(OverviewResponse {
        total_spent_minor: overview.total_spent.cents(),
        transaction_count: overview.transaction_count,
        by_category: overview
            .by_category
            .into_iter()
            .map(|bucket| CategorySpendView {
                name: bucket.name,
                spent_minor: bucket.spent.cents(),
            })
            .collect(),
    }))
}
