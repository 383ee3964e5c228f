//! Categories API endpoints.

use api_types::category::{CategoryListResponse, CategoryView};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<CategoryListResponse>, ServerError> {
    let categories = state
        .engine
        .list_categories()
        .await?
        .into_iter()
        .map(map_category)
        .collect();

    Ok(Json(CategoryListResponse { categories }))
}
