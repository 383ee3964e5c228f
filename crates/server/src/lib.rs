use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::{EngineError, MoneyCents};

use serde::Serialize;
pub use completion::HttpCompletion;
pub use server::{ChatPolicy, ServerState, UserId, router, run_with_listener};

mod alerts;
mod budgets;
mod categories;
mod chat;
mod completion;
mod overview;
mod server;
mod transactions;

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidName(_)
        | EngineError::InvalidId(_)
        | EngineError::InvalidFilter(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "storage unavailable".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

/// Amount given either as integer cents or as a decimal string.
fn money_field(
    minor: Option<i64>,
    decimal: Option<&str>,
    label: &str,
) -> Result<MoneyCents, ServerError> {
    match (minor, decimal) {
        (Some(cents), _) => Ok(MoneyCents::new(cents)),
        (None, Some(text)) => Ok(text.parse::<MoneyCents>()?),
        (None, None) => Err(ServerError::Generic(format!("{label} is required"))),
    }
}

/// Boundary conversion of a client category reference.
fn category_ref(value: api_types::CategoryRef) -> engine::CategoryRef {
    match value {
        api_types::CategoryRef::Name(name) => engine::CategoryRef::Name(name),
        api_types::CategoryRef::Id(id) => engine::CategoryRef::Id(id),
        api_types::CategoryRef::Object { id, name } => engine::CategoryRef::Embedded { id, name },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use sea_orm::DbErr;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        for err in [
            EngineError::InvalidAmount("x".to_string()),
            EngineError::InvalidName("x".to_string()),
            EngineError::InvalidId("x".to_string()),
            EngineError::InvalidFilter("x".to_string()),
        ] {
            let res = ServerError::from(err).into_response();
            assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[tokio::test]
    async fn storage_errors_hide_details() {
        let err = EngineError::Database(DbErr::Custom("disk I/O error".to_string()));
        let res = ServerError::from(err).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"storage unavailable"}"#);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn category_ref_keeps_the_client_shape() {
        assert_eq!(
            category_ref(api_types::CategoryRef::Object {
                id: None,
                name: Some("Shopping".to_string()),
            }),
            engine::CategoryRef::Embedded {
                id: None,
                name: Some("Shopping".to_string()),
            }
        );
        assert_eq!(
            category_ref(api_types::CategoryRef::Id(2)),
            engine::CategoryRef::Id(2)
        );
    }

    #[test]
    fn money_field_prefers_cents_then_text() {
        assert_eq!(
            money_field(Some(5), Some("9.99"), "amount").ok(),
            Some(MoneyCents::new(5))
        );
        assert_eq!(
            money_field(None, Some("9,99"), "amount").ok(),
            Some(MoneyCents::new(999))
        );
        let missing = money_field(None, None, "amount").err().unwrap().into_response();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        let bad = money_field(None, Some("abc"), "amount").err().unwrap().into_response();
        assert_eq!(bad.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
