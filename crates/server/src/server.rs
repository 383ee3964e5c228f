use axum::{
    Json, Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
    typed_header::TypedHeaderRejection,
};

use std::{sync::Arc, time::Duration};

use crate::{ServerError, alerts, budgets, categories, chat, overview, transactions};
use api_types::health::Health;
use engine::{Assistant, Engine};

static USER_HEADER: axum::http::HeaderName =
    axum::http::HeaderName::from_static("spendwise-user-id");

/// Retry policy for persisting chat turns in the background.
#[derive(Clone, Copy, Debug)]
pub struct ChatPolicy {
    pub persist_attempts: u32,
    pub persist_backoff: Duration,
}

impl Default for ChatPolicy {
    fn default() -> Self {
        Self {
            persist_attempts: 3,
            persist_backoff: Duration::from_millis(500),
        }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub assistant: Arc<Assistant>,
    pub chat: ChatPolicy,
}

impl ServerState {
    pub fn new(engine: Engine, assistant: Assistant, chat: ChatPolicy) -> Self {
        Self {
            engine: Arc::new(engine),
            assistant: Arc::new(assistant),
            chat,
        }
    }
}

/// Id of the user a request acts for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UserId(pub i64);

/// `TypedHeader` for the user header
///
/// Every API request must contain a "spendwise-user-id" entry in the header.
#[derive(Debug)]
struct UserHeader(i64);

impl Header for UserHeader {
    fn name() -> &'static axum::http::HeaderName {
        &USER_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };
        let Ok(value) = value.trim().parse() else {
            return Err(AxumError::invalid());
        };

        Ok(UserHeader(value))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        values.extend(std::iter::once(axum::http::HeaderValue::from(self.0)));
    }
}

async fn identify(
    user_header: Result<TypedHeader<UserHeader>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Ok(TypedHeader(UserHeader(user_id))) = user_header else {
        return Err(ServerError::Generic(
            "missing or invalid spendwise-user-id header".to_string(),
        ));
    };

    request.extensions_mut().insert(UserId(user_id));
    Ok(next.run(request).await)
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/categories", get(categories::list))
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route("/budgets", get(budgets::list).post(budgets::create))
        .route("/budgets/progress", get(budgets::progress))
        .route("/alerts", get(alerts::list))
        .route("/alerts/preview", post(alerts::preview))
        .route("/overview", get(overview::get))
        .route("/chat", post(chat::ask))
        .route("/chat/history", get(chat::history))
        .route("/chat/messages", post(chat::save))
        .route("/chat/alerts", post(chat::alerts))
        .route_layer(middleware::from_fn(identify))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}
