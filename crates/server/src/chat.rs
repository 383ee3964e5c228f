//! Assistant chat endpoints.

use std::sync::Arc;

use api_types::chat::{
    ChatAlertsRequest, ChatAlertsResponse, ChatAnnouncement, ChatAsk, ChatHistoryResponse,
    ChatMessageNew, ChatMessageView, ChatReply, ChatSender,
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use engine::{
    ChatMessageDraft, Engine, FinanceContext, Sender, TransactionListFilter, WELCOME_MESSAGE,
    alert_message, newly_raised,
};

use crate::{
    ServerError,
    server::{ChatPolicy, ServerState, UserId},
};

fn map_sender(sender: Sender) -> ChatSender {
    match sender {
        Sender::User => ChatSender::User,
        Sender::Bot => ChatSender::Bot,
    }
}

fn sender_from_api(sender: ChatSender) -> Sender {
    match sender {
        ChatSender::User => Sender::User,
        ChatSender::Bot => Sender::Bot,
    }
}

fn map_message(message: engine::ChatMessage) -> ChatMessageView {
    ChatMessageView {
        id: message.id,
        text: message.text,
        sender: map_sender(message.sender),
        timestamp: message.timestamp,
    }
}

pub async fn history(
    Extension(UserId(user_id)): Extension<UserId>,
    State(state): State<ServerState>,
) -> Result<Json<ChatHistoryResponse>, ServerError> {
    let mut messages: Vec<ChatMessageView> = state
        .engine
        .chat_history(user_id)
        .await?
        .into_iter()
        .map(map_message)
        .collect();

    // The greeting is shown, never stored.
    if messages.is_empty() {
        messages.push(ChatMessageView {
            id: 0,
            text: WELCOME_MESSAGE.to_string(),
            sender: ChatSender::Bot,
            timestamp: Utc::now(),
        });
    }

    Ok(Json(ChatHistoryResponse { messages }))
}

pub async fn save(
    Extension(UserId(user_id)): Extension<UserId>,
    State(state): State<ServerState>,
    Json(payload): Json<ChatMessageNew>,
) -> Result<(StatusCode, Json<ChatMessageView>), ServerError> {
    let draft = ChatMessageDraft {
        user_id,
        text: payload.text,
        sender: sender_from_api(payload.sender),
        timestamp: payload.timestamp.unwrap_or_else(Utc::now),
    };
    let message = state.engine.append_chat_message(draft).await?;
    Ok((StatusCode::CREATED, Json(map_message(message))))
}

/// Answer a question about the user's finances.
///
/// The question is stored before answering; the answer is stored in the
/// background and the reply does not wait for it.
pub async fn ask(
    Extension(UserId(user_id)): Extension<UserId>,
    State(state): State<ServerState>,
    Json(payload): Json<ChatAsk>,
) -> Result<Json<ChatReply>, ServerError> {
    let history = state.engine.chat_history(user_id).await?;
    state
        .engine
        .append_chat_message(ChatMessageDraft::now(user_id, Sender::User, &payload.message))
        .await?;

    let budgets = state.engine.list_budgets(user_id).await?;
    let transactions = state
        .engine
        .list_transactions(user_id, &TransactionListFilter::default())
        .await?;
    let alerts = engine::evaluate(&budgets, &transactions);
    let context = FinanceContext {
        budgets: &budgets,
        transactions: &transactions,
        alerts: &alerts,
    };

    let answer = state
        .assistant
        .reply(context, &history, &payload.message)
        .await;
    if let Some(err) = &answer.failure {
        tracing::warn!(user_id, "assistant unavailable, replying with an apology: {err}");
    }
    let reply = answer.text;

    let draft = ChatMessageDraft::now(user_id, Sender::Bot, reply.clone());
    tokio::spawn(persist_with_retry(state.engine.clone(), draft, state.chat));

    Ok(Json(ChatReply { reply }))
}

/// Announcements for alerts the client has not shown yet.
pub async fn alerts(
    Extension(UserId(user_id)): Extension<UserId>,
    State(state): State<ServerState>,
    Json(payload): Json<ChatAlertsRequest>,
) -> Result<Json<ChatAlertsResponse>, ServerError> {
    let alerts = state.engine.budget_alerts(user_id).await?;
    let announcements = newly_raised(&payload.seen_budget_ids, &alerts)
        .into_iter()
        .map(|alert| ChatAnnouncement {
            budget_id: alert.budget_id,
            text: alert_message(alert),
        })
        .collect();

    Ok(Json(ChatAlertsResponse { announcements }))
}

#[derive(Debug, PartialEq, Eq)]
enum Persisted {
    Stored { attempts: u32 },
    Dropped { attempts: u32 },
}

/// Store a chat message, retrying a bounded number of times before dropping it.
async fn persist_with_retry(
    engine: Arc<Engine>,
    draft: ChatMessageDraft,
    policy: ChatPolicy,
) -> Persisted {
    let attempts = policy.persist_attempts.max(1);
    for attempt in 1..attempts {
        match engine.append_chat_message(draft.clone()).await {
            Ok(_) => return Persisted::Stored { attempts: attempt },
            Err(err) => {
                tracing::debug!("chat message not stored (attempt {attempt}/{attempts}): {err}");
                tokio::time::sleep(policy.persist_backoff).await;
            }
        }
    }
    match engine.append_chat_message(draft.clone()).await {
        Ok(_) => Persisted::Stored { attempts },
        Err(err) => {
            tracing::warn!(
                user_id = draft.user_id,
                "dropping chat message after {attempts} attempts: {err}"
            );
            Persisted::Dropped { attempts }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use migration::MigratorTrait;
    use sea_orm::{ConnectionTrait, Database, Statement};

    use super::*;

    async fn engine(drop_chat_logs: bool) -> Arc<Engine> {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        if drop_chat_logs {
            db.execute(Statement::from_string(
                db.get_database_backend(),
                "DROP TABLE chat_logs;",
            ))
            .await
            .unwrap();
        }
        Arc::new(Engine::builder().database(db).build().await.unwrap())
    }

    fn policy() -> ChatPolicy {
        ChatPolicy {
            persist_attempts: 3,
            persist_backoff: Duration::from_millis(20),
        }
    }

    #[tokio::test]
    async fn stored_on_the_first_attempt() {
        let engine = engine(false).await;
        let draft = ChatMessageDraft::now(1, Sender::Bot, "hello");
        let outcome = persist_with_retry(engine.clone(), draft, policy()).await;
        assert_eq!(outcome, Persisted::Stored { attempts: 1 });
        assert_eq!(engine.chat_history(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn dropped_after_every_attempt_fails() {
        let engine = engine(true).await;
        let draft = ChatMessageDraft::now(1, Sender::Bot, "hello");
        let started = Instant::now();
        let outcome = persist_with_retry(engine, draft, policy()).await;
        assert_eq!(outcome, Persisted::Dropped { attempts: 3 });
        // Two backoffs between three attempts.
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let engine = engine(true).await;
        let draft = ChatMessageDraft::now(1, Sender::Bot, "hello");
        let policy = ChatPolicy {
            persist_attempts: 0,
            persist_backoff: Duration::from_secs(60),
        };
        let outcome = persist_with_retry(engine, draft, policy).await;
        assert_eq!(outcome, Persisted::Dropped { attempts: 1 });
    }
}
