//! Chat transcript between a user and the assistant.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Bot => "Bot",
        }
    }
}

impl TryFrom<&str> for Sender {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "User" => Ok(Self::User),
            "Bot" => Ok(Self::Bot),
            other => Err(EngineError::InvalidName(format!("invalid sender: {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: i64,
    pub user_id: i64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessageDraft {
    pub user_id: i64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessageDraft {
    pub fn now(user_id: i64, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            user_id,
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "chat_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub message_text: String,
    pub sender: String,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&ChatMessageDraft> for ActiveModel {
    fn from(draft: &ChatMessageDraft) -> Self {
        Self {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(draft.user_id),
            message_text: ActiveValue::Set(draft.text.clone()),
            sender: ActiveValue::Set(draft.sender.as_str().to_string()),
            timestamp: ActiveValue::Set(draft.timestamp),
        }
    }
}

impl TryFrom<Model> for ChatMessage {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            text: model.message_text,
            sender: Sender::try_from(model.sender.as_str())?,
            timestamp: model.timestamp,
        })
    }
}
