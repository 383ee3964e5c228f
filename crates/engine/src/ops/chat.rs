use sea_orm::{QueryFilter, QueryOrder, prelude::*};

use crate::{
    ChatMessage, ChatMessageDraft, ResultEngine, chat_logs, util::normalize_required_text,
};

use super::Engine;

impl Engine {
    pub async fn append_chat_message(&self, draft: ChatMessageDraft) -> ResultEngine<ChatMessage> {
        let draft = ChatMessageDraft {
            text: normalize_required_text(&draft.text, "message")?,
            ..draft
        };
        let model = chat_logs::ActiveModel::from(&draft)
            .insert(&self.database)
            .await?;
        ChatMessage::try_from(model)
    }

    /// Transcript of `user_id`, oldest first.
    pub async fn chat_history(&self, user_id: i64) -> ResultEngine<Vec<ChatMessage>> {
        chat_logs::Entity::find()
            .filter(chat_logs::Column::UserId.eq(user_id))
            .order_by_asc(chat_logs::Column::Timestamp)
            .order_by_asc(chat_logs::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(ChatMessage::try_from)
            .collect()
    }
}
