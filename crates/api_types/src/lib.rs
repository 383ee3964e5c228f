use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category reference as clients send it.
///
/// Accepted JSON shapes:
/// - `"Food & Dining"` (a name)
/// - `3` (an id)
/// - `{"id": 3, "name": "Shopping"}`, either field optional (`category_id`
///   is accepted for `id`)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Name(String),
    Id(i64),
    Object {
        #[serde(default, alias = "category_id")]
        id: Option<i64>,
        #[serde(default)]
        name: Option<String>,
    },
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: i64,
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryListResponse {
        pub categories: Vec<CategoryView>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        /// Positive amount in cents. Takes precedence over `amount`.
        #[serde(default)]
        pub amount_minor: Option<i64>,
        /// Positive decimal amount as typed, e.g. `"12.50"` or `"$3,20"`.
        #[serde(default)]
        pub amount: Option<String>,
        #[serde(default)]
        pub category: Option<CategoryRef>,
        #[serde(default)]
        pub merchant: Option<String>,
        /// Defaults to the time the request is received.
        #[serde(default)]
        pub occurred_at: Option<DateTime<Utc>>,
        /// The free text the user typed, if any.
        #[serde(default)]
        pub raw_text: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: i64,
        pub amount_minor: i64,
        pub category_id: Option<i64>,
        pub category: String,
        pub merchant: Option<String>,
        pub occurred_at: DateTime<Utc>,
        pub raw_text: Option<String>,
    }

    /// Query string of `GET /transactions`; `from` inclusive, `to` exclusive.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        pub from: Option<DateTime<Utc>>,
        pub to: Option<DateTime<Utc>>,
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub category_id: i64,
        /// Limit in cents. Takes precedence over `limit`.
        #[serde(default)]
        pub limit_minor: Option<i64>,
        /// Decimal limit as typed, e.g. `"500"`.
        #[serde(default)]
        pub limit: Option<String>,
        /// Only `"Monthly"` is supported; the default.
        #[serde(default)]
        pub period: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: i64,
        pub category_id: Option<i64>,
        pub category: String,
        pub limit_minor: i64,
        pub period: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetListResponse {
        pub budgets: Vec<BudgetView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetProgressView {
        pub budget_id: i64,
        pub category: String,
        pub spent_minor: i64,
        pub limit_minor: i64,
        pub percentage: f64,
        /// One of `ok`, `watch`, `warning`, `critical`.
        pub status: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetProgressResponse {
        pub budgets: Vec<BudgetProgressView>,
    }
}

pub mod alert {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AlertView {
        pub budget_id: i64,
        pub category: String,
        pub spent_minor: i64,
        pub limit_minor: i64,
        pub percentage: f64,
        /// `warning` or `critical`.
        pub severity: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AlertsQuery {
        /// Number of alerts the client is currently showing.
        pub known: Option<usize>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AlertsResponse {
        pub alerts: Vec<AlertView>,
        /// Present only when the request carried `known`.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub has_new_alert: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RawTransaction {
        #[serde(default)]
        pub id: i64,
        pub amount_minor: i64,
        #[serde(default)]
        pub category: Option<CategoryRef>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RawBudget {
        pub id: i64,
        #[serde(default)]
        pub category: Option<CategoryRef>,
        pub limit_minor: i64,
    }

    /// Body of `POST /alerts/preview`: records in whatever shape the client
    /// holds them.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AlertPreview {
        #[serde(default)]
        pub budgets: Vec<RawBudget>,
        #[serde(default)]
        pub transactions: Vec<RawTransaction>,
    }
}

pub mod overview {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorySpendView {
        pub name: String,
        pub spent_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OverviewResponse {
        pub total_spent_minor: i64,
        pub transaction_count: usize,
        pub by_category: Vec<CategorySpendView>,
    }
}

pub mod chat {
    use super::*;

    /// Author of a chat message.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum ChatSender {
        User,
        Bot,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChatMessageView {
        pub id: i64,
        pub text: String,
        pub sender: ChatSender,
        pub timestamp: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChatHistoryResponse {
        /// Oldest first. Starts with the welcome message when the transcript
        /// is empty.
        pub messages: Vec<ChatMessageView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChatMessageNew {
        pub text: String,
        pub sender: ChatSender,
        #[serde(default)]
        pub timestamp: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChatAsk {
        pub message: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChatReply {
        pub reply: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ChatAlertsRequest {
        /// Budgets whose alert was already announced.
        #[serde(default)]
        pub seen_budget_ids: Vec<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChatAnnouncement {
        pub budget_id: i64,
        pub text: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChatAlertsResponse {
        pub announcements: Vec<ChatAnnouncement>,
    }
}

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Health {
        pub status: String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertPreview;

    #[test]
    fn category_ref_accepts_every_client_shape() {
        let refs: Vec<Option<CategoryRef>> = serde_json::from_str(
            r#"["Shopping", 3, {"id": 2, "name": "Transportation"}, {"category_id": 4}, {}, null]"#,
        )
        .unwrap();
        assert_eq!(
            refs,
            vec![
                Some(CategoryRef::Name("Shopping".to_string())),
                Some(CategoryRef::Id(3)),
                Some(CategoryRef::Object {
                    id: Some(2),
                    name: Some("Transportation".to_string()),
                }),
                Some(CategoryRef::Object {
                    id: Some(4),
                    name: None,
                }),
                Some(CategoryRef::Object {
                    id: None,
                    name: None,
                }),
                None,
            ]
        );
    }

    #[test]
    fn preview_tolerates_missing_fields() {
        let preview: AlertPreview = serde_json::from_str(
            r#"{"budgets": [{"id": 1, "category": {"name": "Food & Dining"}, "limit_minor": 50000}],
                "transactions": [{"amount_minor": 45000, "category": "Food & Dining"},
                                 {"amount_minor": 1200}]}"#,
        )
        .unwrap();
        assert_eq!(preview.budgets.len(), 1);
        assert_eq!(preview.transactions.len(), 2);
        assert_eq!(preview.transactions[1].category, None);
        assert_eq!(preview.transactions[1].id, 0);
    }

    #[test]
    fn has_new_alert_is_omitted_when_unknown() {
        let body = serde_json::to_value(alert::AlertsResponse {
            alerts: Vec::new(),
            has_new_alert: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "alerts": [] }));
    }

    #[test]
    fn amounts_may_arrive_as_cents_or_text() {
        let by_cents: transaction::TransactionNew =
            serde_json::from_str(r#"{"amount_minor": 1250}"#).unwrap();
        assert_eq!(by_cents.amount_minor, Some(1250));
        assert_eq!(by_cents.amount, None);

        let by_text: budget::BudgetNew =
            serde_json::from_str(r#"{"category_id": 1, "limit": "500.00"}"#).unwrap();
        assert_eq!(by_text.limit_minor, None);
        assert_eq!(by_text.limit.as_deref(), Some("500.00"));
    }
}
