//! Finance assistant.
//!
//! The language model behind the chat is an opaque [`ChatCompletion`]
//! collaborator: the [`Assistant`] writes a prompt summarizing the user's
//! budgets, spending and recent conversation, and returns whatever text comes
//! back. Any failure turns into [`APOLOGY`]; the chat never errors out.

use std::{fmt::Write as _, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    Budget, BudgetAlert, ChatMessage, MoneyCents, Severity, Transaction,
    aggregate::{aggregate, spending_overview},
};

pub const WELCOME_MESSAGE: &str = "Hello! I'm your personal financial assistant. I can help you \
analyze your spending, create budgets, and answer questions about your finances. How can I help \
you today?";

pub const APOLOGY: &str =
    "Sorry, I'm having trouble answering right now. Please try again in a moment.";

/// Number of past messages included in the prompt by default.
pub const DEFAULT_HISTORY_TURNS: usize = 10;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion transport error: {0}")]
    Transport(String),
    #[error("completion provider returned {status}: {message}")]
    Provider { status: u16, message: String },
    #[error("completion provider returned no text")]
    Empty,
}

/// Prompt in, text out.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// What the assistant knows about the user when answering.
#[derive(Clone, Copy, Debug)]
pub struct FinanceContext<'a> {
    pub budgets: &'a [Budget],
    pub transactions: &'a [Transaction],
    pub alerts: &'a [BudgetAlert],
}

#[derive(Clone)]
pub struct Assistant {
    completion: Option<Arc<dyn ChatCompletion>>,
    history_turns: usize,
}

impl Assistant {
    pub fn new(completion: Option<Arc<dyn ChatCompletion>>, history_turns: usize) -> Self {
        Self {
            completion,
            history_turns,
        }
    }

    /// An assistant with no model behind it; every reply is [`APOLOGY`].
    pub fn offline() -> Self {
        Self::new(None, DEFAULT_HISTORY_TURNS)
    }

    /// Answer `question`; `failure` carries the cause when the text is the
    /// apology because the completion failed.
    pub async fn reply(
        &self,
        context: FinanceContext<'_>,
        history: &[ChatMessage],
        question: &str,
    ) -> AssistantReply {
        let Some(completion) = &self.completion else {
            return AssistantReply::apology(None);
        };

        let start = history.len().saturating_sub(self.history_turns);
        let prompt = build_prompt(context, &history[start..], question);
        match completion.complete(&prompt).await {
            Ok(text) if !text.trim().is_empty() => AssistantReply {
                text: text.trim().to_string(),
                failure: None,
            },
            Ok(_) => AssistantReply::apology(Some(CompletionError::Empty)),
            Err(err) => AssistantReply::apology(Some(err)),
        }
    }
}

#[derive(Debug)]
pub struct AssistantReply {
    pub text: String,
    pub failure: Option<CompletionError>,
}

impl AssistantReply {
    fn apology(failure: Option<CompletionError>) -> Self {
        Self {
            text: APOLOGY.to_string(),
            failure,
        }
    }
}

impl std::fmt::Debug for Assistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assistant")
            .field("online", &self.completion.is_some())
            .field("history_turns", &self.history_turns)
            .finish()
    }
}

/// Natural-language prompt handed to the completion collaborator.
pub fn build_prompt(context: FinanceContext<'_>, history: &[ChatMessage], question: &str) -> String {
    let mut prompt = String::from(
        "You are SpendWise, a friendly personal finance assistant. Answer briefly and only \
         from the data below. Amounts are in US dollars.\n",
    );

    prompt.push_str("\nBudgets (monthly):\n");
    if context.budgets.is_empty() {
        prompt.push_str("- none set\n");
    }
    for budget in context.budgets {
        let spent = aggregate(context.transactions, &budget.category.name);
        let _ = write!(
            prompt,
            "- {}: spent {} of {}",
            budget.category.name, spent, budget.limit
        );
        if let Some(percentage) = spent.percent_of(budget.limit) {
            let _ = write!(prompt, " ({percentage:.0}%)");
        }
        prompt.push('\n');
    }

    let overview = spending_overview(context.transactions);
    let _ = writeln!(
        prompt,
        "\nTotal spent: {} across {} transactions.",
        overview.total_spent, overview.transaction_count
    );

    if !context.alerts.is_empty() {
        prompt.push_str("\nActive alerts:\n");
        for alert in context.alerts {
            let _ = writeln!(
                prompt,
                "- {} {}: {:.0}% of the limit used",
                alert.severity.as_str(),
                alert.category,
                alert.percentage
            );
        }
    }

    if !history.is_empty() {
        prompt.push_str("\nRecent conversation:\n");
        for message in history {
            let _ = writeln!(prompt, "{}: {}", message.sender.as_str(), message.text);
        }
    }

    let _ = write!(prompt, "\nUser question: {}", question.trim());
    prompt
}

/// Chat announcement for a budget alert.
pub fn alert_message(alert: &BudgetAlert) -> String {
    match alert.severity {
        Severity::Critical => format!(
            "BUDGET ALERT: You've exceeded your {} budget! You've spent {} of your {} limit \
             ({:.0}%). Consider reducing spending in this category.",
            alert.category, alert.spent, alert.limit, alert.percentage
        ),
        Severity::Warning => format!(
            "WARNING: You're approaching your {} budget limit. You've used {:.0}% ({} of {}). \
             You have {} remaining.",
            alert.category,
            alert.percentage,
            alert.spent,
            alert.limit,
            alert.remaining().max(MoneyCents::ZERO)
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{Period, ResolvedCategory, Sender, aggregate::tests::tx, alerts::evaluate};

    struct Recording {
        prompts: Mutex<Vec<String>>,
        answer: Result<String, ()>,
    }

    #[async_trait]
    impl ChatCompletion for Recording {
        async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
            if let Ok(mut prompts) = self.prompts.lock() {
                prompts.push(prompt.to_string());
            }
            self.answer
                .clone()
                .map_err(|_| CompletionError::Transport("offline".to_string()))
        }
    }

    fn food_budget() -> Budget {
        Budget {
            id: 1,
            user_id: 1,
            category: ResolvedCategory {
                id: Some(1),
                name: "Food & Dining".to_string(),
            },
            limit: MoneyCents::new(500_00),
            period: Period::Monthly,
        }
    }

    fn message(id: i64, sender: Sender, text: &str) -> ChatMessage {
        ChatMessage {
            id,
            user_id: 1,
            text: text.to_string(),
            sender,
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, id as u32).unwrap(),
        }
    }

    #[test]
    fn prompt_summarizes_budgets_alerts_and_history() {
        let budgets = vec![food_budget()];
        let txs = vec![tx(1, 450_00, "Food & Dining"), tx(2, 50_00, "Income")];
        let alerts = evaluate(&budgets, &txs);
        let history = vec![message(1, Sender::User, "hi"), message(2, Sender::Bot, "hello")];
        let context = FinanceContext {
            budgets: &budgets,
            transactions: &txs,
            alerts: &alerts,
        };

        let prompt = build_prompt(context, &history, " Am I over budget? ");
        assert!(prompt.contains("- Food & Dining: spent $450.00 of $500.00 (90%)"));
        assert!(prompt.contains("Total spent: $450.00 across 1 transactions."));
        assert!(prompt.contains("- warning Food & Dining: 90% of the limit used"));
        assert!(prompt.contains("User: hi\nBot: hello\n"));
        assert!(prompt.ends_with("User question: Am I over budget?"));
    }

    #[tokio::test]
    async fn reply_returns_model_text_and_trims_history() {
        let recording = Arc::new(Recording {
            prompts: Mutex::new(Vec::new()),
            answer: Ok("  You are fine.  ".to_string()),
        });
        let assistant = Assistant::new(Some(recording.clone()), 1);
        let history = vec![
            message(1, Sender::User, "first question"),
            message(2, Sender::Bot, "latest answer"),
        ];
        let context = FinanceContext {
            budgets: &[],
            transactions: &[],
            alerts: &[],
        };

        let reply = assistant.reply(context, &history, "status?").await;
        assert_eq!(reply.text, "You are fine.");
        assert!(reply.failure.is_none());
        let prompts = recording.prompts.lock().unwrap();
        assert!(!prompts[0].contains("first question"));
        assert!(prompts[0].contains("Bot: latest answer"));
    }

    #[tokio::test]
    async fn failures_degrade_to_an_apology() {
        let failing = Arc::new(Recording {
            prompts: Mutex::new(Vec::new()),
            answer: Err(()),
        });
        let context = FinanceContext {
            budgets: &[],
            transactions: &[],
            alerts: &[],
        };
        let reply = Assistant::new(Some(failing), 10)
            .reply(context, &[], "hello")
            .await;
        assert_eq!(reply.text, APOLOGY);
        assert!(matches!(reply.failure, Some(CompletionError::Transport(_))));

        let offline = Assistant::offline().reply(context, &[], "hello").await;
        assert_eq!(offline.text, APOLOGY);
        assert!(offline.failure.is_none());
    }

    #[tokio::test]
    async fn blank_model_text_is_reported_as_empty() {
        let blank = Arc::new(Recording {
            prompts: Mutex::new(Vec::new()),
            answer: Ok("   ".to_string()),
        });
        let context = FinanceContext {
            budgets: &[],
            transactions: &[],
            alerts: &[],
        };
        let reply = Assistant::new(Some(blank), 10).reply(context, &[], "hello").await;
        assert_eq!(reply.text, APOLOGY);
        assert!(matches!(reply.failure, Some(CompletionError::Empty)));
    }

    #[test]
    fn alert_messages_match_severity() {
        let budgets = vec![food_budget()];
        let warning = evaluate(&budgets, &[tx(1, 450_00, "Food & Dining")]);
        assert_eq!(
            alert_message(&warning[0]),
            "WARNING: You're approaching your Food & Dining budget limit. You've used 90% \
             ($450.00 of $500.00). You have $50.00 remaining."
        );

        let critical = evaluate(&budgets, &[tx(1, 600_00, "Food & Dining")]);
        assert!(alert_message(&critical[0]).starts_with(
            "BUDGET ALERT: You've exceeded your Food & Dining budget! You've spent $600.00 of \
             your $500.00 limit (120%)."
        ));
    }
}
