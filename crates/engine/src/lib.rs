//! SpendWise engine.
//!
//! Two layers live here:
//!
//! - the budget engine, pure functions over in-memory lists: category
//!   resolution ([`CategoryResolver`]), spend aggregation ([`aggregate`]) and
//!   budget threshold evaluation ([`evaluate`]);
//! - the stores, [`Engine`] operations persisting transactions, budgets,
//!   categories and the chat transcript through sea-orm.

pub use aggregate::{CategorySpend, SpendingOverview, aggregate, spending_overview, total_income};
pub use alerts::{
    BudgetAlert, BudgetProgress, BudgetStatus, Severity, evaluate, has_new_alert, newly_raised,
    progress,
};
pub use assistant::{
    APOLOGY, Assistant, AssistantReply, ChatCompletion, CompletionError, DEFAULT_HISTORY_TURNS,
    FinanceContext, WELCOME_MESSAGE, alert_message, build_prompt,
};
pub use budgets::{Budget, BudgetDraft, DEFAULT_BUDGETS, Period};
pub use categories::Category;
pub use chat_logs::{ChatMessage, ChatMessageDraft, Sender};
pub use error::EngineError;
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder, TransactionListFilter};
pub use resolver::{
    CategoryRef, CategoryResolver, DEFAULT_CATEGORIES, Fallback, INCOME, OTHER, OTHER_ID,
    ResolvedCategory,
};
pub use transactions::{Transaction, TransactionDraft};

mod aggregate;
mod alerts;
mod assistant;
mod budgets;
mod categories;
mod chat_logs;
mod error;
mod money;
mod ops;
mod resolver;
mod transactions;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
