//! Transaction primitives.
//!
//! A `Transaction` is an immutable money movement. Amounts are always
//! positive; whether it is income or spend depends only on its category
//! being `"Income"`.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{CategoryRef, MoneyCents, ResolvedCategory};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub amount: MoneyCents,
    pub category: ResolvedCategory,
    pub merchant: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub raw_text: Option<String>,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.category.is_income()
    }
}

/// Input for [`Engine::create_transaction`](crate::Engine::create_transaction).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionDraft {
    pub amount: MoneyCents,
    pub category: Option<CategoryRef>,
    pub merchant: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub raw_text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub category_id: Option<i64>,
    pub amount_minor: i64,
    pub merchant: Option<String>,
    pub occurred_at: DateTimeUtc,
    pub raw_text: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Categories,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn new(user_id: i64, category_id: i64, draft: &TransactionDraft) -> Self {
        Self {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(user_id),
            category_id: ActiveValue::Set(Some(category_id)),
            amount_minor: ActiveValue::Set(draft.amount.cents()),
            merchant: ActiveValue::Set(draft.merchant.clone()),
            occurred_at: ActiveValue::Set(draft.occurred_at),
            raw_text: ActiveValue::Set(draft.raw_text.clone()),
        }
    }
}

impl Transaction {
    /// Build from a stored row and its (optional) category relation.
    pub(crate) fn from_row(model: Model, category: Option<super::categories::Model>) -> Self {
        let category = match category {
            Some(category) => ResolvedCategory {
                id: Some(category.id),
                name: category.name,
            },
            None => ResolvedCategory {
                id: None,
                name: crate::Fallback::Uncategorized.name().to_string(),
            },
        };
        Self {
            id: model.id,
            user_id: model.user_id,
            amount: MoneyCents::new(model.amount_minor),
            category,
            merchant: model.merchant,
            occurred_at: model.occurred_at,
            raw_text: model.raw_text,
        }
    }
}
