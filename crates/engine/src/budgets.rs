//! Per-category spending limits.

use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{EngineError, MoneyCents, ResolvedCategory, resolver::OTHER_ID};

/// Starter budgets created the first time a user with no budgets lists them:
/// `(category id, limit in cents)`. Income gets no budget.
pub const DEFAULT_BUDGETS: [(i64, i64); 5] = [
    (1, 500_00),
    (2, 200_00),
    (3, 300_00),
    (4, 400_00),
    (OTHER_ID, 150_00),
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Period {
    #[default]
    Monthly,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
        }
    }
}

impl TryFrom<&str> for Period {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Monthly" | "monthly" => Ok(Self::Monthly),
            other => Err(EngineError::InvalidName(format!(
                "invalid budget period: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub category: ResolvedCategory,
    /// Zero means "no limit set"; such budgets never raise alerts.
    pub limit: MoneyCents,
    pub period: Period,
}

/// Input for [`Engine::create_budget`](crate::Engine::create_budget).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetDraft {
    pub category_id: i64,
    pub limit: MoneyCents,
    pub period: Period,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub limit_minor: i64,
    pub period: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
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
    pub(crate) fn new(user_id: i64, draft: &BudgetDraft) -> Self {
        Self {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(user_id),
            category_id: ActiveValue::Set(draft.category_id),
            limit_minor: ActiveValue::Set(draft.limit.cents()),
            period: ActiveValue::Set(draft.period.as_str().to_string()),
        }
    }
}

impl Budget {
    pub(crate) fn from_row(
        model: Model,
        category: Option<super::categories::Model>,
        resolver: &crate::CategoryResolver,
    ) -> Result<Self, EngineError> {
        let category = match category {
            Some(category) => ResolvedCategory {
                id: Some(category.id),
                name: category.name,
            },
            None => resolver.resolve(
                Some(&crate::CategoryRef::Id(model.category_id)),
                crate::Fallback::Uncategorized,
            ),
        };
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            category,
            limit: MoneyCents::new(model.limit_minor),
            period: Period::try_from(model.period.as_str())?,
        })
    }
}
