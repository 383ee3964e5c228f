//! Category resolution.
//!
//! Records reach the engine with their category in one of several shapes: a
//! plain name, a numeric id, an embedded `{id, name}` object, or nothing at
//! all. [`CategoryRef`] captures those shapes once at the boundary and
//! [`CategoryResolver`] turns any of them into a [`ResolvedCategory`], the
//! only representation the rest of the engine looks at.
//!
//! Resolution never fails: unknown ids become `"Other"` and missing
//! categories become the caller-chosen [`Fallback`] label.

use std::collections::BTreeMap;

use crate::{Category, util::normalize_category_key};

/// Name of the pseudo-category whose transactions are never counted as spend.
pub const INCOME: &str = "Income";
/// Catch-all category.
pub const OTHER: &str = "Other";
pub const OTHER_ID: i64 = 6;

/// The built-in category table, also seeded into the store.
pub const DEFAULT_CATEGORIES: [(i64, &str); 6] = [
    (1, "Food & Dining"),
    (2, "Transportation"),
    (3, "Shopping"),
    (4, "Bills & Utilities"),
    (5, INCOME),
    (OTHER_ID, OTHER),
];

/// Label used when a record carries no category at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fallback {
    /// Raw records fed straight into aggregation.
    Unknown,
    /// Records loaded from the store without a category relation.
    Uncategorized,
}

impl Fallback {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Uncategorized => "Uncategorized",
        }
    }
}

/// A category reference as found on incoming records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CategoryRef {
    Name(String),
    Id(i64),
    Embedded { id: Option<i64>, name: Option<String> },
}

impl From<Category> for CategoryRef {
    fn from(category: Category) -> Self {
        Self::Embedded {
            id: Some(category.id),
            name: Some(category.name),
        }
    }
}

/// Canonical `{id, name}` pair; `id` is `None` when the name matches no
/// known category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedCategory {
    pub id: Option<i64>,
    pub name: String,
}

impl ResolvedCategory {
    pub fn is_income(&self) -> bool {
        self.name == INCOME
    }
}

impl From<Category> for ResolvedCategory {
    fn from(category: Category) -> Self {
        Self {
            id: Some(category.id),
            name: category.name,
        }
    }
}

/// Id/name lookup table, seeded with [`DEFAULT_CATEGORIES`].
#[derive(Clone, Debug)]
pub struct CategoryResolver {
    by_id: BTreeMap<i64, String>,
}

impl Default for CategoryResolver {
    fn default() -> Self {
        Self {
            by_id: DEFAULT_CATEGORIES
                .iter()
                .map(|(id, name)| (*id, (*name).to_string()))
                .collect(),
        }
    }
}

impl CategoryResolver {
    /// Extend the default table with categories loaded from the store.
    pub fn with_categories<I>(categories: I) -> Self
    where
        I: IntoIterator<Item = Category>,
    {
        let mut resolver = Self::default();
        for category in categories {
            resolver.by_id.insert(category.id, category.name);
        }
        resolver
    }

    pub fn contains_id(&self, id: i64) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Display name for an id; unknown ids map to `"Other"`.
    pub fn name_for_id(&self, id: i64) -> &str {
        self.by_id.get(&id).map(String::as_str).unwrap_or(OTHER)
    }

    /// Id of a known category, matched ignoring case, accents and spacing.
    pub fn id_for_name(&self, name: &str) -> Option<i64> {
        let key = normalize_category_key(name);
        self.by_id
            .iter()
            .find(|(_, candidate)| normalize_category_key(candidate) == key)
            .map(|(id, _)| *id)
    }

    /// Id to store for a new record; anything unresolvable lands in `Other`.
    pub fn storage_id(&self, category: Option<&CategoryRef>) -> i64 {
        let by_name = |name: &str| self.id_for_name(name).unwrap_or(OTHER_ID);
        match category {
            Some(CategoryRef::Id(id)) | Some(CategoryRef::Embedded { id: Some(id), .. })
                if self.contains_id(*id) =>
            {
                *id
            }
            Some(CategoryRef::Embedded {
                name: Some(name), ..
            })
            | Some(CategoryRef::Name(name)) => by_name(name),
            _ => OTHER_ID,
        }
    }

    pub fn resolve(&self, category: Option<&CategoryRef>, fallback: Fallback) -> ResolvedCategory {
        match category {
            Some(CategoryRef::Embedded {
                id,
                name: Some(name),
            }) => ResolvedCategory {
                id: id.or_else(|| self.id_for_name(name)),
                name: name.clone(),
            },
            Some(CategoryRef::Name(name)) => ResolvedCategory {
                id: self.id_for_name(name),
                name: name.clone(),
            },
            Some(CategoryRef::Id(id))
            | Some(CategoryRef::Embedded {
                id: Some(id),
                name: None,
            }) => self.resolve_id(*id),
            Some(CategoryRef::Embedded {
                id: None,
                name: None,
            })
            | None => ResolvedCategory {
                id: None,
                name: fallback.name().to_string(),
            },
        }
    }

    fn resolve_id(&self, id: i64) -> ResolvedCategory {
        match self.by_id.get(&id) {
            Some(name) => ResolvedCategory {
                id: Some(id),
                name: name.clone(),
            },
            None => ResolvedCategory {
                id: Some(OTHER_ID),
                name: OTHER.to_string(),
            },
        }
    }
}
