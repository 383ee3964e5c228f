//! Seed the built-in categories with their fixed ids.

use sea_orm::{ConnectionTrait, Statement};
use sea_orm_migration::prelude::*;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

#[derive(DeriveMigrationName)]
pub struct Migration;

const DEFAULT_CATEGORIES: [(i64, &str); 6] = [
    (1, "Food & Dining"),
    (2, "Transportation"),
    (3, "Shopping"),
    (4, "Bills & Utilities"),
    (5, "Income"),
    (6, "Other"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = db.get_database_backend();

        for (id, name) in DEFAULT_CATEGORIES {
            db.execute(Statement::from_sql_and_values(
                backend,
                "INSERT INTO categories (id, name, name_norm) VALUES (?, ?, ?);",
                vec![id.into(), name.into(), normalize_key(name).into()],
            ))
            .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = db.get_database_backend();
        db.execute(Statement::from_string(
            backend,
            "DELETE FROM categories WHERE id <= 6;",
        ))
        .await?;
        Ok(())
    }
}

/// Same folding the engine applies when matching category names.
fn normalize_key(input: &str) -> String {
    let folded: String = input
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_names_are_unique() {
        let mut keys: Vec<String> = DEFAULT_CATEGORIES
            .iter()
            .map(|(_, name)| normalize_key(name))
            .collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), DEFAULT_CATEGORIES.len());
        assert_eq!(normalize_key("Bills & Utilities"), "bills & utilities");
    }
}
