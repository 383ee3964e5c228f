use sea_orm::{ConnectionTrait, QueryOrder, prelude::*};

use crate::{Category, CategoryResolver, ResultEngine, categories};

use super::Engine;

impl Engine {
    /// Every known category, by id.
    pub async fn list_categories(&self) -> ResultEngine<Vec<Category>> {
        Ok(load_categories(&self.database)
            .await?
            .into_iter()
            .map(Category::from)
            .collect())
    }

    /// Resolver seeded with the built-in table and the stored categories.
    pub async fn category_resolver(&self) -> ResultEngine<CategoryResolver> {
        category_resolver(&self.database).await
    }
}

async fn load_categories<C: ConnectionTrait>(db: &C) -> ResultEngine<Vec<categories::Model>> {
    Ok(categories::Entity::find()
        .order_by_asc(categories::Column::Id)
        .all(db)
        .await?)
}

pub(super) async fn category_resolver<C: ConnectionTrait>(db: &C) -> ResultEngine<CategoryResolver> {
    let categories = load_categories(db).await?;
    Ok(CategoryResolver::with_categories(
        categories.into_iter().map(Category::from),
    ))
}
