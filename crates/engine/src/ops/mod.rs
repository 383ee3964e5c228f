use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

use crate::EngineError;

mod budgets;
mod categories;
mod chat;
mod insights;
mod transactions;

pub use transactions::TransactionListFilter;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Entry point for every store operation.
///
/// The engine keeps no per-user state: every call takes the user id
/// explicitly and works on the database handed to the builder.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`.
    ///
    /// Fails when the database has no categories, i.e. it was not migrated.
    pub async fn build(self) -> crate::ResultEngine<Engine> {
        let seeded = crate::categories::Entity::find().count(&self.database).await?;
        if seeded == 0 {
            return Err(EngineError::KeyNotFound("categories".to_string()));
        }
        Ok(Engine {
            database: self.database,
        })
    }
}
