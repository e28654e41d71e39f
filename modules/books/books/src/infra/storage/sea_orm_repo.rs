use async_trait::async_trait;
use books_sdk::{Book, NewBook};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    Database, DatabaseConnection, EntityTrait, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;

use super::entity::{ActiveModel, Entity as BookEntity};
use super::migrations::Migrator;
use crate::domain::{error::DomainError, repo::BooksRepository};

/// sea-orm backed store.
pub struct SeaOrmBooksRepository {
    db: DatabaseConnection,
}

impl SeaOrmBooksRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connect to `dsn` and apply pending migrations.
    ///
    /// # Errors
    /// Returns [`DomainError::Database`] if connecting or migrating fails.
    pub async fn connect(dsn: &str) -> Result<Self, DomainError> {
        let db = Database::connect(dsn).await?;
        Migrator::up(&db, None).await?;
        tracing::info!("books storage ready");
        Ok(Self::new(db))
    }
}

#[async_trait]
impl BooksRepository for SeaOrmBooksRepository {
    async fn save(&self, book: NewBook) -> Result<Book, DomainError> {
        let txn = self.db.begin().await?;

        let existing = match book.id {
            Some(id) => BookEntity::find_by_id(id).one(&txn).await?,
            None => None,
        };

        let model = if let Some(existing) = existing {
            let mut am: ActiveModel = existing.into();
            am.title = Set(book.title);
            am.author = Set(book.author);
            am.update(&txn).await?
        } else {
            ActiveModel {
                id: NotSet,
                title: Set(book.title),
                author: Set(book.author),
            }
            .insert(&txn)
            .await?
        };

        txn.commit().await?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Book>, DomainError> {
        let found = BookEntity::find_by_id(id).one(&self.db).await?;
        Ok(found.map(Into::into))
    }
}
