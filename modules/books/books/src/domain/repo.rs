use async_trait::async_trait;
use books_sdk::{Book, NewBook};

use crate::domain::error::DomainError;

/// Key-by-id store for books.
///
/// Ids handed out by `save` are unique for the lifetime of the store.
#[async_trait]
pub trait BooksRepository: Send + Sync {
    /// Insert a new book, or overwrite the book with `book.id` if it exists.
    /// A supplied id that matches nothing is ignored and a fresh id is assigned.
    async fn save(&self, book: NewBook) -> Result<Book, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Book>, DomainError>;
}
