use std::collections::BTreeMap;

use async_trait::async_trait;
use books_sdk::{Book, NewBook};
use parking_lot::RwLock;

use crate::domain::{error::DomainError, repo::BooksRepository};

struct Inner {
    books: BTreeMap<i64, Book>,
    next_id: i64,
}

/// Map-backed store. Ids start at 1 and are never reused.
pub struct InMemoryBooksRepository {
    inner: RwLock<Inner>,
}

impl InMemoryBooksRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                books: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().books.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryBooksRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BooksRepository for InMemoryBooksRepository {
    async fn save(&self, book: NewBook) -> Result<Book, DomainError> {
        let mut inner = self.inner.write();

        if let Some(existing) = book.id.and_then(|id| inner.books.get_mut(&id)) {
            existing.title = book.title;
            existing.author = book.author;
            return Ok(existing.clone());
        }

        let id = inner.next_id;
        inner.next_id += 1;
        let stored = Book {
            id,
            title: book.title,
            author: book.author,
        };
        inner.books.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Book>, DomainError> {
        Ok(self.inner.read().books.get(&id).cloned())
    }
}
