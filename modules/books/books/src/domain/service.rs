use std::sync::Arc;

use bookshelf_security::{SecRequirement, SecurityContext, authorize};
use books_sdk::{Book, NewBook};
use tracing::{debug, info, instrument};

use crate::domain::{
    error::{DomainError, FieldViolation},
    repo::BooksRepository,
};

/// Resource name used in capability checks.
#[derive(Debug, Clone, Copy)]
pub enum Resource {
    Books,
}

impl AsRef<str> for Resource {
    fn as_ref(&self) -> &str {
        match self {
            Resource::Books => "Books",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Action {
    Read,
    Write,
}

impl AsRef<str> for Action {
    fn as_ref(&self) -> &str {
        match self {
            Action::Read => "Read",
            Action::Write => "Write",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Upper bound for `title` and `author`, in characters.
    pub max_field_len: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { max_field_len: 255 }
    }
}

/// Books domain service.
pub struct Service {
    repo: Arc<dyn BooksRepository>,
    config: ServiceConfig,
}

impl Service {
    #[must_use]
    pub fn new(repo: Arc<dyn BooksRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    /// Look up a book. Needs `Books.Read`.
    ///
    /// # Errors
    /// [`DomainError::Forbidden`] without the capability (the store is not
    /// queried), [`DomainError::Database`] if the store fails.
    #[instrument(skip(self, ctx), fields(subject = ctx.subject()))]
    pub async fn get_book(
        &self,
        ctx: &SecurityContext,
        id: i64,
    ) -> Result<Option<Book>, DomainError> {
        check(ctx, Action::Read)?;

        let found = self.repo.find_by_id(id).await?;
        debug!(found = found.is_some(), "book lookup finished");
        Ok(found)
    }

    /// Store a book and return it with its id. Needs `Books.Write`.
    ///
    /// # Errors
    /// [`DomainError::Forbidden`] without the capability (nothing is stored),
    /// [`DomainError::Validation`] for blank or oversized fields,
    /// [`DomainError::Database`] if the store fails.
    #[instrument(skip(self, ctx, new_book), fields(subject = ctx.subject(), id = ?new_book.id))]
    pub async fn save_book(
        &self,
        ctx: &SecurityContext,
        new_book: NewBook,
    ) -> Result<Book, DomainError> {
        check(ctx, Action::Write)?;
        self.validate(&new_book)?;

        let saved = self.repo.save(new_book).await?;
        info!(book_id = saved.id, "book saved");
        Ok(saved)
    }

    fn validate(&self, book: &NewBook) -> Result<(), DomainError> {
        let violations: Vec<FieldViolation> = [("title", &book.title), ("author", &book.author)]
            .into_iter()
            .filter_map(|(field, value)| self.check_field(field, value))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(violations))
        }
    }

    fn check_field(&self, field: &'static str, value: &str) -> Option<FieldViolation> {
        let message = if value.trim().is_empty() {
            "must not be blank".to_owned()
        } else if value.chars().count() > self.config.max_field_len {
            format!("must be at most {} characters", self.config.max_field_len)
        } else {
            return None;
        };
        Some(FieldViolation { field, message })
    }
}

/// Capability gate run first in every operation.
fn check(ctx: &SecurityContext, action: Action) -> Result<(), DomainError> {
    let requirement = SecRequirement::new(Resource::Books, action);
    authorize(ctx, &requirement).map_err(|_| {
        info!(required = %requirement, "capability missing, request rejected");
        DomainError::forbidden(requirement.to_string())
    })
}
