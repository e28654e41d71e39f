use books_sdk::{Book, NewBook};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Wire shape of a book, for requests and responses.
///
/// `id` is `null`/absent on create and always set in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookDto {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    pub author: String,
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            id: Some(book.id),
            title: book.title,
            author: book.author,
        }
    }
}

impl From<BookDto> for NewBook {
    fn from(dto: BookDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            author: dto.author,
        }
    }
}
