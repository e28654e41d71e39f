use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{
        Path,
        rejection::{JsonRejection, PathRejection},
    },
    http::Uri,
};
use bookshelf_errors::{Problem, response::ApiResult};
use bookshelf_security::axum_ext::Authz;
use tracing::info;

use super::dto::BookDto;
use super::error::{book_not_found, domain_error_to_problem, json_rejection, path_rejection};
use crate::domain::service::Service;

/// Fetch one book.
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book identifier")),
    responses(
        (status = 200, description = "The stored book", body = BookDto),
        (status = 400, description = "Identifier is not an integer", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Missing or invalid bearer token", body = Problem, content_type = "application/problem+json"),
        (status = 403, description = "Caller lacks Books.Read", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "No book with this identifier", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Storage failure", body = Problem, content_type = "application/problem+json"),
    ),
    security(("bearer" = []))
)]
pub async fn get_book(
    uri: Uri,
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<Service>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<BookDto>> {
    let Path(id) = id.map_err(|r| path_rejection(&r, uri.path()))?;
    info!(book_id = id, requester = ctx.subject(), "Getting book");

    match svc.get_book(&ctx, id).await {
        Ok(Some(book)) => Ok(Json(BookDto::from(book))),
        Ok(None) => Err(book_not_found(id, uri.path())),
        Err(e) => Err(domain_error_to_problem(&e, uri.path())),
    }
}

/// Store a book; the response carries the assigned id.
#[utoipa::path(
    post,
    path = "/books/add",
    tag = "books",
    request_body = BookDto,
    responses(
        (status = 200, description = "The stored book with its identifier", body = BookDto),
        (status = 400, description = "Malformed JSON body", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Missing or invalid bearer token", body = Problem, content_type = "application/problem+json"),
        (status = 403, description = "Caller lacks Books.Write", body = Problem, content_type = "application/problem+json"),
        (status = 422, description = "Blank or oversized title/author", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Storage failure", body = Problem, content_type = "application/problem+json"),
    ),
    security(("bearer" = []))
)]
pub async fn save_book(
    uri: Uri,
    Authz(ctx): Authz,
    Extension(svc): Extension<Arc<Service>>,
    body: Result<Json<BookDto>, JsonRejection>,
) -> ApiResult<Json<BookDto>> {
    let Json(dto) = body.map_err(|r| json_rejection(&r, uri.path()))?;
    info!(requester = ctx.subject(), id = ?dto.id, "Saving book");

    let saved = svc
        .save_book(&ctx, dto.into())
        .await
        .map_err(|e| domain_error_to_problem(&e, uri.path()))?;
    Ok(Json(BookDto::from(saved)))
}
