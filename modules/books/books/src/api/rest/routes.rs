use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    routing::{get, post},
};
use bookshelf_errors::{Problem, ValidationViolation};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use super::{dto::BookDto, handlers};
use crate::domain::service::Service;

pub const OPENAPI_PATH: &str = "/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(title = "Books API", description = "Capability-gated access to the book store"),
    paths(handlers::get_book, handlers::save_book),
    components(schemas(BookDto, Problem, ValidationViolation)),
    modifiers(&BearerSecurity),
    tags((name = "books", description = "Book records"))
)]
pub struct BooksApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Book routes. Expects the auth middleware to be layered on top.
#[must_use]
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/books/{id}", get(handlers::get_book))
        .route("/books/add", post(handlers::save_book))
        .layer(Extension(service))
}

/// `GET /openapi.json`
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(BooksApiDoc::openapi())
}
