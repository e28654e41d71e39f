//! Books resource service.
//!
//! `GET /books/{id}` needs `Books.Read`, `POST /books/add` needs `Books.Write`.
//! Both checks run inside [`domain::service::Service`] before the store is touched.

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
pub mod module;

pub use config::{BooksConfig, StorageConfig, StorageKind};
pub use module::BooksModule;
