//! Books SDK
//!
//! Transport-agnostic models and errors shared by the books service and its
//! callers, plus [`BooksHttpClient`] for talking to the service (directly or
//! through the gateway).

pub mod client;
pub mod errors;
pub mod models;

pub use client::BooksHttpClient;
pub use errors::BooksError;
pub use models::{Book, NewBook};
