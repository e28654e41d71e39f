use std::time::Duration;

use bookshelf_errors::Problem;
use reqwest::StatusCode;
use tracing::instrument;

use crate::{
    errors::BooksError,
    models::{Book, NewBook},
};

/// HTTP client for the books API.
///
/// Point `base_url` at the gateway (or the service itself). The bearer token,
/// when set, is sent on every call.
#[derive(Clone)]
pub struct BooksHttpClient {
    http: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl BooksHttpClient {
    /// # Errors
    /// Returns [`BooksError::Transport`] if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BooksError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BooksError::transport(e.to_string()))?;
        Ok(Self::with_client(http, base_url))
    }

    #[must_use]
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            bearer_token: None,
        }
    }

    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// `GET /books/{id}`. A missing book is `Ok(None)`.
    ///
    /// # Errors
    /// Any non-success status other than 404, or a transport failure.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn get_book(&self, id: i64) -> Result<Option<Book>, BooksError> {
        let resp = self
            .authorized(self.http.get(self.url(&format!("/books/{id}"))))
            .send()
            .await
            .map_err(|e| BooksError::transport(e.to_string()))?;

        match resp.status() {
            StatusCode::OK => resp
                .json::<Book>()
                .await
                .map(Some)
                .map_err(|e| BooksError::transport(format!("invalid book body: {e}"))),
            StatusCode::NOT_FOUND => {
                let problem = read_problem(resp).await;
                // A gateway without a matching route also answers 404.
                if problem.code.starts_with("GATEWAY_") {
                    Err(BooksError::from_status(404, problem.detail))
                } else {
                    Ok(None)
                }
            }
            status => Err(error_from(status, resp).await),
        }
    }

    /// `POST /books/add`.
    ///
    /// # Errors
    /// Any non-success status, or a transport failure.
    #[instrument(skip(self, book), fields(base_url = %self.base_url))]
    pub async fn save_book(&self, book: &NewBook) -> Result<Book, BooksError> {
        let resp = self
            .authorized(self.http.post(self.url("/books/add")))
            .json(book)
            .send()
            .await
            .map_err(|e| BooksError::transport(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            resp.json::<Book>()
                .await
                .map_err(|e| BooksError::transport(format!("invalid book body: {e}")))
        } else {
            Err(error_from(status, resp).await)
        }
    }
}

async fn read_problem(resp: reqwest::Response) -> Problem {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    serde_json::from_str::<Problem>(&body).unwrap_or_else(|_| {
        let detail = if body.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_owned()
        } else {
            body
        };
        Problem::new(status, status.canonical_reason().unwrap_or(""), detail)
    })
}

async fn error_from(status: StatusCode, resp: reqwest::Response) -> BooksError {
    let problem = read_problem(resp).await;
    tracing::debug!(status = status.as_u16(), code = %problem.code, "books call failed");
    BooksError::from_status(status.as_u16(), problem.detail)
}
