use std::time::Duration;

use async_trait::async_trait;
use bookshelf_errors::Problem;
use reqwest::StatusCode;
use tracing::instrument;

use crate::api::{RegistrationClient, ServiceResolver};
use crate::errors::ServiceRegistryError;
use crate::models::{NewInstance, ServiceInstance};

const API_PREFIX: &str = "/registry/v1";

/// Talks to a remote registry over its REST API.
#[derive(Clone)]
pub struct HttpRegistryClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRegistryClient {
    /// # Errors
    /// Returns [`ServiceRegistryError::Internal`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceRegistryError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceRegistryError::internal(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{API_PREFIX}{path}", self.base_url)
    }
}

fn unreachable(e: &reqwest::Error) -> ServiceRegistryError {
    ServiceRegistryError::unavailable(e.to_string())
}

async fn error_from(resp: reqwest::Response, instance_id: &str) -> ServiceRegistryError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<Problem>(&body).map_or(body, |p| p.detail);

    match status {
        StatusCode::NOT_FOUND => ServiceRegistryError::not_found(instance_id),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ServiceRegistryError::validation(detail)
        }
        s if s.is_server_error() => ServiceRegistryError::unavailable(format!("{s}: {detail}")),
        s => ServiceRegistryError::internal(format!("{s}: {detail}")),
    }
}

#[async_trait]
impl ServiceResolver for HttpRegistryClient {
    #[instrument(skip(self), fields(registry = %self.base_url))]
    async fn resolve(&self, service_name: &str) -> Result<Vec<ServiceInstance>, ServiceRegistryError> {
        let resp = self
            .http
            .get(self.url(&format!("/services/{service_name}/instances")))
            .send()
            .await
            .map_err(|e| unreachable(&e))?;

        if !resp.status().is_success() {
            return Err(error_from(resp, "").await);
        }
        resp.json::<Vec<ServiceInstance>>()
            .await
            .map_err(|e| ServiceRegistryError::unavailable(format!("invalid instance list: {e}")))
    }
}

#[async_trait]
impl RegistrationClient for HttpRegistryClient {
    #[instrument(skip(self, instance), fields(registry = %self.base_url, service = %instance.service_name))]
    async fn register(&self, instance: NewInstance) -> Result<ServiceInstance, ServiceRegistryError> {
        let resp = self
            .http
            .post(self.url("/instances"))
            .json(&instance)
            .send()
            .await
            .map_err(|e| unreachable(&e))?;

        if !resp.status().is_success() {
            return Err(error_from(resp, instance.instance_id.as_deref().unwrap_or_default()).await);
        }
        resp.json::<ServiceInstance>()
            .await
            .map_err(|e| ServiceRegistryError::internal(format!("invalid instance body: {e}")))
    }

    #[instrument(skip(self), fields(registry = %self.base_url))]
    async fn heartbeat(&self, instance_id: &str) -> Result<(), ServiceRegistryError> {
        let resp = self
            .http
            .put(self.url(&format!("/instances/{instance_id}/heartbeat")))
            .send()
            .await
            .map_err(|e| unreachable(&e))?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(error_from(resp, instance_id).await)
        }
    }

    #[instrument(skip(self), fields(registry = %self.base_url))]
    async fn deregister(&self, instance_id: &str) -> Result<(), ServiceRegistryError> {
        let resp = self
            .http
            .delete(self.url(&format!("/instances/{instance_id}")))
            .send()
            .await
            .map_err(|e| unreachable(&e))?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(error_from(resp, instance_id).await)
        }
    }
}
