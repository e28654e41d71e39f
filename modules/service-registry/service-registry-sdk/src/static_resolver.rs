use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;

use crate::api::ServiceResolver;
use crate::errors::ServiceRegistryError;
use crate::models::{InstanceStatus, ServiceInstance};

/// Fixed service table, typically read from configuration.
///
/// Instance ids are `<service>-<index>`. An unknown service resolves to an
/// empty list, not an error.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    services: HashMap<String, Vec<ServiceInstance>>,
}

impl StaticResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_service<I, S>(mut self, service_name: &str, base_urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let now = Utc::now();
        let instances = base_urls
            .into_iter()
            .enumerate()
            .map(|(idx, url)| {
                let url: String = url.into();
                ServiceInstance {
                    instance_id: format!("{service_name}-{idx}"),
                    service_name: service_name.to_owned(),
                    base_url: url.trim_end_matches('/').to_owned(),
                    status: InstanceStatus::Up,
                    registered_at: now,
                    last_heartbeat: now,
                }
            })
            .collect();
        self.services.insert(service_name.to_owned(), instances);
        self
    }
}

#[async_trait]
impl ServiceResolver for StaticResolver {
    async fn resolve(&self, service_name: &str) -> Result<Vec<ServiceInstance>, ServiceRegistryError> {
        Ok(self.services.get(service_name).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[tokio::test]
    async fn resolves_configured_urls_in_order() {
        let resolver = StaticResolver::new()
            .with_service("books-service", ["http://a:1/", "http://b:2"]);

        let found = resolver.resolve("books-service").await.unwrap();
        let urls: Vec<&str> = found.iter().map(|i| i.base_url.as_str()).collect();
        assert_eq!(urls, ["http://a:1", "http://b:2"]);
        assert_eq!(found[1].instance_id, "books-service-1");
    }

    #[tokio::test]
    async fn unknown_service_is_empty() {
        let resolver = StaticResolver::new().with_service("books-service", Vec::<String>::new());
        assert!(resolver.resolve("books-service").await.unwrap().is_empty());
        assert!(resolver.resolve("other").await.unwrap().is_empty());
    }
}
