use std::sync::Arc;

use async_trait::async_trait;
use service_registry_sdk::{ServiceInstance, ServiceRegistryError, ServiceResolver};

use crate::domain::service::Service;

/// In-process resolver over the registry service.
#[derive(Clone)]
pub struct LocalResolver {
    service: Arc<Service>,
}

impl LocalResolver {
    #[must_use]
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ServiceResolver for LocalResolver {
    async fn resolve(&self, service_name: &str) -> Result<Vec<ServiceInstance>, ServiceRegistryError> {
        Ok(self.service.live_instances(service_name))
    }
}
