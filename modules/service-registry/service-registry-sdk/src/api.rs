use async_trait::async_trait;

use crate::errors::ServiceRegistryError;
use crate::models::{NewInstance, ServiceInstance};

/// Maps a logical service name to its live instances.
#[async_trait]
pub trait ServiceResolver: Send + Sync {
    /// Live instances of `service_name`. An empty list is a valid answer.
    ///
    /// # Errors
    /// [`ServiceRegistryError::Unavailable`] if the source of truth cannot be queried.
    async fn resolve(&self, service_name: &str) -> Result<Vec<ServiceInstance>, ServiceRegistryError>;
}

/// Instance lifecycle calls made by a service about itself.
#[async_trait]
pub trait RegistrationClient: Send + Sync {
    async fn register(&self, instance: NewInstance) -> Result<ServiceInstance, ServiceRegistryError>;

    async fn heartbeat(&self, instance_id: &str) -> Result<(), ServiceRegistryError>;

    async fn deregister(&self, instance_id: &str) -> Result<(), ServiceRegistryError>;
}
