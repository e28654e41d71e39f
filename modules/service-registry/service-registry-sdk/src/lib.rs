//! Service registry SDK
//!
//! Shared by the registry itself, by services that register with it, and by
//! the gateway that resolves service names through it.

pub mod api;
pub mod errors;
pub mod http_client;
pub mod models;
pub mod registration;
pub mod static_resolver;

pub use api::{RegistrationClient, ServiceResolver};
pub use errors::ServiceRegistryError;
pub use http_client::HttpRegistryClient;
pub use models::{InstanceStatus, NewInstance, ServiceInstance};
pub use registration::run_registration;
pub use static_resolver::StaticResolver;
