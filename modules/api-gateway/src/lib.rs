//! Edge gateway.
//!
//! Every request runs through a [`filters::SecurityFilterChain`], is matched
//! against the route table, resolved to a live instance through a
//! [`service_registry_sdk::ServiceResolver`] and forwarded with its method,
//! path and query unchanged.

pub mod balancer;
pub mod config;
pub mod error;
pub mod filters;
pub mod module;
pub mod proxy;
pub mod routing;

pub use config::{DiscoveryConfig, DiscoveryMode, GatewayConfig, RouteConfig, SecurityConfig};
pub use error::GatewayError;
pub use filters::{FilterRejection, SecurityFilter, SecurityFilterChain};
pub use module::GatewayModule;
