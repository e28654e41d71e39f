//! Service registry.
//!
//! Instances register under a service name and stay visible while they keep
//! heartbeating. The gateway resolves names through [`LocalResolver`] when
//! embedded, or through the REST surface otherwise.

pub mod api;
pub mod config;
pub mod domain;
pub mod module;
pub mod sweeper;

pub use config::RegistryConfig;
pub use domain::local_resolver::LocalResolver;
pub use module::RegistryModule;
