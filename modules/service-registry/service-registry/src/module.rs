use std::sync::Arc;

use axum::{Router, routing::get};
use bookshelf_bootstrap::health;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::api::rest::routes;
use crate::config::RegistryConfig;
use crate::domain::{local_resolver::LocalResolver, service::Service, storage::InstanceStorage};
use crate::sweeper::spawn_sweeper;

pub struct RegistryModule {
    service: Arc<Service>,
    sweep_interval: std::time::Duration,
}

impl RegistryModule {
    #[must_use]
    pub fn new(cfg: &RegistryConfig) -> Self {
        info!(
            heartbeat_ttl_ms = cfg.heartbeat_ttl_ms,
            sweep_interval_ms = cfg.sweep_interval_ms,
            "Initializing service registry"
        );
        let storage = Arc::new(InstanceStorage::new());
        Self {
            service: Arc::new(Service::new(storage, cfg.heartbeat_ttl())),
            sweep_interval: cfg.sweep_interval(),
        }
    }

    #[must_use]
    pub fn service(&self) -> Arc<Service> {
        Arc::clone(&self.service)
    }

    #[must_use]
    pub fn resolver(&self) -> LocalResolver {
        LocalResolver::new(self.service())
    }

    /// REST routes plus `/health`. The registry is an internal service and
    /// runs without authentication.
    #[must_use]
    pub fn router(&self) -> Router {
        routes::router(self.service()).route("/health", get(health))
    }

    #[must_use]
    pub fn start_sweeper(&self, cancel: CancellationToken) -> JoinHandle<()> {
        spawn_sweeper(self.service(), self.sweep_interval, cancel)
    }
}
