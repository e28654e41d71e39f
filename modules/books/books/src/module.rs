use std::sync::Arc;

use axum::{Router, middleware::from_fn_with_state, routing::get};
use bookshelf_bootstrap::health;
use bookshelf_security::axum_ext::AuthState;
use tracing::info;

use crate::api::rest::routes::{self, OPENAPI_PATH};
use crate::config::{BooksConfig, StorageKind};
use crate::domain::{
    repo::BooksRepository,
    service::{Service, ServiceConfig},
};
use crate::infra::storage::{InMemoryBooksRepository, SeaOrmBooksRepository};

pub const HEALTH_PATH: &str = "/health";

/// Wires the store, the domain service and the authenticated router.
pub struct BooksModule {
    service: Arc<Service>,
    auth: AuthState,
}

impl BooksModule {
    /// Build the module from configuration, opening the configured store.
    ///
    /// # Errors
    /// Fails if the auth settings lack key material or the store cannot be opened.
    pub async fn init(cfg: &BooksConfig) -> anyhow::Result<Self> {
        info!(storage = ?cfg.storage.kind, "Initializing books module");

        let repo: Arc<dyn BooksRepository> = match cfg.storage.kind {
            StorageKind::Memory => Arc::new(InMemoryBooksRepository::new()),
            StorageKind::Sqlite => Arc::new(SeaOrmBooksRepository::connect(&cfg.storage.dsn).await?),
        };

        let module = Self::from_parts(repo, cfg)?;
        info!("Books module initialized");
        Ok(module)
    }

    /// Build the module around an existing store.
    ///
    /// # Errors
    /// Fails if the auth settings lack key material.
    pub fn from_parts(repo: Arc<dyn BooksRepository>, cfg: &BooksConfig) -> anyhow::Result<Self> {
        let service = Service::new(
            repo,
            ServiceConfig {
                max_field_len: cfg.max_field_len,
            },
        );

        let mut auth_cfg = cfg.auth.clone();
        for path in [HEALTH_PATH, OPENAPI_PATH] {
            if !auth_cfg.public_paths.iter().any(|p| p == path) {
                auth_cfg.public_paths.push(path.to_owned());
            }
        }

        Ok(Self {
            service: Arc::new(service),
            auth: AuthState::from_config(&auth_cfg)?,
        })
    }

    #[must_use]
    pub fn service(&self) -> Arc<Service> {
        Arc::clone(&self.service)
    }

    /// Book routes, `/openapi.json` and `/health` behind the auth middleware.
    #[must_use]
    pub fn router(&self) -> Router {
        routes::router(self.service())
            .route(OPENAPI_PATH, get(routes::openapi_json))
            .route(HEALTH_PATH, get(health))
            .layer(from_fn_with_state(
                self.auth.clone(),
                bookshelf_security::axum_ext::auth_middleware,
            ))
    }
}
