use std::time::Duration;

use books::BooksConfig;
use bookshelf_bootstrap::{LoggingConfig, ServerConfig};
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "BOOKS__";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BooksServerConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub books: BooksConfig,
    pub discovery: RegistrationConfig,
}

impl Default for BooksServerConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::with_bind_addr("127.0.0.1:8081"),
            logging: LoggingConfig::default(),
            books: BooksConfig::default(),
            discovery: RegistrationConfig::default(),
        }
    }
}

/// Self-registration with the service registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistrationConfig {
    pub enabled: bool,
    pub registry_url: String,
    pub service_name: String,
    /// Address the gateway should use; defaults to `http://<bind_addr>`.
    pub advertise_url: Option<String>,
    pub instance_id: Option<String>,
    pub heartbeat_interval_ms: u64,
    /// Per-request timeout for registry calls.
    pub registry_timeout_ms: u64,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            registry_url: "http://127.0.0.1:8761".to_owned(),
            service_name: "books-service".to_owned(),
            advertise_url: None,
            instance_id: None,
            heartbeat_interval_ms: 10_000,
            registry_timeout_ms: 5_000,
        }
    }
}

impl RegistrationConfig {
    #[must_use]
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    #[must_use]
    pub fn registry_timeout(&self) -> Duration {
        Duration::from_millis(self.registry_timeout_ms)
    }

    #[must_use]
    pub fn advertise_url(&self, server: &ServerConfig) -> String {
        self.advertise_url
            .clone()
            .unwrap_or_else(|| format!("http://{}", server.bind_addr))
    }
}
