use bookshelf_bootstrap::{LoggingConfig, ServerConfig};
use serde::{Deserialize, Serialize};
use service_registry::RegistryConfig;

pub const ENV_PREFIX: &str = "REGISTRY__";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryServerConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub registry: RegistryConfig,
}

impl Default for RegistryServerConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::with_bind_addr("127.0.0.1:8761"),
            logging: LoggingConfig::default(),
            registry: RegistryConfig::default(),
        }
    }
}
