use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    /// Matched in order; the first matching prefix wins.
    pub routes: Vec<RouteConfig>,
    pub security: SecurityConfig,
    pub discovery: DiscoveryConfig,
    pub upstream_timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            routes: vec![RouteConfig {
                id: "books".to_owned(),
                path_prefix: "/books".to_owned(),
                service: "books-service".to_owned(),
            }],
            security: SecurityConfig::default(),
            discovery: DiscoveryConfig::default(),
            upstream_timeout_ms: 10_000,
        }
    }
}

impl GatewayConfig {
    #[must_use]
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    pub id: String,
    pub path_prefix: String,
    pub service: String,
}

/// Filters are off unless enabled here; an empty chain passes everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SecurityConfig {
    pub csrf: CsrfConfig,
    pub require_bearer: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CsrfConfig {
    pub enabled: bool,
    pub cookie_name: String,
    pub header_name: String,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cookie_name: "XSRF-TOKEN".to_owned(),
            header_name: "x-xsrf-token".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryMode {
    /// Instances listed under `discovery.services`.
    #[default]
    Static,
    /// Instances looked up in the service registry on every request.
    Registry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    pub mode: DiscoveryMode,
    pub registry_url: String,
    pub registry_timeout_ms: u64,
    /// Service name to instance base URLs, for `static` mode.
    pub services: BTreeMap<String, Vec<String>>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            mode: DiscoveryMode::Static,
            registry_url: "http://127.0.0.1:8761".to_owned(),
            registry_timeout_ms: 2_000,
            services: BTreeMap::new(),
        }
    }
}
