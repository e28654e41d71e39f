use api_gateway::GatewayConfig;
use bookshelf_bootstrap::{LoggingConfig, ServerConfig};
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "GATEWAY__";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayServerConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub gateway: GatewayConfig,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use api_gateway::DiscoveryMode;
    use bookshelf_bootstrap::load_layered;
    use figment::Jail;

    #[test]
    fn static_services_from_yaml() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "gateway.yaml",
                r"
gateway:
  discovery:
    mode: static
    services:
      books-service:
        - http://127.0.0.1:8081
        - http://127.0.0.1:8082
  security:
    csrf:
      enabled: true
",
            )?;
            jail.set_env("GATEWAY__GATEWAY__UPSTREAM_TIMEOUT_MS", "250");

            let cfg = load_layered(
                &GatewayServerConfig::default(),
                Some(std::path::Path::new("gateway.yaml")),
                ENV_PREFIX,
            )
            .unwrap();

            assert_eq!(cfg.gateway.discovery.mode, DiscoveryMode::Static);
            assert_eq!(cfg.gateway.discovery.services["books-service"].len(), 2);
            assert!(cfg.gateway.security.csrf.enabled);
            assert_eq!(cfg.gateway.upstream_timeout_ms, 250);
            assert_eq!(cfg.gateway.routes.len(), 1);
            Ok(())
        });
    }
}
