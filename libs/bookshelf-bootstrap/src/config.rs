//! Layered configuration: defaults -> YAML file -> environment.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive, e.g. `info` or `books=debug,info`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Inbound request timeout.
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_owned(),
            request_timeout_ms: 30_000,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn with_bind_addr(bind_addr: impl Into<String>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            ..Self::default()
        }
    }

    /// # Errors
    /// Returns an error if `bind_addr` is not a valid socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr
            .parse()
            .with_context(|| format!("invalid bind address '{}'", self.bind_addr))
    }

    /// Replace the port of `bind_addr`, keeping the host.
    ///
    /// # Errors
    /// Returns an error if the current `bind_addr` cannot be parsed.
    pub fn override_port(&mut self, port: u16) -> Result<()> {
        let mut addr = self.socket_addr()?;
        addr.set_port(port);
        self.bind_addr = addr.to_string();
        Ok(())
    }
}

/// Load `T` from `defaults`, then the YAML file at `path` (if any), then
/// environment variables starting with `env_prefix` (`__` separates levels).
///
/// # Errors
/// Returns an error if any layer fails to parse or the merged result does not
/// deserialize into `T`.
pub fn load_layered<T>(defaults: &T, path: Option<&Path>, env_prefix: &str) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut figment = Figment::from(Serialized::defaults(defaults));
    if let Some(path) = path {
        figment = figment.merge(Yaml::file(path));
    }
    figment = figment.merge(Env::prefixed(env_prefix).split("__"));

    figment
        .extract()
        .with_context(|| match path {
            Some(p) => format!("failed to load configuration from {}", p.display()),
            None => "failed to load configuration".to_owned(),
        })
}

/// Render the effective configuration for `--print-config` and `check`.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn render_config<T: Serialize>(config: &T) -> Result<String> {
    serde_json::to_string_pretty(config).context("failed to render configuration")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use figment::Jail;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    #[serde(default, deny_unknown_fields)]
    struct SampleConfig {
        server: ServerConfig,
        logging: LoggingConfig,
        name: String,
    }

    impl Default for SampleConfig {
        fn default() -> Self {
            Self {
                server: ServerConfig::with_bind_addr("127.0.0.1:9000"),
                logging: LoggingConfig::default(),
                name: "default".to_owned(),
            }
        }
    }

    fn load(path: Option<&Path>) -> figment::Result<SampleConfig> {
        load_layered(&SampleConfig::default(), path, "SAMPLE__").map_err(|e| format!("{e:#}").into())
    }

    #[test]
    fn defaults_apply_without_file_or_env() {
        Jail::expect_with(|_jail| {
            let cfg = load(None)?;
            assert_eq!(cfg, SampleConfig::default());
            Ok(())
        });
    }

    #[test]
    fn yaml_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "app.yaml",
                "name: from-yaml\nserver:\n  bind_addr: 0.0.0.0:7000\nlogging:\n  format: json\n",
            )?;
            jail.set_env("SAMPLE__NAME", "from-env");

            let cfg = load(Some(Path::new("app.yaml")))?;
            assert_eq!(cfg.name, "from-env");
            assert_eq!(cfg.server.bind_addr, "0.0.0.0:7000");
            assert_eq!(cfg.server.request_timeout_ms, 30_000);
            assert_eq!(cfg.logging.format, LogFormat::Json);
            Ok(())
        });
    }

    #[test]
    fn unknown_keys_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("bad.yaml", "server:\n  bind_adr: 0.0.0.0:1\n")?;
            assert!(load(Some(Path::new("bad.yaml"))).is_err());
            Ok(())
        });
    }

    #[test]
    fn port_override_keeps_host() {
        let mut server = ServerConfig::with_bind_addr("0.0.0.0:8081");
        server.override_port(9999).unwrap();
        assert_eq!(server.bind_addr, "0.0.0.0:9999");

        let mut broken = ServerConfig::with_bind_addr("not an addr");
        assert!(broken.override_port(1).is_err());
    }
}
