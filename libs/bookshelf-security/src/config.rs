use secrecy::SecretString;
use serde::{Deserialize, Serialize, Serializer};

/// Written in place of any configured secret when the config is serialized.
pub const REDACTED: &str = "***";

/// How inbound requests are authenticated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Validate `Authorization: Bearer` JWTs.
    #[default]
    Jwt,
    /// Every request runs as root. Local development only.
    Disabled,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub mode: AuthMode,
    pub jwt: JwtConfig,
    /// Paths served without authentication, matched exactly.
    pub public_paths: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JwtAlgorithm {
    #[default]
    HS256,
    RS256,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JwtConfig {
    pub algorithm: JwtAlgorithm,
    /// Shared secret for HS256. Serialized as [`REDACTED`].
    #[serde(serialize_with = "serialize_redacted")]
    pub secret: Option<SecretString>,
    /// PEM-encoded public key for RS256.
    pub public_key_pem: Option<String>,
    /// Allowed issuers (if empty, any issuer is accepted)
    pub issuers: Vec<String>,
    /// Allowed audiences (if empty, any audience is accepted)
    pub audiences: Vec<String>,
    /// Leeway in seconds for exp/nbf
    pub leeway_seconds: u64,
    /// Claim holding the role strings.
    pub roles_claim: String,
    /// Stripped from each role before parsing, e.g. `APPROLE_`.
    pub role_prefix: Option<String>,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            algorithm: JwtAlgorithm::HS256,
            secret: None,
            public_key_pem: None,
            issuers: Vec::new(),
            audiences: Vec::new(),
            leeway_seconds: 60,
            roles_claim: "roles".to_owned(),
            role_prefix: None,
        }
    }
}

#[allow(clippy::ref_option)] // signature fixed by `serde(serialize_with)`
fn serialize_redacted<S: Serializer>(secret: &Option<SecretString>, s: S) -> Result<S::Ok, S::Error> {
    match secret {
        Some(_) => s.serialize_some(REDACTED),
        None => s.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn secret_is_redacted_when_serialized() {
        let cfg = AuthConfig {
            jwt: JwtConfig {
                secret: Some("s3cr3t-value".into()),
                ..JwtConfig::default()
            },
            ..AuthConfig::default()
        };

        let out = serde_json::to_string_pretty(&cfg).unwrap();
        assert!(!out.contains("s3cr3t-value"), "{out}");
        assert!(out.contains(REDACTED));
        assert!(!format!("{cfg:?}").contains("s3cr3t-value"));
    }

    #[test]
    fn secret_is_read_from_plain_string() {
        let cfg: JwtConfig = serde_json::from_str(r#"{"secret":"from-file"}"#).unwrap();
        assert_eq!(cfg.secret.unwrap().expose_secret(), "from-file");

        let unset = serde_json::to_value(JwtConfig::default()).unwrap();
        assert!(unset["secret"].is_null());
    }
}
