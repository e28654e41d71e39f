//! Bearer JWT validation and role extraction.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};
use secrecy::ExposeSecret;
use serde_json::Value;
use thiserror::Error;

use crate::{
    capability::Capability,
    config::{JwtAlgorithm, JwtConfig},
    context::SecurityContext,
    errors::AuthError,
};

#[derive(Debug, Error)]
pub enum JwtConfigError {
    #[error("HS256 requires `auth.jwt.secret`")]
    MissingSecret,

    #[error("RS256 requires `auth.jwt.public_key_pem`")]
    MissingPublicKey,

    #[error("invalid RS256 public key: {0}")]
    InvalidKey(String),
}

/// Validates tokens and turns their claims into a [`SecurityContext`].
#[derive(Clone)]
pub struct JwtValidator {
    key: DecodingKey,
    validation: Validation,
    roles_claim: String,
    role_prefix: Option<String>,
}

impl JwtValidator {
    /// # Errors
    /// Returns [`JwtConfigError`] when the key material for the chosen algorithm is absent or invalid.
    pub fn from_config(cfg: &JwtConfig) -> Result<Self, JwtConfigError> {
        let (algorithm, key) = match cfg.algorithm {
            JwtAlgorithm::HS256 => {
                let secret = cfg.secret.as_ref().ok_or(JwtConfigError::MissingSecret)?;
                (
                    Algorithm::HS256,
                    DecodingKey::from_secret(secret.expose_secret().as_bytes()),
                )
            }
            JwtAlgorithm::RS256 => {
                let pem = cfg
                    .public_key_pem
                    .as_deref()
                    .ok_or(JwtConfigError::MissingPublicKey)?;
                let key = DecodingKey::from_rsa_pem(pem.as_bytes())
                    .map_err(|e| JwtConfigError::InvalidKey(e.to_string()))?;
                (Algorithm::RS256, key)
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.leeway = cfg.leeway_seconds;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if !cfg.issuers.is_empty() {
            validation.set_issuer(&cfg.issuers);
        }
        if cfg.audiences.is_empty() {
            validation.validate_aud = false;
        } else {
            validation.set_audience(&cfg.audiences);
        }

        Ok(Self {
            key,
            validation,
            roles_claim: cfg.roles_claim.clone(),
            role_prefix: cfg.role_prefix.clone(),
        })
    }

    /// # Errors
    /// [`AuthError::TokenExpired`] for expired tokens, [`AuthError::InvalidToken`] otherwise.
    pub fn validate(&self, token: &str) -> Result<SecurityContext, AuthError> {
        let data = decode::<Value>(token, &self.key, &self.validation).map_err(|e| {
            if matches!(e.kind(), ErrorKind::ExpiredSignature) {
                AuthError::TokenExpired
            } else {
                AuthError::InvalidToken(e.to_string())
            }
        })?;

        let claims = data.claims;
        let subject = claims
            .get("sub")
            .and_then(Value::as_str)
            .ok_or_else(|| AuthError::InvalidToken("'sub' claim must be a string".to_owned()))?;

        Ok(SecurityContext::builder()
            .subject(subject)
            .capabilities(self.capabilities_from(&claims))
            .build())
    }

    /// Reads the roles claim as an array of strings or a space-separated string.
    fn capabilities_from(&self, claims: &Value) -> Vec<Capability> {
        let raw: Vec<&str> = match claims.get(&self.roles_claim) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(s)) => s.split_whitespace().collect(),
            _ => Vec::new(),
        };

        raw.into_iter()
            .filter_map(|role| {
                let role = match self.role_prefix.as_deref() {
                    Some(prefix) => role.strip_prefix(prefix).unwrap_or(role),
                    None => role,
                };
                match role.parse::<Capability>() {
                    Ok(cap) => Some(cap),
                    Err(e) => {
                        tracing::debug!(role, error = %e, "ignoring unrecognized role");
                        None
                    }
                }
            })
            .collect()
    }
}
