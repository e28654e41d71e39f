//! Axum middleware and extractors for bearer authentication.
//!
//! The middleware only establishes *who* is calling. Whether the caller may do
//! something is decided by the operation itself through [`crate::authorize`].

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    config::{AuthConfig, AuthMode},
    context::SecurityContext,
    errors::AuthError,
    jwt::{JwtConfigError, JwtValidator},
};

/// Turns request headers into a [`SecurityContext`].
pub enum Authenticator {
    Disabled,
    Jwt(JwtValidator),
}

impl Authenticator {
    /// # Errors
    /// Returns [`JwtConfigError`] if JWT mode is selected without usable key material.
    pub fn from_config(cfg: &AuthConfig) -> Result<Self, JwtConfigError> {
        match cfg.mode {
            AuthMode::Disabled => {
                tracing::warn!(
                    "Authentication is DISABLED: every request runs with all capabilities. Do not use in production."
                );
                Ok(Self::Disabled)
            }
            AuthMode::Jwt => Ok(Self::Jwt(JwtValidator::from_config(&cfg.jwt)?)),
        }
    }

    /// # Errors
    /// [`AuthError::Unauthenticated`] when no bearer token is present, or the
    /// validator's error when the token is rejected.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<SecurityContext, AuthError> {
        match self {
            Self::Disabled => Ok(SecurityContext::root()),
            Self::Jwt(validator) => {
                let token = extract_bearer_token(headers).ok_or(AuthError::Unauthenticated)?;
                validator.validate(token)
            }
        }
    }
}

#[derive(Clone)]
pub struct AuthState {
    authenticator: Arc<Authenticator>,
    public_paths: Arc<[String]>,
}

impl AuthState {
    #[must_use]
    pub fn new(authenticator: Authenticator, public_paths: Vec<String>) -> Self {
        Self {
            authenticator: Arc::new(authenticator),
            public_paths: public_paths.into(),
        }
    }

    /// # Errors
    /// See [`Authenticator::from_config`].
    pub fn from_config(cfg: &AuthConfig) -> Result<Self, JwtConfigError> {
        Ok(Self::new(
            Authenticator::from_config(cfg)?,
            cfg.public_paths.clone(),
        ))
    }

    fn is_public(&self, path: &str) -> bool {
        self.public_paths.iter().any(|p| p == path)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header. The
/// scheme is matched case-insensitively.
#[must_use]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Authenticates the request and stores the resulting [`SecurityContext`] in
/// request extensions. Public paths get an anonymous context.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    if state.is_public(request.uri().path()) {
        request
            .extensions_mut()
            .insert(SecurityContext::anonymous());
        return next.run(request).await;
    }

    match state.authenticator.authenticate(request.headers()) {
        Ok(ctx) => {
            tracing::debug!(subject = ctx.subject(), "request authenticated");
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        Err(err) => {
            tracing::info!(
                method = %request.method(),
                path = request.uri().path(),
                error = %err,
                "authentication failed"
            );
            err.into_response()
        }
    }
}

/// Extractor for the caller's [`SecurityContext`]; requires [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct Authz(pub SecurityContext);

impl<S> FromRequestParts<S> for Authz
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext>()
            .cloned()
            .map(Authz)
            .ok_or_else(|| {
                AuthError::Internal(
                    "SecurityContext not found - auth middleware not configured".to_owned(),
                )
            })
    }
}
