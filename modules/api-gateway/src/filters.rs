//! Pluggable request filters run before routing.

use std::sync::Arc;

use http::{HeaderMap, Method, header, request::Parts};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::config::{CsrfConfig, SecurityConfig};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterRejection {
    #[error("{filter}: {reason}")]
    Unauthenticated { filter: &'static str, reason: String },

    #[error("{filter}: {reason}")]
    Forbidden { filter: &'static str, reason: String },
}

/// One check applied to every inbound request.
pub trait SecurityFilter: Send + Sync {
    fn name(&self) -> &'static str;

    /// # Errors
    /// [`FilterRejection`] to stop the request before it is routed.
    fn apply(&self, parts: &Parts) -> Result<(), FilterRejection>;
}

/// Ordered filters; the first rejection wins.
#[derive(Clone, Default)]
pub struct SecurityFilterChain {
    filters: Vec<Arc<dyn SecurityFilter>>,
}

impl SecurityFilterChain {
    /// The pass-through chain.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, filter: impl SecurityFilter + 'static) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    #[must_use]
    pub fn from_config(cfg: &SecurityConfig) -> Self {
        let mut chain = Self::empty();
        if cfg.csrf.enabled {
            chain = chain.with(CsrfFilter::new(&cfg.csrf));
        }
        if cfg.require_bearer {
            chain = chain.with(BearerPresenceFilter);
        }
        chain
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// # Errors
    /// The first [`FilterRejection`] raised by a filter.
    pub fn apply(&self, parts: &Parts) -> Result<(), FilterRejection> {
        self.filters.iter().try_for_each(|f| f.apply(parts))
    }
}

/// Double-submit cookie check on state-changing methods.
pub struct CsrfFilter {
    cookie_name: String,
    header_name: String,
}

impl CsrfFilter {
    #[must_use]
    pub fn new(cfg: &CsrfConfig) -> Self {
        Self {
            cookie_name: cfg.cookie_name.clone(),
            header_name: cfg.header_name.clone(),
        }
    }

    fn cookie<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.cookie_name)
            .map(|(_, value)| value)
    }
}

fn is_safe(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

impl SecurityFilter for CsrfFilter {
    fn name(&self) -> &'static str {
        "csrf"
    }

    fn apply(&self, parts: &Parts) -> Result<(), FilterRejection> {
        if is_safe(&parts.method) {
            return Ok(());
        }

        let sent = parts
            .headers
            .get(self.header_name.as_str())
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty());

        match (self.cookie(&parts.headers), sent) {
            (Some(cookie), Some(header)) if tokens_match(cookie, header) => Ok(()),
            _ => Err(FilterRejection::Forbidden {
                filter: self.name(),
                reason: "missing or mismatched CSRF token".to_owned(),
            }),
        }
    }
}

/// Constant-time comparison.
fn tokens_match(cookie: &str, header: &str) -> bool {
    cookie.as_bytes().ct_eq(header.as_bytes()).into()
}

/// Token of an `Authorization: Bearer <token>` header. The scheme is
/// case-insensitive (RFC 7235).
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Requires an `Authorization: Bearer` header. The token itself is checked
/// by the upstream service.
pub struct BearerPresenceFilter;

impl SecurityFilter for BearerPresenceFilter {
    fn name(&self) -> &'static str {
        "bearer-presence"
    }

    fn apply(&self, parts: &Parts) -> Result<(), FilterRejection> {
        if bearer_token(&parts.headers).is_some() {
            Ok(())
        } else {
            Err(FilterRejection::Unauthenticated {
                filter: self.name(),
                reason: "bearer token required".to_owned(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use http::Request;

    fn parts(method: Method, headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().method(method).uri("/books/add");
        for (k, v) in headers {
            builder = builder.header(*k, *v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn csrf_chain() -> SecurityFilterChain {
        SecurityFilterChain::from_config(&SecurityConfig {
            csrf: CsrfConfig {
                enabled: true,
                ..CsrfConfig::default()
            },
            require_bearer: false,
        })
    }

    #[test]
    fn default_chain_is_empty_and_passes_everything() {
        let chain = SecurityFilterChain::from_config(&SecurityConfig::default());
        assert!(chain.is_empty());
        assert_eq!(chain.apply(&parts(Method::POST, &[])), Ok(()));
    }

    #[test]
    fn csrf_ignores_safe_methods() {
        assert_eq!(csrf_chain().apply(&parts(Method::GET, &[])), Ok(()));
    }

    #[test]
    fn csrf_rejects_missing_or_mismatched_token() {
        let chain = csrf_chain();
        assert!(matches!(
            chain.apply(&parts(Method::POST, &[])),
            Err(FilterRejection::Forbidden { filter: "csrf", .. })
        ));
        assert!(
            chain
                .apply(&parts(
                    Method::POST,
                    &[("cookie", "XSRF-TOKEN=abc"), ("x-xsrf-token", "xyz")]
                ))
                .is_err()
        );
    }

    #[test]
    fn csrf_accepts_matching_double_submit() {
        let p = parts(
            Method::POST,
            &[
                ("cookie", "session=1; XSRF-TOKEN=abc"),
                ("x-xsrf-token", "abc"),
            ],
        );
        assert_eq!(csrf_chain().apply(&p), Ok(()));
    }

    #[test]
    fn bearer_presence() {
        let chain = SecurityFilterChain::empty().with(BearerPresenceFilter);
        assert!(matches!(
            chain.apply(&parts(Method::GET, &[])),
            Err(FilterRejection::Unauthenticated { .. })
        ));
        assert_eq!(
            chain.apply(&parts(Method::GET, &[("authorization", "Bearer t")])),
            Ok(())
        );
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        let chain = SecurityFilterChain::empty().with(BearerPresenceFilter);
        for value in ["bearer t", "BEARER t", "bEaReR   t"] {
            assert_eq!(
                chain.apply(&parts(Method::GET, &[("authorization", value)])),
                Ok(()),
                "{value}"
            );
        }
        for value in ["Basic Zm9v", "Bearer ", "Bearer"] {
            assert!(
                chain
                    .apply(&parts(Method::GET, &[("authorization", value)]))
                    .is_err(),
                "{value}"
            );
        }
    }

    #[test]
    fn csrf_tokens_of_different_length_do_not_match() {
        assert!(tokens_match("abc", "abc"));
        assert!(!tokens_match("abc", "abcd"));
        assert!(!tokens_match("abc", "abd"));
        assert!(!tokens_match("", "abc"));
    }

    #[test]
    fn first_rejection_wins() {
        let chain = csrf_chain().with(BearerPresenceFilter);
        assert_eq!(chain.names(), ["csrf", "bearer-presence"]);
        assert!(matches!(
            chain.apply(&parts(Method::POST, &[])),
            Err(FilterRejection::Forbidden { .. })
        ));
    }
}
