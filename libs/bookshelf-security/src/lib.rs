//! Security primitives for bookshelf services.
//!
//! A caller is described by a [`SecurityContext`]: a subject plus the
//! [`Capability`] grants carried by its bearer token. Operations declare a
//! [`SecRequirement`] and call [`authorize`] before doing any work.

pub mod authorizer;
pub mod capability;
pub mod config;
pub mod context;
pub mod errors;
pub mod jwt;
pub mod types;

#[cfg(feature = "axum-ext")]
pub mod axum_ext;

pub use authorizer::authorize;
pub use capability::{Capability, CapabilityParseError};
pub use config::{AuthConfig, AuthMode, JwtAlgorithm, JwtConfig};
pub use context::{SecurityContext, SecurityContextBuilder};
pub use errors::AuthError;
pub use jwt::JwtValidator;
pub use types::SecRequirement;
