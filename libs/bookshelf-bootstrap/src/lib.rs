//! Shared process plumbing for the bookshelf binaries.

pub mod config;
pub mod http;
pub mod logging;
pub mod signals;

pub use config::{LogFormat, LoggingConfig, ServerConfig, load_layered, render_config};
pub use http::{apply_common_layers, health, serve, serve_listener};
pub use logging::init_logging;
pub use signals::{shutdown_token, wait_for_shutdown};
