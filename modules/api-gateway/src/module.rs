use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{ConnectInfo, Request, State},
    response::Response,
    routing::get,
};
use bookshelf_bootstrap::health;
use service_registry_sdk::{HttpRegistryClient, ServiceResolver, StaticResolver};
use tracing::{info, warn};

use crate::balancer::RoundRobin;
use crate::config::{DiscoveryConfig, DiscoveryMode, GatewayConfig};
use crate::error::GatewayError;
use crate::filters::SecurityFilterChain;
use crate::proxy::Forwarder;
use crate::routing::RouteTable;

pub const HEALTH_PATH: &str = "/health";

struct GatewayState {
    routes: RouteTable,
    filters: SecurityFilterChain,
    resolver: Arc<dyn ServiceResolver>,
    balancer: RoundRobin,
    forwarder: Forwarder,
}

/// Edge gateway: filters, routes, resolves and forwards.
pub struct GatewayModule {
    state: Arc<GatewayState>,
}

impl GatewayModule {
    /// Build from configuration, choosing the resolver from `discovery.mode`.
    ///
    /// # Errors
    /// Fails if the registry client cannot be built.
    pub fn from_config(cfg: &GatewayConfig) -> anyhow::Result<Self> {
        let resolver = resolver_from_config(&cfg.discovery)?;
        Ok(Self::new(
            cfg,
            SecurityFilterChain::from_config(&cfg.security),
            resolver,
        ))
    }

    /// Build with an explicit filter chain and resolver.
    #[must_use]
    pub fn new(
        cfg: &GatewayConfig,
        filters: SecurityFilterChain,
        resolver: Arc<dyn ServiceResolver>,
    ) -> Self {
        if filters.is_empty() {
            warn!("Gateway security filter chain is empty: every request is forwarded");
        } else {
            info!(filters = ?filters.names(), "Gateway security filters installed");
        }
        let routes = RouteTable::new(cfg.routes.clone());
        if routes.is_empty() {
            warn!("Gateway has no routes: every request is answered with 404");
        } else {
            info!(routes = routes.len(), "Gateway route table loaded");
        }
        for route in &cfg.routes {
            info!(id = %route.id, prefix = %route.path_prefix, service = %route.service, "Gateway route");
        }

        Self {
            state: Arc::new(GatewayState {
                routes,
                filters,
                resolver,
                balancer: RoundRobin::new(),
                forwarder: Forwarder::new(cfg.upstream_timeout()),
            }),
        }
    }

    /// `/health` plus a fallback that forwards everything else.
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .route(HEALTH_PATH, get(health))
            .fallback(proxy_handler)
            .with_state(Arc::clone(&self.state))
    }
}

fn resolver_from_config(cfg: &DiscoveryConfig) -> anyhow::Result<Arc<dyn ServiceResolver>> {
    match cfg.mode {
        DiscoveryMode::Static => {
            let resolver = cfg
                .services
                .iter()
                .fold(StaticResolver::new(), |r, (name, urls)| {
                    r.with_service(name, urls.iter().cloned())
                });
            info!(services = cfg.services.len(), "Using static service discovery");
            Ok(Arc::new(resolver))
        }
        DiscoveryMode::Registry => {
            let client = HttpRegistryClient::new(
                cfg.registry_url.clone(),
                Duration::from_millis(cfg.registry_timeout_ms),
            )?;
            info!(registry_url = %cfg.registry_url, "Using service registry discovery");
            Ok(Arc::new(client))
        }
    }
}

async fn proxy_handler(State(state): State<Arc<GatewayState>>, request: Request) -> Response {
    let path = request.uri().path().to_owned();
    match forward(&state, request).await {
        Ok(response) => response,
        Err(err) => err.into_response_for(&path),
    }
}

#[tracing::instrument(
    name = "gateway_forward",
    skip_all,
    fields(method = %request.method(), path = %request.uri().path())
)]
async fn forward(state: &GatewayState, request: Request) -> Result<Response, GatewayError> {
    let client_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let (parts, body) = request.into_parts();

    state.filters.apply(&parts)?;

    let route = state
        .routes
        .match_path(parts.uri.path())
        .ok_or_else(|| GatewayError::RouteNotFound {
            path: parts.uri.path().to_owned(),
        })?;

    let instances = state
        .resolver
        .resolve(&route.service)
        .await
        .map_err(|e| GatewayError::Discovery {
            service: route.service.clone(),
            message: e.to_string(),
        })?;

    let instance = state
        .balancer
        .pick(&route.service, &instances)
        .ok_or_else(|| GatewayError::NoInstances {
            service: route.service.clone(),
        })?;

    tracing::debug!(
        route = %route.id,
        instance_id = %instance.instance_id,
        "routing request"
    );

    state
        .forwarder
        .forward(parts, body, &instance.base_url, client_addr)
        .await
}
