#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use api_gateway::{
    GatewayConfig, GatewayModule, SecurityFilterChain,
    config::{CsrfConfig, SecurityConfig},
};
use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::{ConnectInfo, Request},
    http::{Method, StatusCode, header},
    response::Response,
};
use serde_json::{Value, json};
use service_registry_sdk::{HttpRegistryClient, ServiceResolver, StaticResolver};
use tower::ServiceExt;

/// Upstream that echoes what it received, tagged with its own name.
async fn spawn_echo(name: &'static str) -> String {
    let app = Router::new().fallback(move |req: Request| async move {
        let (parts, body) = req.into_parts();
        let body: Bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let header = |h: &str| {
            parts
                .headers
                .get(h)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned)
        };
        Json(json!({
            "upstream": name,
            "method": parts.method.as_str(),
            "path": parts.uri.path(),
            "query": parts.uri.query(),
            "body": String::from_utf8_lossy(&body),
            "authorization": header("authorization"),
            "x_forwarded_for": header("x-forwarded-for"),
            "x_forwarded_host": header("x-forwarded-host"),
        }))
    });
    spawn(app).await
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn gateway(resolver: impl ServiceResolver + 'static, filters: SecurityFilterChain) -> Router {
    GatewayModule::new(&GatewayConfig::default(), filters, Arc::new(resolver)).router()
}

fn books_at(urls: Vec<String>) -> StaticResolver {
    StaticResolver::new().with_service("books-service", urls)
}

async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn forwards_method_path_query_and_body_unchanged() {
    let upstream = spawn_echo("only").await;
    let gw = gateway(books_at(vec![upstream]), SecurityFilterChain::empty());

    let mut req = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/books/add?dry_run=false")
        .header(header::HOST, "gateway.local")
        .header(header::AUTHORIZATION, "Bearer opaque-token")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"title":"t","author":"a"}"#))
        .unwrap();
    req.extensions_mut()
        .insert(ConnectInfo("198.51.100.9:40000".parse::<SocketAddr>().unwrap()));

    let resp = gw.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let echo = json_body(resp).await;
    assert_eq!(echo["method"], "POST");
    assert_eq!(echo["path"], "/books/add");
    assert_eq!(echo["query"], "dry_run=false");
    assert_eq!(echo["body"], r#"{"title":"t","author":"a"}"#);
    assert_eq!(echo["authorization"], "Bearer opaque-token");
    assert_eq!(echo["x_forwarded_for"], "198.51.100.9");
    assert_eq!(echo["x_forwarded_host"], "gateway.local");
}

#[tokio::test]
async fn zero_live_instances_is_503() {
    let gw = gateway(books_at(Vec::new()), SecurityFilterChain::empty());
    let req = axum::http::Request::builder()
        .uri("/books/1")
        .body(Body::empty())
        .unwrap();

    let resp = gw.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
    assert_eq!(json_body(resp).await["code"], "GATEWAY_NO_INSTANCES");
}

#[tokio::test]
async fn unreachable_registry_is_503_discovery() {
    let registry = HttpRegistryClient::new(closed_port_url(), Duration::from_secs(1)).unwrap();
    let gw = gateway(registry, SecurityFilterChain::empty());
    let req = axum::http::Request::builder()
        .uri("/books/1")
        .body(Body::empty())
        .unwrap();

    let resp = gw.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_body(resp).await["code"], "GATEWAY_DISCOVERY");
}

#[tokio::test]
async fn unknown_route_is_404() {
    let gw = gateway(books_at(Vec::new()), SecurityFilterChain::empty());
    let req = axum::http::Request::builder()
        .uri("/orders/1")
        .body(Body::empty())
        .unwrap();

    let resp = gw.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await["code"], "GATEWAY_ROUTE_NOT_FOUND");
}

#[tokio::test]
async fn gateway_without_routes_answers_404_even_with_live_instances() {
    let upstream = spawn_echo("a").await;
    let cfg = GatewayConfig {
        routes: Vec::new(),
        ..GatewayConfig::default()
    };
    let gw = GatewayModule::new(
        &cfg,
        SecurityFilterChain::empty(),
        Arc::new(books_at(vec![upstream])),
    )
    .router();

    let req = axum::http::Request::builder()
        .uri("/books/1")
        .body(Body::empty())
        .unwrap();
    let resp = gw.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await["code"], "GATEWAY_ROUTE_NOT_FOUND");
}

#[tokio::test]
async fn dead_upstream_is_502() {
    let gw = gateway(books_at(vec![closed_port_url()]), SecurityFilterChain::empty());
    let req = axum::http::Request::builder()
        .uri("/books/1")
        .body(Body::empty())
        .unwrap();

    let resp = gw.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(json_body(resp).await["code"], "GATEWAY_UPSTREAM");
}

#[tokio::test]
async fn slow_upstream_is_504() {
    let slow = spawn(Router::new().fallback(|| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        "late"
    }))
    .await;
    let cfg = GatewayConfig {
        upstream_timeout_ms: 100,
        ..GatewayConfig::default()
    };
    let gw = GatewayModule::new(
        &cfg,
        SecurityFilterChain::empty(),
        Arc::new(books_at(vec![slow])),
    )
    .router();
    let req = axum::http::Request::builder()
        .uri("/books/1")
        .body(Body::empty())
        .unwrap();

    let resp = gw.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(json_body(resp).await["code"], "GATEWAY_UPSTREAM_TIMEOUT");
}

#[tokio::test]
async fn round_robin_alternates_instances() {
    let a = spawn_echo("a").await;
    let b = spawn_echo("b").await;
    let gw = gateway(books_at(vec![a, b]), SecurityFilterChain::empty());

    let mut seen = Vec::new();
    for _ in 0..4 {
        let req = axum::http::Request::builder()
            .uri("/books/1")
            .body(Body::empty())
            .unwrap();
        let echo = json_body(gw.clone().oneshot(req).await.unwrap()).await;
        seen.push(echo["upstream"].as_str().unwrap().to_owned());
    }
    assert_eq!(seen, ["a", "b", "a", "b"]);
}

#[tokio::test]
async fn csrf_filter_blocks_before_forwarding() {
    let upstream = spawn_echo("only").await;
    let filters = SecurityFilterChain::from_config(&SecurityConfig {
        csrf: CsrfConfig {
            enabled: true,
            ..CsrfConfig::default()
        },
        require_bearer: false,
    });
    let gw = gateway(books_at(vec![upstream]), filters);

    let rejected = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/books/add")
        .body(Body::empty())
        .unwrap();
    let resp = gw.clone().oneshot(rejected).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(resp).await["code"], "GATEWAY_FILTER_REJECTED");

    let accepted = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/books/add")
        .header(header::COOKIE, "XSRF-TOKEN=tok")
        .header("x-xsrf-token", "tok")
        .body(Body::empty())
        .unwrap();
    assert_eq!(gw.oneshot(accepted).await.unwrap().status(), StatusCode::OK);
}

#[tokio::test]
async fn health_is_served_locally() {
    let gw = gateway(books_at(Vec::new()), SecurityFilterChain::empty());
    let req = axum::http::Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let resp = gw.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
