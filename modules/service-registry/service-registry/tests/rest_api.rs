#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use serde_json::{Value, json};
use service_registry::{RegistryConfig, RegistryModule};
use tower::ServiceExt;

fn app() -> Router {
    RegistryModule::new(&RegistryConfig::default()).router()
}

fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn register_then_list_then_deregister() {
    let app = app();

    let resp = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/registry/v1/instances",
            Some(json!({"instance_id": "b-1", "service_name": "books-service", "base_url": "http://127.0.0.1:8081"})),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = json_body(resp).await;
    assert_eq!(created["instance_id"], "b-1");
    assert_eq!(created["status"], "up");

    let resp = app
        .clone()
        .oneshot(request(
            Method::GET,
            "/registry/v1/services/books-service/instances",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let live = json_body(resp).await;
    assert_eq!(live.as_array().map(Vec::len), Some(1));
    assert_eq!(live[0]["base_url"], "http://127.0.0.1:8081");

    let resp = app
        .clone()
        .oneshot(request(Method::DELETE, "/registry/v1/instances/b-1", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .oneshot(request(
            Method::GET,
            "/registry/v1/services/books-service/instances",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(json_body(resp).await, json!([]));
}

#[tokio::test]
async fn heartbeat_for_unknown_instance_is_404_problem() {
    let resp = app()
        .oneshot(request(
            Method::PUT,
            "/registry/v1/instances/ghost/heartbeat",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
    assert_eq!(json_body(resp).await["code"], "REGISTRY_INSTANCE_NOT_FOUND");
}

#[tokio::test]
async fn invalid_base_url_is_422() {
    let resp = app()
        .oneshot(request(
            Method::POST,
            "/registry/v1/instances",
            Some(json!({"service_name": "books-service", "base_url": "ftp://nowhere"})),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(resp).await["code"], "REGISTRY_VALIDATION");
}

#[tokio::test]
async fn down_instance_disappears_from_listing() {
    let app = app();
    app.clone()
        .oneshot(request(
            Method::POST,
            "/registry/v1/instances",
            Some(json!({"instance_id": "b-1", "service_name": "books-service", "base_url": "http://a:1"})),
        ))
        .await
        .unwrap();

    let resp = app
        .clone()
        .oneshot(request(
            Method::PUT,
            "/registry/v1/instances/b-1/status",
            Some(json!({"status": "down"})),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .oneshot(request(
            Method::GET,
            "/registry/v1/services/books-service/instances",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(json_body(resp).await, json!([]));
}

#[tokio::test]
async fn health_reports_ok() {
    let resp = app()
        .oneshot(request(Method::GET, "/health", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!({ "status": "ok" }));
}
