use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    routing::{delete, get, post, put},
};
use bookshelf_errors::Problem;
use utoipa::OpenApi;

use super::dto::{InstanceDto, InstanceStatusDto, RegisterReq, StatusReq};
use super::handlers;
use crate::domain::service::Service;

#[derive(OpenApi)]
#[openapi(
    info(title = "Service Registry API", description = "Instance registration, heartbeats and lookup"),
    paths(
        handlers::register,
        handlers::heartbeat,
        handlers::set_status,
        handlers::deregister,
        handlers::list_live,
    ),
    components(schemas(InstanceDto, InstanceStatusDto, RegisterReq, StatusReq, Problem)),
    tags((name = "registry", description = "Service instances"))
)]
pub struct RegistryApiDoc;

#[must_use]
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/registry/v1/instances", post(handlers::register))
        .route(
            "/registry/v1/instances/{instance_id}",
            delete(handlers::deregister),
        )
        .route(
            "/registry/v1/instances/{instance_id}/heartbeat",
            put(handlers::heartbeat),
        )
        .route(
            "/registry/v1/instances/{instance_id}/status",
            put(handlers::set_status),
        )
        .route(
            "/registry/v1/services/{service_name}/instances",
            get(handlers::list_live),
        )
        .route("/openapi.json", get(openapi_json))
        .layer(Extension(service))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(RegistryApiDoc::openapi())
}
