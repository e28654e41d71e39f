use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, rejection::JsonRejection},
    http::Uri,
    response::IntoResponse,
};
use bookshelf_errors::{
    Problem,
    response::{ApiResult, created_json, no_content},
};
use tracing::info;

use super::dto::{InstanceDto, RegisterReq, StatusReq};
use super::error::{domain_error_to_problem, json_rejection};
use crate::domain::service::Service;

#[utoipa::path(
    post,
    path = "/registry/v1/instances",
    tag = "registry",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "Instance registered", body = InstanceDto),
        (status = 400, description = "Malformed JSON body", body = Problem, content_type = "application/problem+json"),
        (status = 422, description = "Invalid service name or base URL", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn register(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    body: Result<Json<RegisterReq>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = body.map_err(|r| json_rejection(&r, uri.path()))?;
    info!(service = %req.service_name, base_url = %req.base_url, "Registering instance");

    let instance = svc
        .register(req.into())
        .map_err(|e| domain_error_to_problem(&e, uri.path()))?;
    Ok(created_json(InstanceDto::from(instance)))
}

#[utoipa::path(
    put,
    path = "/registry/v1/instances/{instance_id}/heartbeat",
    tag = "registry",
    params(("instance_id" = String, Path, description = "Instance identifier")),
    responses(
        (status = 204, description = "Heartbeat recorded"),
        (status = 404, description = "Unknown or expired instance", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn heartbeat(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Path(instance_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    svc.heartbeat(&instance_id)
        .map_err(|e| domain_error_to_problem(&e, uri.path()))?;
    Ok(no_content())
}

#[utoipa::path(
    put,
    path = "/registry/v1/instances/{instance_id}/status",
    tag = "registry",
    params(("instance_id" = String, Path, description = "Instance identifier")),
    request_body = StatusReq,
    responses(
        (status = 204, description = "Status changed"),
        (status = 400, description = "Malformed JSON body", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Unknown instance", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn set_status(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Path(instance_id): Path<String>,
    body: Result<Json<StatusReq>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = body.map_err(|r| json_rejection(&r, uri.path()))?;
    svc.set_status(&instance_id, req.status.into())
        .map_err(|e| domain_error_to_problem(&e, uri.path()))?;
    Ok(no_content())
}

#[utoipa::path(
    delete,
    path = "/registry/v1/instances/{instance_id}",
    tag = "registry",
    params(("instance_id" = String, Path, description = "Instance identifier")),
    responses(
        (status = 204, description = "Instance removed"),
        (status = 404, description = "Unknown instance", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn deregister(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Path(instance_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    svc.deregister(&instance_id)
        .map_err(|e| domain_error_to_problem(&e, uri.path()))?;
    Ok(no_content())
}

#[utoipa::path(
    get,
    path = "/registry/v1/services/{service_name}/instances",
    tag = "registry",
    params(("service_name" = String, Path, description = "Logical service name")),
    responses(
        (status = 200, description = "Live instances, possibly none", body = [InstanceDto]),
    )
)]
pub async fn list_live(
    Extension(svc): Extension<Arc<Service>>,
    Path(service_name): Path<String>,
) -> Json<Vec<InstanceDto>> {
    Json(
        svc.live_instances(&service_name)
            .into_iter()
            .map(InstanceDto::from)
            .collect(),
    )
}
