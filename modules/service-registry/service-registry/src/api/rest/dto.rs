use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use service_registry_sdk::{InstanceStatus, NewInstance, ServiceInstance};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InstanceStatusDto {
    Up,
    Down,
}

impl From<InstanceStatus> for InstanceStatusDto {
    fn from(s: InstanceStatus) -> Self {
        match s {
            InstanceStatus::Up => Self::Up,
            InstanceStatus::Down => Self::Down,
        }
    }
}

impl From<InstanceStatusDto> for InstanceStatus {
    fn from(s: InstanceStatusDto) -> Self {
        match s {
            InstanceStatusDto::Up => Self::Up,
            InstanceStatusDto::Down => Self::Down,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InstanceDto {
    pub instance_id: String,
    pub service_name: String,
    pub base_url: String,
    pub status: InstanceStatusDto,
    pub registered_at: DateTime<Utc>,
    pub last_heartbeat: DateTime<Utc>,
}

impl From<ServiceInstance> for InstanceDto {
    fn from(i: ServiceInstance) -> Self {
        Self {
            instance_id: i.instance_id,
            service_name: i.service_name,
            base_url: i.base_url,
            status: i.status.into(),
            registered_at: i.registered_at,
            last_heartbeat: i.last_heartbeat,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RegisterReq {
    #[serde(default)]
    pub instance_id: Option<String>,
    pub service_name: String,
    pub base_url: String,
}

impl From<RegisterReq> for NewInstance {
    fn from(req: RegisterReq) -> Self {
        Self {
            instance_id: req.instance_id,
            service_name: req.service_name,
            base_url: req.base_url,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct StatusReq {
    pub status: InstanceStatusDto,
}
