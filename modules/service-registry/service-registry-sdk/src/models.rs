use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceStatus {
    #[default]
    Up,
    Down,
}

/// A registered, addressable copy of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInstance {
    pub instance_id: String,
    pub service_name: String,
    /// Scheme, host and port, e.g. `http://127.0.0.1:8081`. No trailing slash.
    pub base_url: String,
    pub status: InstanceStatus,
    pub registered_at: DateTime<Utc>,
    pub last_heartbeat: DateTime<Utc>,
}

/// Registration request. Without `instance_id` the registry assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInstance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    pub service_name: String,
    pub base_url: String,
}

impl NewInstance {
    #[must_use]
    pub fn new(service_name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            instance_id: None,
            service_name: service_name.into(),
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn with_instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = Some(instance_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn new_instance_without_id_omits_field() {
        let json = serde_json::to_value(NewInstance::new("books-service", "http://h:1")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"service_name": "books-service", "base_url": "http://h:1"})
        );
    }

    #[test]
    fn status_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&InstanceStatus::Down).unwrap(),
            "\"down\""
        );
    }
}
