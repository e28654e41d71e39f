use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use service_registry_sdk::{InstanceStatus, NewInstance, ServiceInstance};
use tracing::{debug, info, instrument};
use url::Url;

use crate::domain::{error::DomainError, storage::InstanceStorage};

/// Registry domain service.
///
/// An instance is live while its status is `Up` and its last heartbeat is
/// no older than the configured TTL.
pub struct Service {
    storage: Arc<InstanceStorage>,
    ttl: TimeDelta,
}

impl Service {
    #[must_use]
    pub fn new(storage: Arc<InstanceStorage>, heartbeat_ttl: Duration) -> Self {
        Self {
            storage,
            ttl: TimeDelta::from_std(heartbeat_ttl).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Register or re-register an instance. Re-registering an id replaces it.
    ///
    /// # Errors
    /// [`DomainError::Validation`] for an invalid service name or base URL.
    #[instrument(skip(self, new), fields(service = %new.service_name))]
    pub fn register(&self, new: NewInstance) -> Result<ServiceInstance, DomainError> {
        self.register_at(new, Utc::now())
    }

    fn register_at(&self, new: NewInstance, now: DateTime<Utc>) -> Result<ServiceInstance, DomainError> {
        validate_service_name(&new.service_name)?;
        let base_url = normalize_base_url(&new.base_url)?;

        let instance_id = match new.instance_id {
            Some(id) if id.trim().is_empty() => {
                return Err(DomainError::validation("instance_id must not be blank"));
            }
            Some(id) => id,
            None => uuid::Uuid::new_v4().to_string(),
        };

        let instance = ServiceInstance {
            instance_id,
            service_name: new.service_name,
            base_url,
            status: InstanceStatus::Up,
            registered_at: now,
            last_heartbeat: now,
        };
        self.storage.upsert(instance.clone());

        info!(instance_id = %instance.instance_id, base_url = %instance.base_url, "instance registered");
        Ok(instance)
    }

    /// # Errors
    /// [`DomainError::InstanceNotFound`] if the id is unknown (never registered or evicted).
    pub fn heartbeat(&self, instance_id: &str) -> Result<(), DomainError> {
        self.heartbeat_at(instance_id, Utc::now())
    }

    fn heartbeat_at(&self, instance_id: &str, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.storage.touch(instance_id, now) {
            debug!(instance_id, "heartbeat");
            Ok(())
        } else {
            Err(DomainError::instance_not_found(instance_id))
        }
    }

    /// # Errors
    /// [`DomainError::InstanceNotFound`] if the id is unknown.
    pub fn deregister(&self, instance_id: &str) -> Result<ServiceInstance, DomainError> {
        let removed = self
            .storage
            .remove(instance_id)
            .ok_or_else(|| DomainError::instance_not_found(instance_id))?;
        info!(instance_id, service = %removed.service_name, "instance deregistered");
        Ok(removed)
    }

    /// # Errors
    /// [`DomainError::InstanceNotFound`] if the id is unknown.
    pub fn set_status(&self, instance_id: &str, status: InstanceStatus) -> Result<(), DomainError> {
        if self.storage.set_status(instance_id, status) {
            info!(instance_id, ?status, "instance status changed");
            Ok(())
        } else {
            Err(DomainError::instance_not_found(instance_id))
        }
    }

    /// Live instances of `service_name`, ordered by id.
    #[must_use]
    pub fn live_instances(&self, service_name: &str) -> Vec<ServiceInstance> {
        self.live_instances_at(service_name, Utc::now())
    }

    fn live_instances_at(&self, service_name: &str, now: DateTime<Utc>) -> Vec<ServiceInstance> {
        self.storage
            .select(service_name, |i| self.is_live(i, now))
    }

    /// Remove instances whose heartbeat expired; returns how many were removed.
    #[must_use]
    pub fn evict_expired(&self) -> usize {
        self.evict_expired_at(Utc::now())
    }

    fn evict_expired_at(&self, now: DateTime<Utc>) -> usize {
        let evicted = self
            .storage
            .remove_where(|i| self.is_expired(i, now));
        for id in &evicted {
            info!(instance_id = %id, "instance expired");
        }
        evicted.len()
    }

    fn is_expired(&self, instance: &ServiceInstance, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(instance.last_heartbeat) > self.ttl
    }

    fn is_live(&self, instance: &ServiceInstance, now: DateTime<Utc>) -> bool {
        instance.status == InstanceStatus::Up && !self.is_expired(instance, now)
    }
}

fn validate_service_name(name: &str) -> Result<(), DomainError> {
    if name.is_empty() {
        return Err(DomainError::validation("service_name must not be empty"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(DomainError::validation(format!(
            "service_name '{name}' may only contain ASCII letters, digits, '-', '_' and '.'"
        )));
    }
    Ok(())
}

/// Accepts absolute `http`/`https` URLs without path, query or fragment.
fn normalize_base_url(raw: &str) -> Result<String, DomainError> {
    let url = Url::parse(raw)
        .map_err(|e| DomainError::validation(format!("base_url '{raw}' is not a URL: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(DomainError::validation(format!(
            "base_url '{raw}' must use http or https"
        )));
    }
    if url.host_str().is_none() {
        return Err(DomainError::validation(format!("base_url '{raw}' has no host")));
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(DomainError::validation(format!(
            "base_url '{raw}' must not carry a path, query or fragment"
        )));
    }

    Ok(url.as_str().trim_end_matches('/').to_owned())
}
