use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use service_registry_sdk::{InstanceStatus, ServiceInstance};

/// Instances keyed by id.
#[derive(Default)]
pub struct InstanceStorage {
    inner: RwLock<HashMap<String, ServiceInstance>>,
}

impl InstanceStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by `instance_id`.
    pub fn upsert(&self, instance: ServiceInstance) {
        self.inner
            .write()
            .insert(instance.instance_id.clone(), instance);
    }

    #[must_use]
    pub fn get(&self, instance_id: &str) -> Option<ServiceInstance> {
        self.inner.read().get(instance_id).cloned()
    }

    /// Returns `false` if the instance is unknown.
    #[must_use]
    pub fn touch(&self, instance_id: &str, at: DateTime<Utc>) -> bool {
        if let Some(inst) = self.inner.write().get_mut(instance_id) {
            inst.last_heartbeat = at;
            true
        } else {
            false
        }
    }

    /// Returns `false` if the instance is unknown.
    #[must_use]
    pub fn set_status(&self, instance_id: &str, status: InstanceStatus) -> bool {
        if let Some(inst) = self.inner.write().get_mut(instance_id) {
            inst.status = status;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn remove(&self, instance_id: &str) -> Option<ServiceInstance> {
        self.inner.write().remove(instance_id)
    }

    /// Instances of `service_name` matching `keep`, ordered by id.
    #[must_use]
    pub fn select<F>(&self, service_name: &str, keep: F) -> Vec<ServiceInstance>
    where
        F: Fn(&ServiceInstance) -> bool,
    {
        let mut found: Vec<ServiceInstance> = self
            .inner
            .read()
            .values()
            .filter(|i| i.service_name == service_name && keep(i))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.instance_id.cmp(&b.instance_id));
        found
    }

    /// Drop every instance matching `expired`; returns the removed ids.
    #[must_use]
    pub fn remove_where<F>(&self, expired: F) -> Vec<String>
    where
        F: Fn(&ServiceInstance) -> bool,
    {
        let mut guard = self.inner.write();
        let ids: Vec<String> = guard
            .values()
            .filter(|i| expired(i))
            .map(|i| i.instance_id.clone())
            .collect();
        for id in &ids {
            guard.remove(id);
        }
        ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
