use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use service_registry_sdk::ServiceInstance;

/// Per-service round-robin cursor.
#[derive(Debug, Default)]
pub struct RoundRobin {
    counters: DashMap<String, AtomicUsize>,
}

impl RoundRobin {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next instance for `service`, or `None` if `instances` is empty.
    #[must_use]
    pub fn pick<'a>(&self, service: &str, instances: &'a [ServiceInstance]) -> Option<&'a ServiceInstance> {
        if instances.is_empty() {
            return None;
        }
        let n = match self.counters.get(service) {
            Some(counter) => counter.fetch_add(1, Ordering::Relaxed),
            None => self
                .counters
                .entry(service.to_owned())
                .or_default()
                .fetch_add(1, Ordering::Relaxed),
        };
        instances.get(n % instances.len())
    }
}
