use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::domain::service::Service;

/// Periodically evict instances whose heartbeat expired, until `cancel` fires.
#[must_use]
pub fn spawn_sweeper(
    service: Arc<Service>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let evicted = service.evict_expired();
                    if evicted > 0 {
                        tracing::debug!(evicted, "sweep finished");
                    }
                }
            }
        }
        tracing::debug!("registry sweeper stopped");
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::domain::storage::InstanceStorage;
    use service_registry_sdk::NewInstance;

    #[tokio::test]
    async fn expired_instances_are_swept_and_sweeper_stops() {
        let storage = Arc::new(InstanceStorage::new());
        let service = Arc::new(Service::new(storage.clone(), Duration::ZERO));
        service
            .register(NewInstance::new("books-service", "http://a:1"))
            .unwrap();

        let cancel = CancellationToken::new();
        let handle = spawn_sweeper(service, Duration::from_millis(10), cancel.clone());

        for _ in 0..50 {
            if storage.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(storage.is_empty());

        cancel.cancel();
        handle.await.unwrap();
    }
}
