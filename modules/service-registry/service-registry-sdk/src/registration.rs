//! Keeps one instance registered for as long as the process runs.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::RegistrationClient;
use crate::errors::ServiceRegistryError;
use crate::models::NewInstance;

/// Register `instance`, heartbeat every `interval`, and deregister once
/// `cancel` fires.
///
/// Failed registrations are retried on the same interval. The id assigned by
/// the first successful registration is kept for the lifetime of the loop, so
/// a heartbeat answered with [`ServiceRegistryError::NotFound`] (the registry
/// evicted us or restarted) re-registers under that id even when `instance`
/// came without one.
///
/// # Errors
/// Returns the deregistration error, if any. Errors while running are logged.
pub async fn run_registration(
    client: Arc<dyn RegistrationClient>,
    mut instance: NewInstance,
    interval: Duration,
    cancel: CancellationToken,
) -> Result<(), ServiceRegistryError> {
    let mut instance_id: Option<String> = None;

    loop {
        match &instance_id {
            None => match client.register(instance.clone()).await {
                Ok(registered) => {
                    tracing::info!(
                        instance_id = %registered.instance_id,
                        service = %registered.service_name,
                        "registered with service registry"
                    );
                    instance.instance_id = Some(registered.instance_id.clone());
                    instance_id = Some(registered.instance_id);
                }
                Err(e) => tracing::warn!(error = %e, "registration failed, will retry"),
            },
            Some(id) => match client.heartbeat(id).await {
                Ok(()) => tracing::trace!(instance_id = %id, "heartbeat sent"),
                Err(ServiceRegistryError::NotFound { .. }) => {
                    tracing::warn!(instance_id = %id, "registry forgot this instance, re-registering");
                    instance_id = None;
                    continue;
                }
                Err(e) => tracing::warn!(instance_id = %id, error = %e, "heartbeat failed"),
            },
        }

        tokio::select! {
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(interval) => {}
        }
    }

    match instance_id {
        Some(id) => {
            client.deregister(&id).await?;
            tracing::info!(instance_id = %id, "deregistered from service registry");
            Ok(())
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::models::{InstanceStatus, ServiceInstance};
    use async_trait::async_trait;
    use chrono::Utc;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
        registered_with: Mutex<Vec<Option<String>>>,
        fail_first_heartbeat: bool,
    }

    #[async_trait]
    impl RegistrationClient for Recorder {
        async fn register(&self, instance: NewInstance) -> Result<ServiceInstance, ServiceRegistryError> {
            self.calls.lock().push("register".to_owned());
            let mut registered_with = self.registered_with.lock();
            registered_with.push(instance.instance_id.clone());
            let generated = format!("i-{}", registered_with.len());
            let now = Utc::now();
            Ok(ServiceInstance {
                instance_id: instance.instance_id.unwrap_or(generated),
                service_name: instance.service_name,
                base_url: instance.base_url,
                status: InstanceStatus::Up,
                registered_at: now,
                last_heartbeat: now,
            })
        }

        async fn heartbeat(&self, instance_id: &str) -> Result<(), ServiceRegistryError> {
            let mut calls = self.calls.lock();
            let first = !calls.iter().any(|c| c == "heartbeat");
            calls.push("heartbeat".to_owned());
            if first && self.fail_first_heartbeat {
                return Err(ServiceRegistryError::not_found(instance_id));
            }
            Ok(())
        }

        async fn deregister(&self, _instance_id: &str) -> Result<(), ServiceRegistryError> {
            self.calls.lock().push("deregister".to_owned());
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn registers_heartbeats_and_deregisters() {
        let recorder = Arc::new(Recorder::default());
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_registration(
            recorder.clone(),
            NewInstance::new("books-service", "http://h:1"),
            Duration::from_secs(5),
            cancel.clone(),
        ));

        tokio::time::sleep(Duration::from_secs(11)).await;
        cancel.cancel();
        task.await.unwrap().unwrap();

        let calls = recorder.calls.lock().clone();
        assert_eq!(calls.first().map(String::as_str), Some("register"));
        assert!(calls.iter().filter(|c| *c == "heartbeat").count() >= 2);
        assert_eq!(calls.last().map(String::as_str), Some("deregister"));
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_instance_triggers_reregistration() {
        let recorder = Arc::new(Recorder {
            fail_first_heartbeat: true,
            ..Recorder::default()
        });
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_registration(
            recorder.clone(),
            NewInstance::new("books-service", "http://h:1").with_instance_id("fixed"),
            Duration::from_secs(5),
            cancel.clone(),
        ));

        tokio::time::sleep(Duration::from_secs(6)).await;
        cancel.cancel();
        task.await.unwrap().unwrap();

        let calls = recorder.calls.lock().clone();
        assert_eq!(&calls[..3], ["register", "heartbeat", "register"]);
    }

    #[tokio::test(start_paused = true)]
    async fn reregistration_reuses_the_assigned_id() {
        let recorder = Arc::new(Recorder {
            fail_first_heartbeat: true,
            ..Recorder::default()
        });
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_registration(
            recorder.clone(),
            NewInstance::new("books-service", "http://h:1"),
            Duration::from_secs(5),
            cancel.clone(),
        ));

        tokio::time::sleep(Duration::from_secs(6)).await;
        cancel.cancel();
        task.await.unwrap().unwrap();

        let registered_with = recorder.registered_with.lock().clone();
        assert_eq!(registered_with, [None, Some("i-1".to_owned())]);
    }
}
