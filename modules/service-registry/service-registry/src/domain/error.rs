use service_registry_sdk::ServiceRegistryError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Instance not found: {instance_id}")]
    InstanceNotFound { instance_id: String },

    #[error("Validation failed: {message}")]
    Validation { message: String },
}

impl DomainError {
    #[must_use]
    pub fn instance_not_found(instance_id: impl Into<String>) -> Self {
        Self::InstanceNotFound {
            instance_id: instance_id.into(),
        }
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<DomainError> for ServiceRegistryError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InstanceNotFound { instance_id } => Self::not_found(instance_id),
            DomainError::Validation { message } => Self::validation(message),
        }
    }
}
