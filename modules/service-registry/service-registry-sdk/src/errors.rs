use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceRegistryError {
    #[error("Instance not found: {instance_id}")]
    NotFound { instance_id: String },

    #[error("Invalid registration: {message}")]
    Validation { message: String },

    /// The registry could not be reached or answered with a server error.
    #[error("Registry unavailable: {message}")]
    Unavailable { message: String },

    #[error("Registry error: {message}")]
    Internal { message: String },
}

impl ServiceRegistryError {
    #[must_use]
    pub fn not_found(instance_id: impl Into<String>) -> Self {
        Self::NotFound {
            instance_id: instance_id.into(),
        }
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
