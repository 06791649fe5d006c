//! Store error type

use serde::{Deserialize, Serialize};

/// Failure from the content-storage collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum StoreError {
    /// The payload was rejected before any upload was attempted
    #[error("invalid payload: {reason}")]
    InvalidPayload {
        /// Why the payload was rejected
        reason: String,
    },

    /// The service processed the upload and refused it
    #[error("upload refused (status {status}): {reason}")]
    UploadRefused {
        /// HTTP status code
        status: u16,
        /// Body or status text reported by the service
        reason: String,
    },

    /// The call itself failed
    #[error("store unavailable: {reason}")]
    Unavailable {
        /// Failure reported by the transport
        reason: String,
    },

    /// Configuration is unusable
    #[error("store configuration invalid: {reason}")]
    Config {
        /// What is wrong with the configuration
        reason: String,
    },
}

impl StoreError {
    /// Create an invalid-payload error
    pub fn invalid_payload(reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            reason: reason.into(),
        }
    }

    /// Create an unavailability error
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}
