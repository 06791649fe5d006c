//! Ledger error type
//!
//! Two observable outcomes exist for an external ledger call: the ledger
//! processed it and said no, or the call itself never completed. The
//! client maps these into the unified governance taxonomy at its boundary.

use serde::{Deserialize, Serialize};

/// Failure reported by the external ledger collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum LedgerError {
    /// The ledger processed the transaction and refused it
    #[error("transaction rejected by ledger: {reason}")]
    Rejected {
        /// Rejection reason as reported by the ledger
        reason: String,
    },

    /// The call never completed (network, wallet, service unavailable)
    #[error("ledger unavailable: {reason}")]
    Unavailable {
        /// Failure reported by the transport
        reason: String,
    },
}

impl LedgerError {
    /// Create a rejection error
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    /// Create an unavailability error
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}
