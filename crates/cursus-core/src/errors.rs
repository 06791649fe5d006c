//! Unified error system for Cursus
//!
//! One error type covers every governance operation. Local precondition
//! failures are detected before any transaction is submitted and carry a
//! machine-readable sub-reason so call sites can explain *why* an action is
//! unavailable without submitting it. No error here is fatal: every failure
//! returns the caller to an idle state from which eligibility can be
//! re-derived.

use crate::phase::ProposalPhase;
use crate::roles::Role;
use serde::{Deserialize, Serialize};

/// Machine-readable reason a governance precondition did not hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase", tag = "reason")]
pub enum PreconditionFailure {
    /// The caller has not declared an offering for the syllabus
    #[error("caller has not declared it offers this course")]
    NotOffering,

    /// Fewer than a strict majority of members offer the course
    #[error("only {offering} of {total} universities offer this course; a strict majority is required")]
    OfferingQuorumNotMet {
        /// Universities currently offering the course
        offering: usize,
        /// Registered universities in the consortium
        total: usize,
    },

    /// The caller already voted on the live proposal
    #[error("caller has already voted on this proposal")]
    AlreadyVoted,

    /// The proposal slot is not in the phase the action requires
    #[error("proposal is {actual}, but this action requires it to be {expected}")]
    WrongLifecycleState {
        /// Phase the action requires
        expected: ProposalPhase,
        /// Phase derived from the snapshot
        actual: ProposalPhase,
    },

    /// Too few votes for execution against total membership
    #[error("{votes} of {total} members voted; execution needs a majority of all members")]
    ExecutionQuorumNotMet {
        /// Votes recorded on the live proposal
        votes: usize,
        /// Registered universities in the consortium
        total: usize,
    },

    /// The caller already declared an offering for the syllabus
    #[error("caller already offers this course")]
    DuplicateOffering,

    /// The candidate address is already a registered member
    #[error("address is already a registered university")]
    AlreadyRegistered,

    /// A syllabus needs a non-empty course name
    #[error("course name must not be empty")]
    EmptyCourseName,

    /// No syllabus record exists for the requested identifier
    #[error("no syllabus exists with the requested id")]
    NoSuchSyllabus,
}

/// Unified error type for all governance operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum GovernanceError {
    /// The caller's role does not permit the action
    #[error("unauthorized: {action} requires {required}, caller is {actual}")]
    Unauthorized {
        /// Human-readable action name
        action: String,
        /// Role the action requires
        required: Role,
        /// Role derived for the caller
        actual: Role,
    },

    /// A state or quorum gate did not hold; nothing was submitted
    #[error("precondition failed: {0}")]
    PreconditionFailed(#[from] PreconditionFailure),

    /// The local predicate passed but the ledger state has since moved on.
    /// The caller must refetch and re-derive the decision, not resubmit.
    #[error("stale snapshot: {message}")]
    StaleSnapshot {
        /// What diverged between the snapshot and the ledger
        message: String,
    },

    /// The external call itself failed (network, wallet, service)
    #[error("transport failure: {message}")]
    Transport {
        /// Failure reported by the transport
        message: String,
    },
}

impl GovernanceError {
    /// Create an unauthorized error
    pub fn unauthorized(action: impl Into<String>, required: Role, actual: Role) -> Self {
        Self::Unauthorized {
            action: action.into(),
            required,
            actual,
        }
    }

    /// Create a stale-snapshot error
    pub fn stale_snapshot(message: impl Into<String>) -> Self {
        Self::StaleSnapshot {
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// The precondition sub-reason, if this is a local precondition failure
    pub fn precondition(&self) -> Option<&PreconditionFailure> {
        match self {
            Self::PreconditionFailed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Whether the caller can recover by refetching ledger state
    pub fn is_recoverable_by_refresh(&self) -> bool {
        matches!(self, Self::StaleSnapshot { .. })
    }
}

/// Standard result type for governance operations
pub type Result<T> = std::result::Result<T, GovernanceError>;

/// Errors from parsing or converting core value types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// Address is not `0x` + 40 hex digits
    #[error("invalid member address: {0:?}")]
    InvalidAddress(String),

    /// Content references must be non-empty
    #[error("content reference must not be empty")]
    EmptyContentRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_reason_is_exposed() {
        let err = GovernanceError::from(PreconditionFailure::AlreadyVoted);
        assert_eq!(err.precondition(), Some(&PreconditionFailure::AlreadyVoted));
        assert!(!err.is_recoverable_by_refresh());

        let stale = GovernanceError::stale_snapshot("vote count moved");
        assert!(stale.is_recoverable_by_refresh());
        assert_eq!(stale.precondition(), None);
    }

    #[test]
    fn messages_carry_quorum_arithmetic() {
        let err = GovernanceError::from(PreconditionFailure::OfferingQuorumNotMet {
            offering: 2,
            total: 5,
        });
        let text = err.to_string();
        assert!(text.contains("2 of 5"));
    }

    #[test]
    fn serde_round_trip_preserves_reason() {
        let err = GovernanceError::from(PreconditionFailure::ExecutionQuorumNotMet {
            votes: 1,
            total: 4,
        });
        let json = serde_json::to_string(&err).unwrap();
        let back: GovernanceError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
