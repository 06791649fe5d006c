//! Cursus Core - Domain Foundation
//!
//! Foundational types for the consortium syllabus governance system: the
//! identifiers, content references and timestamps that every other layer
//! speaks in, plus the unified error taxonomy.
//!
//! This crate contains only pure value types. Decision logic lives in
//! `cursus-governance`; external collaborators (ledger, content storage)
//! live behind the effect traits in `cursus-ledger` and `cursus-store`.

#![forbid(unsafe_code)]

/// Member, syllabus and proposal identifiers
pub mod identifiers;

/// Opaque content-address references
pub mod content;

/// Unix-epoch timestamps
pub mod time;

/// Caller roles derived from the registry
pub mod roles;

/// Proposal lifecycle phases
pub mod phase;

/// Unified error handling
pub mod errors;

pub use content::ContentRef;
pub use errors::{GovernanceError, PreconditionFailure, Result, TypeError};
pub use identifiers::{MemberAddress, ProposalId, SyllabusId};
pub use phase::ProposalPhase;
pub use roles::Role;
pub use time::{current_unix_timestamp, Timestamp};
