//! Cursus Governance - Pure Decision Engine
//!
//! The rules that decide, given a snapshot of ledger-exposed state, which
//! governance actions are currently legal for a caller, plus the
//! reconstruction of a syllabus's version timeline from heterogeneous
//! ledger records.
//!
//! Everything here is a synchronous, side-effect-free computation over an
//! immutable [`GovernanceSnapshot`]: re-entrant, deterministic, and safe to
//! re-evaluate from independently fetched snapshots. Apparent races (two
//! universities voting "simultaneously") are resolved by the ledger's own
//! serialization, never by this crate; callers must treat every mutating
//! submission as subject to post-hoc rejection and re-validate afterwards
//! (see `cursus-ledger`).
//!
//! # Components
//!
//! - [`registry`]: who is in the consortium, and role derivation
//! - [`snapshot`]: the immutable fact set every predicate evaluates over
//! - [`quorum`]: offering and execution quorum arithmetic
//! - [`lifecycle`]: the proposal state machine and its authorization gates
//! - [`timeline`]: version history reconstruction
//! - [`stats`]: adoption and proposal-status aggregates

#![forbid(unsafe_code)]

pub mod lifecycle;
pub mod quorum;
pub mod registry;
pub mod snapshot;
pub mod stats;
pub mod timeline;

pub use lifecycle::{
    authorize, authorize_role, can_perform, eligibility, validate_new_syllabus,
    validate_registration, Eligibility, GovernanceAction,
};
pub use quorum::{execution_quorum_met, offering_quorum_met, strict_majority_threshold};
pub use registry::Registry;
pub use snapshot::{GovernanceSnapshot, ProposalRecord, SessionContext, SyllabusRecord};
pub use stats::{catalog_status, AdoptionLevel, CatalogStatus, CourseStats, ProposalStatusBreakdown};
pub use timeline::{version_timeline, VersionEntry, VersionKind};
