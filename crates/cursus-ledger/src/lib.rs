//! Cursus Ledger - External Ledger Seam
//!
//! The ledger holds the authoritative Syllabus/Proposal/Offering/Vote
//! facts; this crate defines the effect traits it is consumed through and
//! the [`GovernanceClient`] that sits between the pure decision engine and
//! the wire.
//!
//! Every mutating call follows the same shape: fetch a snapshot, evaluate
//! the pure predicate locally (rejecting with a precise reason before any
//! transaction is submitted), submit, then refetch and re-validate the
//! post-state before reporting success. Submissions are always subject to
//! post-hoc rejection by the ledger's own serialization; a locally-valid
//! transition the ledger refuses, or whose effect is not visible
//! afterwards, surfaces as [`GovernanceError::StaleSnapshot`]. This crate
//! performs no retries; retries, if any, belong to the transport below.
//!
//! [`GovernanceError::StaleSnapshot`]: cursus_core::GovernanceError::StaleSnapshot

#![forbid(unsafe_code)]

/// Ledger effect traits
pub mod effects;

/// Ledger error type
pub mod errors;

/// Raw ledger record encodings
pub mod records;

/// Snapshot-fetching, submit-then-confirm client
pub mod client;

pub use client::{CatalogEntry, GovernanceClient};
pub use effects::{LedgerReads, LedgerWrites, TxReceipt};
pub use errors::LedgerError;
pub use records::{RawProposalRecord, RawSyllabusRecord};
