//! Cursus Testing Infrastructure
//!
//! Common fixtures and builders shared across test modules, plus an
//! in-memory ledger implementing the effect traits with the
//! contract-observed semantics.
//!
//! # Usage
//!
//! Add this to your crate's `Cargo.toml` dev-dependencies:
//! ```toml
//! [dev-dependencies]
//! cursus-testkit = { path = "../cursus-testkit" }
//! ```
//!
//! Then in your tests:
//! ```rust,no_run
//! use cursus_testkit::*;
//!
//! let ledger = ConsortiumBuilder::new().universities(4).build_ledger();
//! ```

#![forbid(unsafe_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

pub mod consortium;
pub mod fake_ledger;

pub use consortium::{ConsortiumBuilder, SnapshotBuilder};
pub use fake_ledger::FakeLedger;

use cursus_core::MemberAddress;

/// Deterministic university address for seed `n`
pub fn member(n: u8) -> MemberAddress {
    MemberAddress::parse(&format!("0x{:040x}", n as u64 + 1)).expect("fixture address")
}

/// Fixture internal-accreditor address
pub fn internal_accreditor() -> MemberAddress {
    member(250)
}

/// Fixture external-accreditor address
pub fn external_accreditor() -> MemberAddress {
    member(251)
}
