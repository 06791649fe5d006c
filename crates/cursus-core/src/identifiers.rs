//! Core identifier types used across the Cursus platform
//!
//! Ledger records encode absence with a zero identifier, so the parsed
//! identifier types here are guaranteed positive: a `SyllabusId` or
//! `ProposalId` in hand always denotes a real record.

use crate::errors::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ledger account address of a consortium member
///
/// Opaque to this system beyond its format: `0x` followed by 40 hex digits.
/// Comparison is case-insensitive; the canonical form is lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberAddress(String);

impl MemberAddress {
    /// Parse and canonicalize an address string
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        let hex_part = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .ok_or_else(|| TypeError::InvalidAddress(raw.to_string()))?;

        if hex_part.len() != 40 || hex::decode(hex_part).is_err() {
            return Err(TypeError::InvalidAddress(raw.to_string()));
        }

        Ok(Self(format!("0x{}", hex_part.to_ascii_lowercase())))
    }

    /// Canonical (lowercased) address string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MemberAddress {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Syllabus identifier: positive, 1-based, monotonically assigned
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SyllabusId(u64);

impl SyllabusId {
    /// Convert a raw ledger value, treating 0 as absence
    pub fn from_raw(raw: u64) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }

    /// Raw ledger encoding
    pub fn to_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SyllabusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "syllabus-{}", self.0)
    }
}

/// Proposal identifier assigned by the ledger
///
/// The ledger keeps at most one live proposal per syllabus; this id names
/// the record currently occupying that slot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProposalId(u64);

impl ProposalId {
    /// Convert a raw ledger value, treating 0 as absence
    pub fn from_raw(raw: u64) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }

    /// Raw ledger encoding
    pub fn to_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "proposal-{}", self.0)
    }
}
