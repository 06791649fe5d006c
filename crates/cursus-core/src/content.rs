//! Opaque content-address references
//!
//! Syllabus and proposal content lives in external content-addressed
//! storage; the ledger and this engine only ever carry the address. The
//! engine never inspects content.

use crate::errors::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content-address string (e.g. an IPFS hash)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentRef(String);

impl ContentRef {
    /// Wrap a content-address string, rejecting empty input
    pub fn new(reference: impl Into<String>) -> Result<Self, TypeError> {
        let reference = reference.into();
        if reference.is_empty() {
            return Err(TypeError::EmptyContentRef);
        }
        Ok(Self(reference))
    }

    /// The underlying address string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
