//! Unix-epoch timestamps
//!
//! The ledger records seconds since epoch. Decision logic never reads a
//! wall clock; callers that need a "now" marker (e.g. for the version
//! timeline) obtain one here and pass it in explicitly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Construct from seconds since epoch
    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Seconds since epoch
    pub fn as_secs(self) -> u64 {
        self.0
    }

    /// The current wall-clock time
    pub fn now() -> Self {
        Self(current_unix_timestamp())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Current Unix timestamp in seconds
pub fn current_unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_seconds() {
        assert!(Timestamp::from_secs(10) < Timestamp::from_secs(11));
        assert_eq!(Timestamp::from_secs(10).as_secs(), 10);
    }
}
