//! Caller roles
//!
//! A caller's role is derived per session by comparing its address against
//! the registry and the two fixed accreditor identities. The external
//! accreditor is recognized but holds no mutating privileges.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Governance role of a session's caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// Registered consortium university
    University,
    /// The consortium's internal accreditor
    InternalAccreditor,
    /// The consortium's external accreditor (read-only by design)
    ExternalAccreditor,
    /// Unauthenticated or unregistered caller
    None,
}

impl Role {
    /// Whether any mutating action is defined for this role
    pub fn can_mutate(self) -> bool {
        matches!(self, Role::University | Role::InternalAccreditor)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::University => "university",
            Role::InternalAccreditor => "internal accreditor",
            Role::ExternalAccreditor => "external accreditor",
            Role::None => "none",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_accreditor_is_read_only() {
        assert!(Role::University.can_mutate());
        assert!(Role::InternalAccreditor.can_mutate());
        assert!(!Role::ExternalAccreditor.can_mutate());
        assert!(!Role::None.can_mutate());
    }
}
