//! Registry view
//!
//! Read-only projection of the set of registered universities and the two
//! fixed accreditor identities. Universities are never removed in this
//! design; the list only grows.

use cursus_core::{MemberAddress, Role};
use serde::{Deserialize, Serialize};

/// The consortium's membership as exposed by the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    universities: Vec<MemberAddress>,
    internal_accreditor: MemberAddress,
    external_accreditor: MemberAddress,
}

impl Registry {
    /// Build a registry from ledger-enumerated members
    pub fn new(
        universities: Vec<MemberAddress>,
        internal_accreditor: MemberAddress,
        external_accreditor: MemberAddress,
    ) -> Self {
        Self {
            universities,
            internal_accreditor,
            external_accreditor,
        }
    }

    /// Registered universities, in registration order
    pub fn universities(&self) -> &[MemberAddress] {
        &self.universities
    }

    /// Number of registered universities
    pub fn total_universities(&self) -> usize {
        self.universities.len()
    }

    /// Whether the address belongs to a registered university
    pub fn is_university(&self, address: &MemberAddress) -> bool {
        self.universities.contains(address)
    }

    /// The internal accreditor's identity
    pub fn internal_accreditor(&self) -> &MemberAddress {
        &self.internal_accreditor
    }

    /// The external accreditor's identity
    pub fn external_accreditor(&self) -> &MemberAddress {
        &self.external_accreditor
    }

    /// Derive the governance role of a caller
    ///
    /// Accreditor identities take precedence over university membership,
    /// internal before external.
    pub fn role_of(&self, address: &MemberAddress) -> Role {
        if *address == self.internal_accreditor {
            Role::InternalAccreditor
        } else if *address == self.external_accreditor {
            Role::ExternalAccreditor
        } else if self.is_university(address) {
            Role::University
        } else {
            Role::None
        }
    }
}
