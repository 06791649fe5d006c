//! Governance snapshot
//!
//! An immutable point-in-time read of ledger-exposed facts for one
//! syllabus. All predicate evaluation happens over a snapshot value;
//! nothing here mutates, so concurrent callers evaluating the same
//! predicates from independently fetched snapshots cannot interfere.
//!
//! Offering declarations and votes are append-only facts: the snapshot
//! only ever records "true" entries, and there is no way to represent
//! "undeclare" or "unvote".

use crate::registry::Registry;
use cursus_core::{
    ContentRef, GovernanceError, MemberAddress, ProposalId, ProposalPhase, Role, SyllabusId,
    Timestamp,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-syllabus record as exposed by the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyllabusRecord {
    /// Ledger-assigned identifier
    pub id: SyllabusId,
    /// Course name, non-empty
    pub course_name: String,
    /// Address of the current syllabus content
    pub content: ContentRef,
    /// Whether the syllabus has been finalized
    pub finalized: bool,
    /// Last time the content reference was set or replaced
    pub last_modified: Timestamp,
}

/// The syllabus's single proposal slot as exposed by the ledger
///
/// The ledger indexes proposals by syllabus id, so a syllabus has at most
/// one live proposal; this record is that slot. An executed proposal stays
/// readable but no longer blocks the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRecord {
    /// Ledger-assigned identifier
    pub id: ProposalId,
    /// Address of the proposed replacement content
    pub content: ContentRef,
    /// Cached vote tally; cross-checked against the vote facts
    pub vote_count: u32,
    /// How many proposals this syllabus has seen over its lifetime
    pub revision_count: u32,
    /// Whether the internal accreditor opened voting
    pub approved_by_internal_accreditor: bool,
    /// Whether the proposal was executed. Terminal.
    pub executed: bool,
}

/// Caller identity for a session, passed explicitly to every predicate
///
/// Replaces ambient wallet state so `can_perform` is testable without a
/// live wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    address: Option<MemberAddress>,
    role: Role,
}

impl SessionContext {
    /// An unauthenticated session
    pub fn anonymous() -> Self {
        Self {
            address: None,
            role: Role::None,
        }
    }

    /// Session for a connected caller, with its role derived from the registry
    pub fn for_member(address: MemberAddress, registry: &Registry) -> Self {
        let role = registry.role_of(&address);
        Self {
            address: Some(address),
            role,
        }
    }

    /// The caller's address, if authenticated
    pub fn address(&self) -> Option<&MemberAddress> {
        self.address.as_ref()
    }

    /// The caller's derived role
    pub fn role(&self) -> Role {
        self.role
    }
}

/// Immutable snapshot of every ledger fact the engine needs for one syllabus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceSnapshot {
    /// Consortium membership
    pub registry: Registry,
    /// The syllabus under consideration
    pub syllabus: SyllabusRecord,
    /// The syllabus's proposal slot, if occupied
    pub proposal: Option<ProposalRecord>,
    /// Universities that declared they offer this course
    pub offering: BTreeSet<MemberAddress>,
    /// Universities that voted on the live proposal
    pub votes: BTreeSet<MemberAddress>,
}

impl GovernanceSnapshot {
    /// Whether a university has declared it offers this course
    pub fn is_offering(&self, address: &MemberAddress) -> bool {
        self.offering.contains(address)
    }

    /// Number of universities offering this course
    pub fn offering_count(&self) -> usize {
        self.offering.len()
    }

    /// Whether a university has voted on the live proposal
    pub fn has_voted(&self, address: &MemberAddress) -> bool {
        self.votes.contains(address)
    }

    /// Vote count recomputed from the vote facts
    ///
    /// This, not the record's cached `vote_count`, is what quorum
    /// decisions use.
    pub fn recomputed_vote_count(&self) -> usize {
        self.votes.len()
    }

    /// Whether the cached vote count agrees with the vote facts
    pub fn vote_count_consistent(&self) -> bool {
        match &self.proposal {
            Some(proposal) => proposal.vote_count as usize == self.votes.len(),
            None => self.votes.is_empty(),
        }
    }

    /// Lifecycle phase of the syllabus's proposal slot
    pub fn phase(&self) -> ProposalPhase {
        match &self.proposal {
            None => ProposalPhase::NoProposal,
            Some(p) if p.executed => ProposalPhase::Executed,
            Some(p) if p.approved_by_internal_accreditor => ProposalPhase::ApprovedForVoting,
            Some(_) => ProposalPhase::Proposed,
        }
    }

    /// Check the snapshot's internal consistency
    ///
    /// A snapshot that violates ledger invariants (`executed` without
    /// accreditor approval, cached vote count diverging from the vote
    /// facts) is a stale or torn read; callers must refetch rather than
    /// decide over it.
    pub fn verify_integrity(&self) -> Result<(), GovernanceError> {
        if let Some(proposal) = &self.proposal {
            if proposal.executed && !proposal.approved_by_internal_accreditor {
                return Err(GovernanceError::stale_snapshot(format!(
                    "{} is executed but not accreditor-approved",
                    proposal.id
                )));
            }
        }
        if !self.vote_count_consistent() {
            let cached = self.proposal.as_ref().map(|p| p.vote_count).unwrap_or(0);
            return Err(GovernanceError::stale_snapshot(format!(
                "cached vote count {} diverges from {} recorded vote facts",
                cached,
                self.votes.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! In-crate snapshot fixtures for unit tests.

    use super::*;

    pub fn addr(seed: u8) -> MemberAddress {
        MemberAddress::parse(&format!("0x{:040x}", seed as u64 + 1)).unwrap()
    }

    pub fn registry(universities: u8) -> Registry {
        Registry::new(
            (1..=universities).map(addr).collect(),
            addr(250),
            addr(251),
        )
    }

    pub fn syllabus() -> SyllabusRecord {
        SyllabusRecord {
            id: SyllabusId::from_raw(1).unwrap(),
            course_name: "Distributed Systems".to_string(),
            content: ContentRef::new("QmInitialContent").unwrap(),
            finalized: false,
            last_modified: Timestamp::from_secs(1_700_000_000),
        }
    }

    pub fn proposal(approved: bool, executed: bool, votes: u32) -> ProposalRecord {
        ProposalRecord {
            id: ProposalId::from_raw(1).unwrap(),
            content: ContentRef::new("QmProposedContent").unwrap(),
            vote_count: votes,
            revision_count: 1,
            approved_by_internal_accreditor: approved,
            executed,
        }
    }

    /// Snapshot over `universities` members, of which the first
    /// `offering` declared the course and the first `votes` voted.
    pub fn snapshot(
        universities: u8,
        offering: u8,
        proposal_record: Option<ProposalRecord>,
        votes: u8,
    ) -> GovernanceSnapshot {
        GovernanceSnapshot {
            registry: registry(universities),
            syllabus: syllabus(),
            proposal: proposal_record,
            offering: (1..=offering).map(addr).collect(),
            votes: (1..=votes).map(addr).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn phase_derivation() {
        assert_eq!(snapshot(3, 0, None, 0).phase(), ProposalPhase::NoProposal);
        assert_eq!(
            snapshot(3, 2, Some(proposal(false, false, 0)), 0).phase(),
            ProposalPhase::Proposed
        );
        assert_eq!(
            snapshot(3, 2, Some(proposal(true, false, 0)), 0).phase(),
            ProposalPhase::ApprovedForVoting
        );
        assert_eq!(
            snapshot(3, 2, Some(proposal(true, true, 2)), 2).phase(),
            ProposalPhase::Executed
        );
    }

    #[test]
    fn offering_and_vote_projections() {
        let snap = snapshot(5, 3, Some(proposal(true, false, 2)), 2);
        assert!(snap.is_offering(&addr(1)));
        assert!(!snap.is_offering(&addr(4)));
        assert_eq!(snap.offering_count(), 3);
        assert!(snap.has_voted(&addr(2)));
        assert!(!snap.has_voted(&addr(3)));
        assert_eq!(snap.recomputed_vote_count(), 2);
    }

    #[test]
    fn integrity_rejects_divergent_vote_count() {
        let snap = snapshot(5, 3, Some(proposal(true, false, 4)), 2);
        assert!(!snap.vote_count_consistent());
        assert_matches!(
            snap.verify_integrity(),
            Err(GovernanceError::StaleSnapshot { .. })
        );
    }

    #[test]
    fn integrity_rejects_executed_without_approval() {
        let snap = snapshot(5, 3, Some(proposal(false, true, 0)), 0);
        assert_matches!(
            snap.verify_integrity(),
            Err(GovernanceError::StaleSnapshot { .. })
        );
    }

    #[test]
    fn integrity_accepts_consistent_snapshot() {
        assert!(snapshot(5, 3, Some(proposal(true, false, 2)), 2)
            .verify_integrity()
            .is_ok());
        assert!(snapshot(5, 0, None, 0).verify_integrity().is_ok());
    }

    #[test]
    fn session_role_derivation() {
        let reg = registry(3);
        assert_eq!(
            SessionContext::for_member(addr(1), &reg).role(),
            Role::University
        );
        assert_eq!(
            SessionContext::for_member(addr(250), &reg).role(),
            Role::InternalAccreditor
        );
        assert_eq!(SessionContext::anonymous().role(), Role::None);
        assert_eq!(SessionContext::anonymous().address(), None);
    }
}
