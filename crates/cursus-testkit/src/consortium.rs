//! Consortium and snapshot builders

use crate::fake_ledger::FakeLedger;
use crate::{external_accreditor, internal_accreditor, member};
use cursus_core::{ContentRef, ProposalId, SyllabusId, Timestamp};
use cursus_governance::{GovernanceSnapshot, ProposalRecord, Registry, SyllabusRecord};
use std::collections::BTreeSet;

/// Builds a fixture consortium: `n` universities plus the two accreditors
#[derive(Debug, Clone)]
pub struct ConsortiumBuilder {
    universities: u8,
}

impl ConsortiumBuilder {
    /// A consortium with three universities
    pub fn new() -> Self {
        Self { universities: 3 }
    }

    /// Set the number of registered universities
    pub fn universities(mut self, count: u8) -> Self {
        self.universities = count;
        self
    }

    /// Build a registry value
    pub fn build_registry(&self) -> Registry {
        Registry::new(
            (1..=self.universities).map(member).collect(),
            internal_accreditor(),
            external_accreditor(),
        )
    }

    /// Build an in-memory ledger seeded with this consortium
    pub fn build_ledger(&self) -> FakeLedger {
        FakeLedger::new(
            (1..=self.universities).map(member).collect(),
            internal_accreditor(),
            external_accreditor(),
        )
    }
}

impl Default for ConsortiumBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds governance snapshots directly, without a ledger round-trip
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    registry: Registry,
    course_name: String,
    content: ContentRef,
    finalized: bool,
    last_modified: Timestamp,
    proposal: Option<ProposalRecord>,
    offering: BTreeSet<cursus_core::MemberAddress>,
    votes: BTreeSet<cursus_core::MemberAddress>,
}

impl SnapshotBuilder {
    /// Start from a registry
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            course_name: "Distributed Systems".to_string(),
            content: ContentRef::new("QmInitialContent").expect("fixture content"),
            finalized: false,
            last_modified: Timestamp::from_secs(1_700_000_000),
            proposal: None,
            offering: BTreeSet::new(),
            votes: BTreeSet::new(),
        }
    }

    /// Set the syllabus content reference
    pub fn content(mut self, content: ContentRef) -> Self {
        self.content = content;
        self
    }

    /// Mark the first `count` universities as offering the course
    pub fn offering(mut self, count: u8) -> Self {
        self.offering = (1..=count).map(member).collect();
        self
    }

    /// Occupy the proposal slot
    pub fn proposal(mut self, approved: bool, executed: bool, votes: u8) -> Self {
        self.proposal = Some(ProposalRecord {
            id: ProposalId::from_raw(1).expect("fixture id"),
            content: ContentRef::new("QmProposedContent").expect("fixture content"),
            vote_count: votes as u32,
            revision_count: 1,
            approved_by_internal_accreditor: approved,
            executed,
        });
        self.votes = (1..=votes).map(member).collect();
        self
    }

    /// Build the snapshot
    pub fn build(self) -> GovernanceSnapshot {
        GovernanceSnapshot {
            registry: self.registry,
            syllabus: SyllabusRecord {
                id: SyllabusId::from_raw(1).expect("fixture id"),
                course_name: self.course_name,
                content: self.content,
                finalized: self.finalized,
                last_modified: self.last_modified,
            },
            proposal: self.proposal,
            offering: self.offering,
            votes: self.votes,
        }
    }
}
