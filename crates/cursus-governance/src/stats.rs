//! Adoption and proposal-status aggregates
//!
//! Read-only projections consumed by dashboards: per-course adoption,
//! catalog display status, and the consortium-wide proposal breakdown.

use crate::snapshot::{GovernanceSnapshot, ProposalRecord, SyllabusRecord};
use serde::{Deserialize, Serialize};

/// Adoption bands used by the course dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdoptionLevel {
    /// Fewer than half the consortium offers the course
    Low,
    /// At least half, below three quarters
    Medium,
    /// Three quarters or more
    High,
}

/// Per-course statistics derived from one snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseStats {
    /// Universities offering the course
    pub offering_count: usize,
    /// Registered universities in the consortium
    pub total_universities: usize,
    /// Change proposals over the syllabus's lifetime
    pub proposal_revisions: u32,
    /// Votes on the live proposal
    pub vote_count: usize,
}

impl CourseStats {
    /// Derive the statistics from a snapshot
    pub fn from_snapshot(snapshot: &GovernanceSnapshot) -> Self {
        Self {
            offering_count: snapshot.offering_count(),
            total_universities: snapshot.registry.total_universities(),
            proposal_revisions: snapshot
                .proposal
                .as_ref()
                .map(|p| p.revision_count)
                .unwrap_or(0),
            vote_count: snapshot.recomputed_vote_count(),
        }
    }

    /// Share of the consortium offering the course, in percent
    pub fn adoption_rate_percent(&self) -> f64 {
        if self.total_universities == 0 {
            return 0.0;
        }
        self.offering_count as f64 / self.total_universities as f64 * 100.0
    }

    /// Adoption band for the course
    pub fn adoption_level(&self) -> AdoptionLevel {
        let rate = self.adoption_rate_percent();
        if rate >= 75.0 {
            AdoptionLevel::High
        } else if rate >= 50.0 {
            AdoptionLevel::Medium
        } else {
            AdoptionLevel::Low
        }
    }
}

/// Catalog display status of a syllabus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CatalogStatus {
    /// Not yet finalized, no executed change
    Draft,
    /// Finalized, no executed change
    Finalized,
    /// A change proposal has been executed
    Executed,
}

/// Derive the catalog status for a syllabus and its proposal slot
///
/// An executed change takes precedence over the `finalized` flag.
pub fn catalog_status(
    syllabus: &SyllabusRecord,
    proposal: Option<&ProposalRecord>,
) -> CatalogStatus {
    if proposal.is_some_and(|p| p.executed) {
        CatalogStatus::Executed
    } else if syllabus.finalized {
        CatalogStatus::Finalized
    } else {
        CatalogStatus::Draft
    }
}

/// Consortium-wide proposal tallies for the analytics view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalStatusBreakdown {
    /// Awaiting internal-accreditor approval
    pub pending_approval: usize,
    /// Approved for voting, not yet executed
    pub approved_for_voting: usize,
    /// Executed
    pub executed: usize,
}

impl ProposalStatusBreakdown {
    /// Tally a collection of proposal records
    pub fn tally<'a>(proposals: impl IntoIterator<Item = &'a ProposalRecord>) -> Self {
        let mut breakdown = Self::default();
        for proposal in proposals {
            if proposal.executed {
                breakdown.executed += 1;
            } else if proposal.approved_by_internal_accreditor {
                breakdown.approved_for_voting += 1;
            } else {
                breakdown.pending_approval += 1;
            }
        }
        breakdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::fixtures::{proposal, snapshot, syllabus};

    #[test]
    fn adoption_bands() {
        let stats = |offering, total| CourseStats {
            offering_count: offering,
            total_universities: total,
            proposal_revisions: 0,
            vote_count: 0,
        };
        assert_eq!(stats(1, 4).adoption_level(), AdoptionLevel::Low);
        assert_eq!(stats(2, 4).adoption_level(), AdoptionLevel::Medium);
        assert_eq!(stats(3, 4).adoption_level(), AdoptionLevel::High);
        assert_eq!(stats(0, 0).adoption_rate_percent(), 0.0);
        assert_eq!(stats(0, 0).adoption_level(), AdoptionLevel::Low);
    }

    #[test]
    fn stats_from_snapshot() {
        let snap = snapshot(5, 3, Some(proposal(true, false, 2)), 2);
        let stats = CourseStats::from_snapshot(&snap);
        assert_eq!(stats.offering_count, 3);
        assert_eq!(stats.total_universities, 5);
        assert_eq!(stats.vote_count, 2);
        assert_eq!(stats.proposal_revisions, 1);
        assert_eq!(stats.adoption_level(), AdoptionLevel::Medium);
    }

    #[test]
    fn catalog_status_precedence() {
        let mut record = syllabus();
        assert_eq!(catalog_status(&record, None), CatalogStatus::Draft);

        record.finalized = true;
        assert_eq!(catalog_status(&record, None), CatalogStatus::Finalized);

        // An executed change outranks the finalized flag.
        let done = proposal(true, true, 3);
        assert_eq!(catalog_status(&record, Some(&done)), CatalogStatus::Executed);

        let live = proposal(true, false, 1);
        assert_eq!(catalog_status(&record, Some(&live)), CatalogStatus::Finalized);
    }

    #[test]
    fn breakdown_tally() {
        let records = [
            proposal(false, false, 0),
            proposal(true, false, 2),
            proposal(true, true, 3),
            proposal(false, false, 0),
        ];
        let breakdown = ProposalStatusBreakdown::tally(records.iter());
        assert_eq!(breakdown.pending_approval, 2);
        assert_eq!(breakdown.approved_for_voting, 1);
        assert_eq!(breakdown.executed, 1);
    }
}
