//! Version timeline builder
//!
//! Merges a syllabus's own content record with its proposal record into an
//! ordered, labeled history, most recent first. Read-only and independent
//! of the lifecycle engine: rebuildable at any time from a fresh snapshot,
//! never mutated in place.

use crate::snapshot::GovernanceSnapshot;
use cursus_core::{ContentRef, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a timeline entry represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VersionKind {
    /// The syllabus's original content record
    Initial,
    /// A live, not-yet-executed change proposal
    Proposal,
    /// An executed change proposal
    Executed,
}

impl VersionKind {
    /// Initial entries sort behind proposal entries on equal timestamps
    fn recency_rank(self) -> u8 {
        match self {
            VersionKind::Initial => 0,
            VersionKind::Proposal | VersionKind::Executed => 1,
        }
    }
}

/// One entry in a syllabus's version history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    /// What this entry represents
    pub kind: VersionKind,
    /// Address of this version's content
    pub content: ContentRef,
    /// When this version appeared
    pub timestamp: Timestamp,
    /// The proposal behind this entry, for non-initial entries
    pub proposal_id: Option<ProposalId>,
    /// Whether `timestamp` is a substituted "now" marker rather than a
    /// ledger fact (the ledger assigns no timestamp to a live proposal)
    pub approximate: bool,
}

impl fmt::Display for VersionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.proposal_id) {
            (VersionKind::Initial, _) => write!(f, "Initial Version"),
            (VersionKind::Proposal, Some(id)) => write!(f, "Proposal #{}", id.to_raw()),
            (VersionKind::Executed, Some(id)) => {
                write!(f, "Executed Proposal #{}", id.to_raw())
            }
            // Non-initial entries always carry a proposal id; this arm is
            // unreachable from `version_timeline`.
            (_, None) => write!(f, "Unknown Version"),
        }
    }
}

/// Rebuild the version timeline from a snapshot, most recent first
///
/// `now` is the marker substituted for the live proposal's missing ledger
/// timestamp; pass the caller's current wall clock. Executed proposals
/// reuse the syllabus's `last_modified` (execution is what set it), so
/// their timestamps are ledger facts and tie with the initial entry;
/// ties are broken with proposal entries ahead of `Initial`.
pub fn version_timeline(snapshot: &GovernanceSnapshot, now: Timestamp) -> Vec<VersionEntry> {
    let mut entries = vec![VersionEntry {
        kind: VersionKind::Initial,
        content: snapshot.syllabus.content.clone(),
        timestamp: snapshot.syllabus.last_modified,
        proposal_id: None,
        approximate: false,
    }];

    if let Some(proposal) = &snapshot.proposal {
        let (kind, timestamp, approximate) = if proposal.executed {
            (VersionKind::Executed, snapshot.syllabus.last_modified, false)
        } else {
            (VersionKind::Proposal, now, true)
        };
        entries.push(VersionEntry {
            kind,
            content: proposal.content.clone(),
            timestamp,
            proposal_id: Some(proposal.id),
            approximate,
        });
    }

    entries.sort_by(|a, b| {
        (b.timestamp, b.kind.recency_rank()).cmp(&(a.timestamp, a.kind.recency_rank()))
    });
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::fixtures::{proposal, snapshot};

    fn now() -> Timestamp {
        // Later than the fixture syllabus's last_modified.
        Timestamp::from_secs(1_700_100_000)
    }

    #[test]
    fn lone_initial_entry() {
        let timeline = version_timeline(&snapshot(3, 2, None, 0), now());
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].kind, VersionKind::Initial);
        assert!(!timeline[0].approximate);
        assert_eq!(timeline[0].to_string(), "Initial Version");
    }

    #[test]
    fn live_proposal_sorts_first_with_now_marker() {
        let snap = snapshot(3, 2, Some(proposal(true, false, 1)), 1);
        let timeline = version_timeline(&snap, now());
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].kind, VersionKind::Proposal);
        assert_eq!(timeline[0].timestamp, now());
        assert!(timeline[0].approximate);
        assert_eq!(timeline[0].to_string(), "Proposal #1");
        assert_eq!(timeline[1].kind, VersionKind::Initial);
    }

    #[test]
    fn executed_proposal_wins_timestamp_tie_with_initial() {
        let snap = snapshot(3, 2, Some(proposal(true, true, 2)), 2);
        let timeline = version_timeline(&snap, now());
        assert_eq!(timeline[0].kind, VersionKind::Executed);
        assert!(!timeline[0].approximate);
        // Both entries carry the same ledger timestamp; the executed entry
        // still orders ahead of the initial one.
        assert_eq!(timeline[0].timestamp, timeline[1].timestamp);
        assert_eq!(timeline[1].kind, VersionKind::Initial);
        assert_eq!(timeline[0].to_string(), "Executed Proposal #1");
    }

    #[test]
    fn rebuilding_from_unchanged_snapshot_is_idempotent() {
        let snap = snapshot(3, 2, Some(proposal(true, false, 1)), 1);
        let at = now();
        assert_eq!(version_timeline(&snap, at), version_timeline(&snap, at));
    }
}
