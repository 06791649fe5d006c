//! Proposal lifecycle phases
//!
//! ```text
//! NoProposal → Proposed → ApprovedForVoting → Executed (terminal)
//! ```
//!
//! A proposal can stall indefinitely in `Proposed` or `ApprovedForVoting`;
//! there is no rejection or withdrawal transition in this design.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phase of a syllabus's change-proposal slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProposalPhase {
    /// No proposal exists for the syllabus
    NoProposal,
    /// Proposal submitted, awaiting internal-accreditor approval
    Proposed,
    /// Approved by the internal accreditor; voting is open
    ApprovedForVoting,
    /// Executed; the syllabus content has been replaced. Terminal.
    Executed,
}

impl ProposalPhase {
    /// Whether the phase permits creating a fresh proposal
    ///
    /// `Executed` counts: an executed proposal no longer occupies the
    /// syllabus's single live-proposal slot.
    pub fn accepts_new_proposal(self) -> bool {
        matches!(self, ProposalPhase::NoProposal | ProposalPhase::Executed)
    }

    /// Whether the phase is terminal
    pub fn is_terminal(self) -> bool {
        matches!(self, ProposalPhase::Executed)
    }
}

impl fmt::Display for ProposalPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProposalPhase::NoProposal => "no proposal",
            ProposalPhase::Proposed => "proposed",
            ProposalPhase::ApprovedForVoting => "approved for voting",
            ProposalPhase::Executed => "executed",
        };
        write!(f, "{name}")
    }
}
