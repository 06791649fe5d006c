//! Proposal lifecycle engine
//!
//! The state machine governing a syllabus's change-proposal slot and the
//! authorization predicate for each transition:
//!
//! | Transition | Role | Precondition |
//! |---|---|---|
//! | Create proposal | University | offering the course, offering quorum met, slot free |
//! | Approve for voting | Internal accreditor | slot is `Proposed` |
//! | Cast vote | University | offering the course, voting open, not yet voted |
//! | Execute | Internal accreditor | voting open, execution quorum met |
//!
//! [`authorize`] is the single decision predicate consumed by every call
//! site; it is pure and side-effect free, so UI code and tests can probe
//! "why is this action disabled" without submitting anything. An attempt
//! whose precondition fails is rejected locally with a specific reason
//! code: the engine never silently no-ops, and nothing is ever submitted
//! to the ledger on a failed gate.

use crate::quorum::{execution_quorum_met, offering_quorum_met};
use crate::registry::Registry;
use crate::snapshot::{GovernanceSnapshot, SessionContext};
use cursus_core::{
    GovernanceError, MemberAddress, PreconditionFailure, ProposalPhase, Role,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Every mutating ledger action the consortium defines
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum GovernanceAction {
    /// Add a university to the registry
    RegisterUniversity,
    /// Create a new course syllabus
    CreateSyllabus,
    /// Declare that the caller offers the course
    DeclareOffering,
    /// Propose a change to the syllabus content
    CreateProposal,
    /// Open the live proposal for voting
    ApproveForVoting,
    /// Vote for the live proposal
    CastVote,
    /// Execute the live proposal, replacing the syllabus content
    ExecuteProposal,
}

impl GovernanceAction {
    /// All actions, in lifecycle order
    pub const ALL: [GovernanceAction; 7] = [
        GovernanceAction::RegisterUniversity,
        GovernanceAction::CreateSyllabus,
        GovernanceAction::DeclareOffering,
        GovernanceAction::CreateProposal,
        GovernanceAction::ApproveForVoting,
        GovernanceAction::CastVote,
        GovernanceAction::ExecuteProposal,
    ];

    /// The role an action demands
    pub fn required_role(self) -> Role {
        match self {
            GovernanceAction::RegisterUniversity
            | GovernanceAction::ApproveForVoting
            | GovernanceAction::ExecuteProposal => Role::InternalAccreditor,
            GovernanceAction::CreateSyllabus
            | GovernanceAction::DeclareOffering
            | GovernanceAction::CreateProposal
            | GovernanceAction::CastVote => Role::University,
        }
    }
}

impl fmt::Display for GovernanceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GovernanceAction::RegisterUniversity => "register university",
            GovernanceAction::CreateSyllabus => "create syllabus",
            GovernanceAction::DeclareOffering => "declare offering",
            GovernanceAction::CreateProposal => "create proposal",
            GovernanceAction::ApproveForVoting => "approve for voting",
            GovernanceAction::CastVote => "cast vote",
            GovernanceAction::ExecuteProposal => "execute proposal",
        };
        write!(f, "{name}")
    }
}

/// Role gate alone, for actions not scoped to any syllabus
///
/// `RegisterUniversity` and `CreateSyllabus` have no snapshot to evaluate
/// over; their only engine-level gate is the caller's role. Syllabus-scoped
/// actions must go through [`authorize`].
pub fn authorize_role(
    session: &SessionContext,
    action: GovernanceAction,
) -> Result<(), GovernanceError> {
    require_role(action, session).map(|_| ())
}

fn require_role(
    action: GovernanceAction,
    session: &SessionContext,
) -> Result<&MemberAddress, GovernanceError> {
    let required = action.required_role();
    if session.role() != required {
        return Err(GovernanceError::unauthorized(
            action.to_string(),
            required,
            session.role(),
        ));
    }
    session.address().ok_or_else(|| {
        GovernanceError::unauthorized(action.to_string(), required, Role::None)
    })
}

fn require_phase(
    expected: ProposalPhase,
    actual: ProposalPhase,
) -> Result<(), GovernanceError> {
    if actual != expected {
        return Err(PreconditionFailure::WrongLifecycleState { expected, actual }.into());
    }
    Ok(())
}

/// Decide whether `session` may perform `action` over `snapshot`
///
/// Pure: re-deriving this twice from the same snapshot yields the same
/// outcome. An `Err` means the transition must not be submitted; the error
/// carries the machine-readable reason.
pub fn authorize(
    session: &SessionContext,
    action: GovernanceAction,
    snapshot: &GovernanceSnapshot,
) -> Result<(), GovernanceError> {
    snapshot.verify_integrity()?;
    let total = snapshot.registry.total_universities();

    match action {
        GovernanceAction::RegisterUniversity | GovernanceAction::CreateSyllabus => {
            require_role(action, session)?;
            Ok(())
        }

        GovernanceAction::DeclareOffering => {
            let actor = require_role(action, session)?;
            if snapshot.is_offering(actor) {
                return Err(PreconditionFailure::DuplicateOffering.into());
            }
            Ok(())
        }

        GovernanceAction::CreateProposal => {
            // The offering quorum is a fact about the registry, not the
            // caller: it gates creation for every role.
            let offering = snapshot.offering_count();
            if !offering_quorum_met(offering, total) {
                return Err(
                    PreconditionFailure::OfferingQuorumNotMet { offering, total }.into(),
                );
            }
            let actor = require_role(action, session)?;
            if !snapshot.is_offering(actor) {
                return Err(PreconditionFailure::NotOffering.into());
            }
            let phase = snapshot.phase();
            if !phase.accepts_new_proposal() {
                return Err(PreconditionFailure::WrongLifecycleState {
                    expected: ProposalPhase::NoProposal,
                    actual: phase,
                }
                .into());
            }
            Ok(())
        }

        GovernanceAction::ApproveForVoting => {
            require_role(action, session)?;
            require_phase(ProposalPhase::Proposed, snapshot.phase())
        }

        GovernanceAction::CastVote => {
            let actor = require_role(action, session)?;
            require_phase(ProposalPhase::ApprovedForVoting, snapshot.phase())?;
            if !snapshot.is_offering(actor) {
                return Err(PreconditionFailure::NotOffering.into());
            }
            if snapshot.has_voted(actor) {
                return Err(PreconditionFailure::AlreadyVoted.into());
            }
            Ok(())
        }

        GovernanceAction::ExecuteProposal => {
            require_role(action, session)?;
            require_phase(ProposalPhase::ApprovedForVoting, snapshot.phase())?;
            let votes = snapshot.recomputed_vote_count();
            if !execution_quorum_met(votes, total) {
                return Err(
                    PreconditionFailure::ExecutionQuorumNotMet { votes, total }.into(),
                );
            }
            Ok(())
        }
    }
}

/// Boolean shadow of [`authorize`]
pub fn can_perform(
    session: &SessionContext,
    action: GovernanceAction,
    snapshot: &GovernanceSnapshot,
) -> bool {
    authorize(session, action, snapshot).is_ok()
}

/// Outcome of evaluating every action at once for one session
///
/// Lets a call site render all its controls (and their "why is this
/// disabled" explanations) from a single pass over one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    outcomes: BTreeMap<GovernanceAction, Option<GovernanceError>>,
}

impl Eligibility {
    /// Whether the action is currently legal
    pub fn allowed(&self, action: GovernanceAction) -> bool {
        matches!(self.outcomes.get(&action), Some(None))
    }

    /// Why the action is currently illegal, if it is
    pub fn denial(&self, action: GovernanceAction) -> Option<&GovernanceError> {
        self.outcomes.get(&action).and_then(Option::as_ref)
    }

    /// Iterate over all (action, denial) outcomes
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (GovernanceAction, Option<&GovernanceError>)> {
        self.outcomes
            .iter()
            .map(|(action, denial)| (*action, denial.as_ref()))
    }
}

/// Evaluate [`authorize`] for every action over one snapshot
pub fn eligibility(session: &SessionContext, snapshot: &GovernanceSnapshot) -> Eligibility {
    let outcomes = GovernanceAction::ALL
        .into_iter()
        .map(|action| (action, authorize(session, action, snapshot).err()))
        .collect();
    Eligibility { outcomes }
}

/// Validate a university-registration payload before submission
pub fn validate_registration(
    candidate: &MemberAddress,
    registry: &Registry,
) -> Result<(), GovernanceError> {
    if registry.is_university(candidate) {
        return Err(PreconditionFailure::AlreadyRegistered.into());
    }
    Ok(())
}

/// Validate a new-syllabus payload before submission
pub fn validate_new_syllabus(course_name: &str) -> Result<(), GovernanceError> {
    if course_name.trim().is_empty() {
        return Err(PreconditionFailure::EmptyCourseName.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::fixtures::{addr, proposal, registry, snapshot};
    use assert_matches::assert_matches;
    use cursus_core::GovernanceError;

    fn university(n: u8, universities: u8) -> SessionContext {
        SessionContext::for_member(addr(n), &registry(universities))
    }

    fn accreditor(universities: u8) -> SessionContext {
        SessionContext::for_member(addr(250), &registry(universities))
    }

    fn external(universities: u8) -> SessionContext {
        SessionContext::for_member(addr(251), &registry(universities))
    }

    #[test]
    fn create_proposal_requires_offering_quorum_for_every_role() {
        // 2 of 5 offering: below the strict majority.
        let snap = snapshot(5, 2, None, 0);
        for session in [
            university(1, 5),
            accreditor(5),
            external(5),
            SessionContext::anonymous(),
        ] {
            assert_matches!(
                authorize(&session, GovernanceAction::CreateProposal, &snap),
                Err(GovernanceError::PreconditionFailed(
                    PreconditionFailure::OfferingQuorumNotMet { offering: 2, total: 5 }
                ))
            );
        }
    }

    #[test]
    fn create_proposal_double_gate() {
        // Quorum met, but the caller does not offer the course.
        let snap = snapshot(5, 3, None, 0);
        assert_matches!(
            authorize(&university(4, 5), GovernanceAction::CreateProposal, &snap),
            Err(GovernanceError::PreconditionFailed(PreconditionFailure::NotOffering))
        );
        // Offering caller with quorum met may propose.
        assert!(can_perform(
            &university(1, 5),
            GovernanceAction::CreateProposal,
            &snap
        ));
    }

    #[test]
    fn create_proposal_blocked_by_live_proposal() {
        let live = snapshot(5, 3, Some(proposal(false, false, 0)), 0);
        assert_matches!(
            authorize(&university(1, 5), GovernanceAction::CreateProposal, &live),
            Err(GovernanceError::PreconditionFailed(
                PreconditionFailure::WrongLifecycleState {
                    actual: ProposalPhase::Proposed,
                    ..
                }
            ))
        );

        // An executed proposal frees the slot again.
        let executed = snapshot(5, 3, Some(proposal(true, true, 3)), 3);
        assert!(can_perform(
            &university(1, 5),
            GovernanceAction::CreateProposal,
            &executed
        ));
    }

    #[test]
    fn approve_for_voting_requires_internal_accreditor_and_proposed() {
        let snap = snapshot(5, 3, Some(proposal(false, false, 0)), 0);
        assert!(can_perform(
            &accreditor(5),
            GovernanceAction::ApproveForVoting,
            &snap
        ));
        assert_matches!(
            authorize(&university(1, 5), GovernanceAction::ApproveForVoting, &snap),
            Err(GovernanceError::Unauthorized { .. })
        );
        assert_matches!(
            authorize(&external(5), GovernanceAction::ApproveForVoting, &snap),
            Err(GovernanceError::Unauthorized { .. })
        );

        let already = snapshot(5, 3, Some(proposal(true, false, 0)), 0);
        assert_matches!(
            authorize(&accreditor(5), GovernanceAction::ApproveForVoting, &already),
            Err(GovernanceError::PreconditionFailed(
                PreconditionFailure::WrongLifecycleState {
                    expected: ProposalPhase::Proposed,
                    actual: ProposalPhase::ApprovedForVoting,
                }
            ))
        );
    }

    #[test]
    fn cast_vote_gates() {
        let open = snapshot(5, 3, Some(proposal(true, false, 1)), 1);

        // Offering university that has not voted yet.
        assert!(can_perform(&university(2, 5), GovernanceAction::CastVote, &open));

        // Already voted: rejected, and the decision is derived from facts,
        // so re-deriving cannot bump any count.
        assert_matches!(
            authorize(&university(1, 5), GovernanceAction::CastVote, &open),
            Err(GovernanceError::PreconditionFailed(PreconditionFailure::AlreadyVoted))
        );
        assert_eq!(open.recomputed_vote_count(), 1);

        // Not offering.
        assert_matches!(
            authorize(&university(4, 5), GovernanceAction::CastVote, &open),
            Err(GovernanceError::PreconditionFailed(PreconditionFailure::NotOffering))
        );

        // Voting not open yet.
        let pending = snapshot(5, 3, Some(proposal(false, false, 0)), 0);
        assert_matches!(
            authorize(&university(1, 5), GovernanceAction::CastVote, &pending),
            Err(GovernanceError::PreconditionFailed(
                PreconditionFailure::WrongLifecycleState {
                    expected: ProposalPhase::ApprovedForVoting,
                    actual: ProposalPhase::Proposed,
                }
            ))
        );
    }

    #[test]
    fn execute_requires_quorum_and_open_voting() {
        // total = 4 needs 3 votes.
        let short = snapshot(4, 3, Some(proposal(true, false, 2)), 2);
        assert_matches!(
            authorize(&accreditor(4), GovernanceAction::ExecuteProposal, &short),
            Err(GovernanceError::PreconditionFailed(
                PreconditionFailure::ExecutionQuorumNotMet { votes: 2, total: 4 }
            ))
        );

        let ready = snapshot(4, 3, Some(proposal(true, false, 3)), 3);
        assert!(can_perform(
            &accreditor(4),
            GovernanceAction::ExecuteProposal,
            &ready
        ));

        // Terminal: an executed proposal admits no further transitions.
        let done = snapshot(4, 3, Some(proposal(true, true, 3)), 3);
        for action in [GovernanceAction::ApproveForVoting, GovernanceAction::ExecuteProposal] {
            assert_matches!(
                authorize(&accreditor(4), action, &done),
                Err(GovernanceError::PreconditionFailed(
                    PreconditionFailure::WrongLifecycleState {
                        actual: ProposalPhase::Executed,
                        ..
                    }
                ))
            );
        }
        assert_matches!(
            authorize(&university(1, 4), GovernanceAction::CastVote, &done),
            Err(GovernanceError::PreconditionFailed(
                PreconditionFailure::WrongLifecycleState { .. }
            ))
        );
    }

    #[test]
    fn declare_offering_is_monotonic() {
        let snap = snapshot(5, 2, None, 0);
        assert!(can_perform(
            &university(3, 5),
            GovernanceAction::DeclareOffering,
            &snap
        ));
        assert_matches!(
            authorize(&university(1, 5), GovernanceAction::DeclareOffering, &snap),
            Err(GovernanceError::PreconditionFailed(
                PreconditionFailure::DuplicateOffering
            ))
        );
    }

    #[test]
    fn external_accreditor_has_no_mutating_privileges() {
        let snap = snapshot(5, 3, Some(proposal(true, false, 3)), 3);
        for action in GovernanceAction::ALL {
            assert_matches!(
                authorize(&external(5), action, &snap),
                Err(GovernanceError::Unauthorized { .. })
            );
        }
    }

    #[test]
    fn authorize_is_pure() {
        let snap = snapshot(5, 3, Some(proposal(true, false, 2)), 2);
        let session = university(1, 5);
        for action in GovernanceAction::ALL {
            assert_eq!(
                authorize(&session, action, &snap),
                authorize(&session, action, &snap)
            );
        }
    }

    #[test]
    fn authorize_refuses_inconsistent_snapshot() {
        // Cached count diverges from vote facts: every decision demands a refetch.
        let snap = snapshot(5, 3, Some(proposal(true, false, 4)), 2);
        assert_matches!(
            authorize(&accreditor(5), GovernanceAction::ExecuteProposal, &snap),
            Err(GovernanceError::StaleSnapshot { .. })
        );
    }

    #[test]
    fn eligibility_matches_per_action_authorize() {
        let snap = snapshot(5, 3, Some(proposal(true, false, 2)), 2);
        for session in [university(1, 5), accreditor(5), SessionContext::anonymous()] {
            let map = eligibility(&session, &snap);
            for action in GovernanceAction::ALL {
                assert_eq!(
                    map.allowed(action),
                    can_perform(&session, action, &snap),
                    "{action} mismatch"
                );
                assert_eq!(
                    map.denial(action),
                    authorize(&session, action, &snap).err().as_ref()
                );
            }
        }
    }

    #[test]
    fn payload_validation() {
        let reg = registry(3);
        assert!(validate_registration(&addr(9), &reg).is_ok());
        assert_matches!(
            validate_registration(&addr(1), &reg),
            Err(GovernanceError::PreconditionFailed(
                PreconditionFailure::AlreadyRegistered
            ))
        );
        assert!(validate_new_syllabus("Distributed Systems").is_ok());
        assert_matches!(
            validate_new_syllabus("   "),
            Err(GovernanceError::PreconditionFailed(
                PreconditionFailure::EmptyCourseName
            ))
        );
    }
}
