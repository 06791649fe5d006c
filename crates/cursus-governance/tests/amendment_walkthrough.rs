//! Walks a syllabus amendment through its whole lifecycle at the pure
//! level, re-deriving eligibility from a fresh snapshot at every step the
//! way call sites do.

use assert_matches::assert_matches;
use cursus_core::{GovernanceError, PreconditionFailure, ProposalPhase, Timestamp};
use cursus_governance::{
    authorize, can_perform, version_timeline, GovernanceAction, SessionContext, VersionKind,
};
use cursus_testkit::{external_accreditor, internal_accreditor, member, ConsortiumBuilder, SnapshotBuilder};

const UNIVERSITIES: u8 = 4;

fn builder() -> SnapshotBuilder {
    SnapshotBuilder::new(ConsortiumBuilder::new().universities(UNIVERSITIES).build_registry())
}

fn session(n: u8) -> SessionContext {
    SessionContext::for_member(
        member(n),
        &ConsortiumBuilder::new().universities(UNIVERSITIES).build_registry(),
    )
}

fn accreditor_session() -> SessionContext {
    SessionContext::for_member(
        internal_accreditor(),
        &ConsortiumBuilder::new().universities(UNIVERSITIES).build_registry(),
    )
}

#[test]
fn amendment_lifecycle_gates_in_order() {
    let proposer = session(1);
    let accreditor = accreditor_session();

    // 1 of 4 offering: proposals are closed to everyone.
    let early = builder().offering(1).build();
    assert_matches!(
        authorize(&proposer, GovernanceAction::CreateProposal, &early),
        Err(GovernanceError::PreconditionFailed(
            PreconditionFailure::OfferingQuorumNotMet { offering: 1, total: 4 }
        ))
    );

    // 3 of 4 offering: the proposer (who offers the course) may propose.
    let adopted = builder().offering(3).build();
    assert!(can_perform(&proposer, GovernanceAction::CreateProposal, &adopted));
    assert_matches!(
        authorize(&session(4), GovernanceAction::CreateProposal, &adopted),
        Err(GovernanceError::PreconditionFailed(PreconditionFailure::NotOffering))
    );

    // Proposal lands: voting is not open until the accreditor approves.
    let proposed = builder().offering(3).proposal(false, false, 0).build();
    assert_eq!(proposed.phase(), ProposalPhase::Proposed);
    assert_matches!(
        authorize(&session(2), GovernanceAction::CastVote, &proposed),
        Err(GovernanceError::PreconditionFailed(
            PreconditionFailure::WrongLifecycleState { .. }
        ))
    );
    assert!(can_perform(&accreditor, GovernanceAction::ApproveForVoting, &proposed));

    // Voting open, two of four voted: execution is still short.
    let voting = builder().offering(3).proposal(true, false, 2).build();
    assert!(can_perform(&session(3), GovernanceAction::CastVote, &voting));
    assert_matches!(
        authorize(&accreditor, GovernanceAction::ExecuteProposal, &voting),
        Err(GovernanceError::PreconditionFailed(
            PreconditionFailure::ExecutionQuorumNotMet { votes: 2, total: 4 }
        ))
    );

    // Third vote reaches the majority of all members; execution opens.
    let ready = builder().offering(3).proposal(true, false, 3).build();
    assert!(can_perform(&accreditor, GovernanceAction::ExecuteProposal, &ready));

    // Executed: terminal for the slot, and the slot is free again.
    let done = builder().offering(3).proposal(true, true, 3).build();
    assert_eq!(done.phase(), ProposalPhase::Executed);
    assert!(!can_perform(&accreditor, GovernanceAction::ExecuteProposal, &done));
    assert!(can_perform(&proposer, GovernanceAction::CreateProposal, &done));
}

#[test]
fn stalled_proposal_blocks_new_ones_indefinitely() {
    // No rejection or withdrawal transition exists: a proposal sitting in
    // either pre-execution phase keeps the slot occupied.
    let proposer = session(1);
    for (approved, phase) in [
        (false, ProposalPhase::Proposed),
        (true, ProposalPhase::ApprovedForVoting),
    ] {
        let stalled = builder().offering(3).proposal(approved, false, 0).build();
        assert_eq!(stalled.phase(), phase);
        assert_matches!(
            authorize(&proposer, GovernanceAction::CreateProposal, &stalled),
            Err(GovernanceError::PreconditionFailed(
                PreconditionFailure::WrongLifecycleState { .. }
            ))
        );
    }
}

#[test]
fn external_accreditor_stays_read_only_through_the_lifecycle() {
    let external = SessionContext::for_member(
        external_accreditor(),
        &ConsortiumBuilder::new().universities(UNIVERSITIES).build_registry(),
    );
    for snapshot in [
        builder().offering(3).build(),
        builder().offering(3).proposal(false, false, 0).build(),
        builder().offering(3).proposal(true, false, 3).build(),
    ] {
        for action in GovernanceAction::ALL {
            assert!(!can_perform(&external, action, &snapshot), "{action}");
        }
    }
}

#[test]
fn timeline_tracks_the_lifecycle() {
    let now = Timestamp::from_secs(1_700_100_000);

    let before = builder().offering(3).build();
    assert_eq!(
        version_timeline(&before, now)
            .iter()
            .map(|entry| entry.kind)
            .collect::<Vec<_>>(),
        vec![VersionKind::Initial]
    );

    let live = builder().offering(3).proposal(true, false, 1).build();
    let entries = version_timeline(&live, now);
    assert_eq!(entries[0].kind, VersionKind::Proposal);
    assert!(entries[0].approximate);

    let done = builder().offering(3).proposal(true, true, 3).build();
    let entries = version_timeline(&done, now);
    assert_eq!(entries[0].kind, VersionKind::Executed);
    assert!(!entries[0].approximate);
    assert_eq!(entries[1].kind, VersionKind::Initial);
}
