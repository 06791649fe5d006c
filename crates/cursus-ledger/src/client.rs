//! Governance client
//!
//! One consolidated decision path for every call site: assemble a
//! [`GovernanceSnapshot`] from ledger reads, evaluate the pure predicates,
//! and only then touch the wire. After a submission the post-state is
//! re-read and re-validated; success is never reported on the strength of
//! the submission alone.

use crate::effects::{LedgerReads, LedgerWrites, TxReceipt};
use crate::errors::LedgerError;
use cursus_core::{
    ContentRef, GovernanceError, MemberAddress, PreconditionFailure, ProposalPhase, Role,
    SyllabusId, Timestamp, TypeError,
};
use cursus_governance::{
    authorize, authorize_role, eligibility, validate_new_syllabus, validate_registration,
    version_timeline, Eligibility, GovernanceAction, GovernanceSnapshot, ProposalRecord,
    Registry, SessionContext, SyllabusRecord, VersionEntry,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// One syllabus with its proposal slot, as listed by [`GovernanceClient::catalog`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// The syllabus record
    pub syllabus: SyllabusRecord,
    /// Its proposal slot, if occupied
    pub proposal: Option<ProposalRecord>,
}

/// Client over an external ledger implementing both effect traits
#[derive(Debug, Clone)]
pub struct GovernanceClient<L> {
    ledger: L,
}

impl<L> GovernanceClient<L>
where
    L: LedgerReads + LedgerWrites,
{
    /// Wrap a ledger transport
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// The underlying ledger transport
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Fetch the consortium registry
    pub async fn registry(&self) -> Result<Registry, GovernanceError> {
        let universities = self.ledger.universities().await.map_err(read_error)?;
        let internal = self.ledger.internal_accreditor().await.map_err(read_error)?;
        let external = self.ledger.external_accreditor().await.map_err(read_error)?;
        Ok(Registry::new(universities, internal, external))
    }

    /// Derive the session context for a connected caller
    pub async fn session_for(
        &self,
        address: MemberAddress,
    ) -> Result<SessionContext, GovernanceError> {
        let registry = self.registry().await?;
        let session = SessionContext::for_member(address, &registry);
        debug!(role = %session.role(), "derived session role");
        Ok(session)
    }

    /// Fetch an immutable snapshot of every fact the engine needs for one
    /// syllabus
    ///
    /// Fails with `StaleSnapshot` when the read is internally inconsistent
    /// (torn read); the caller refetches.
    pub async fn snapshot(
        &self,
        syllabus_id: SyllabusId,
    ) -> Result<GovernanceSnapshot, GovernanceError> {
        let registry = self.registry().await?;
        let raw = self
            .ledger
            .syllabus(syllabus_id.to_raw())
            .await
            .map_err(read_error)?;
        let syllabus = raw
            .into_domain()
            .map_err(malformed)?
            .ok_or(PreconditionFailure::NoSuchSyllabus)?;
        let proposal = self
            .ledger
            .proposal(syllabus_id.to_raw())
            .await
            .map_err(read_error)?
            .into_domain()
            .map_err(malformed)?;

        let mut offering = BTreeSet::new();
        let mut votes = BTreeSet::new();
        for university in registry.universities() {
            if self
                .ledger
                .is_offering(syllabus_id.to_raw(), university)
                .await
                .map_err(read_error)?
            {
                offering.insert(university.clone());
            }
            if self
                .ledger
                .has_voted(syllabus_id.to_raw(), university)
                .await
                .map_err(read_error)?
            {
                votes.insert(university.clone());
            }
        }

        let snapshot = GovernanceSnapshot {
            registry,
            syllabus,
            proposal,
            offering,
            votes,
        };
        snapshot.verify_integrity()?;
        Ok(snapshot)
    }

    /// Evaluate every action's eligibility for a session over one syllabus
    pub async fn eligibility_for(
        &self,
        session: &SessionContext,
        syllabus_id: SyllabusId,
    ) -> Result<Eligibility, GovernanceError> {
        let snapshot = self.snapshot(syllabus_id).await?;
        Ok(eligibility(session, &snapshot))
    }

    /// Enumerate every syllabus with its proposal slot
    pub async fn catalog(&self) -> Result<Vec<CatalogEntry>, GovernanceError> {
        let count = self.ledger.syllabus_count().await.map_err(read_error)?;
        let mut entries = Vec::new();
        for id in 1..=count {
            let syllabus = self
                .ledger
                .syllabus(id)
                .await
                .map_err(read_error)?
                .into_domain()
                .map_err(malformed)?;
            let Some(syllabus) = syllabus else {
                continue;
            };
            let proposal = self
                .ledger
                .proposal(id)
                .await
                .map_err(read_error)?
                .into_domain()
                .map_err(malformed)?;
            entries.push(CatalogEntry { syllabus, proposal });
        }
        Ok(entries)
    }

    /// Rebuild a syllabus's version timeline, most recent first
    pub async fn version_history(
        &self,
        syllabus_id: SyllabusId,
    ) -> Result<Vec<VersionEntry>, GovernanceError> {
        let snapshot = self.snapshot(syllabus_id).await?;
        Ok(version_timeline(&snapshot, Timestamp::now()))
    }

    /// Register a new university (internal accreditor only)
    pub async fn register_university(
        &self,
        session: &SessionContext,
        candidate: MemberAddress,
    ) -> Result<TxReceipt, GovernanceError> {
        authorize_role(session, GovernanceAction::RegisterUniversity)?;
        let registry = self.registry().await?;
        validate_registration(&candidate, &registry)?;
        let actor = signer(session, GovernanceAction::RegisterUniversity)?;

        debug!(%candidate, "submitting university registration");
        let receipt = self
            .ledger
            .register_university(actor, &candidate)
            .await
            .map_err(submit_error)?;

        let registry = self.registry().await?;
        if !registry.is_university(&candidate) {
            warn!(%candidate, "registration not visible after submission");
            return Err(GovernanceError::stale_snapshot(
                "registered university not visible after submission",
            ));
        }
        info!(%candidate, "university registered");
        Ok(receipt)
    }

    /// Create a syllabus and declare the creator's offering for it
    ///
    /// The creating university evidently offers the course; the follow-up
    /// declaration keeps the offering facts aligned with that.
    pub async fn create_syllabus(
        &self,
        session: &SessionContext,
        course_name: &str,
        content: ContentRef,
    ) -> Result<SyllabusId, GovernanceError> {
        authorize_role(session, GovernanceAction::CreateSyllabus)?;
        validate_new_syllabus(course_name)?;
        let actor = signer(session, GovernanceAction::CreateSyllabus)?;

        debug!(course_name, "submitting syllabus creation");
        let (syllabus_id, _receipt) = self
            .ledger
            .create_syllabus(actor, course_name, &content)
            .await
            .map_err(submit_error)?;

        // Confirm the record landed before declaring the offering.
        self.snapshot(syllabus_id).await?;
        self.declare_offering(session, syllabus_id).await?;
        info!(%syllabus_id, course_name, "syllabus created");
        Ok(syllabus_id)
    }

    /// Declare that the calling university offers the course
    pub async fn declare_offering(
        &self,
        session: &SessionContext,
        syllabus_id: SyllabusId,
    ) -> Result<TxReceipt, GovernanceError> {
        let receipt = self
            .submit(session, GovernanceAction::DeclareOffering, syllabus_id, |actor| {
                self.ledger.declare_offering(actor, syllabus_id)
            })
            .await?;
        self.confirm(syllabus_id, |after| {
            session.address().is_some_and(|actor| after.is_offering(actor))
        })
        .await?;
        Ok(receipt)
    }

    /// Propose a change to the syllabus content
    pub async fn propose_change(
        &self,
        session: &SessionContext,
        syllabus_id: SyllabusId,
        content: ContentRef,
    ) -> Result<TxReceipt, GovernanceError> {
        let receipt = self
            .submit(session, GovernanceAction::CreateProposal, syllabus_id, |actor| {
                self.ledger.create_proposal(actor, syllabus_id, &content)
            })
            .await?;
        self.confirm(syllabus_id, |after| {
            after.phase() == ProposalPhase::Proposed
        })
        .await?;
        Ok(receipt)
    }

    /// Re-propose a prior version's content reference
    pub async fn propose_revert(
        &self,
        session: &SessionContext,
        syllabus_id: SyllabusId,
        version: &VersionEntry,
    ) -> Result<TxReceipt, GovernanceError> {
        self.propose_change(session, syllabus_id, version.content.clone())
            .await
    }

    /// Open the syllabus's live proposal for voting (internal accreditor)
    pub async fn approve_for_voting(
        &self,
        session: &SessionContext,
        syllabus_id: SyllabusId,
    ) -> Result<TxReceipt, GovernanceError> {
        let receipt = self
            .submit(session, GovernanceAction::ApproveForVoting, syllabus_id, |actor| {
                self.ledger.approve_for_voting(actor, syllabus_id)
            })
            .await?;
        self.confirm(syllabus_id, |after| {
            after.phase() == ProposalPhase::ApprovedForVoting
        })
        .await?;
        Ok(receipt)
    }

    /// Vote for the syllabus's live proposal
    pub async fn cast_vote(
        &self,
        session: &SessionContext,
        syllabus_id: SyllabusId,
    ) -> Result<TxReceipt, GovernanceError> {
        let receipt = self
            .submit(session, GovernanceAction::CastVote, syllabus_id, |actor| {
                self.ledger.cast_vote(actor, syllabus_id)
            })
            .await?;
        self.confirm(syllabus_id, |after| {
            session.address().is_some_and(|actor| after.has_voted(actor))
        })
        .await?;
        Ok(receipt)
    }

    /// Execute the syllabus's live proposal (internal accreditor)
    pub async fn execute_proposal(
        &self,
        session: &SessionContext,
        syllabus_id: SyllabusId,
    ) -> Result<TxReceipt, GovernanceError> {
        let receipt = self
            .submit(session, GovernanceAction::ExecuteProposal, syllabus_id, |actor| {
                self.ledger.execute_proposal(actor, syllabus_id)
            })
            .await?;
        self.confirm(syllabus_id, |after| {
            after.phase() == ProposalPhase::Executed
        })
        .await?;
        Ok(receipt)
    }

    /// Validate locally, then submit
    ///
    /// The local gate runs over a fresh snapshot; a failed precondition
    /// rejects here and nothing reaches the ledger.
    async fn submit<'a, F, Fut>(
        &self,
        session: &'a SessionContext,
        action: GovernanceAction,
        syllabus_id: SyllabusId,
        call: F,
    ) -> Result<TxReceipt, GovernanceError>
    where
        F: FnOnce(&'a MemberAddress) -> Fut,
        Fut: std::future::Future<Output = Result<TxReceipt, LedgerError>>,
    {
        let snapshot = self.snapshot(syllabus_id).await?;
        authorize(session, action, &snapshot)?;
        let actor = signer(session, action)?;
        debug!(%action, %syllabus_id, %actor, "submitting transition");
        call(actor).await.map_err(submit_error)
    }

    /// Re-read the post-state and require the transition's effect to be
    /// visible before reporting success
    async fn confirm<F>(
        &self,
        syllabus_id: SyllabusId,
        effect_visible: F,
    ) -> Result<(), GovernanceError>
    where
        F: FnOnce(&GovernanceSnapshot) -> bool,
    {
        let after = self.snapshot(syllabus_id).await?;
        if !effect_visible(&after) {
            warn!(%syllabus_id, "transition effect not visible after submission");
            return Err(GovernanceError::stale_snapshot(
                "submitted transition is not visible in the refetched state",
            ));
        }
        info!(%syllabus_id, "transition confirmed");
        Ok(())
    }
}

fn signer(
    session: &SessionContext,
    action: GovernanceAction,
) -> Result<&MemberAddress, GovernanceError> {
    session.address().ok_or_else(|| {
        GovernanceError::unauthorized(action.to_string(), action.required_role(), Role::None)
    })
}

fn read_error(err: LedgerError) -> GovernanceError {
    GovernanceError::transport(err.to_string())
}

fn submit_error(err: LedgerError) -> GovernanceError {
    match err {
        // The local predicate passed, so a ledger-side refusal means the
        // state moved between snapshot and submission.
        LedgerError::Rejected { reason } => GovernanceError::stale_snapshot(format!(
            "ledger rejected a locally valid transition: {reason}"
        )),
        LedgerError::Unavailable { reason } => GovernanceError::transport(reason),
    }
}

fn malformed(err: TypeError) -> GovernanceError {
    GovernanceError::transport(format!("malformed ledger record: {err}"))
}
