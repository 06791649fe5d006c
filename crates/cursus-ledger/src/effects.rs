//! Ledger effect traits
//!
//! Pure interface signatures for the external ledger collaborator. Reads
//! are idempotent and side-effect-free; writes are submit-then-confirm
//! transactions whose durable effect must be re-read before being trusted.
//! Implementations live outside this crate (a contract transport in
//! production, `cursus_testkit::FakeLedger` in tests).

use crate::errors::LedgerError;
use crate::records::{RawProposalRecord, RawSyllabusRecord};
use async_trait::async_trait;
use cursus_core::{ContentRef, MemberAddress, SyllabusId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Confirmation handle for a submitted transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Opaque transaction reference assigned by the ledger
    pub reference: String,
}

/// Read operations exposed by the ledger
#[async_trait]
pub trait LedgerReads: Send + Sync {
    /// Enumerate registered universities, in registration order
    async fn universities(&self) -> Result<Vec<MemberAddress>, LedgerError>;

    /// The fixed internal-accreditor identity
    async fn internal_accreditor(&self) -> Result<MemberAddress, LedgerError>;

    /// The fixed external-accreditor identity
    async fn external_accreditor(&self) -> Result<MemberAddress, LedgerError>;

    /// Number of syllabi ever created
    async fn syllabus_count(&self) -> Result<u64, LedgerError>;

    /// Per-syllabus record; id 0 in the result marks absence
    async fn syllabus(&self, syllabus_id: u64) -> Result<RawSyllabusRecord, LedgerError>;

    /// Per-syllabus proposal slot; id 0 in the result marks an empty slot
    async fn proposal(&self, syllabus_id: u64) -> Result<RawProposalRecord, LedgerError>;

    /// Whether `university` declared it offers the syllabus's course
    async fn is_offering(
        &self,
        syllabus_id: u64,
        university: &MemberAddress,
    ) -> Result<bool, LedgerError>;

    /// Whether `university` voted on the syllabus's live proposal
    async fn has_voted(
        &self,
        syllabus_id: u64,
        university: &MemberAddress,
    ) -> Result<bool, LedgerError>;
}

/// Write operations accepted by the ledger
///
/// `actor` is the transaction signer. The ledger enforces its own
/// authorization and precondition checks independently of this engine's
/// local gates; a refusal surfaces as [`LedgerError::Rejected`].
#[async_trait]
pub trait LedgerWrites: Send + Sync {
    /// Register a new university (internal accreditor only)
    async fn register_university(
        &self,
        actor: &MemberAddress,
        candidate: &MemberAddress,
    ) -> Result<TxReceipt, LedgerError>;

    /// Create a syllabus and return its assigned id
    async fn create_syllabus(
        &self,
        actor: &MemberAddress,
        course_name: &str,
        content: &ContentRef,
    ) -> Result<(SyllabusId, TxReceipt), LedgerError>;

    /// Declare that `actor` offers the course
    async fn declare_offering(
        &self,
        actor: &MemberAddress,
        syllabus_id: SyllabusId,
    ) -> Result<TxReceipt, LedgerError>;

    /// Create a change proposal for the syllabus
    async fn create_proposal(
        &self,
        actor: &MemberAddress,
        syllabus_id: SyllabusId,
        content: &ContentRef,
    ) -> Result<TxReceipt, LedgerError>;

    /// Open the syllabus's live proposal for voting
    async fn approve_for_voting(
        &self,
        actor: &MemberAddress,
        syllabus_id: SyllabusId,
    ) -> Result<TxReceipt, LedgerError>;

    /// Vote for the syllabus's live proposal
    async fn cast_vote(
        &self,
        actor: &MemberAddress,
        syllabus_id: SyllabusId,
    ) -> Result<TxReceipt, LedgerError>;

    /// Execute the syllabus's live proposal
    async fn execute_proposal(
        &self,
        actor: &MemberAddress,
        syllabus_id: SyllabusId,
    ) -> Result<TxReceipt, LedgerError>;
}

#[async_trait]
impl<T: LedgerReads + ?Sized> LedgerReads for Arc<T> {
    async fn universities(&self) -> Result<Vec<MemberAddress>, LedgerError> {
        (**self).universities().await
    }

    async fn internal_accreditor(&self) -> Result<MemberAddress, LedgerError> {
        (**self).internal_accreditor().await
    }

    async fn external_accreditor(&self) -> Result<MemberAddress, LedgerError> {
        (**self).external_accreditor().await
    }

    async fn syllabus_count(&self) -> Result<u64, LedgerError> {
        (**self).syllabus_count().await
    }

    async fn syllabus(&self, syllabus_id: u64) -> Result<RawSyllabusRecord, LedgerError> {
        (**self).syllabus(syllabus_id).await
    }

    async fn proposal(&self, syllabus_id: u64) -> Result<RawProposalRecord, LedgerError> {
        (**self).proposal(syllabus_id).await
    }

    async fn is_offering(
        &self,
        syllabus_id: u64,
        university: &MemberAddress,
    ) -> Result<bool, LedgerError> {
        (**self).is_offering(syllabus_id, university).await
    }

    async fn has_voted(
        &self,
        syllabus_id: u64,
        university: &MemberAddress,
    ) -> Result<bool, LedgerError> {
        (**self).has_voted(syllabus_id, university).await
    }
}

#[async_trait]
impl<T: LedgerWrites + ?Sized> LedgerWrites for Arc<T> {
    async fn register_university(
        &self,
        actor: &MemberAddress,
        candidate: &MemberAddress,
    ) -> Result<TxReceipt, LedgerError> {
        (**self).register_university(actor, candidate).await
    }

    async fn create_syllabus(
        &self,
        actor: &MemberAddress,
        course_name: &str,
        content: &ContentRef,
    ) -> Result<(SyllabusId, TxReceipt), LedgerError> {
        (**self).create_syllabus(actor, course_name, content).await
    }

    async fn declare_offering(
        &self,
        actor: &MemberAddress,
        syllabus_id: SyllabusId,
    ) -> Result<TxReceipt, LedgerError> {
        (**self).declare_offering(actor, syllabus_id).await
    }

    async fn create_proposal(
        &self,
        actor: &MemberAddress,
        syllabus_id: SyllabusId,
        content: &ContentRef,
    ) -> Result<TxReceipt, LedgerError> {
        (**self).create_proposal(actor, syllabus_id, content).await
    }

    async fn approve_for_voting(
        &self,
        actor: &MemberAddress,
        syllabus_id: SyllabusId,
    ) -> Result<TxReceipt, LedgerError> {
        (**self).approve_for_voting(actor, syllabus_id).await
    }

    async fn cast_vote(
        &self,
        actor: &MemberAddress,
        syllabus_id: SyllabusId,
    ) -> Result<TxReceipt, LedgerError> {
        (**self).cast_vote(actor, syllabus_id).await
    }

    async fn execute_proposal(
        &self,
        actor: &MemberAddress,
        syllabus_id: SyllabusId,
    ) -> Result<TxReceipt, LedgerError> {
        (**self).execute_proposal(actor, syllabus_id).await
    }
}
