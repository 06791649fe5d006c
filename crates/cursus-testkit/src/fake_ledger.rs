//! In-memory ledger
//!
//! Implements both ledger effect traits with the semantics the live
//! contract enforces on its side: proposals keyed by syllabus id,
//! monotonic offering and vote facts, and its own authorization and quorum
//! checks independent of the engine's local gates. A violated check
//! surfaces as [`LedgerError::Rejected`], which is how stale-snapshot
//! behavior is exercised in tests.
//!
//! Test hooks cover the remaining failure modes: `set_offline` makes every
//! call fail with `Unavailable`, `drop_next_write` accepts a transaction
//! without applying its effect (a submission whose durable effect never
//! lands), and `set_cached_vote_count` desynchronizes the cached tally
//! from the vote facts.

use async_trait::async_trait;
use cursus_core::{ContentRef, MemberAddress, SyllabusId};
use cursus_ledger::{
    LedgerError, LedgerReads, LedgerWrites, RawProposalRecord, RawSyllabusRecord, TxReceipt,
};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
struct ProposalSlot {
    record: RawProposalRecord,
    voters: BTreeSet<MemberAddress>,
}

#[derive(Debug, Clone)]
struct SyllabusSlot {
    record: RawSyllabusRecord,
    proposal: Option<ProposalSlot>,
    offering: BTreeSet<MemberAddress>,
}

#[derive(Debug)]
struct State {
    universities: Vec<MemberAddress>,
    internal: MemberAddress,
    external: MemberAddress,
    syllabi: BTreeMap<u64, SyllabusSlot>,
    next_syllabus: u64,
    next_proposal: u64,
    next_tx: u64,
    now: u64,
    offline: bool,
    drop_next_write: bool,
    write_attempts: u64,
}

/// In-memory ledger for tests
#[derive(Debug)]
pub struct FakeLedger {
    state: Mutex<State>,
}

impl FakeLedger {
    /// Seed a ledger with a registered consortium
    pub fn new(
        universities: Vec<MemberAddress>,
        internal: MemberAddress,
        external: MemberAddress,
    ) -> Self {
        Self {
            state: Mutex::new(State {
                universities,
                internal,
                external,
                syllabi: BTreeMap::new(),
                next_syllabus: 1,
                next_proposal: 1,
                next_tx: 1,
                now: 1_700_000_000,
                offline: false,
                drop_next_write: false,
                write_attempts: 0,
            }),
        }
    }

    /// Make every subsequent call fail with `Unavailable`
    pub fn set_offline(&self, offline: bool) {
        self.state.lock().offline = offline;
    }

    /// Accept the next write without applying its effect
    pub fn drop_next_write(&self) {
        self.state.lock().drop_next_write = true;
    }

    /// Advance the ledger clock
    pub fn advance_time(&self, secs: u64) {
        self.state.lock().now += secs;
    }

    /// Desynchronize the cached vote tally from the vote facts
    pub fn set_cached_vote_count(&self, syllabus_id: SyllabusId, count: u32) {
        let mut state = self.state.lock();
        if let Some(slot) = state.syllabi.get_mut(&syllabus_id.to_raw()) {
            if let Some(proposal) = slot.proposal.as_mut() {
                proposal.record.vote_count = count;
            }
        }
    }

    /// Number of write transactions that reached the ledger
    pub fn write_attempts(&self) -> u64 {
        self.state.lock().write_attempts
    }
}

impl State {
    fn check_online(&self) -> Result<(), LedgerError> {
        if self.offline {
            return Err(LedgerError::unavailable("ledger endpoint unreachable"));
        }
        Ok(())
    }

    /// Record a write attempt; returns false when the transaction is
    /// accepted but its effect dropped
    fn begin_write(&mut self) -> Result<bool, LedgerError> {
        self.check_online()?;
        self.write_attempts += 1;
        if self.drop_next_write {
            self.drop_next_write = false;
            return Ok(false);
        }
        Ok(true)
    }

    fn receipt(&mut self) -> TxReceipt {
        let reference = format!("0xtx{:08x}", self.next_tx);
        self.next_tx += 1;
        TxReceipt { reference }
    }

    fn require_member(&self, actor: &MemberAddress) -> Result<(), LedgerError> {
        if !self.universities.contains(actor) {
            return Err(LedgerError::rejected("caller is not a registered university"));
        }
        Ok(())
    }

    fn require_internal(&self, actor: &MemberAddress) -> Result<(), LedgerError> {
        if *actor != self.internal {
            return Err(LedgerError::rejected("caller is not the internal accreditor"));
        }
        Ok(())
    }

    fn slot(&self, syllabus_id: u64) -> Result<&SyllabusSlot, LedgerError> {
        self.syllabi
            .get(&syllabus_id)
            .ok_or_else(|| LedgerError::rejected("no such syllabus"))
    }

    fn slot_mut(&mut self, syllabus_id: u64) -> Result<&mut SyllabusSlot, LedgerError> {
        self.syllabi
            .get_mut(&syllabus_id)
            .ok_or_else(|| LedgerError::rejected("no such syllabus"))
    }
}

#[async_trait]
impl LedgerReads for FakeLedger {
    async fn universities(&self) -> Result<Vec<MemberAddress>, LedgerError> {
        let state = self.state.lock();
        state.check_online()?;
        Ok(state.universities.clone())
    }

    async fn internal_accreditor(&self) -> Result<MemberAddress, LedgerError> {
        let state = self.state.lock();
        state.check_online()?;
        Ok(state.internal.clone())
    }

    async fn external_accreditor(&self) -> Result<MemberAddress, LedgerError> {
        let state = self.state.lock();
        state.check_online()?;
        Ok(state.external.clone())
    }

    async fn syllabus_count(&self) -> Result<u64, LedgerError> {
        let state = self.state.lock();
        state.check_online()?;
        Ok(state.next_syllabus - 1)
    }

    async fn syllabus(&self, syllabus_id: u64) -> Result<RawSyllabusRecord, LedgerError> {
        let state = self.state.lock();
        state.check_online()?;
        Ok(state
            .syllabi
            .get(&syllabus_id)
            .map(|slot| slot.record.clone())
            .unwrap_or_default())
    }

    async fn proposal(&self, syllabus_id: u64) -> Result<RawProposalRecord, LedgerError> {
        let state = self.state.lock();
        state.check_online()?;
        Ok(state
            .syllabi
            .get(&syllabus_id)
            .and_then(|slot| slot.proposal.as_ref())
            .map(|proposal| proposal.record.clone())
            .unwrap_or_default())
    }

    async fn is_offering(
        &self,
        syllabus_id: u64,
        university: &MemberAddress,
    ) -> Result<bool, LedgerError> {
        let state = self.state.lock();
        state.check_online()?;
        Ok(state
            .syllabi
            .get(&syllabus_id)
            .is_some_and(|slot| slot.offering.contains(university)))
    }

    async fn has_voted(
        &self,
        syllabus_id: u64,
        university: &MemberAddress,
    ) -> Result<bool, LedgerError> {
        let state = self.state.lock();
        state.check_online()?;
        Ok(state
            .syllabi
            .get(&syllabus_id)
            .and_then(|slot| slot.proposal.as_ref())
            .is_some_and(|proposal| proposal.voters.contains(university)))
    }
}

#[async_trait]
impl LedgerWrites for FakeLedger {
    async fn register_university(
        &self,
        actor: &MemberAddress,
        candidate: &MemberAddress,
    ) -> Result<TxReceipt, LedgerError> {
        let mut state = self.state.lock();
        let apply = state.begin_write()?;
        state.require_internal(actor)?;
        if state.universities.contains(candidate) {
            return Err(LedgerError::rejected("university already registered"));
        }
        if apply {
            state.universities.push(candidate.clone());
        }
        Ok(state.receipt())
    }

    async fn create_syllabus(
        &self,
        actor: &MemberAddress,
        course_name: &str,
        content: &ContentRef,
    ) -> Result<(SyllabusId, TxReceipt), LedgerError> {
        let mut state = self.state.lock();
        let apply = state.begin_write()?;
        state.require_member(actor)?;
        if course_name.is_empty() {
            return Err(LedgerError::rejected("course name must not be empty"));
        }
        let id = state.next_syllabus;
        if apply {
            let record = RawSyllabusRecord {
                id,
                course_name: course_name.to_string(),
                content: content.as_str().to_string(),
                finalized: false,
                last_modified: state.now,
            };
            state.syllabi.insert(
                id,
                SyllabusSlot {
                    record,
                    proposal: None,
                    offering: BTreeSet::new(),
                },
            );
            state.next_syllabus += 1;
        }
        let receipt = state.receipt();
        let id = SyllabusId::from_raw(id).ok_or_else(|| {
            LedgerError::rejected("ledger assigned the reserved zero identifier")
        })?;
        Ok((id, receipt))
    }

    async fn declare_offering(
        &self,
        actor: &MemberAddress,
        syllabus_id: SyllabusId,
    ) -> Result<TxReceipt, LedgerError> {
        let mut state = self.state.lock();
        let apply = state.begin_write()?;
        state.require_member(actor)?;
        let slot = state.slot(syllabus_id.to_raw())?;
        if slot.offering.contains(actor) {
            return Err(LedgerError::rejected("university already offers this course"));
        }
        if apply {
            state
                .slot_mut(syllabus_id.to_raw())?
                .offering
                .insert(actor.clone());
        }
        Ok(state.receipt())
    }

    async fn create_proposal(
        &self,
        actor: &MemberAddress,
        syllabus_id: SyllabusId,
        content: &ContentRef,
    ) -> Result<TxReceipt, LedgerError> {
        let mut state = self.state.lock();
        let apply = state.begin_write()?;
        state.require_member(actor)?;
        let total = state.universities.len();
        let slot = state.slot(syllabus_id.to_raw())?;
        if !slot.offering.contains(actor) {
            return Err(LedgerError::rejected("caller does not offer this course"));
        }
        if slot.offering.len() * 2 <= total {
            return Err(LedgerError::rejected(
                "not enough universities offer this course",
            ));
        }
        if slot
            .proposal
            .as_ref()
            .is_some_and(|proposal| !proposal.record.executed)
        {
            return Err(LedgerError::rejected("a live proposal already exists"));
        }
        let revision_count = slot
            .proposal
            .as_ref()
            .map(|proposal| proposal.record.revision_count)
            .unwrap_or(0)
            + 1;
        if apply {
            let id = state.next_proposal;
            state.next_proposal += 1;
            let record = RawProposalRecord {
                id,
                content: content.as_str().to_string(),
                vote_count: 0,
                revision_count,
                approved_by_internal_accreditor: false,
                executed: false,
            };
            state.slot_mut(syllabus_id.to_raw())?.proposal = Some(ProposalSlot {
                record,
                voters: BTreeSet::new(),
            });
        }
        Ok(state.receipt())
    }

    async fn approve_for_voting(
        &self,
        actor: &MemberAddress,
        syllabus_id: SyllabusId,
    ) -> Result<TxReceipt, LedgerError> {
        let mut state = self.state.lock();
        let apply = state.begin_write()?;
        state.require_internal(actor)?;
        let slot = state.slot_mut(syllabus_id.to_raw())?;
        let proposal = slot
            .proposal
            .as_mut()
            .ok_or_else(|| LedgerError::rejected("no proposal exists"))?;
        if proposal.record.executed {
            return Err(LedgerError::rejected("proposal already executed"));
        }
        if proposal.record.approved_by_internal_accreditor {
            return Err(LedgerError::rejected("proposal already approved"));
        }
        if apply {
            proposal.record.approved_by_internal_accreditor = true;
        }
        Ok(state.receipt())
    }

    async fn cast_vote(
        &self,
        actor: &MemberAddress,
        syllabus_id: SyllabusId,
    ) -> Result<TxReceipt, LedgerError> {
        let mut state = self.state.lock();
        let apply = state.begin_write()?;
        state.require_member(actor)?;
        let slot = state.slot_mut(syllabus_id.to_raw())?;
        if !slot.offering.contains(actor) {
            return Err(LedgerError::rejected("caller does not offer this course"));
        }
        let proposal = slot
            .proposal
            .as_mut()
            .ok_or_else(|| LedgerError::rejected("no proposal exists"))?;
        if !proposal.record.approved_by_internal_accreditor {
            return Err(LedgerError::rejected("voting is not open"));
        }
        if proposal.record.executed {
            return Err(LedgerError::rejected("proposal already executed"));
        }
        if proposal.voters.contains(actor) {
            return Err(LedgerError::rejected("caller already voted"));
        }
        if apply {
            proposal.voters.insert(actor.clone());
            proposal.record.vote_count += 1;
        }
        Ok(state.receipt())
    }

    async fn execute_proposal(
        &self,
        actor: &MemberAddress,
        syllabus_id: SyllabusId,
    ) -> Result<TxReceipt, LedgerError> {
        let mut state = self.state.lock();
        let apply = state.begin_write()?;
        state.require_internal(actor)?;
        let total = state.universities.len();
        let now = state.now;
        let slot = state.slot_mut(syllabus_id.to_raw())?;
        let proposal = slot
            .proposal
            .as_mut()
            .ok_or_else(|| LedgerError::rejected("no proposal exists"))?;
        if !proposal.record.approved_by_internal_accreditor {
            return Err(LedgerError::rejected("voting is not open"));
        }
        if proposal.record.executed {
            return Err(LedgerError::rejected("proposal already executed"));
        }
        if (proposal.voters.len() * 2) < total + 1 {
            return Err(LedgerError::rejected("execution quorum not met"));
        }
        if apply {
            proposal.record.executed = true;
            let new_content = proposal.record.content.clone();
            slot.record.content = new_content;
            slot.record.last_modified = now;
        }
        Ok(state.receipt())
    }
}
