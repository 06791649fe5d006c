//! Raw ledger record encodings
//!
//! The ledger exposes fixed-shape records and encodes absence with zeroed
//! fields (id 0). These types keep that wire encoding; conversion to
//! domain types happens once, at this boundary, so nothing above it ever
//! sees a sentinel.

use cursus_core::{ContentRef, ProposalId, SyllabusId, Timestamp, TypeError};
use cursus_governance::{ProposalRecord, SyllabusRecord};
use serde::{Deserialize, Serialize};

/// Per-syllabus record as the ledger encodes it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSyllabusRecord {
    /// Identifier; 0 means no record exists
    pub id: u64,
    /// Course name
    pub course_name: String,
    /// Content address of the current syllabus content
    pub content: String,
    /// Finalized flag
    pub finalized: bool,
    /// Seconds since epoch of the last content change
    pub last_modified: u64,
}

impl RawSyllabusRecord {
    /// Convert to the domain record; `Ok(None)` when the id-0 sentinel
    /// marks absence
    pub fn into_domain(self) -> Result<Option<SyllabusRecord>, TypeError> {
        let Some(id) = SyllabusId::from_raw(self.id) else {
            return Ok(None);
        };
        Ok(Some(SyllabusRecord {
            id,
            course_name: self.course_name,
            content: ContentRef::new(self.content)?,
            finalized: self.finalized,
            last_modified: Timestamp::from_secs(self.last_modified),
        }))
    }
}

/// Per-syllabus proposal slot as the ledger encodes it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProposalRecord {
    /// Identifier; 0 means the slot is empty
    pub id: u64,
    /// Content address of the proposed replacement content
    pub content: String,
    /// Cached vote tally
    pub vote_count: u32,
    /// Lifetime proposal count for the syllabus
    pub revision_count: u32,
    /// Whether the internal accreditor opened voting
    pub approved_by_internal_accreditor: bool,
    /// Whether the proposal was executed
    pub executed: bool,
}

impl RawProposalRecord {
    /// Convert to the domain record; `Ok(None)` when the id-0 sentinel
    /// marks an empty slot
    pub fn into_domain(self) -> Result<Option<ProposalRecord>, TypeError> {
        let Some(id) = ProposalId::from_raw(self.id) else {
            return Ok(None);
        };
        Ok(Some(ProposalRecord {
            id,
            content: ContentRef::new(self.content)?,
            vote_count: self.vote_count,
            revision_count: self.revision_count,
            approved_by_internal_accreditor: self.approved_by_internal_accreditor,
            executed: self.executed,
        }))
    }
}
