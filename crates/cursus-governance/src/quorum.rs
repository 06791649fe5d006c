//! Quorum arithmetic
//!
//! Two thresholds gate the proposal lifecycle:
//!
//! - **Offering quorum**: a strict majority of all registered universities
//!   must offer a course before changes to it can be proposed
//!   (`offering > total / 2`, ties fail).
//! - **Execution quorum**: a majority of all registered members (not just
//!   offerers) must vote before a proposal can execute
//!   (`votes >= ceil((total + 1) / 2)`, computed as `2 * votes >= total + 1`
//!   to avoid rounding ambiguity).
//!
//! An empty consortium can never reach quorum: both predicates are false
//! when `total == 0`.

/// Whether enough universities offer the course to permit proposals
pub fn offering_quorum_met(offering_count: usize, total_universities: usize) -> bool {
    total_universities > 0 && offering_count * 2 > total_universities
}

/// Whether enough members voted to permit execution
pub fn execution_quorum_met(vote_count: usize, total_universities: usize) -> bool {
    total_universities > 0 && vote_count * 2 >= total_universities + 1
}

/// Smallest count that constitutes a strict majority of `total` members
///
/// Both quorums resolve to this count: `total / 2 + 1`. Used by call sites
/// to explain how far an action is from becoming available.
pub fn strict_majority_threshold(total_universities: usize) -> usize {
    total_universities / 2 + 1
}
