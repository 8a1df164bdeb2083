//! Claim ledger: prevents double payout of a refund leaf.
//!
//! Like a spent-output set: each `(bundle, leaf)` pair can only be claimed
//! once. Attempting to claim it a second time returns
//! [`SpokePoolError::AlreadyClaimed`]. Claims are never cleared.
//!
//! Storage is sparse: 64-bit words keyed by `(bundle, leaf / 64)`. A word
//! exists only once one of its leaves is claimed.

use std::collections::HashMap;

use spokepool_types::{BundleId, LeafId, Result, SpokePoolError};

/// Tracks which leaves have been paid, per bundle.
#[derive(Debug, Default)]
pub struct ClaimLedger {
    /// Claim bits. Bit `leaf % 64` of word `(bundle, leaf / 64)`.
    words: HashMap<(BundleId, u32), u64>,
    /// Total number of claims recorded.
    claimed: usize,
}

impl ClaimLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `leaf_id` has already been claimed under `bundle_id`.
    #[must_use]
    pub fn is_claimed(&self, bundle_id: BundleId, leaf_id: LeafId) -> bool {
        let (word, mask) = Self::position(leaf_id);
        self.words
            .get(&(bundle_id, word))
            .is_some_and(|bits| bits & mask != 0)
    }

    /// Mark a leaf as claimed.
    ///
    /// # Errors
    /// Returns [`SpokePoolError::AlreadyClaimed`] if the pair was already
    /// claimed. The ledger is unchanged in that case.
    pub fn mark_claimed(&mut self, bundle_id: BundleId, leaf_id: LeafId) -> Result<()> {
        if self.is_claimed(bundle_id, leaf_id) {
            return Err(SpokePoolError::AlreadyClaimed { bundle_id, leaf_id });
        }

        let (word, mask) = Self::position(leaf_id);
        *self.words.entry((bundle_id, word)).or_insert(0) |= mask;
        self.claimed += 1;
        Ok(())
    }

    /// Number of claims recorded across all bundles.
    pub fn len(&self) -> usize {
        self.claimed
    }

    pub fn is_empty(&self) -> bool {
        self.claimed == 0
    }

    fn position(leaf_id: LeafId) -> (u32, u64) {
        (leaf_id.0 / 64, 1u64 << (leaf_id.0 % 64))
    }
}
