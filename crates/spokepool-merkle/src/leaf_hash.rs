//! Canonical refund-leaf hashing.
//!
//! The hash commits to every field in schema order:
//!
//! ```text
//! SHA-256(tag || leaf_id || domain_id || amount_to_return || token
//!         || n_addresses || addresses... || n_amounts || amounts...
//!         [|| fills_refunded_commitment || fills_refunded_digest])
//! ```
//!
//! Integers are little-endian, lengths are `u64`. The tag differs between
//! V1 and V2, so a V1 leaf and a V2 leaf never share a hash even when the
//! V2 commitments are zero.

use sha2::{Digest, Sha256};
use spokepool_types::{Bytes32, RefundLeaf, RefundLeafV2, VersionedRefundLeaf, constants};

/// Hash a leaf in the hashing domain of its schema.
#[must_use]
pub fn leaf_hash(leaf: &VersionedRefundLeaf) -> Bytes32 {
    match leaf {
        VersionedRefundLeaf::V1(leaf) => refund_leaf_hash(leaf),
        VersionedRefundLeaf::V2(leaf) => refund_leaf_v2_hash(leaf),
    }
}

/// Hash a base-schema leaf.
#[must_use]
pub fn refund_leaf_hash(leaf: &RefundLeaf) -> Bytes32 {
    let mut hasher = Sha256::new();
    hasher.update(constants::REFUND_LEAF_V1_TAG);
    update_common(&mut hasher, leaf);
    finalize(hasher)
}

/// Hash an extended-schema leaf.
#[must_use]
pub fn refund_leaf_v2_hash(leaf: &RefundLeafV2) -> Bytes32 {
    let mut hasher = Sha256::new();
    hasher.update(constants::REFUND_LEAF_V2_TAG);
    update_common(&mut hasher, &leaf.leaf);
    hasher.update(leaf.fills_refunded_commitment);
    hasher.update(leaf.fills_refunded_digest);
    finalize(hasher)
}

fn update_common(hasher: &mut Sha256, leaf: &RefundLeaf) {
    hasher.update(leaf.leaf_id.0.to_le_bytes());
    hasher.update(leaf.domain_id.0.to_le_bytes());
    hasher.update(leaf.amount_to_return.to_le_bytes());
    hasher.update(leaf.token.as_bytes());

    hasher.update((leaf.refund_addresses.len() as u64).to_le_bytes());
    for address in &leaf.refund_addresses {
        hasher.update(address.as_bytes());
    }

    hasher.update((leaf.refund_amounts.len() as u64).to_le_bytes());
    for amount in &leaf.refund_amounts {
        hasher.update(amount.to_le_bytes());
    }
}

fn finalize(hasher: Sha256) -> Bytes32 {
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}
