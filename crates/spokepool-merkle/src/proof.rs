//! Sorted-pair Merkle inclusion proofs.
//!
//! Each step hashes the running node with the next sibling, smaller value
//! first, so proofs carry no left/right flags. Trees built by
//! [`MerkleTree`](crate::MerkleTree) follow the same rule.

use sha2::{Digest, Sha256};
use spokepool_types::{Bytes32, VersionedRefundLeaf, constants};

use crate::leaf_hash::leaf_hash;

/// Fold `proof` over `leaf` and return the implied root.
#[must_use]
pub fn process_proof(proof: &[Bytes32], leaf: &Bytes32) -> Bytes32 {
    proof
        .iter()
        .fold(*leaf, |computed, sibling| hash_pair(&computed, sibling))
}

/// Check that `proof` links `leaf` to `root`.
///
/// Proofs longer than [`constants::MAX_PROOF_LEN`] are rejected without hashing.
#[must_use]
pub fn verify_proof(root: &Bytes32, leaf: &Bytes32, proof: &[Bytes32]) -> bool {
    if proof.len() > constants::MAX_PROOF_LEN {
        return false;
    }
    process_proof(proof, leaf) == *root
}

/// Hash `leaf` in its schema's domain and check inclusion under `root`.
#[must_use]
pub fn verify_leaf(leaf: &VersionedRefundLeaf, proof: &[Bytes32], root: &Bytes32) -> bool {
    verify_proof(root, &leaf_hash(leaf), proof)
}

/// Commutative node hash: `SHA-256(min(a, b) || max(a, b))`.
#[must_use]
pub fn hash_pair(a: &Bytes32, b: &Bytes32) -> Bytes32 {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    let mut hasher = Sha256::new();
    hasher.update(lo);
    hasher.update(hi);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}
