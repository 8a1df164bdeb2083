//! Merkle tree builder for producing roots and proofs in tests.
//!
//! Layers are built bottom-up by hashing adjacent pairs with
//! [`hash_pair`]. An unpaired last node is carried to the next layer
//! unchanged, so its proof has no element for that level.

use spokepool_types::{Bytes32, VersionedRefundLeaf};

use crate::{leaf_hash::leaf_hash, proof::hash_pair};

/// An in-memory Merkle tree over leaf hashes.
pub struct MerkleTree {
    /// `layers[0]` holds the leaves, the last layer holds the root.
    layers: Vec<Vec<Bytes32>>,
}

impl MerkleTree {
    /// Build a tree over precomputed leaf hashes.
    #[must_use]
    pub fn new(leaves: Vec<Bytes32>) -> Self {
        let mut layers = vec![leaves];
        while layers.last().is_some_and(|layer| layer.len() > 1) {
            let prev = &layers[layers.len() - 1];
            let next: Vec<Bytes32> = prev
                .chunks(2)
                .map(|pair| match pair {
                    [a, b] => hash_pair(a, b),
                    _ => pair[0],
                })
                .collect();
            layers.push(next);
        }
        Self { layers }
    }

    /// Build a tree over refund leaves, hashing each in its schema's domain.
    #[must_use]
    pub fn from_leaves(leaves: &[VersionedRefundLeaf]) -> Self {
        Self::new(leaves.iter().map(leaf_hash).collect())
    }

    /// The root, or all zeroes for an empty tree.
    #[must_use]
    pub fn root(&self) -> Bytes32 {
        self.layers
            .last()
            .and_then(|layer| layer.first())
            .copied()
            .unwrap_or([0u8; 32])
    }

    /// Number of leaves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers[0].len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers[0].is_empty()
    }

    /// Sibling path for the leaf at `index`, or `None` if out of range.
    #[must_use]
    pub fn proof(&self, index: usize) -> Option<Vec<Bytes32>> {
        if index >= self.len() {
            return None;
        }
        let mut proof = Vec::new();
        let mut idx = index;
        for layer in &self.layers[..self.layers.len() - 1] {
            let sibling = idx ^ 1;
            if sibling < layer.len() {
                proof.push(layer[sibling]);
            }
            idx /= 2;
        }
        Some(proof)
    }
}
