//! # spokepool-merkle
//!
//! **Pure commitment verification for SpokePool.**
//!
//! Given a refund leaf, an inclusion proof, and a relayed refund root, this
//! crate answers one question: is the leaf committed under the root? It has:
//!
//! - **Zero side effects**: no state, no I/O
//! - **Schema-separated hashing**: V1 and V2 leaves hash under distinct tags
//! - **Order sensitivity**: any field change or array reordering changes the hash

pub mod leaf_hash;
pub mod proof;
#[cfg(any(test, feature = "test-helpers"))]
pub mod tree;

pub use leaf_hash::{leaf_hash, refund_leaf_hash, refund_leaf_v2_hash};
pub use proof::{hash_pair, process_proof, verify_leaf, verify_proof};
#[cfg(any(test, feature = "test-helpers"))]
pub use tree::MerkleTree;
