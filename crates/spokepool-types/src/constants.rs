//! System-wide constants for the SpokePool settlement engine.

/// Hashing domain tag for base-schema refund leaves.
pub const REFUND_LEAF_V1_TAG: &[u8] = b"spokepool:refund_leaf:v1:";

/// Hashing domain tag for extended-schema refund leaves.
pub const REFUND_LEAF_V2_TAG: &[u8] = b"spokepool:refund_leaf:v2:";

/// Longest accepted inclusion proof. Covers trees of up to 2^64 leaves.
pub const MAX_PROOF_LEN: usize = 64;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
