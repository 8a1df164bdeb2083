//! Root bundle: one relayed pair of Merkle commitments.

use serde::{Deserialize, Serialize};

use crate::{BundleId, Bytes32};

/// A relayed root bundle. Immutable once stored in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootBundle {
    /// Position in the registry.
    pub bundle_id: BundleId,
    /// Root of the refund-leaf Merkle tree.
    pub refund_root: Bytes32,
    /// Root of the auxiliary tree. Opaque to the payout path.
    pub auxiliary_root: Bytes32,
}

impl RootBundle {
    /// Hex-encoded refund root, for log lines.
    #[must_use]
    pub fn refund_root_hex(&self) -> String {
        hex::encode(self.refund_root)
    }
}
