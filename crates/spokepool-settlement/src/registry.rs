//! Root bundle registry.
//!
//! An append-only sequence of relayed commitments. The bundle id is the
//! position in the sequence, so ids start at 0 and increase by one per
//! relay. Bundles are never mutated or removed: a proof against an old
//! bundle stays checkable forever.

use spokepool_types::{BundleId, Bytes32, Result, RootBundle, SpokePoolError};

/// Append-only store of relayed root bundles.
#[derive(Debug, Default)]
pub struct RootBundleRegistry {
    bundles: Vec<RootBundle>,
}

impl RootBundleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bundle and return its id. Root contents are not validated.
    pub fn relay(&mut self, refund_root: Bytes32, auxiliary_root: Bytes32) -> Result<RootBundle> {
        let bundle_id = u32::try_from(self.bundles.len())
            .map(BundleId)
            .map_err(|_| SpokePoolError::Internal("bundle id space exhausted".into()))?;
        let bundle = RootBundle {
            bundle_id,
            refund_root,
            auxiliary_root,
        };
        self.bundles.push(bundle);
        Ok(bundle)
    }

    /// Look up a bundle by id.
    #[must_use]
    pub fn get(&self, bundle_id: BundleId) -> Option<&RootBundle> {
        self.bundles.get(bundle_id.0 as usize)
    }

    /// Number of relayed bundles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}
