//! Refund leaf schemas.
//!
//! A refund leaf is one payout instruction inside a relayed root bundle.
//! Two schema versions exist and they hash into separate domains:
//!
//! - **V1** ([`RefundLeaf`]): base fields only.
//! - **V2** ([`RefundLeafV2`]): base fields plus two opaque commitments over
//!   the fills being refunded. The payout path never interprets them, it only
//!   hashes them and echoes them in the executed-leaf event.
//!
//! [`VersionedRefundLeaf`] is the tagged variant the engine dispatches on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Address, Amount, Bytes32, DomainId, LeafId};

/// Schema version of a refund leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeafSchema {
    V1,
    V2,
}

impl fmt::Display for LeafSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => write!(f, "V1"),
            Self::V2 => write!(f, "V2"),
        }
    }
}

/// Base refund leaf.
///
/// `refund_amounts[i]` pairs with `refund_addresses[i]`. Zero amounts are
/// legal and skipped at payout. `amount_to_return` is the surplus to forward
/// to the parent layer and is not tied to the sum of refunds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundLeaf {
    pub leaf_id: LeafId,
    pub domain_id: DomainId,
    pub amount_to_return: Amount,
    pub token: Address,
    pub refund_addresses: Vec<Address>,
    pub refund_amounts: Vec<Amount>,
}

impl RefundLeaf {
    /// Whether addresses and amounts have matching lengths.
    #[must_use]
    pub fn has_consistent_shape(&self) -> bool {
        self.refund_addresses.len() == self.refund_amounts.len()
    }
}

/// Extended refund leaf carrying commitments over the refunded fills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundLeafV2 {
    pub leaf: RefundLeaf,
    pub fills_refunded_commitment: Bytes32,
    pub fills_refunded_digest: Bytes32,
}

/// A refund leaf tagged with its schema version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionedRefundLeaf {
    V1(RefundLeaf),
    V2(RefundLeafV2),
}

impl VersionedRefundLeaf {
    /// The fields shared by every schema.
    #[must_use]
    pub fn common(&self) -> &RefundLeaf {
        match self {
            Self::V1(leaf) => leaf,
            Self::V2(v2) => &v2.leaf,
        }
    }

    #[must_use]
    pub fn schema(&self) -> LeafSchema {
        match self {
            Self::V1(_) => LeafSchema::V1,
            Self::V2(_) => LeafSchema::V2,
        }
    }
}

impl From<RefundLeaf> for VersionedRefundLeaf {
    fn from(leaf: RefundLeaf) -> Self {
        Self::V1(leaf)
    }
}

impl From<RefundLeafV2> for VersionedRefundLeaf {
    fn from(leaf: RefundLeafV2) -> Self {
        Self::V2(leaf)
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl RefundLeaf {
    /// Build a leaf from `(recipient, amount)` pairs.
    #[must_use]
    pub fn dummy(
        leaf_id: u32,
        domain_id: u64,
        amount_to_return: Amount,
        token: Address,
        refunds: &[(Address, Amount)],
    ) -> Self {
        Self {
            leaf_id: LeafId(leaf_id),
            domain_id: DomainId(domain_id),
            amount_to_return,
            token,
            refund_addresses: refunds.iter().map(|(addr, _)| *addr).collect(),
            refund_amounts: refunds.iter().map(|(_, amount)| *amount).collect(),
        }
    }
}
