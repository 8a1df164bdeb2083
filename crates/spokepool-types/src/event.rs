//! Observable outcomes of SpokePool calls.
//!
//! Every event carries enough structured data for an off-chain process to
//! reconcile balances without replaying calls. Events are appended to the
//! engine's log only when the call that produced them commits.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Address, Amount, BundleId, Bytes32, DomainId, LeafId, Result};

/// An event emitted by the settlement engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpokeEvent {
    /// A new root bundle was appended to the registry.
    RelayedRootBundle {
        bundle_id: BundleId,
        refund_root: Bytes32,
        auxiliary_root: Bytes32,
    },
    /// The independent fills-pause flag changed.
    PausedFills { is_paused: bool },
    /// Tokens moved from one holder to another.
    Transfer {
        token: Address,
        from: Address,
        to: Address,
        amount: Amount,
    },
    /// The pre-payout hook ran for `token`.
    PrePayoutHookInvoked { token: Address },
    /// The bridging adapter accepted `amount` of `token`.
    BridgingInvoked { amount: Amount, token: Address },
    /// Surplus was forwarded to the parent settlement layer.
    TokensBridged {
        amount_to_return: Amount,
        domain_id: DomainId,
        bundle_id: BundleId,
        token: Address,
        initiator: Address,
    },
    /// Summary of one refund distribution, emitted regardless of amounts.
    RefundsDistributed {
        bundle_id: BundleId,
        domain_id: DomainId,
        token: Address,
        amount_to_return: Amount,
        transfer_count: usize,
        total_refunded: Amount,
    },
    /// A base-schema leaf was executed.
    ExecutedRefundLeaf {
        bundle_id: BundleId,
        leaf_id: LeafId,
        domain_id: DomainId,
        amount_to_return: Amount,
        token: Address,
        refund_addresses: Vec<Address>,
        refund_amounts: Vec<Amount>,
        caller: Address,
    },
    /// An extended-schema leaf was executed.
    ExecutedRefundLeafV2 {
        bundle_id: BundleId,
        leaf_id: LeafId,
        domain_id: DomainId,
        amount_to_return: Amount,
        token: Address,
        refund_addresses: Vec<Address>,
        refund_amounts: Vec<Amount>,
        fills_refunded_commitment: Bytes32,
        fills_refunded_digest: Bytes32,
        caller: Address,
    },
}

impl SpokeEvent {
    /// Short event name, stable across versions.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::RelayedRootBundle { .. } => "RELAYED_ROOT_BUNDLE",
            Self::PausedFills { .. } => "PAUSED_FILLS",
            Self::Transfer { .. } => "TRANSFER",
            Self::PrePayoutHookInvoked { .. } => "PRE_PAYOUT_HOOK_INVOKED",
            Self::BridgingInvoked { .. } => "BRIDGING_INVOKED",
            Self::TokensBridged { .. } => "TOKENS_BRIDGED",
            Self::RefundsDistributed { .. } => "REFUNDS_DISTRIBUTED",
            Self::ExecutedRefundLeaf { .. } => "EXECUTED_REFUND_LEAF",
            Self::ExecutedRefundLeafV2 { .. } => "EXECUTED_REFUND_LEAF_V2",
        }
    }
}

impl fmt::Display for SpokeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An event as stored in the engine's append-only log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the log, starting at 0.
    pub sequence: u64,
    /// When the producing call committed.
    pub recorded_at: DateTime<Utc>,
    pub event: SpokeEvent,
}

impl EventRecord {
    /// JSON encoding for off-chain reconciliation.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
