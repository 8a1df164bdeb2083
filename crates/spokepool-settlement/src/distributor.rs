//! Refund distributor.
//!
//! Turns a validated payout into staged effects:
//! 1. Check addresses and amounts line up
//! 2. Check the vault covers every refund plus the surplus
//! 3. Stage one vault transfer per strictly-positive refund
//! 4. If `amount_to_return > 0`, hand the surplus to the bridging adapter
//! 5. Stage the per-invocation `RefundsDistributed` summary
//!
//! Zero refunds produce no transfer and no event. A recipient listed
//! twice receives two independent transfers.

use serde::Serialize;
use spokepool_types::{
    Address, Amount, BundleId, DomainId, RefundLeaf, Result, SpokeEvent, SpokePoolError,
};

use crate::{
    bridge::BridgeAdapter,
    pending::{PendingSettlement, TokenOutflow, TokenTransfer},
};

/// Inputs of one distribution, in the order the operation takes them.
#[derive(Debug, Clone, Copy)]
pub struct RefundPayout<'a> {
    pub domain_id: DomainId,
    pub amount_to_return: Amount,
    pub refund_amounts: &'a [Amount],
    pub bundle_id: BundleId,
    pub token: Address,
    pub refund_addresses: &'a [Address],
}

impl<'a> RefundPayout<'a> {
    /// Payout described by a leaf executed under `bundle_id`.
    #[must_use]
    pub fn from_leaf(leaf: &'a RefundLeaf, bundle_id: BundleId) -> Self {
        Self {
            domain_id: leaf.domain_id,
            amount_to_return: leaf.amount_to_return,
            refund_amounts: &leaf.refund_amounts,
            bundle_id,
            token: leaf.token,
            refund_addresses: &leaf.refund_addresses,
        }
    }

    /// Total the vault must hold: positive refunds plus the surplus.
    pub fn required_balance(&self) -> Result<Amount> {
        self.refund_amounts
            .iter()
            .try_fold(self.amount_to_return, |acc, amount| acc.checked_add(*amount))
            .ok_or(SpokePoolError::AmountOverflow)
    }
}

/// What a distribution staged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DistributionSummary {
    /// Transfers staged (strictly-positive refunds).
    pub transfer_count: usize,
    /// Sum of staged refund transfers.
    pub total_refunded: Amount,
    /// Surplus handed to the bridge, zero if the hook did not fire.
    pub bridged: Amount,
}

/// Stages refund transfers out of the vault and fires the bridging hook.
pub struct RefundDistributor<'a> {
    vault: Address,
    bridge: &'a dyn BridgeAdapter,
}

impl<'a> RefundDistributor<'a> {
    #[must_use]
    pub fn new(vault: Address, bridge: &'a dyn BridgeAdapter) -> Self {
        Self { vault, bridge }
    }

    /// Stage a payout into `pending`.
    ///
    /// `vault_balance` is the vault's current balance of `payout.token`.
    /// The balance check runs before the bridging adapter is called, so an
    /// underfunded vault never reaches the adapter.
    ///
    /// # Errors
    /// - `InvalidLeafShape` if addresses and amounts differ in length
    /// - `AmountOverflow` if the required total overflows
    /// - `InsufficientBalance` if the vault cannot cover the payout
    /// - `BridgingFailed` if the adapter rejects the surplus
    pub fn distribute(
        &self,
        payout: &RefundPayout<'_>,
        vault_balance: Amount,
        initiator: Address,
        pending: &mut PendingSettlement,
    ) -> Result<DistributionSummary> {
        if payout.refund_addresses.len() != payout.refund_amounts.len() {
            return Err(SpokePoolError::InvalidLeafShape {
                addresses: payout.refund_addresses.len(),
                amounts: payout.refund_amounts.len(),
            });
        }

        let required = payout.required_balance()?;
        if vault_balance < required {
            return Err(SpokePoolError::InsufficientBalance {
                holder: self.vault,
                token: payout.token,
                needed: required,
                available: vault_balance,
            });
        }

        let mut summary = DistributionSummary {
            transfer_count: 0,
            total_refunded: 0,
            bridged: 0,
        };

        for (recipient, amount) in payout
            .refund_addresses
            .iter()
            .zip(payout.refund_amounts)
            .filter(|(_, amount)| **amount > 0)
        {
            pending.transfer(TokenTransfer {
                token: payout.token,
                from: self.vault,
                to: *recipient,
                amount: *amount,
            });
            summary.transfer_count += 1;
            // Bounded by `required`, which did not overflow.
            summary.total_refunded += *amount;

            tracing::debug!(
                bundle = payout.bundle_id.0,
                recipient = %recipient.short(),
                amount = %amount,
                "Refund staged"
            );
        }

        if payout.amount_to_return > 0 {
            self.bridge
                .send(payout.amount_to_return, payout.token)
                .map_err(|e| SpokePoolError::BridgingFailed {
                    reason: e.to_string(),
                })?;

            pending.outflow(TokenOutflow {
                token: payout.token,
                holder: self.vault,
                amount: payout.amount_to_return,
            });
            pending.emit(SpokeEvent::BridgingInvoked {
                amount: payout.amount_to_return,
                token: payout.token,
            });
            pending.emit(SpokeEvent::TokensBridged {
                amount_to_return: payout.amount_to_return,
                domain_id: payout.domain_id,
                bundle_id: payout.bundle_id,
                token: payout.token,
                initiator,
            });
            summary.bridged = payout.amount_to_return;

            tracing::info!(
                bundle = payout.bundle_id.0,
                token = %payout.token,
                amount = %payout.amount_to_return,
                "Surplus bridged to parent layer"
            );
        }

        pending.emit(SpokeEvent::RefundsDistributed {
            bundle_id: payout.bundle_id,
            domain_id: payout.domain_id,
            token: payout.token,
            amount_to_return: payout.amount_to_return,
            transfer_count: summary.transfer_count,
            total_refunded: summary.total_refunded,
        });

        Ok(summary)
    }
}
