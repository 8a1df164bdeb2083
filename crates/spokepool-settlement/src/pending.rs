//! Pending settlement: the staged effects of one payout call.
//!
//! Nothing a payout does touches engine state directly. Claims, transfers,
//! bridge outflows and events accumulate here and are applied together by
//! [`SettlementState::commit`](crate::state::SettlementState::commit).
//! Dropping a `PendingSettlement` discards everything it staged.

use serde::Serialize;
use spokepool_types::{Address, Amount, BundleId, LeafId, SpokeEvent};

/// A token movement between two holders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenTransfer {
    pub token: Address,
    pub from: Address,
    pub to: Address,
    pub amount: Amount,
}

/// Tokens leaving this domain (handed to the bridging adapter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenOutflow {
    pub token: Address,
    pub holder: Address,
    pub amount: Amount,
}

/// Staged effects awaiting commit.
#[derive(Debug, Default)]
pub struct PendingSettlement {
    claims: Vec<(BundleId, LeafId)>,
    transfers: Vec<TokenTransfer>,
    outflows: Vec<TokenOutflow>,
    events: Vec<SpokeEvent>,
}

impl PendingSettlement {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a claim on `(bundle_id, leaf_id)`.
    pub fn claim(&mut self, bundle_id: BundleId, leaf_id: LeafId) {
        self.claims.push((bundle_id, leaf_id));
    }

    /// Stage a transfer and its `Transfer` event.
    pub fn transfer(&mut self, transfer: TokenTransfer) {
        self.events.push(SpokeEvent::Transfer {
            token: transfer.token,
            from: transfer.from,
            to: transfer.to,
            amount: transfer.amount,
        });
        self.transfers.push(transfer);
    }

    /// Stage tokens leaving the domain.
    pub fn outflow(&mut self, outflow: TokenOutflow) {
        self.outflows.push(outflow);
    }

    /// Stage an event.
    pub fn emit(&mut self, event: SpokeEvent) {
        self.events.push(event);
    }

    #[must_use]
    pub fn claims(&self) -> &[(BundleId, LeafId)] {
        &self.claims
    }

    #[must_use]
    pub fn transfers(&self) -> &[TokenTransfer] {
        &self.transfers
    }

    #[must_use]
    pub fn outflows(&self) -> &[TokenOutflow] {
        &self.outflows
    }

    #[must_use]
    pub fn events(&self) -> &[SpokeEvent] {
        &self.events
    }

    /// Tokens touched by any staged transfer or outflow, deduplicated.
    #[must_use]
    pub fn touched_tokens(&self) -> Vec<Address> {
        let mut tokens: Vec<Address> = self
            .transfers
            .iter()
            .map(|t| t.token)
            .chain(self.outflows.iter().map(|o| o.token))
            .collect();
        tokens.sort_unstable();
        tokens.dedup();
        tokens
    }

    pub(crate) fn into_events(self) -> Vec<SpokeEvent> {
        self.events
    }
}
