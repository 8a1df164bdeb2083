//! Mutable engine state and the all-or-nothing commit.

use chrono::Utc;
use spokepool_types::{Address, Amount, EventRecord, Result, SpokeEvent, SpokePoolError};

use crate::{
    claim_ledger::ClaimLedger, pending::PendingSettlement, token_ledger::TokenLedger,
    vault_accounting::VaultAccounting,
};

/// Everything a committed call can change, apart from the bundle registry.
#[derive(Debug)]
pub struct SettlementState {
    vault: Address,
    pub(crate) ledger: TokenLedger,
    pub(crate) claims: ClaimLedger,
    pub(crate) accounting: VaultAccounting,
    pub(crate) fills_paused: bool,
    events: Vec<EventRecord>,
}

impl SettlementState {
    #[must_use]
    pub fn new(vault: Address, fills_paused: bool) -> Self {
        Self {
            vault,
            ledger: TokenLedger::new(),
            claims: ClaimLedger::new(),
            accounting: VaultAccounting::new(vault),
            fills_paused,
            events: Vec::new(),
        }
    }

    /// Credit the vault and record the funding.
    pub fn fund(&mut self, token: Address, amount: Amount) -> Result<()> {
        // Ledger overflow is checked first so a failure leaves both sides untouched.
        self.ledger
            .balance(self.vault, token)
            .checked_add(amount)
            .ok_or(SpokePoolError::AmountOverflow)?;
        self.accounting.record_funding(token, amount)?;
        self.ledger.credit(self.vault, token, amount)
    }

    /// Append an event outside of a pending settlement.
    pub fn record(&mut self, event: SpokeEvent) {
        let recorded_at = Utc::now();
        let sequence = self.events.len() as u64;
        self.events.push(EventRecord {
            sequence,
            recorded_at,
            event,
        });
    }

    /// Apply a pending settlement, or nothing at all.
    ///
    /// 1. Every staged claim must still be unclaimed
    /// 2. The balance batch must replay without underflow or overflow
    /// 3. Vault accounting must match the projected vault balances
    ///
    /// Only after all three checks pass is any state written.
    ///
    /// # Errors
    /// - `AlreadyClaimed` if a staged claim was taken in the meantime
    /// - `InsufficientBalance` / `AmountOverflow` from the balance replay
    /// - `SupplyInvariantViolation` if accounting disagrees with balances
    pub fn commit(&mut self, pending: PendingSettlement) -> Result<()> {
        for (i, &(bundle_id, leaf_id)) in pending.claims().iter().enumerate() {
            if self.claims.is_claimed(bundle_id, leaf_id)
                || pending.claims()[..i].contains(&(bundle_id, leaf_id))
            {
                return Err(SpokePoolError::AlreadyClaimed { bundle_id, leaf_id });
            }
        }

        let preview = self.ledger.preview(pending.transfers(), pending.outflows())?;

        let mut flow_updates = Vec::new();
        for token in pending.touched_tokens() {
            let flows = self
                .accounting
                .preview(token, pending.transfers(), pending.outflows())?;
            let vault_balance = preview
                .get(&(self.vault, token))
                .copied()
                .unwrap_or_else(|| self.ledger.balance(self.vault, token));
            VaultAccounting::verify(&flows, token, vault_balance)?;
            flow_updates.push((token, flows));
        }

        // All checks passed: write.
        for &(bundle_id, leaf_id) in pending.claims() {
            self.claims.mark_claimed(bundle_id, leaf_id)?;
        }
        self.ledger.apply(preview);
        for (token, flows) in flow_updates {
            self.accounting.set(token, flows);
        }
        for event in pending.into_events() {
            self.record(event);
        }
        Ok(())
    }

    /// The full event log.
    #[must_use]
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }
}
