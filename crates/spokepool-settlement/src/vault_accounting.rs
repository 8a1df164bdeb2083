//! Vault accounting invariant checker.
//!
//! Invariant enforced on every commit:
//! ```text
//! ∀ token: vault balance == funded - paid_out - bridged
//! ```
//!
//! `paid_out` counts vault transfers to other holders; transfers from the
//! vault to itself are net zero and not counted. A violation means some
//! path moved vault funds outside the settlement path.

use std::collections::HashMap;

use spokepool_types::{Address, Amount, Result, SpokePoolError};

use crate::pending::{TokenOutflow, TokenTransfer};

/// Lifetime flows of one token through the vault.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenFlows {
    pub funded: Amount,
    pub paid_out: Amount,
    pub bridged: Amount,
}

impl TokenFlows {
    /// Balance the vault should hold: funded - paid_out - bridged.
    pub fn expected_balance(&self) -> Result<Amount> {
        self.funded
            .checked_sub(self.paid_out)
            .and_then(|rest| rest.checked_sub(self.bridged))
            .ok_or_else(|| SpokePoolError::SupplyInvariantViolation {
                reason: format!(
                    "outflows exceed funding (funded={}, paid_out={}, bridged={})",
                    self.funded, self.paid_out, self.bridged
                ),
            })
    }
}

/// Tracks per-token vault flows and validates them against ledger balances.
#[derive(Debug)]
pub struct VaultAccounting {
    vault: Address,
    flows: HashMap<Address, TokenFlows>,
}

impl VaultAccounting {
    #[must_use]
    pub fn new(vault: Address) -> Self {
        Self {
            vault,
            flows: HashMap::new(),
        }
    }

    /// Record funds arriving in the vault.
    pub fn record_funding(&mut self, token: Address, amount: Amount) -> Result<()> {
        let flows = self.flows.entry(token).or_default();
        flows.funded = flows
            .funded
            .checked_add(amount)
            .ok_or(SpokePoolError::AmountOverflow)?;
        Ok(())
    }

    /// Flows of `token` after applying the batch. Does not modify `self`.
    pub fn preview(
        &self,
        token: Address,
        transfers: &[TokenTransfer],
        outflows: &[TokenOutflow],
    ) -> Result<TokenFlows> {
        let mut flows = self.flows(token);
        for t in transfers
            .iter()
            .filter(|t| t.token == token && t.from == self.vault && t.to != self.vault)
        {
            flows.paid_out = flows
                .paid_out
                .checked_add(t.amount)
                .ok_or(SpokePoolError::AmountOverflow)?;
        }
        for o in outflows
            .iter()
            .filter(|o| o.token == token && o.holder == self.vault)
        {
            flows.bridged = flows
                .bridged
                .checked_add(o.amount)
                .ok_or(SpokePoolError::AmountOverflow)?;
        }
        Ok(flows)
    }

    /// Replace the recorded flows of `token`.
    pub fn set(&mut self, token: Address, flows: TokenFlows) {
        self.flows.insert(token, flows);
    }

    /// Recorded flows of `token`.
    #[must_use]
    pub fn flows(&self, token: Address) -> TokenFlows {
        self.flows.get(&token).copied().unwrap_or_default()
    }

    /// Verify that `vault_balance` matches the recorded flows of `token`.
    ///
    /// # Errors
    /// Returns [`SpokePoolError::SupplyInvariantViolation`] on mismatch.
    pub fn verify(flows: &TokenFlows, token: Address, vault_balance: Amount) -> Result<()> {
        let expected = flows.expected_balance()?;
        if vault_balance != expected {
            return Err(SpokePoolError::SupplyInvariantViolation {
                reason: format!(
                    "Token {token}: vault balance {vault_balance} != expected {expected} \
                     (funded={}, paid_out={}, bridged={})",
                    flows.funded, flows.paid_out, flows.bridged,
                ),
            });
        }
        Ok(())
    }
}
