//! Token ledger: balances per (holder, token).
//!
//! The engine holds its own funds under its vault address. A batch of
//! staged transfers is applied all-or-nothing: [`TokenLedger::preview`]
//! replays the batch in order on a working copy of the touched balances,
//! and [`TokenLedger::apply`] writes that copy back only if every step
//! succeeded.

use std::collections::HashMap;

use spokepool_types::{Address, Amount, Result, SpokePoolError};

use crate::pending::{TokenOutflow, TokenTransfer};

/// Post-batch balances of every `(holder, token)` the batch touched.
pub type BalancePreview = HashMap<(Address, Address), Amount>;

/// Per-(holder, token) balances.
#[derive(Debug, Default)]
pub struct TokenLedger {
    balances: HashMap<(Address, Address), Amount>,
}

impl TokenLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `token` held by `holder`. Zero if never credited.
    #[must_use]
    pub fn balance(&self, holder: Address, token: Address) -> Amount {
        self.balances.get(&(holder, token)).copied().unwrap_or(0)
    }

    /// Credit `amount` of `token` to `holder`.
    pub fn credit(&mut self, holder: Address, token: Address, amount: Amount) -> Result<()> {
        let entry = self.balances.entry((holder, token)).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or(SpokePoolError::AmountOverflow)?;
        Ok(())
    }

    /// Compute the balances that applying the batch would produce.
    ///
    /// Transfers run in order, then outflows. The ledger is not modified.
    ///
    /// # Errors
    /// - `InsufficientBalance` if any debit exceeds the running balance
    /// - `AmountOverflow` if any credit overflows
    pub fn preview(
        &self,
        transfers: &[TokenTransfer],
        outflows: &[TokenOutflow],
    ) -> Result<BalancePreview> {
        let mut working = BalancePreview::new();

        for t in transfers {
            self.debit_working(&mut working, t.from, t.token, t.amount)?;
            let to = working
                .entry((t.to, t.token))
                .or_insert_with(|| self.balance(t.to, t.token));
            *to = to.checked_add(t.amount).ok_or(SpokePoolError::AmountOverflow)?;
        }
        for o in outflows {
            self.debit_working(&mut working, o.holder, o.token, o.amount)?;
        }

        Ok(working)
    }

    /// Write back a preview produced by [`TokenLedger::preview`].
    pub fn apply(&mut self, preview: BalancePreview) {
        for (key, amount) in preview {
            if amount == 0 {
                self.balances.remove(&key);
            } else {
                self.balances.insert(key, amount);
            }
        }
    }

    fn debit_working(
        &self,
        working: &mut BalancePreview,
        holder: Address,
        token: Address,
        amount: Amount,
    ) -> Result<()> {
        let from = working
            .entry((holder, token))
            .or_insert_with(|| self.balance(holder, token));
        if *from < amount {
            return Err(SpokePoolError::InsufficientBalance {
                holder,
                token,
                needed: amount,
                available: *from,
            });
        }
        *from -= amount;
        Ok(())
    }
}
