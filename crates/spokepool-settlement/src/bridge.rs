//! Collaborator seams: the bridging adapter and the pre-payout hook.
//!
//! The engine owns no bridging logic. Each domain plugs in its own
//! [`BridgeAdapter`] that moves surplus toward the parent settlement layer.
//! Both traits take `&self` so implementations can be shared and can call
//! back into the engine; such nested payout calls are rejected by the
//! reentrancy lock.

use std::sync::Arc;

use spokepool_types::{Address, Amount, Result};
use thiserror::Error;

/// Why an adapter refused a hand-off.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// No bridge route exists for this token.
    #[error("no bridge route for token {0}")]
    UnsupportedToken(Address),

    /// The adapter or the bridge behind it rejected the transfer.
    #[error("adapter rejected transfer: {0}")]
    Rejected(String),
}

/// Moves tokens from this domain to the parent settlement layer.
pub trait BridgeAdapter: Send + Sync {
    /// Hand `amount` of `token` to the bridge. Called at most once per payout.
    fn send(&self, amount: Amount, token: Address) -> std::result::Result<(), BridgeError>;
}

impl<T: BridgeAdapter + ?Sized> BridgeAdapter for Arc<T> {
    fn send(&self, amount: Amount, token: Address) -> std::result::Result<(), BridgeError> {
        (**self).send(amount, token)
    }
}

/// Bookkeeping extension point run before a leaf's funds move.
///
/// Must not move engine funds. An error aborts the leaf execution.
pub trait PrePayoutHook: Send + Sync {
    fn before_payout(&self, token: Address) -> Result<()>;
}

impl<T: PrePayoutHook + ?Sized> PrePayoutHook for Arc<T> {
    fn before_payout(&self, token: Address) -> Result<()> {
        (**self).before_payout(token)
    }
}

/// Hook that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPrePayoutHook;

impl PrePayoutHook for NoopPrePayoutHook {
    fn before_payout(&self, _token: Address) -> Result<()> {
        Ok(())
    }
}
