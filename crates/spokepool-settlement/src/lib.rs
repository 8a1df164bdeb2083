//! # spokepool-settlement
//!
//! **Payout plane**: root bundle registry, exactly-once leaf claims,
//! refund distribution, and the hand-off of surplus to the bridge.
//!
//! ## Architecture
//!
//! [`SpokePool`] receives relayed root bundles and, for each refund leaf
//! presented with an inclusion proof:
//! 1. Rejects nested payout calls ([`ReentrancyLock`])
//! 2. Checks the leaf's domain and shape
//! 3. Verifies the proof against the bundle's refund root
//! 4. Checks the leaf has not been claimed ([`ClaimLedger`])
//! 5. Runs the pre-payout hook, then the [`RefundDistributor`]
//! 6. Commits claim, transfers, bridging and events together
//!
//! ## Atomicity
//!
//! Every effect is staged in a [`PendingSettlement`] and applied by
//! [`SettlementState::commit`] only after the balance replay and the vault
//! accounting check ([`VaultAccounting`]) pass. A failed call changes nothing.

pub mod bridge;
pub mod claim_ledger;
pub mod distributor;
pub mod engine;
pub mod pending;
pub mod reentrancy;
pub mod registry;
pub mod state;
pub mod token_ledger;
pub mod vault_accounting;

pub use bridge::{BridgeAdapter, BridgeError, NoopPrePayoutHook, PrePayoutHook};
pub use claim_ledger::ClaimLedger;
pub use distributor::{DistributionSummary, RefundDistributor, RefundPayout};
pub use engine::SpokePool;
pub use pending::{PendingSettlement, TokenOutflow, TokenTransfer};
pub use reentrancy::{ReentrancyGuard, ReentrancyLock};
pub use registry::RootBundleRegistry;
pub use state::SettlementState;
pub use token_ledger::TokenLedger;
pub use vault_accounting::{TokenFlows, VaultAccounting};
