//! Error types for the SpokePool settlement engine.
//!
//! All errors use the `SP_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Leaf validation errors
//! - 2xx: Proof / bundle errors
//! - 3xx: Claim / reentrancy errors
//! - 4xx: Funds errors
//! - 5xx: Bridging errors
//! - 9xx: General / internal errors
//!
//! Every error aborts the whole call. No variant is retried internally.

use thiserror::Error;

use crate::{Address, Amount, BundleId, DomainId, LeafId};

/// Central error enum for all SpokePool operations.
#[derive(Debug, Error)]
pub enum SpokePoolError {
    // =================================================================
    // Leaf Validation Errors (1xx)
    // =================================================================
    /// The leaf targets a different domain than this engine serves.
    #[error("SP_ERR_100: Invalid domain: leaf targets {leaf}, engine serves {expected}")]
    InvalidDomain { leaf: DomainId, expected: DomainId },

    /// Refund addresses and amounts have different lengths.
    #[error("SP_ERR_101: Invalid leaf shape: {addresses} addresses, {amounts} amounts")]
    InvalidLeafShape { addresses: usize, amounts: usize },

    // =================================================================
    // Proof / Bundle Errors (2xx)
    // =================================================================
    /// The bundle is unknown or the proof does not reach its refund root.
    /// The two causes are deliberately not distinguished.
    #[error("SP_ERR_200: Invalid Merkle proof for {0}")]
    InvalidMerkleProof(BundleId),

    // =================================================================
    // Claim / Reentrancy Errors (3xx)
    // =================================================================
    /// The leaf was already executed under this bundle.
    #[error("SP_ERR_300: Leaf already claimed: {bundle_id} {leaf_id}")]
    AlreadyClaimed { bundle_id: BundleId, leaf_id: LeafId },

    /// A payout entry point was re-entered while another call holds the lock.
    #[error("SP_ERR_301: Reentrant call rejected")]
    ReentrantCall,

    // =================================================================
    // Funds Errors (4xx)
    // =================================================================
    /// The holder does not have enough of the token to cover the payout.
    #[error("SP_ERR_400: Insufficient balance of {token} at {holder}: need {needed}, have {available}")]
    InsufficientBalance {
        holder: Address,
        token: Address,
        needed: Amount,
        available: Amount,
    },

    /// An amount computation overflowed.
    #[error("SP_ERR_401: Amount overflow")]
    AmountOverflow,

    /// Vault accounting no longer matches ledger balances.
    #[error("SP_ERR_402: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // Bridging Errors (5xx)
    // =================================================================
    /// The bridging adapter rejected the hand-off.
    #[error("SP_ERR_500: Bridging failed: {reason}")]
    BridgingFailed { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("SP_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("SP_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("SP_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SpokePoolError>;

impl From<serde_json::Error> for SpokePoolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
