//! Identifiers used throughout SpokePool.
//!
//! Bundle and leaf identifiers are small integers assigned by the
//! coordinator; addresses are raw 32-byte account keys so that both
//! 20-byte EVM addresses (left-padded) and 32-byte keys fit.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Token amount in base units.
pub type Amount = u128;

/// A 256-bit commitment (Merkle root, leaf hash, opaque digest).
pub type Bytes32 = [u8; 32];

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// Account or token address. 20-byte EVM addresses are stored left-padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Left-pad a 20-byte EVM address into the 32-byte representation.
    #[must_use]
    pub fn from_evm(bytes: [u8; 20]) -> Self {
        let mut out = [0u8; 32];
        out[12..].copy_from_slice(&bytes);
        Self(out)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First four bytes, hex encoded. Used in log lines.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Deterministic test address where every byte equals `byte`.
    #[must_use]
    pub fn repeat_byte(byte: u8) -> Self {
        Self([byte; 32])
    }

    /// A random address for tests.
    #[cfg(any(test, feature = "test-helpers"))]
    #[must_use]
    pub fn random() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// DomainId
// ---------------------------------------------------------------------------

/// Identifier of an execution domain (one destination network).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct DomainId(pub u64);

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "domain:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// BundleId
// ---------------------------------------------------------------------------

/// Position of a relayed root bundle in the registry. Starts at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct BundleId(pub u32);

impl fmt::Display for BundleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bundle:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// LeafId
// ---------------------------------------------------------------------------

/// Identifier of a refund leaf, unique within its bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct LeafId(pub u32);

impl fmt::Display for LeafId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "leaf:{}", self.0)
    }
}
