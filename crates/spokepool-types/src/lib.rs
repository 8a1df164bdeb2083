//! # spokepool-types
//!
//! Shared types, errors, and configuration for the **SpokePool** settlement engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`DomainId`], [`BundleId`], [`LeafId`], [`Amount`], [`Bytes32`]
//! - **Leaf model**: [`RefundLeaf`], [`RefundLeafV2`], [`VersionedRefundLeaf`], [`LeafSchema`]
//! - **Bundle model**: [`RootBundle`]
//! - **Events**: [`SpokeEvent`], [`EventRecord`]
//! - **Configuration**: [`SpokeConfig`]
//! - **Errors**: [`SpokePoolError`] with `SP_ERR_` prefix codes
//! - **Constants**: hashing domain tags and limits

pub mod bundle;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod leaf;

pub use bundle::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use leaf::*;

// Constants are accessed via `spokepool_types::constants::FOO`
// (not re-exported to avoid name collisions).
