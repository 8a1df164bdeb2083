//! The SpokePool engine.
//!
//! One instance serves one domain. Payout entry points
//! ([`SpokePool::execute_refund_leaf`], [`SpokePool::execute_refund_leaf_v2`],
//! [`SpokePool::distribute`]) run under the reentrancy lock and stage all of
//! their effects in a [`PendingSettlement`]. The settlement state is written
//! once, at commit, so a failed call leaves no claim, transfer or event behind.
//!
//! ## Leaf execution
//!
//! ```text
//! acquire lock → domain → shape → bundle lookup → proof → claim check
//!   → stage claim → pre-payout hook → distribute → executed event → commit
//! ```
//!
//! No engine mutex is held while the hook or the bridging adapter runs, so a
//! collaborator may call back into non-payout entry points (relay, queries).
//! Any payout call made while another payout is in flight fails with
//! `ReentrantCall`, including one forwarded to a different thread.

use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard};

use spokepool_merkle::verify_leaf;
use spokepool_types::{
    Address, Amount, BundleId, Bytes32, DomainId, EventRecord, LeafId, RefundLeaf, RefundLeafV2,
    Result, RootBundle, SpokeConfig, SpokeEvent, SpokePoolError, VersionedRefundLeaf, constants,
};

use crate::{
    bridge::{BridgeAdapter, NoopPrePayoutHook, PrePayoutHook},
    distributor::{DistributionSummary, RefundDistributor, RefundPayout},
    pending::PendingSettlement,
    reentrancy::ReentrancyLock,
    registry::RootBundleRegistry,
    state::SettlementState,
};

/// Destination-domain settlement engine.
pub struct SpokePool {
    config: SpokeConfig,
    registry: RwLock<RootBundleRegistry>,
    state: Mutex<SettlementState>,
    lock: ReentrancyLock,
    bridge: Box<dyn BridgeAdapter>,
    hook: Box<dyn PrePayoutHook>,
}

impl SpokePool {
    /// Create an engine with the given bridging adapter and a no-op hook.
    pub fn new(config: SpokeConfig, bridge: impl BridgeAdapter + 'static) -> Self {
        let state = SettlementState::new(config.vault, config.fills_paused);
        tracing::info!(
            version = constants::VERSION,
            domain = config.domain_id.0,
            vault = %config.vault,
            "SpokePool initialized"
        );
        Self {
            config,
            registry: RwLock::new(RootBundleRegistry::new()),
            state: Mutex::new(state),
            lock: ReentrancyLock::new(),
            bridge: Box::new(bridge),
            hook: Box::new(NoopPrePayoutHook),
        }
    }

    /// Replace the pre-payout hook.
    #[must_use]
    pub fn with_pre_payout_hook(mut self, hook: impl PrePayoutHook + 'static) -> Self {
        self.hook = Box::new(hook);
        self
    }

    // ------------------------------------------------------------------
    // Root bundles
    // ------------------------------------------------------------------

    /// Append a root bundle and return its id.
    ///
    /// Roots are opaque and not validated. Proposer authorization happens
    /// before this call reaches the engine.
    pub fn relay_root_bundle(
        &self,
        refund_root: Bytes32,
        auxiliary_root: Bytes32,
    ) -> Result<BundleId> {
        let mut state = self.state_mut()?;
        let bundle = self
            .registry
            .write()
            .map_err(|_| poisoned("registry"))?
            .relay(refund_root, auxiliary_root)?;

        state.record(SpokeEvent::RelayedRootBundle {
            bundle_id: bundle.bundle_id,
            refund_root,
            auxiliary_root,
        });

        tracing::info!(
            bundle = bundle.bundle_id.0,
            refund_root = %bundle.refund_root_hex(),
            auxiliary_root = %hex::encode(auxiliary_root),
            "Root bundle relayed"
        );
        Ok(bundle.bundle_id)
    }

    // ------------------------------------------------------------------
    // Payout entry points
    // ------------------------------------------------------------------

    /// Execute a base-schema refund leaf.
    ///
    /// # Errors
    /// `ReentrantCall`, `InvalidDomain`, `InvalidLeafShape`,
    /// `InvalidMerkleProof`, `AlreadyClaimed`, `InsufficientBalance`,
    /// `BridgingFailed`, or any error raised by the pre-payout hook.
    pub fn execute_refund_leaf(
        &self,
        caller: Address,
        bundle_id: BundleId,
        leaf: RefundLeaf,
        proof: &[Bytes32],
    ) -> Result<DistributionSummary> {
        self.execute_leaf(caller, bundle_id, VersionedRefundLeaf::V1(leaf), proof)
    }

    /// Execute an extended-schema refund leaf. The proof must come from a
    /// tree built over extended-schema leaf hashes.
    pub fn execute_refund_leaf_v2(
        &self,
        caller: Address,
        bundle_id: BundleId,
        leaf: RefundLeafV2,
        proof: &[Bytes32],
    ) -> Result<DistributionSummary> {
        self.execute_leaf(caller, bundle_id, VersionedRefundLeaf::V2(leaf), proof)
    }

    fn execute_leaf(
        &self,
        caller: Address,
        bundle_id: BundleId,
        leaf: VersionedRefundLeaf,
        proof: &[Bytes32],
    ) -> Result<DistributionSummary> {
        let _guard = self.lock.acquire().inspect_err(|_| {
            tracing::warn!(bundle = bundle_id.0, "Payout call rejected, payout in flight");
        })?;

        let common = leaf.common();
        if common.domain_id != self.config.domain_id {
            tracing::warn!(
                bundle = bundle_id.0,
                leaf = common.leaf_id.0,
                leaf_domain = common.domain_id.0,
                domain = self.config.domain_id.0,
                "Leaf for another domain rejected"
            );
            return Err(SpokePoolError::InvalidDomain {
                leaf: common.domain_id,
                expected: self.config.domain_id,
            });
        }
        if !common.has_consistent_shape() {
            return Err(SpokePoolError::InvalidLeafShape {
                addresses: common.refund_addresses.len(),
                amounts: common.refund_amounts.len(),
            });
        }

        // Unknown bundle and failed inclusion are deliberately the same error.
        let bundle = self
            .root_bundle(bundle_id)
            .ok_or(SpokePoolError::InvalidMerkleProof(bundle_id))?;
        if !verify_leaf(&leaf, proof, &bundle.refund_root) {
            return Err(SpokePoolError::InvalidMerkleProof(bundle_id));
        }

        if self.state_mut()?.claims.is_claimed(bundle_id, common.leaf_id) {
            tracing::warn!(
                bundle = bundle_id.0,
                leaf = common.leaf_id.0,
                "Replay of claimed leaf rejected"
            );
            return Err(SpokePoolError::AlreadyClaimed {
                bundle_id,
                leaf_id: common.leaf_id,
            });
        }

        let mut pending = PendingSettlement::new();
        pending.claim(bundle_id, common.leaf_id);

        self.hook.before_payout(common.token)?;
        pending.emit(SpokeEvent::PrePayoutHookInvoked {
            token: common.token,
        });

        let payout = RefundPayout::from_leaf(common, bundle_id);
        let summary = self.stage_payout(&payout, caller, &mut pending)?;

        pending.emit(executed_event(&leaf, bundle_id, caller));
        self.state_mut()?.commit(pending)?;

        tracing::info!(
            bundle = bundle_id.0,
            leaf = common.leaf_id.0,
            schema = %leaf.schema(),
            transfers = summary.transfer_count,
            refunded = %summary.total_refunded,
            bridged = %summary.bridged,
            "Refund leaf executed"
        );
        Ok(summary)
    }

    /// Distribute refunds without a leaf or proof.
    ///
    /// Runs under the same lock and commit as leaf execution but records no
    /// claim. `caller` is reported as the bridging initiator.
    pub fn distribute(
        &self,
        caller: Address,
        payout: &RefundPayout<'_>,
    ) -> Result<DistributionSummary> {
        let _guard = self.lock.acquire().inspect_err(|_| {
            tracing::warn!(bundle = payout.bundle_id.0, "Payout call rejected, payout in flight");
        })?;
        let mut pending = PendingSettlement::new();
        let summary = self.stage_payout(payout, caller, &mut pending)?;
        self.state_mut()?.commit(pending)?;
        Ok(summary)
    }

    fn stage_payout(
        &self,
        payout: &RefundPayout<'_>,
        initiator: Address,
        pending: &mut PendingSettlement,
    ) -> Result<DistributionSummary> {
        let vault_balance = self
            .state_mut()?
            .ledger
            .balance(self.config.vault, payout.token);
        RefundDistributor::new(self.config.vault, self.bridge.as_ref()).distribute(
            payout,
            vault_balance,
            initiator,
            pending,
        )
    }

    // ------------------------------------------------------------------
    // Operational entry points
    // ------------------------------------------------------------------

    /// Credit the vault with `amount` of `token`.
    pub fn fund(&self, token: Address, amount: Amount) -> Result<()> {
        self.state_mut()?.fund(token, amount)?;
        tracing::debug!(token = %token, amount = %amount, "Vault funded");
        Ok(())
    }

    /// Set the fills-pause flag. Leaf execution ignores it.
    pub fn pause_fills(&self, paused: bool) -> Result<()> {
        let mut state = self.state_mut()?;
        state.fills_paused = paused;
        state.record(SpokeEvent::PausedFills { is_paused: paused });
        tracing::info!(paused, "Fills pause flag set");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &SpokeConfig {
        &self.config
    }

    /// Domain this engine settles for.
    #[must_use]
    pub fn domain_id(&self) -> DomainId {
        self.config.domain_id
    }

    /// Current fills-pause flag.
    #[must_use]
    pub fn fills_paused(&self) -> bool {
        self.state_read().fills_paused
    }

    /// Relayed bundle with this id, if any.
    #[must_use]
    pub fn root_bundle(&self, bundle_id: BundleId) -> Option<RootBundle> {
        self.registry_read().get(bundle_id).copied()
    }

    /// Number of relayed bundles.
    #[must_use]
    pub fn bundle_count(&self) -> usize {
        self.registry_read().len()
    }

    /// Whether the leaf has been paid under the bundle.
    #[must_use]
    pub fn is_claimed(&self, bundle_id: BundleId, leaf_id: LeafId) -> bool {
        self.state_read().claims.is_claimed(bundle_id, leaf_id)
    }

    /// Committed balance of `holder` in `token`.
    #[must_use]
    pub fn balance(&self, holder: Address, token: Address) -> Amount {
        self.state_read().ledger.balance(holder, token)
    }

    /// Snapshot of the committed event log.
    #[must_use]
    pub fn events(&self) -> Vec<EventRecord> {
        self.state_read().events().to_vec()
    }

    fn state_mut(&self) -> Result<MutexGuard<'_, SettlementState>> {
        self.state.lock().map_err(|_| poisoned("settlement state"))
    }

    fn state_read(&self) -> MutexGuard<'_, SettlementState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn registry_read(&self) -> RwLockReadGuard<'_, RootBundleRegistry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }
}

fn executed_event(leaf: &VersionedRefundLeaf, bundle_id: BundleId, caller: Address) -> SpokeEvent {
    let common = leaf.common();
    match leaf {
        VersionedRefundLeaf::V1(_) => SpokeEvent::ExecutedRefundLeaf {
            bundle_id,
            leaf_id: common.leaf_id,
            domain_id: common.domain_id,
            amount_to_return: common.amount_to_return,
            token: common.token,
            refund_addresses: common.refund_addresses.clone(),
            refund_amounts: common.refund_amounts.clone(),
            caller,
        },
        VersionedRefundLeaf::V2(v2) => SpokeEvent::ExecutedRefundLeafV2 {
            bundle_id,
            leaf_id: common.leaf_id,
            domain_id: common.domain_id,
            amount_to_return: common.amount_to_return,
            token: common.token,
            refund_addresses: common.refund_addresses.clone(),
            refund_amounts: common.refund_amounts.clone(),
            fills_refunded_commitment: v2.fills_refunded_commitment,
            fills_refunded_digest: v2.fills_refunded_digest,
            caller,
        },
    }
}

fn poisoned(what: &str) -> SpokePoolError {
    SpokePoolError::Internal(format!("{what} lock poisoned"))
}
