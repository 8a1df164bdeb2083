//! End-to-end tests through the public `SpokePool` surface.
//!
//! Each test builds refund trees with `MerkleTree`, relays their roots,
//! and executes leaves against a funded vault. They cover the replay,
//! domain, proof, shape and surplus rules along with the all-or-nothing
//! behavior of failed calls.

use std::sync::{Arc, Mutex};

use spokepool_merkle::MerkleTree;
use spokepool_settlement::{BridgeAdapter, BridgeError, RefundPayout, SpokePool};
use spokepool_types::*;

const DOMAIN: u64 = 137;
const OTHER_DOMAIN: u64 = 42_161;
const REFUND: Amount = 1_000;
const SURPLUS: Amount = 250;

/// Bridge adapter that records every hand-off.
#[derive(Default)]
struct RecordingBridge {
    sent: Mutex<Vec<(Amount, Address)>>,
}

impl BridgeAdapter for RecordingBridge {
    fn send(&self, amount: Amount, token: Address) -> std::result::Result<(), BridgeError> {
        self.sent.lock().unwrap().push((amount, token));
        Ok(())
    }
}

/// A pool plus the handles tests inspect.
struct Harness {
    pool: SpokePool,
    bridge: Arc<RecordingBridge>,
    vault: Address,
    token: Address,
    alice: Address,
    bob: Address,
}

impl Harness {
    fn new(funding: Amount) -> Self {
        let vault = Address::random();
        let token = Address::random();
        let bridge = Arc::new(RecordingBridge::default());
        let pool = SpokePool::new(SpokeConfig::new(DomainId(DOMAIN), vault), Arc::clone(&bridge));
        pool.fund(token, funding).unwrap();
        Self {
            pool,
            bridge,
            vault,
            token,
            alice: Address::random(),
            bob: Address::random(),
        }
    }

    /// leaf0 pays alice and bob and returns a surplus; leaf1 pays nothing.
    fn two_leaves(&self, domain: u64) -> (RefundLeaf, RefundLeaf) {
        let leaf0 = RefundLeaf::dummy(
            0,
            domain,
            SURPLUS,
            self.token,
            &[(self.alice, REFUND), (self.bob, REFUND)],
        );
        let leaf1 = RefundLeaf::dummy(1, domain, 0, self.token, &[]);
        (leaf0, leaf1)
    }

    fn relay(&self, leaves: &[RefundLeaf]) -> (BundleId, MerkleTree) {
        let versioned: Vec<VersionedRefundLeaf> = leaves.iter().cloned().map(Into::into).collect();
        let tree = MerkleTree::from_leaves(&versioned);
        let bundle = self.pool.relay_root_bundle(tree.root(), [0xAA; 32]).unwrap();
        (bundle, tree)
    }

    fn caller(&self) -> Address {
        Address::repeat_byte(0x77)
    }

    fn event_count(&self, name: &str) -> usize {
        self.pool
            .events()
            .iter()
            .filter(|r| r.event.name() == name)
            .count()
    }

    fn snapshot(&self) -> (Amount, Amount, Amount, usize) {
        (
            self.pool.balance(self.vault, self.token),
            self.pool.balance(self.alice, self.token),
            self.pool.balance(self.bob, self.token),
            self.pool.events().len(),
        )
    }
}

// ---------------------------------------------------------------------------
// Scenario 1: pay out a two-leaf bundle
// ---------------------------------------------------------------------------

#[test]
fn two_leaf_bundle_pays_refunds_and_bridges_once() {
    let h = Harness::new(10_000);
    let (leaf0, leaf1) = h.two_leaves(DOMAIN);
    let (bundle, tree) = h.relay(&[leaf0.clone(), leaf1.clone()]);

    h.pool
        .execute_refund_leaf(h.caller(), bundle, leaf0, &tree.proof(0).unwrap())
        .unwrap();

    assert_eq!(h.pool.balance(h.alice, h.token), REFUND);
    assert_eq!(h.pool.balance(h.bob, h.token), REFUND);
    assert_eq!(
        h.pool.balance(h.vault, h.token),
        10_000 - 2 * REFUND - SURPLUS
    );
    assert_eq!(h.event_count("BRIDGING_INVOKED"), 1);
    assert_eq!(h.event_count("TOKENS_BRIDGED"), 1);
    assert_eq!(*h.bridge.sent.lock().unwrap(), vec![(SURPLUS, h.token)]);

    let summary = h
        .pool
        .execute_refund_leaf(h.caller(), bundle, leaf1, &tree.proof(1).unwrap())
        .unwrap();

    assert_eq!(summary.transfer_count, 0);
    assert_eq!(summary.bridged, 0);
    assert_eq!(h.event_count("TRANSFER"), 2);
    assert_eq!(h.event_count("BRIDGING_INVOKED"), 1);
    assert_eq!(h.event_count("EXECUTED_REFUND_LEAF"), 2);
    assert!(h.pool.is_claimed(bundle, LeafId(0)));
    assert!(h.pool.is_claimed(bundle, LeafId(1)));
}

#[test]
fn tokens_bridged_event_carries_context() {
    let h = Harness::new(10_000);
    let (leaf0, leaf1) = h.two_leaves(DOMAIN);
    let (bundle, tree) = h.relay(&[leaf0.clone(), leaf1]);

    h.pool
        .execute_refund_leaf(h.caller(), bundle, leaf0, &tree.proof(0).unwrap())
        .unwrap();

    let bridged = h
        .pool
        .events()
        .into_iter()
        .find_map(|r| match r.event {
            SpokeEvent::TokensBridged {
                amount_to_return,
                domain_id,
                bundle_id,
                token,
                initiator,
            } => Some((amount_to_return, domain_id, bundle_id, token, initiator)),
            _ => None,
        })
        .expect("TokensBridged emitted");
    assert_eq!(
        bridged,
        (SURPLUS, DomainId(DOMAIN), bundle, h.token, h.caller())
    );
}

// ---------------------------------------------------------------------------
// Scenario 2: replay
// ---------------------------------------------------------------------------

#[test]
fn replay_fails_and_changes_nothing() {
    let h = Harness::new(10_000);
    let (leaf0, leaf1) = h.two_leaves(DOMAIN);
    let (bundle, tree) = h.relay(&[leaf0.clone(), leaf1]);
    let proof = tree.proof(0).unwrap();

    h.pool
        .execute_refund_leaf(h.caller(), bundle, leaf0.clone(), &proof)
        .unwrap();
    let after_first = h.snapshot();

    let err = h
        .pool
        .execute_refund_leaf(h.caller(), bundle, leaf0, &proof)
        .unwrap_err();

    assert!(
        matches!(err, SpokePoolError::AlreadyClaimed { leaf_id, .. } if leaf_id == LeafId(0)),
        "Expected AlreadyClaimed, got: {err:?}"
    );
    assert_eq!(h.snapshot(), after_first);
    assert_eq!(h.bridge.sent.lock().unwrap().len(), 1);
}

#[test]
fn concurrent_claims_pay_exactly_once() {
    let h = Arc::new(Harness::new(10_000));
    let (leaf0, leaf1) = h.two_leaves(DOMAIN);
    let (bundle, tree) = h.relay(&[leaf0.clone(), leaf1]);
    let proof = tree.proof(0).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let h = Arc::clone(&h);
            let leaf = leaf0.clone();
            let proof = proof.clone();
            std::thread::spawn(move || {
                h.pool
                    .execute_refund_leaf(h.caller(), bundle, leaf, &proof)
                    .map(|_| ())
            })
        })
        .collect();
    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    // Losers either hit the in-flight payout or the committed claim.
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().all(|r| matches!(
        r,
        Ok(()) | Err(SpokePoolError::ReentrantCall | SpokePoolError::AlreadyClaimed { .. })
    )));
    assert_eq!(h.pool.balance(h.alice, h.token), REFUND);
    assert_eq!(h.bridge.sent.lock().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Scenario 3: domain isolation
// ---------------------------------------------------------------------------

#[test]
fn leaf_for_other_domain_rejected_despite_valid_proof() {
    let h = Harness::new(10_000);
    let (leaf0, leaf1) = h.two_leaves(OTHER_DOMAIN);
    let (bundle, tree) = h.relay(&[leaf0.clone(), leaf1]);
    let before = h.snapshot();

    let err = h
        .pool
        .execute_refund_leaf(h.caller(), bundle, leaf0, &tree.proof(0).unwrap())
        .unwrap_err();

    assert!(matches!(
        err,
        SpokePoolError::InvalidDomain { leaf, expected }
            if leaf == DomainId(OTHER_DOMAIN) && expected == DomainId(DOMAIN)
    ));
    assert_eq!(h.snapshot(), before);
    assert!(!h.pool.is_claimed(bundle, LeafId(0)));
}

// ---------------------------------------------------------------------------
// Scenario 4: shape validation
// ---------------------------------------------------------------------------

#[test]
fn distribute_rejects_mismatched_arrays() {
    let h = Harness::new(10_000);
    let amounts = [1, 2, 3];
    let payout = RefundPayout {
        domain_id: DomainId(DOMAIN),
        amount_to_return: 0,
        refund_amounts: &amounts,
        bundle_id: BundleId(0),
        token: h.token,
        refund_addresses: &[],
    };
    let before = h.snapshot();

    let err = h.pool.distribute(h.caller(), &payout).unwrap_err();

    assert!(matches!(
        err,
        SpokePoolError::InvalidLeafShape {
            addresses: 0,
            amounts: 3
        }
    ));
    assert_eq!(h.snapshot(), before);
}

#[test]
fn execute_rejects_mismatched_leaf_before_transfers() {
    let h = Harness::new(10_000);
    let mut leaf = RefundLeaf::dummy(0, DOMAIN, 0, h.token, &[(h.alice, 5)]);
    leaf.refund_amounts.push(7);
    let (bundle, tree) = h.relay(std::slice::from_ref(&leaf));

    let err = h
        .pool
        .execute_refund_leaf(h.caller(), bundle, leaf, &tree.proof(0).unwrap())
        .unwrap_err();

    assert!(matches!(err, SpokePoolError::InvalidLeafShape { .. }));
    assert_eq!(h.pool.balance(h.alice, h.token), 0);
}

// ---------------------------------------------------------------------------
// Scenario 5: bundle and proof mismatches
// ---------------------------------------------------------------------------

#[test]
fn wrong_bundle_or_proof_is_invalid_merkle_proof() {
    let h = Harness::new(10_000);
    let (leaf0, leaf1) = h.two_leaves(DOMAIN);
    let (bundle0, tree0) = h.relay(&[leaf0.clone(), leaf1.clone()]);
    let other = RefundLeaf::dummy(0, DOMAIN, 1, h.token, &[(h.bob, 1)]);
    let (bundle1, _) = h.relay(&[other]);
    let before = h.snapshot();

    let attempts = [
        // Valid under bundle 0, presented for bundle 1.
        (bundle1, leaf0.clone(), tree0.proof(0).unwrap()),
        // leaf1's proof for leaf0, and the reverse.
        (bundle0, leaf0.clone(), tree0.proof(1).unwrap()),
        (bundle0, leaf1, tree0.proof(0).unwrap()),
        // Bundle never relayed.
        (BundleId(99), leaf0, tree0.proof(0).unwrap()),
    ];
    for (bundle, leaf, proof) in attempts {
        let err = h
            .pool
            .execute_refund_leaf(h.caller(), bundle, leaf, &proof)
            .unwrap_err();
        assert!(
            matches!(err, SpokePoolError::InvalidMerkleProof(id) if id == bundle),
            "Expected InvalidMerkleProof for {bundle}, got: {err:?}"
        );
    }
    assert_eq!(h.snapshot(), before);
}

#[test]
fn mutated_field_breaks_proof() {
    let h = Harness::new(10_000);
    let (leaf0, leaf1) = h.two_leaves(DOMAIN);
    let (bundle, tree) = h.relay(&[leaf0.clone(), leaf1]);
    let proof = tree.proof(0).unwrap();

    let mut bigger = leaf0.clone();
    bigger.refund_amounts[0] += 1;
    let mut swapped = leaf0.clone();
    swapped.refund_addresses.swap(0, 1);
    let mut more_surplus = leaf0;
    more_surplus.amount_to_return += 1;

    for leaf in [bigger, swapped, more_surplus] {
        let err = h
            .pool
            .execute_refund_leaf(h.caller(), bundle, leaf, &proof)
            .unwrap_err();
        assert!(matches!(err, SpokePoolError::InvalidMerkleProof(_)));
    }
    assert!(!h.pool.is_claimed(bundle, LeafId(0)));
}

#[test]
fn relabelled_domain_breaks_proof() {
    let h = Harness::new(10_000);
    let (foreign, _) = h.two_leaves(OTHER_DOMAIN);
    let (bundle, tree) = h.relay(std::slice::from_ref(&foreign));

    // Passes the domain check, but the proof was built over the original.
    let mut relabelled = foreign;
    relabelled.domain_id = DomainId(DOMAIN);

    let err = h
        .pool
        .execute_refund_leaf(h.caller(), bundle, relabelled, &tree.proof(0).unwrap())
        .unwrap_err();
    assert!(matches!(err, SpokePoolError::InvalidMerkleProof(_)));
}

// ---------------------------------------------------------------------------
// Transfer accounting
// ---------------------------------------------------------------------------

#[test]
fn only_positive_refunds_transfer_and_totals_match() {
    let h = Harness::new(10_000);
    let carol = Address::random();
    let leaf = RefundLeaf::dummy(
        0,
        DOMAIN,
        SURPLUS,
        h.token,
        &[(h.alice, 300), (h.bob, 0), (carol, 200), (h.alice, 100)],
    );
    let (bundle, tree) = h.relay(std::slice::from_ref(&leaf));

    let summary = h
        .pool
        .execute_refund_leaf(h.caller(), bundle, leaf, &tree.proof(0).unwrap())
        .unwrap();

    assert_eq!(summary.transfer_count, 3);
    assert_eq!(summary.total_refunded, 600);
    assert_eq!(h.event_count("TRANSFER"), 3);
    assert_eq!(h.pool.balance(h.alice, h.token), 400);
    assert_eq!(h.pool.balance(h.bob, h.token), 0);
    assert_eq!(h.pool.balance(h.vault, h.token), 10_000 - 600 - SURPLUS);
}

#[test]
fn underfunded_vault_rejects_whole_leaf() {
    let h = Harness::new(REFUND);
    let (leaf0, leaf1) = h.two_leaves(DOMAIN);
    let (bundle, tree) = h.relay(&[leaf0.clone(), leaf1]);
    let before = h.snapshot();

    let err = h
        .pool
        .execute_refund_leaf(h.caller(), bundle, leaf0, &tree.proof(0).unwrap())
        .unwrap_err();

    assert!(matches!(err, SpokePoolError::InsufficientBalance { .. }));
    assert_eq!(h.snapshot(), before);
    assert!(h.bridge.sent.lock().unwrap().is_empty());
    assert!(!h.pool.is_claimed(bundle, LeafId(0)));
}

// ---------------------------------------------------------------------------
// Extended schema
// ---------------------------------------------------------------------------

#[test]
fn v2_bundle_executes_and_rejects_v1_encoding() {
    let h = Harness::new(10_000);
    let (base, _) = h.two_leaves(DOMAIN);
    let v2 = RefundLeafV2 {
        leaf: base.clone(),
        fills_refunded_commitment: [0x11; 32],
        fills_refunded_digest: [0x22; 32],
    };
    let tree = MerkleTree::from_leaves(&[v2.clone().into()]);
    let bundle = h.pool.relay_root_bundle(tree.root(), [0; 32]).unwrap();
    let proof = tree.proof(0).unwrap();

    let err = h
        .pool
        .execute_refund_leaf(h.caller(), bundle, base, &proof)
        .unwrap_err();
    assert!(matches!(err, SpokePoolError::InvalidMerkleProof(_)));

    h.pool
        .execute_refund_leaf_v2(h.caller(), bundle, v2, &proof)
        .unwrap();
    assert_eq!(h.event_count("EXECUTED_REFUND_LEAF_V2"), 1);
    assert_eq!(h.pool.balance(h.alice, h.token), REFUND);
}

// ---------------------------------------------------------------------------
// Event log
// ---------------------------------------------------------------------------

#[test]
fn event_log_serializes_for_reconciliation() {
    let h = Harness::new(10_000);
    let (leaf0, leaf1) = h.two_leaves(DOMAIN);
    let (bundle, tree) = h.relay(&[leaf0.clone(), leaf1]);
    h.pool
        .execute_refund_leaf(h.caller(), bundle, leaf0, &tree.proof(0).unwrap())
        .unwrap();

    let events = h.pool.events();
    for (i, record) in events.iter().enumerate() {
        assert_eq!(record.sequence, i as u64);
    }

    let json = serde_json::to_string(&events).unwrap();
    let decoded: Vec<EventRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, events);
}
