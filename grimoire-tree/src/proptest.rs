//! Property-based tests for hash tree operations.
//!
//! Tests invariants of the sparse binary hash tree under arbitrary
//! append sequences.

use proptest::prelude::*;

use crate::HashTree;
use grimoire_core::{verify_batch, Aggregator, Blake3Aggregator, Sha256Aggregator};

// ============================================================================
// Arbitrary Implementations
// ============================================================================

/// Generate arbitrary record payloads.
fn arb_record() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..64)
}

/// Generate a sequence of arbitrary records.
fn arb_records(max_count: usize) -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(arb_record(), 0..max_count)
}

fn build(records: &[Vec<u8>]) -> HashTree<Sha256Aggregator> {
    let mut tree = HashTree::new(Sha256Aggregator);
    for record in records {
        tree.append(record);
    }
    tree
}

// ============================================================================
// Property Tests: Shape Invariants
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Appending n records produces n leaf_count
    #[test]
    fn prop_tree_leaf_count(records in arb_records(100)) {
        let tree = build(&records);
        prop_assert_eq!(tree.leaf_count(), records.len() as u64);
    }

    /// Leaf count never exceeds the capacity of the current height
    #[test]
    fn prop_tree_leaf_count_within_capacity(records in arb_records(100)) {
        let mut tree = HashTree::new(Sha256Aggregator);
        for record in &records {
            tree.append(record);
            prop_assert!(tree.leaf_count() <= 1u64 << tree.height());
        }
    }

    /// Height is the smallest level that fits all leaves
    #[test]
    fn prop_tree_height_minimal(n in 1usize..200usize) {
        let mut tree = HashTree::new(Sha256Aggregator);
        for i in 0..n {
            tree.append(format!("record{}", i).as_bytes());
        }
        let height = tree.height();
        prop_assert!(n as u64 <= 1u64 << height);
        if height > 0 {
            prop_assert!(n as u64 > 1u64 << (height - 1));
        }
    }

    /// Append returns sequential 0-based indices
    #[test]
    fn prop_tree_append_indices_sequential(records in arb_records(100)) {
        let mut tree = HashTree::new(Sha256Aggregator);
        for (i, record) in records.iter().enumerate() {
            prop_assert_eq!(tree.append(record), i as u64);
        }
    }
}

// ============================================================================
// Property Tests: Root Commitment
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Root is deterministic for the same sequence of appends
    #[test]
    fn prop_tree_root_deterministic(records in arb_records(50)) {
        let tree1 = build(&records);
        let tree2 = build(&records);
        prop_assert_eq!(tree1.root_commitment(), tree2.root_commitment());
    }

    /// Different sequences produce different roots
    #[test]
    fn prop_tree_different_sequences_different_roots(
        records1 in arb_records(10),
        records2 in arb_records(10)
    ) {
        prop_assume!(!records1.is_empty() && !records2.is_empty() && records1 != records2);

        let tree1 = build(&records1);
        let tree2 = build(&records2);
        prop_assert_ne!(tree1.root_commitment(), tree2.root_commitment());
    }

    /// Root changes after each append
    #[test]
    fn prop_tree_root_changes(records in arb_records(20)) {
        prop_assume!(records.len() >= 2);

        let mut tree = HashTree::new(Sha256Aggregator);
        let mut prev_root = tree.root_commitment();

        for record in &records {
            tree.append(record);
            let new_root = tree.root_commitment();
            // Root should change (technically could collide but astronomically unlikely)
            prop_assert_ne!(prev_root, new_root);
            prev_root = new_root;
        }
    }

    /// Both aggregation schemes commit to the same sequence differently
    #[test]
    fn prop_tree_schemes_disagree(records in arb_records(20)) {
        prop_assume!(!records.is_empty());

        let sha = build(&records);
        let mut blake = HashTree::new(Blake3Aggregator);
        for record in &records {
            blake.append(record);
        }
        let sha_root = sha.root_commitment().unwrap();
        let blake_root = blake.root_commitment().unwrap();
        prop_assert_ne!(sha_root, blake_root);
    }
}

// ============================================================================
// Property Tests: Membership Proofs
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Every appended record has a valid membership proof
    #[test]
    fn prop_tree_all_leaves_provable(records in arb_records(50)) {
        prop_assume!(!records.is_empty());

        let tree = build(&records);
        for i in 0..records.len() as u64 {
            let proof = tree.proof(i).expect("proof should succeed");
            prop_assert!(proof.verify(tree.aggregator()).expect("verify should not error"));
            prop_assert_eq!(&proof.commitment, &tree.root_commitment().unwrap());
        }
    }

    /// Proof carries the record bytes it was built for
    #[test]
    fn prop_tree_proof_carries_record(records in arb_records(30)) {
        prop_assume!(!records.is_empty());

        let tree = build(&records);
        for (i, record) in records.iter().enumerate() {
            let proof = tree.proof(i as u64).expect("proof should succeed");
            prop_assert_eq!(proof.member_data.as_deref(), Some(record.as_slice()));
        }
    }

    /// Pruned path never exceeds one entry per level plus the member
    #[test]
    fn prop_tree_proof_size_bounded(n in 1usize..500usize) {
        let mut tree = HashTree::new(Sha256Aggregator);
        for i in 0..n {
            tree.append(format!("record{}", i).as_bytes());
        }

        let proof = tree.proof(0).expect("proof should succeed");
        prop_assert!(proof.pruned_tree.len() <= tree.height() as usize + 1);
    }

    /// Proofs taken before growth still verify against their snapshot
    #[test]
    fn prop_tree_proofs_survive_growth(
        records in arb_records(30),
        extra in arb_records(30)
    ) {
        prop_assume!(!records.is_empty());

        let mut tree = build(&records);
        let snapshots: Vec<_> = (0..records.len() as u64)
            .map(|i| tree.proof(i).expect("proof should succeed"))
            .collect();

        for record in &extra {
            tree.append(record);
        }

        for proof in &snapshots {
            prop_assert!(proof.verify(tree.aggregator()).expect("verify should not error"));
        }
    }

    /// Batch proof generation matches one-at-a-time generation
    #[test]
    fn prop_tree_batch_matches_sequential(n in 1usize..40usize) {
        let mut tree = HashTree::new(Sha256Aggregator);
        for i in 0..n {
            tree.append(format!("record{}", i).as_bytes());
        }

        let indices: Vec<u64> = (0..n as u64).collect();
        let batch = tree.proof_batch(&indices).expect("batch should succeed");
        for (i, proof) in batch.iter().enumerate() {
            prop_assert_eq!(proof, &tree.proof(i as u64).expect("proof should succeed"));
        }
        prop_assert!(verify_batch(&batch, tree.aggregator()).expect("verify should not error"));
    }

    /// Proofs round-trip through their JSON encoding
    #[test]
    fn prop_tree_proof_json_roundtrip(records in arb_records(20)) {
        prop_assume!(!records.is_empty());

        let tree = build(&records);
        let proof = tree.proof(0).expect("proof should succeed");
        let json = proof.to_json().expect("serialize should succeed");
        let parsed = grimoire_core::MembershipProof::from_json(&json)
            .expect("parse should succeed");
        prop_assert_eq!(&parsed, &proof);
        prop_assert!(parsed.verify(tree.aggregator()).expect("verify should not error"));
    }
}

// ============================================================================
// Property Tests: Error Cases
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Proof for an out-of-range leaf index fails
    #[test]
    fn prop_tree_proof_out_of_range(n in 1usize..50usize) {
        let mut tree = HashTree::new(Sha256Aggregator);
        for i in 0..n {
            tree.append(format!("record{}", i).as_bytes());
        }
        prop_assert!(tree.proof(n as u64).is_err());
        prop_assert!(tree.proof(n as u64 + 100).is_err());
    }

    /// Installing a digest over a live node fails without mutating
    #[test]
    fn prop_tree_put_hash_occupied(n in 1usize..30usize) {
        let mut tree = HashTree::new(Sha256Aggregator);
        for i in 0..n {
            tree.append(format!("record{}", i).as_bytes());
        }

        let before = tree.root_commitment();
        let digest = Sha256Aggregator.hash_leaf(b"intruder");
        prop_assert!(tree.put_hash(1, digest).is_err());
        prop_assert_eq!(tree.root_commitment(), before);
    }
}

// ============================================================================
// Property Tests: Tamper Detection
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    /// Modifying the record bytes causes verification failure
    #[test]
    fn prop_tree_tampered_record_fails(records in arb_records(20)) {
        prop_assume!(!records.is_empty());

        let tree = build(&records);
        let mut proof = tree.proof(0).expect("proof should succeed");

        let mut forged = proof.member_data.clone().unwrap_or_default();
        forged.push(0xFF);
        proof.member_data = Some(forged);

        let result = proof.verify(tree.aggregator());
        prop_assert!(result.is_err() || !result.unwrap());
    }

    /// Modifying the member's own pruned entry causes verification failure
    #[test]
    fn prop_tree_tampered_member_entry_fails(n in 1usize..30usize) {
        let mut tree = HashTree::new(Sha256Aggregator);
        for i in 0..n {
            tree.append(format!("record{}", i).as_bytes());
        }

        let mut proof = tree.proof(0).expect("proof should succeed");
        proof.pruned_tree[0].hash = Sha256Aggregator.hash_leaf(b"tampered");

        let result = proof.verify(tree.aggregator());
        prop_assert!(result.is_err() || !result.unwrap());
    }

    /// Modifying a sibling digest causes verification failure
    #[test]
    fn prop_tree_tampered_sibling_fails(n in 2usize..30usize) {
        let mut tree = HashTree::new(Sha256Aggregator);
        for i in 0..n {
            tree.append(format!("record{}", i).as_bytes());
        }

        let mut proof = tree.proof(0).expect("proof should succeed");
        if proof.pruned_tree.len() > 1 {
            // Tamper with the first sibling on the path
            proof.pruned_tree[1].hash = Sha256Aggregator.hash_leaf(b"tampered");

            let result = proof.verify(tree.aggregator());
            prop_assert!(result.is_err() || !result.unwrap());
        }
    }

    /// A proof never verifies against a different tree's commitment
    #[test]
    fn prop_tree_proof_bound_to_commitment(
        records1 in arb_records(15),
        records2 in arb_records(15)
    ) {
        prop_assume!(!records1.is_empty() && !records2.is_empty() && records1 != records2);

        let tree1 = build(&records1);
        let tree2 = build(&records2);

        let mut proof = tree1.proof(0).expect("proof should succeed");
        proof.commitment = tree2.root_commitment().unwrap();

        let result = proof.verify(tree1.aggregator());
        prop_assert!(result.is_err() || !result.unwrap());
    }
}
