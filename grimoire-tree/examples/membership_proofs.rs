//! Hash tree example: append records and generate membership proofs.
//!
//! The tree is an append-only log that provides:
//! - O(log n) append
//! - O(log n) membership proofs
//! - A single root commitment that pins the whole history
//!
//! Run with: cargo run --example membership_proofs

use grimoire_core::{MembershipProof, Sha256Aggregator};
use grimoire_tree::HashTree;

fn main() -> anyhow::Result<()> {
    // Create a tree over the SHA256 scheme
    let mut tree = HashTree::new(Sha256Aggregator);

    println!("=== Tamper-Evident Log Demo ===\n");

    // Append some records
    let records = ["event-1", "event-2", "event-3", "event-4", "event-5"];
    let mut indices = Vec::new();

    for record in &records {
        let index = tree.append(record.as_bytes());
        indices.push(index);
        println!("Appended '{}' at leaf index {}", record, index);
    }

    println!("\nTree Stats:");
    println!("  Height: {}", tree.height());
    println!("  Leaf count: {}", tree.leaf_count());
    println!("  Total nodes: {}", tree.node_count());
    println!("  Root: {:?}", tree.root_commitment());

    // Generate and verify membership proofs
    println!("\n=== Membership Proofs ===\n");

    for (i, &index) in indices.iter().enumerate() {
        let proof = tree.proof(index)?;
        let is_valid = proof.verify(tree.aggregator())?;

        println!(
            "Proof for '{}' (leaf {}): {} path entries, valid: {}",
            records[i],
            index,
            proof.pruned_tree.len(),
            is_valid
        );
    }

    // Keep appending; old indices stay valid
    println!("\n=== Growth ===\n");

    for i in 6..=10 {
        tree.append(format!("event-{}", i).as_bytes());
    }
    println!("Appended 5 more records");
    println!("New height: {}", tree.height());
    println!("New leaf count: {}", tree.leaf_count());
    println!("New root: {:?}", tree.root_commitment());

    let refreshed = tree.proof(indices[0])?;
    println!(
        "Refreshed proof for '{}' still valid: {}",
        records[0],
        refreshed.verify(tree.aggregator())?
    );

    // Demonstrate proof portability
    println!("\n=== Proof Portability ===\n");

    let proof = tree.proof(indices[0])?;
    let serialized = proof.to_json()?;
    println!("Serialized proof size: {} bytes", serialized.len());

    // Anyone holding the commitment can verify without the tree
    let received = MembershipProof::from_json(&serialized)?;
    println!("Parsed proof targets commitment: {}", received.commitment);
    println!(
        "Standalone verification: {}",
        received.verify(&Sha256Aggregator)?
    );

    Ok(())
}
