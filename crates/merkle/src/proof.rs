//! Standalone proof verification

use crate::{tree::MerkleTree, Hash, TreeOptions};

/// Verify an inclusion proof against a root.
///
/// Free function on purpose: a verifier holds only the root, the leaf and
/// the sibling sequence, never a tree instance. Folds each proof element
/// into the running hash under the tree's pairing policy. An invalid proof
/// is a `false` result, not an error.
pub fn verify_proof(root: &Hash, leaf: &Hash, proof: &[Hash], options: TreeOptions) -> bool {
    let mut current = *leaf;
    for element in proof {
        current = MerkleTree::hash_pair(&current, element, options.sorted_pairs);
    }
    current == *root
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(byte: u8) -> Hash {
        [byte; 32]
    }

    fn build_case(sorted_pairs: bool) -> (MerkleTree, Vec<Hash>, TreeOptions) {
        let options = TreeOptions {
            sorted_pairs,
            sort_leaves: false,
        };
        let leaves: Vec<Hash> = (1..=5u8).map(leaf).collect();
        let tree = MerkleTree::build(&leaves, options).unwrap();
        (tree, leaves, options)
    }

    #[test]
    fn test_valid_proof_verifies() {
        for sorted_pairs in [false, true] {
            let (tree, leaves, options) = build_case(sorted_pairs);
            for l in &leaves {
                let proof = tree.prove_inclusion(l).unwrap();
                assert!(verify_proof(&tree.root(), l, &proof, options));
            }
        }
    }

    #[test]
    fn test_empty_proof_is_root_identity() {
        let options = TreeOptions::default();
        let l = leaf(0x42);
        assert!(verify_proof(&l, &l, &[], options));
        assert!(!verify_proof(&leaf(0x43), &l, &[], options));
    }

    #[test]
    fn test_tampered_leaf_fails() {
        let (tree, leaves, options) = build_case(false);
        let proof = tree.prove_inclusion(&leaves[2]).unwrap();
        let mut tampered = leaves[2];
        tampered[0] ^= 0x01;
        assert!(!verify_proof(&tree.root(), &tampered, &proof, options));
    }

    #[test]
    fn test_tampered_proof_element_fails() {
        let (tree, leaves, options) = build_case(false);
        let mut proof = tree.prove_inclusion(&leaves[2]).unwrap();
        proof[1][31] ^= 0x80;
        assert!(!verify_proof(&tree.root(), &leaves[2], &proof, options));
    }

    #[test]
    fn test_tampered_root_fails() {
        let (tree, leaves, options) = build_case(false);
        let proof = tree.prove_inclusion(&leaves[0]).unwrap();
        let mut root = tree.root();
        root[16] ^= 0x10;
        assert!(!verify_proof(&root, &leaves[0], &proof, options));
    }

    #[test]
    fn test_wrong_policy_fails() {
        // built sorted, the pair hashes as (0x11.., 0x22..); verifying the
        // 0x22.. leaf positionally hashes the other order and must miss
        let sorted = TreeOptions {
            sorted_pairs: true,
            sort_leaves: false,
        };
        let tree = MerkleTree::build(&[leaf(0x22), leaf(0x11)], sorted).unwrap();
        let proof = tree.prove_inclusion(&leaf(0x22)).unwrap();
        assert!(verify_proof(&tree.root(), &leaf(0x22), &proof, sorted));

        let positional = TreeOptions {
            sorted_pairs: false,
            sort_leaves: false,
        };
        assert!(!verify_proof(&tree.root(), &leaf(0x22), &proof, positional));
    }

    #[test]
    fn test_truncated_proof_fails() {
        let (tree, leaves, options) = build_case(false);
        let proof = tree.prove_inclusion(&leaves[0]).unwrap();
        assert!(!verify_proof(
            &tree.root(),
            &leaves[0],
            &proof[..proof.len() - 1],
            options
        ));
    }
}
