//! Merkle tree construction and proof generation

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{hasher::Keccak256Hasher, Hash};

/// Errors from tree construction and proof generation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MerkleError {
    /// No leaves were supplied.
    #[error("cannot build a Merkle tree with no leaves")]
    EmptyLeaves,

    /// The requested leaf is not part of the tree.
    #[error("leaf not found in tree")]
    LeafNotFound,
}

/// Pairing policies captured at construction time.
///
/// `sorted_pairs` orders each sibling pair bytewise before hashing, so the
/// root becomes independent of leaf order within a pair. `sort_leaves`
/// sorts the whole leaf set bytewise before building. Defaults are false,
/// matching merkletreejs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreeOptions {
    /// Sort each sibling pair before hashing.
    pub sorted_pairs: bool,
    /// Sort the leaf set before building the tree.
    pub sort_leaves: bool,
}

/// Binary Merkle tree, immutable once built.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    /// Leaf set in tree order (post-sorting when `sort_leaves` is set).
    leaves: Vec<Hash>,
    /// Root hash.
    root: Hash,
    /// Policies the tree was built with; reused for every proof.
    options: TreeOptions,
}

impl MerkleTree {
    /// Build a tree from a non-empty leaf set.
    ///
    /// The input is copied, never mutated. A single-leaf tree has the leaf
    /// itself as root, with no hashing.
    pub fn build(leaves: &[Hash], options: TreeOptions) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyLeaves);
        }

        let mut leaves = leaves.to_vec();
        if options.sort_leaves {
            leaves.sort_unstable();
        }

        let mut level = leaves.clone();
        while level.len() > 1 {
            level = Self::next_level(&level, options);
        }

        Ok(Self {
            leaves,
            root: level[0],
            options,
        })
    }

    /// Root hash.
    pub fn root(&self) -> Hash {
        self.root
    }

    /// Root as a `0x`-prefixed lowercase hex string.
    pub fn root_hex(&self) -> String {
        format!("0x{}", hex::encode(self.root))
    }

    /// Leaf set in tree order.
    pub fn leaves(&self) -> &[Hash] {
        &self.leaves
    }

    /// Options the tree was built with.
    pub fn options(&self) -> TreeOptions {
        self.options
    }

    /// Generate an inclusion proof for a leaf, sibling hashes leaf-to-root.
    ///
    /// The first positional match is used when the tree contains duplicate
    /// leaf values. A level where the target is the promoted trailing node
    /// contributes no proof element.
    pub fn prove_inclusion(&self, leaf: &Hash) -> Result<Vec<Hash>, MerkleError> {
        let mut index = self
            .leaves
            .iter()
            .position(|l| l == leaf)
            .ok_or(MerkleError::LeafNotFound)?;

        let mut proof = Vec::new();
        let mut level = self.leaves.clone();
        while level.len() > 1 {
            if index % 2 == 0 {
                if index + 1 < level.len() {
                    proof.push(level[index + 1]);
                }
            } else {
                proof.push(level[index - 1]);
            }
            level = Self::next_level(&level, self.options);
            index /= 2;
        }

        Ok(proof)
    }

    /// Hash a sibling pair, bytewise-ordering it first when `sorted_pairs`.
    pub(crate) fn hash_pair(left: &Hash, right: &Hash, sorted_pairs: bool) -> Hash {
        if sorted_pairs && left > right {
            Keccak256Hasher::hash_pair(right, left)
        } else {
            Keccak256Hasher::hash_pair(left, right)
        }
    }

    /// Reduce one level to the next; an unpaired trailing node is promoted.
    fn next_level(level: &[Hash], options: TreeOptions) -> Vec<Hash> {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        for pair in level.chunks(2) {
            match pair {
                [left, right] => next.push(Self::hash_pair(left, right, options.sorted_pairs)),
                [promoted] => next.push(*promoted),
                _ => unreachable!("chunks(2) yields one- or two-element slices"),
            }
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify_proof;

    fn leaf(byte: u8) -> Hash {
        [byte; 32]
    }

    const UNSORTED: TreeOptions = TreeOptions {
        sorted_pairs: false,
        sort_leaves: false,
    };

    #[test]
    fn test_empty_leaves_rejected() {
        assert_eq!(
            MerkleTree::build(&[], UNSORTED).unwrap_err(),
            MerkleError::EmptyLeaves
        );
    }

    #[test]
    fn test_single_leaf_root_is_leaf() {
        let tree = MerkleTree::build(&[leaf(0xab)], UNSORTED).unwrap();
        assert_eq!(tree.root(), leaf(0xab));
        assert!(tree.prove_inclusion(&leaf(0xab)).unwrap().is_empty());
    }

    #[test]
    fn test_two_leaf_root_pinned() {
        // keccak256(0x11 * 32 || 0x22 * 32), captured from the reference run
        let tree = MerkleTree::build(&[leaf(0x11), leaf(0x22)], UNSORTED).unwrap();
        assert_eq!(
            tree.root_hex(),
            "0x3e92e0db88d6afea9edc4eedf62fffa4d92bcdfc310dccbe943747fe8302e871"
        );

        let reversed = MerkleTree::build(&[leaf(0x22), leaf(0x11)], UNSORTED).unwrap();
        assert_eq!(
            reversed.root_hex(),
            "0x0d8c8ba03a470ae3c6c53ae06d1eed489e82dac65ea22376b0712d618c582236"
        );
    }

    #[test]
    fn test_sorted_pairs_root_is_order_independent() {
        let options = TreeOptions {
            sorted_pairs: true,
            sort_leaves: false,
        };
        let forward = MerkleTree::build(&[leaf(0x11), leaf(0x22)], options).unwrap();
        let reversed = MerkleTree::build(&[leaf(0x22), leaf(0x11)], options).unwrap();
        assert_eq!(forward.root(), reversed.root());
        // the ordered pair hashes identically to the unsorted forward build
        assert_eq!(
            forward.root_hex(),
            "0x3e92e0db88d6afea9edc4eedf62fffa4d92bcdfc310dccbe943747fe8302e871"
        );
    }

    #[test]
    fn test_sort_leaves_reorders_stored_leaves() {
        let options = TreeOptions {
            sorted_pairs: false,
            sort_leaves: true,
        };
        let tree = MerkleTree::build(&[leaf(0x22), leaf(0x11)], options).unwrap();
        assert_eq!(tree.leaves(), &[leaf(0x11), leaf(0x22)]);
        assert_eq!(
            tree.root_hex(),
            "0x3e92e0db88d6afea9edc4eedf62fffa4d92bcdfc310dccbe943747fe8302e871"
        );
    }

    #[test]
    fn test_three_leaf_promotion_root_pinned() {
        // keccak256(keccak256(a || b) || c): the odd leaf is promoted, not
        // hashed against itself
        let tree = MerkleTree::build(&[leaf(0x11), leaf(0x22), leaf(0x33)], UNSORTED).unwrap();
        assert_eq!(
            tree.root_hex(),
            "0x54cc47e0e0577877f9bdb2727df082c5f7a97451f4dd1695cbbfde937f4376c4"
        );
    }

    #[test]
    fn test_three_leaf_proof_shapes() {
        let leaves = [leaf(0x11), leaf(0x22), leaf(0x33)];
        let tree = MerkleTree::build(&leaves, UNSORTED).unwrap();
        let first_pair = Keccak256Hasher::hash_pair(&leaves[0], &leaves[1]);

        // the promoted third leaf pairs only at the top level
        assert_eq!(tree.prove_inclusion(&leaves[2]).unwrap(), vec![first_pair]);

        // the paired leaves carry their partner plus the promoted leaf
        assert_eq!(
            tree.prove_inclusion(&leaves[0]).unwrap(),
            vec![leaves[1], leaves[2]]
        );
        assert_eq!(
            tree.prove_inclusion(&leaves[1]).unwrap(),
            vec![leaves[0], leaves[2]]
        );
    }

    #[test]
    fn test_leaf_not_found() {
        let tree = MerkleTree::build(&[leaf(0x11), leaf(0x22)], UNSORTED).unwrap();
        assert_eq!(
            tree.prove_inclusion(&leaf(0x99)).unwrap_err(),
            MerkleError::LeafNotFound
        );
    }

    #[test]
    fn test_all_proofs_verify_under_all_options() {
        let option_grid = [(false, false), (false, true), (true, false), (true, true)];
        for count in 1..=8usize {
            let leaves: Vec<Hash> = (0..count).map(|i| leaf(i as u8 + 1)).collect();
            for (sorted_pairs, sort_leaves) in option_grid {
                let options = TreeOptions {
                    sorted_pairs,
                    sort_leaves,
                };
                let tree = MerkleTree::build(&leaves, options).unwrap();
                for l in &leaves {
                    let proof = tree.prove_inclusion(l).unwrap();
                    assert!(
                        verify_proof(&tree.root(), l, &proof, options),
                        "count={count} sorted_pairs={sorted_pairs} sort_leaves={sort_leaves}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_duplicate_leaves_use_first_position() {
        let leaves = [leaf(0x11), leaf(0x11), leaf(0x22)];
        let tree = MerkleTree::build(&leaves, UNSORTED).unwrap();
        // index 0 wins, so the proof pairs with the duplicate at index 1
        assert_eq!(
            tree.prove_inclusion(&leaf(0x11)).unwrap(),
            vec![leaf(0x11), leaf(0x22)]
        );
    }

    #[test]
    fn test_input_slice_not_mutated() {
        let leaves = vec![leaf(0x22), leaf(0x11)];
        let options = TreeOptions {
            sorted_pairs: false,
            sort_leaves: true,
        };
        let _tree = MerkleTree::build(&leaves, options).unwrap();
        assert_eq!(leaves, vec![leaf(0x22), leaf(0x11)]);
    }

    #[test]
    fn test_options_json_field_names() {
        let options: TreeOptions =
            serde_json::from_str(r#"{"sortedPairs":true,"sortLeaves":false}"#).unwrap();
        assert!(options.sorted_pairs);
        assert!(!options.sort_leaves);
    }
}
