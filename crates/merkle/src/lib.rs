//! Binary Merkle tree over Keccak-256 commitments
//!
//! This crate builds roots and inclusion proofs that reproduce the on-chain
//! OneSig verifier bit for bit. Two independent pairing policies are
//! supported ([`TreeOptions`]): sorting each sibling pair before hashing,
//! and sorting the leaf set before building. An unpaired trailing node at an
//! odd-length level is promoted to the next level unhashed, which is what
//! lets its proof simply skip that level.

mod hasher;
mod proof;
mod tree;

pub use hasher::Keccak256Hasher;
pub use proof::verify_proof;
pub use tree::{MerkleError, MerkleTree, TreeOptions};

/// 32-byte hash type
pub type Hash = [u8; 32];

/// A leaf commitment is just a hash; the alias marks intent at API seams.
pub type Leaf = Hash;
