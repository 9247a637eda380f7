//! Keccak-256 hasher

use tiny_keccak::{Hasher, Keccak};

use crate::Hash;

/// Keccak-256 hasher
pub struct Keccak256Hasher;

impl Keccak256Hasher {
    /// Hash an arbitrary byte string
    pub fn hash(data: &[u8]) -> Hash {
        let mut hasher = Keccak::v256();
        hasher.update(data);
        let mut output = [0u8; 32];
        hasher.finalize(&mut output);
        output
    }

    /// Hash two 32-byte values in the given order
    pub fn hash_pair(left: &Hash, right: &Hash) -> Hash {
        let mut hasher = Keccak::v256();
        hasher.update(left);
        hasher.update(right);
        let mut output = [0u8; 32];
        hasher.finalize(&mut output);
        output
    }
}
