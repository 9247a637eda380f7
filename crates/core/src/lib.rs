//! Leaf encoding for OneSig transaction batches
//!
//! This crate turns a batch record into the 32-byte commitment the OneSig
//! verifier contract checks Merkle proofs against: canonical ABI encoding of
//! the calls array, the packed version-1 preimage, and the double keccak
//! reduction. Tree building and proofs live in `onesig-merkle`.

pub mod abi;
pub mod encode;
pub mod error;
pub mod num;
pub mod types;

pub use encode::{encode_leaf, LEAF_ENCODING_VERSION};
pub use error::EncodeError;
pub use num::Uint;
pub use types::{Call, LeafRecord};
