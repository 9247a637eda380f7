//! Canonical leaf encoding
//!
//! A version-1 leaf preimage is the packed concatenation
//! `0x01 || oneSigId (8 bytes BE) || target address (left-padded to 32)
//! || nonce (8 bytes BE) || abi.encode(calls)`, and the leaf commitment is
//! `keccak256(keccak256(preimage))`. The inner hash is what the batch
//! signer commits to; the outer one mirrors the verifier contract hashing
//! the submitted preimage once more.

use onesig_merkle::{Keccak256Hasher, Leaf};

use crate::{abi, error::EncodeError, num, types::LeafRecord};

/// Version byte prefixed to every v1 leaf preimage.
pub const LEAF_ENCODING_VERSION: u8 = 1;

/// Encode a record into its 32-byte leaf commitment.
///
/// Only version 1 is defined. Deterministic: identical input always yields
/// the identical leaf.
pub fn encode_leaf(record: &LeafRecord, version: u32) -> Result<Leaf, EncodeError> {
    match version {
        1 => encode_leaf_v1(record),
        other => Err(EncodeError::UnsupportedVersion(other)),
    }
}

fn encode_leaf_v1(record: &LeafRecord) -> Result<Leaf, EncodeError> {
    // both identifiers must fit their 8-byte slots; wider values are an
    // error, never truncated
    let one_sig_id = num::parse_u64("oneSigId", &record.one_sig_id)?;
    let nonce = num::parse_u64("nonce", &record.nonce)?;
    let target = abi::parse_address("targetOneSigAddress", &record.target_one_sig_address)?;
    let calls = abi::encode_calls(&record.calls)?;

    let mut preimage = Vec::with_capacity(1 + 8 + 32 + 8 + calls.len());
    preimage.push(LEAF_ENCODING_VERSION);
    preimage.extend_from_slice(&one_sig_id.to_be_bytes());
    preimage.extend_from_slice(&[0u8; 12]);
    preimage.extend_from_slice(target.as_slice());
    preimage.extend_from_slice(&nonce.to_be_bytes());
    preimage.extend_from_slice(&calls);

    Ok(Keccak256Hasher::hash(&Keccak256Hasher::hash(&preimage)))
}
