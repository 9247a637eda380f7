//! ABI encoding of the calls array
//!
//! Byte-for-byte equivalent of Solidity `abi.encode(_calls)` for
//! `(address to, uint256 value, bytes data)[]`, which is what the on-chain
//! verifier hashes. Layout: one top-level offset word pointing at the array
//! body, the 32-byte element count, one offset per tuple relative to the
//! word after the count, then the tuple encodings in input order. Each
//! tuple is `to` right-aligned in 32 bytes, `value` as a 32-byte big-endian
//! word, and the dynamic `data` tail (length word plus bytes zero-padded to
//! a 32-byte boundary).

use alloy_primitives::{Address, U256};

use crate::{error::EncodeError, types::Call};

const WORD: usize = 32;

/// Encode an ordered sequence of calls. Pure function of its input.
pub fn encode_calls(calls: &[Call]) -> Result<Vec<u8>, EncodeError> {
    let mut tuples = Vec::with_capacity(calls.len());
    for call in calls {
        tuples.push(encode_call(call)?);
    }

    let tail_len: usize = tuples.iter().map(Vec::len).sum();
    let mut out = Vec::with_capacity(2 * WORD + calls.len() * WORD + tail_len);

    // single dynamic argument: its head is one offset to the array body
    out.extend_from_slice(&uint_word(U256::from(WORD)));
    out.extend_from_slice(&uint_word(U256::from(calls.len())));

    let mut offset = calls.len() * WORD;
    for tuple in &tuples {
        out.extend_from_slice(&uint_word(U256::from(offset)));
        offset += tuple.len();
    }
    for tuple in &tuples {
        out.extend_from_slice(tuple);
    }

    Ok(out)
}

fn encode_call(call: &Call) -> Result<Vec<u8>, EncodeError> {
    let to = parse_address("to", &call.to)?;
    let data = decode_hex("data", &call.data)?;
    let padding = (WORD - data.len() % WORD) % WORD;

    let mut enc = Vec::with_capacity(4 * WORD + data.len() + padding);
    enc.extend_from_slice(&address_word(&to));
    enc.extend_from_slice(&uint_word(call.value.0));
    // `data` is the only dynamic tuple field, so it sits right after the
    // three head words
    enc.extend_from_slice(&uint_word(U256::from(3 * WORD)));
    enc.extend_from_slice(&uint_word(U256::from(data.len())));
    enc.extend_from_slice(&data);
    enc.resize(enc.len() + padding, 0);
    Ok(enc)
}

/// Parse a `0x`-prefixed 40-hex-digit address, rejecting any other length.
pub fn parse_address(field: &'static str, input: &str) -> Result<Address, EncodeError> {
    let bytes = decode_hex(field, input)?;
    if bytes.len() != Address::len_bytes() {
        return Err(EncodeError::InvalidAddress {
            field,
            value: input.to_string(),
        });
    }
    Ok(Address::from_slice(&bytes))
}

/// Decode a hex string, with or without the `0x` prefix.
pub fn decode_hex(field: &'static str, input: &str) -> Result<Vec<u8>, EncodeError> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    hex::decode(digits).map_err(|_| EncodeError::MalformedHex {
        field,
        value: input.to_string(),
    })
}

fn uint_word(value: U256) -> [u8; 32] {
    value.to_be_bytes::<32>()
}

fn address_word(address: &Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_slice());
    word
}
