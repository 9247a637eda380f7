//! OneSig batch data model
//!
//! Field names mirror the JSON envelope consumed by the CLI. Numeric fields
//! that the encoder must bounds-check itself (`oneSigId`, `nonce`) stay
//! strings so their parse errors surface from the encoding step; the call
//! `value` is normalized to a 256-bit integer at parse time.

use serde::{Deserialize, Serialize};

use crate::num::Uint;

/// A single call executed by the target OneSig contract.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Call {
    /// Callee address as a `0x`-prefixed 40-hex-digit string.
    pub to: String,
    /// Native value forwarded with the call; zero when absent.
    #[serde(default)]
    pub value: Uint,
    /// Calldata as a `0x`-prefixed hex string; may be empty or absent.
    #[serde(default)]
    pub data: String,
}

/// One transaction-batch entry, the unit a leaf commits to.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafRecord {
    /// Batch nonce, decimal or `0x`-hex string; must fit in 64 bits.
    pub nonce: String,
    /// Target chain / domain identifier, decimal or `0x`-hex string; must
    /// fit in 64 bits.
    pub one_sig_id: String,
    /// Address of the OneSig contract the batch executes on.
    pub target_one_sig_address: String,
    /// Ordered, non-empty sequence of calls.
    pub calls: Vec<Call>,
}
