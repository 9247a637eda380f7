//! OneSig Merkle root generator
//!
//! Encodes OneSig transaction-batch records into leaf commitments, builds
//! the Merkle tree, and emits the root plus one inclusion proof per leaf as
//! JSON. Pre-encoded leaves and standalone proof verification are also
//! supported.

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::info;

use onesig_core::{encode_leaf, LeafRecord};
use onesig_merkle::{verify_proof, Hash, MerkleTree, TreeOptions};

#[derive(Parser, Debug)]
#[command(name = "onesig-cli", version, about = "OneSig Merkle root and proof generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode leaves from a JSON batch file and build the Merkle tree
    Encode {
        /// Path to the JSON file containing the leaves
        #[arg(short = 'f', long)]
        file_path: PathBuf,

        /// Leaf encoding version to use
        #[arg(short = 'v', long, default_value_t = 1)]
        leaf_encoding_version: u32,

        /// Sort each sibling pair before hashing
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        sorted_pairs: bool,

        /// Sort leaves before building the tree
        #[arg(long, default_value_t = false, action = ArgAction::Set)]
        sort_leaves: bool,
    },

    /// Build the Merkle tree from pre-encoded leaves
    Merkle {
        /// Path to a JSON file of encoded leaves, a comma-separated hex
        /// list, or a single hex leaf
        #[arg(short = 'i', long)]
        encoded_input: String,

        /// Sort each sibling pair before hashing
        #[arg(long, default_value_t = false, action = ArgAction::Set)]
        sorted_pairs: bool,

        /// Sort leaves before building the tree
        #[arg(long, default_value_t = false, action = ArgAction::Set)]
        sort_leaves: bool,
    },

    /// Verify one inclusion proof against a root
    Verify {
        /// Root hash as 0x-hex
        #[arg(long)]
        root: String,

        /// Leaf hash as 0x-hex
        #[arg(long)]
        leaf: String,

        /// Proof elements as comma-separated 0x-hex, leaf-to-root order
        #[arg(long, value_delimiter = ',')]
        proof: Vec<String>,

        /// Pairing policy the tree was built with
        #[arg(long, default_value_t = false, action = ArgAction::Set)]
        sorted_pairs: bool,
    },
}

/// JSON input envelope for `encode`.
#[derive(Debug, Deserialize)]
struct InputFormat {
    leaves: Vec<LeafRecord>,
}

/// JSON input envelope for `merkle` file mode.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EncodedLeavesInput {
    encoded_leaves: Vec<String>,
}

/// One proof entry in the output envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProofOutput {
    leaf: String,
    nonce: String,
    one_sig_id: String,
    target_one_sig_address: String,
    proof: Vec<String>,
}

/// Output envelope shared by `encode` and `merkle`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputFormat {
    merkle_root: String,
    proofs: Vec<ProofOutput>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Encode {
            file_path,
            leaf_encoding_version,
            sorted_pairs,
            sort_leaves,
        } => run_encode(
            &file_path,
            leaf_encoding_version,
            TreeOptions {
                sorted_pairs,
                sort_leaves,
            },
        ),
        Command::Merkle {
            encoded_input,
            sorted_pairs,
            sort_leaves,
        } => run_merkle(
            &encoded_input,
            TreeOptions {
                sorted_pairs,
                sort_leaves,
            },
        ),
        Command::Verify {
            root,
            leaf,
            proof,
            sorted_pairs,
        } => run_verify(&root, &leaf, &proof, sorted_pairs),
    }
}

fn run_encode(file_path: &Path, version: u32, options: TreeOptions) -> Result<()> {
    let data = fs::read_to_string(file_path)
        .with_context(|| format!("failed to read input file {}", file_path.display()))?;
    let input: InputFormat = serde_json::from_str(&data).context("failed to parse input JSON")?;
    validate_input(&input)?;

    let mut leaves = Vec::with_capacity(input.leaves.len());
    for record in &input.leaves {
        let leaf = encode_leaf(record, version).with_context(|| {
            format!(
                "failed to encode leaf (nonce: {}, oneSigId: {})",
                record.nonce, record.one_sig_id
            )
        })?;
        leaves.push(leaf);
    }

    let tree = MerkleTree::build(&leaves, options).context("failed to build merkle tree")?;
    info!(leaves = leaves.len(), root = %tree.root_hex(), "merkle tree built");

    let mut proofs = Vec::with_capacity(leaves.len());
    for (record, leaf) in input.leaves.iter().zip(&leaves) {
        let proof = tree.prove_inclusion(leaf)?;
        proofs.push(ProofOutput {
            leaf: hash_hex(leaf),
            nonce: record.nonce.clone(),
            one_sig_id: record.one_sig_id.clone(),
            target_one_sig_address: record.target_one_sig_address.clone(),
            proof: proof.iter().map(hash_hex).collect(),
        });
    }

    print_output(&OutputFormat {
        merkle_root: tree.root_hex(),
        proofs,
    })
}

fn run_merkle(encoded_input: &str, options: TreeOptions) -> Result<()> {
    let encoded = resolve_encoded_input(encoded_input)?;

    let mut leaves = Vec::with_capacity(encoded.len());
    for (i, hex_leaf) in encoded.iter().enumerate() {
        leaves.push(
            decode_hash(hex_leaf).with_context(|| format!("invalid encoded leaf at index {i}"))?,
        );
    }

    let tree = MerkleTree::build(&leaves, options).context("failed to build merkle tree")?;
    info!(leaves = leaves.len(), root = %tree.root_hex(), "merkle tree built");

    let mut proofs = Vec::with_capacity(leaves.len());
    for leaf in &leaves {
        let proof = tree.prove_inclusion(leaf)?;
        // record metadata is not available in merkle-only mode
        proofs.push(ProofOutput {
            leaf: hash_hex(leaf),
            nonce: String::new(),
            one_sig_id: String::new(),
            target_one_sig_address: String::new(),
            proof: proof.iter().map(hash_hex).collect(),
        });
    }

    print_output(&OutputFormat {
        merkle_root: tree.root_hex(),
        proofs,
    })
}

fn run_verify(root: &str, leaf: &str, proof: &[String], sorted_pairs: bool) -> Result<()> {
    let root = decode_hash(root).context("invalid root")?;
    let leaf = decode_hash(leaf).context("invalid leaf")?;
    let mut elements = Vec::with_capacity(proof.len());
    for (i, element) in proof.iter().enumerate() {
        elements
            .push(decode_hash(element).with_context(|| format!("invalid proof element {i}"))?);
    }

    let options = TreeOptions {
        sorted_pairs,
        sort_leaves: false,
    };
    println!("{}", verify_proof(&root, &leaf, &elements, options));
    Ok(())
}

/// Input checks the encoder does not own: presence of required fields and
/// nonce uniqueness per oneSigId.
fn validate_input(input: &InputFormat) -> Result<()> {
    if input.leaves.is_empty() {
        bail!("no leaves provided");
    }

    let mut seen_nonces: HashMap<&str, HashSet<&str>> = HashMap::new();
    for record in &input.leaves {
        if record.one_sig_id.is_empty() {
            bail!("oneSigId is required");
        }
        if record.nonce.is_empty() {
            bail!("nonce is required");
        }
        if record.target_one_sig_address.is_empty() {
            bail!("targetOneSigAddress is required");
        }
        if record.calls.is_empty() {
            bail!("at least one call is required");
        }
        if !seen_nonces
            .entry(record.one_sig_id.as_str())
            .or_default()
            .insert(record.nonce.as_str())
        {
            bail!(
                "duplicate nonce {} found for oneSigId {}",
                record.nonce,
                record.one_sig_id
            );
        }
        for (i, call) in record.calls.iter().enumerate() {
            if call.to.is_empty() {
                bail!("call {i}: 'to' address is required");
            }
        }
    }

    Ok(())
}

/// Interpret `merkle` input as a comma-separated list, a JSON file of
/// encoded leaves, or a single leaf, in that order.
fn resolve_encoded_input(input: &str) -> Result<Vec<String>> {
    if input.contains(',') {
        return Ok(input.split(',').map(|s| s.trim().to_string()).collect());
    }
    if Path::new(input).exists() {
        let data = fs::read_to_string(input)
            .with_context(|| format!("failed to read encoded leaves file {input}"))?;
        let parsed: EncodedLeavesInput =
            serde_json::from_str(&data).context("failed to parse encoded leaves JSON")?;
        return Ok(parsed.encoded_leaves);
    }
    Ok(vec![input.trim().to_string()])
}

fn decode_hash(input: &str) -> Result<Hash> {
    let digits = input
        .trim()
        .strip_prefix("0x")
        .or_else(|| input.trim().strip_prefix("0X"))
        .unwrap_or(input.trim());
    let bytes = hex::decode(digits).with_context(|| format!("invalid hex string {input:?}"))?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| anyhow!("expected 32 bytes, got {}", bytes.len()))
}

fn hash_hex(hash: &Hash) -> String {
    format!("0x{}", hex::encode(hash))
}

fn print_output(output: &OutputFormat) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(output).context("failed to marshal output")?
    );
    Ok(())
}
