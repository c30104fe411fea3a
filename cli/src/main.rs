// Copyright (c) 2026 QBridge Contributors. MIT License.
// See LICENSE for details.

//! # QBridge CLI
//!
//! Entry point for the `qbridge` binary. Parses arguments, initializes
//! logging, runs one offline command, prints its JSON result to stdout.
//!
//! - `generate-seed`  — fresh random text seed
//! - `identity`       — seed → public key and identity
//! - `parse-identity` — identity → public key
//! - `build-tx`       — seed + destination → signed, encoded transaction
//! - `decode-state`   — query response → classified contract state
//! - `layout`         — built-in contract layout as JSON

mod cli;
mod logging;

use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::json;

use qbridge_contracts::{decode_contract_state, BroadcastRequest, ContractLayout, QueryResponse};
use qbridge_protocol::crypto::derivation::{private_key_from_seed, public_key_from_seed};
use qbridge_protocol::crypto::{Ed25519Scheme, HashFunction, Seed};
use qbridge_protocol::identity::{public_key_to_identity, Identity};
use qbridge_protocol::transaction::TransactionBuilder;

use cli::{BuildTxArgs, Commands, DecodeStateArgs, QbridgeCli};

fn main() -> Result<()> {
    let cli = QbridgeCli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    let hasher = cli.hash.hasher();
    let output = match cli.command {
        Commands::GenerateSeed => json!({ "seed": Seed::generate_text() }),
        Commands::Identity(args) => derive_identity(&args.seed, hasher)?,
        Commands::ParseIdentity(args) => parse_identity(&args.identity, hasher)?,
        Commands::BuildTx(args) => build_transaction(args, hasher)?,
        Commands::DecodeState(args) => decode_state(args)?,
        Commands::Layout => to_json(&ContractLayout::bridge_v1())?,
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("failed to render output")?
    );
    Ok(())
}

fn derive_identity(seed: &str, hasher: &dyn HashFunction) -> Result<serde_json::Value> {
    let seed = Seed::from_text(seed).context("invalid seed")?;
    let public_key =
        public_key_from_seed(&seed, &Ed25519Scheme, hasher).context("key derivation failed")?;
    let identity = public_key_to_identity(&public_key, hasher);
    tracing::info!(identity = %identity, hash = hasher.name(), "identity derived");

    Ok(json!({
        "publicKey": public_key,
        "identity": identity,
        "hash": hasher.name(),
    }))
}

fn parse_identity(text: &str, hasher: &dyn HashFunction) -> Result<serde_json::Value> {
    let identity = Identity::parse(text.trim()).context("malformed identity")?;
    let public_key = identity
        .to_public_key(hasher)
        .with_context(|| format!("identity does not verify under {}", hasher.name()))?;

    Ok(json!({
        "identity": identity,
        "publicKey": public_key,
    }))
}

fn build_transaction(args: BuildTxArgs, hasher: &dyn HashFunction) -> Result<serde_json::Value> {
    let seed = Seed::from_text(&args.seed).context("invalid seed")?;
    let destination = Identity::parse(args.destination.trim()).context("malformed destination")?;
    let payload = hex::decode(args.payload_hex.trim()).context("payload is not valid hex")?;

    let source = public_key_from_seed(&seed, &Ed25519Scheme, hasher)
        .context("key derivation failed")?;
    let unsigned = TransactionBuilder::new()
        .source(source)
        .destination_identity(&destination, hasher)
        .amount(args.amount)
        .tick(args.tick)
        .input_type(args.input_type)
        .payload(payload)
        .build()
        .context("invalid transaction")?;

    let private_key = private_key_from_seed(&seed, hasher);
    let signed = unsigned
        .sign(&Ed25519Scheme, hasher, &private_key)
        .context("signing failed")?;
    drop(private_key);

    let codec = args.codec.codec();
    let id = signed.id(hasher);
    tracing::info!(id = %id, size = signed.serialized_len(), "transaction signed");

    Ok(json!({
        "id": id,
        "source": public_key_to_identity(&source, hasher),
        "header": signed.header(),
        "size": signed.serialized_len(),
        "codec": codec.name(),
        "broadcast": BroadcastRequest::new(&signed, codec),
    }))
}

fn decode_state(args: DecodeStateArgs) -> Result<serde_json::Value> {
    let layout = match &args.layout {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read layout {}", path.display()))?;
            ContractLayout::from_json(&text)
                .with_context(|| format!("invalid layout {}", path.display()))?
        }
        None => ContractLayout::bridge_v1(),
    };

    let raw = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let response = if args.envelope {
        serde_json::from_str::<QueryResponse>(&raw).context("invalid response envelope")?
    } else {
        QueryResponse {
            response_data: raw.trim().to_string(),
        }
    };
    let buffer = response
        .decode(args.codec.codec())
        .context("failed to decode response data")?;
    tracing::debug!(bytes = buffer.len(), layout = %layout.version, "decoding contract state");

    let state = decode_contract_state(&buffer, &layout).context("failed to decode contract state")?;
    for corrupt in &state.corrupt_slots {
        tracing::warn!(slot = corrupt.slot, error = %corrupt.error, "corrupt order slot");
    }

    Ok(json!({
        "summary": state.summary(),
        "state": state,
    }))
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).context("failed to serialize output")
}
