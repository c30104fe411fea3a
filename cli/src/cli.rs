//! # CLI Interface
//!
//! Argument structure for the `qbridge` binary, via `clap` derive. Every
//! subcommand works offline and prints one JSON document to stdout.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use qbridge_protocol::crypto::{Blake3Hasher, HashFunction, Sha256Hasher};
use qbridge_protocol::transaction::{Base64Codec, HexCodec, TransportCodec};

use crate::logging::LogFormat;

/// QBridge offline tool.
///
/// Derives identities, builds and signs bridge transactions, and decodes
/// contract state snapshots. Never talks to the network; feed it RPC
/// responses and hand its output to whatever does.
#[derive(Parser, Debug)]
#[command(
    name = "qbridge",
    about = "QBridge key, transaction and contract-state tool",
    version,
    propagate_version = true
)]
pub struct QbridgeCli {
    /// Log format on stderr.
    #[arg(
        long,
        global = true,
        env = "QBRIDGE_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,

    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, global = true, env = "QBRIDGE_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Hash function for key derivation, checksums and digests.
    #[arg(
        long,
        global = true,
        env = "QBRIDGE_HASH",
        value_enum,
        default_value_t = HashChoice::Blake3
    )]
    pub hash: HashChoice,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a fresh 55-letter text seed.
    GenerateSeed,
    /// Derive the public key and identity for a seed.
    Identity(IdentityArgs),
    /// Parse an identity back to its public key, checking the checksum.
    ParseIdentity(ParseIdentityArgs),
    /// Build, sign and encode a transaction for broadcast.
    BuildTx(BuildTxArgs),
    /// Decode a contract query response into classified state.
    DecodeState(DecodeStateArgs),
    /// Print the built-in contract layout as JSON.
    Layout,
}

/// Arguments for `identity`.
#[derive(Args, Debug)]
pub struct IdentityArgs {
    /// 55-letter lowercase text seed.
    #[arg(long, env = "QBRIDGE_SEED", hide_env_values = true)]
    pub seed: String,
}

/// Arguments for `parse-identity`.
#[derive(Args, Debug)]
pub struct ParseIdentityArgs {
    /// 60-letter uppercase identity.
    pub identity: String,
}

/// Arguments for `build-tx`.
#[derive(Args, Debug)]
pub struct BuildTxArgs {
    /// Text seed of the source identity.
    #[arg(long, env = "QBRIDGE_SEED", hide_env_values = true)]
    pub seed: String,

    /// Destination identity.
    #[arg(long)]
    pub destination: String,

    /// Amount to transfer. Negative or oversized values are rejected.
    #[arg(long, allow_negative_numbers = true)]
    pub amount: i128,

    /// Target tick.
    #[arg(long, allow_negative_numbers = true)]
    pub tick: i64,

    /// Contract input type. Zero for a plain transfer.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub input_type: i64,

    /// Hex-encoded payload.
    #[arg(long, default_value = "")]
    pub payload_hex: String,

    /// Transport encoding of the output.
    #[arg(long, value_enum, default_value_t = CodecChoice::Base64)]
    pub codec: CodecChoice,
}

/// Arguments for `decode-state`.
#[derive(Args, Debug)]
pub struct DecodeStateArgs {
    /// File holding the query response. Reads stdin when omitted.
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// The input is a `{"responseData": ...}` envelope rather than bare text.
    #[arg(long)]
    pub envelope: bool,

    /// Contract layout JSON. Uses the built-in bridge layout when omitted.
    #[arg(long, env = "QBRIDGE_LAYOUT")]
    pub layout: Option<PathBuf>,

    /// Transport encoding of the response data.
    #[arg(long, value_enum, default_value_t = CodecChoice::Base64)]
    pub codec: CodecChoice,
}

/// Selectable hash functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HashChoice {
    Blake3,
    Sha256,
    /// Needs the `k12` feature.
    #[cfg(feature = "k12")]
    K12,
}

impl HashChoice {
    pub fn hasher(self) -> &'static dyn HashFunction {
        match self {
            HashChoice::Blake3 => &Blake3Hasher,
            HashChoice::Sha256 => &Sha256Hasher,
            #[cfg(feature = "k12")]
            HashChoice::K12 => &qbridge_protocol::crypto::K12Hasher,
        }
    }
}

/// Selectable transport codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CodecChoice {
    Base64,
    Hex,
}

impl CodecChoice {
    pub fn codec(self) -> &'static dyn TransportCodec {
        match self {
            CodecChoice::Base64 => &Base64Codec,
            CodecChoice::Hex => &HexCodec,
        }
    }
}
