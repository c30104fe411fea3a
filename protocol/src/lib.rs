// Copyright (c) 2026 QBridge Contributors. MIT License.
// See LICENSE for details.

//! # QBridge Protocol — Core Library
//!
//! Client-side codec for a tick-based ledger: everything needed to turn a
//! secret seed into a signed, wire-ready transaction, and nothing more.
//!
//! The library never opens a socket. Callers hand us bytes (or a seed), we
//! hand back bytes (or typed values). Fetching, broadcasting, retrying and
//! pretty-printing belong to whoever embeds this crate.
//!
//! ## Architecture
//!
//! - **crypto** — Hash functions, key types, the seed → private key
//!   derivation chain, and the `SignatureScheme` capability.
//! - **identity** — 60-letter checksummed identities derived from public keys.
//! - **transaction** — Fixed-layout transaction header, builder, signing,
//!   serialization, and transport text encodings.
//! - **config** — Wire constants and derivation domains.
//!
//! ## Design Philosophy
//!
//! 1. Every byte offset lives in one place. If the ledger moves a field,
//!    there is exactly one constant to change.
//! 2. Key material is short-lived, never `Clone`, never printed.
//! 3. A signed transaction is immutable. The type system says so, not a flag.
//! 4. If it touches money, it has tests. Plural.

pub mod config;
pub mod crypto;
pub mod identity;
pub mod transaction;

pub use crypto::{
    Blake3Hasher, CryptoSuite, Digest, Ed25519Scheme, HashFunction, PrivateKey, PublicKey, Seed,
    Signature, SignatureScheme, SubSeed,
};
pub use identity::Identity;
pub use transaction::{
    Base64Codec, SignedTransaction, TransactionBuilder, TransactionError, TransactionHeader,
    TransportCodec, UnsignedTransaction,
};
