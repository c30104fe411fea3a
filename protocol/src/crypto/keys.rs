//! # Key Material
//!
//! Typed wrappers for every stage of the key chain:
//!
//! ```text
//! Seed ──► SubSeed ──► PrivateKey ──► PublicKey ──► Identity
//! ```
//!
//! The secret stages ([`Seed`], [`SubSeed`], [`PrivateKey`]) share a few
//! rules:
//!
//! - They are not `Clone`. Every copy of a secret is another thing to protect.
//! - `Debug` prints a redacted placeholder.
//! - Their bytes are overwritten when they drop.
//! - They are never logged. If you add logging to this module, you will be
//!   asked to leave.
//!
//! [`PublicKey`] and [`Signature`] are public values: `Copy`, hashable,
//! hex-serialized.

use rand::rngs::OsRng;
use rand::Rng;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use crate::config::{KEY_LENGTH, SIGNATURE_LENGTH, TEXT_SEED_LENGTH};

/// Errors raised while validating key material.
///
/// Messages describe shapes (lengths, alphabets), never contents.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// A fixed-width value was built from a slice of the wrong length.
    #[error("invalid {kind} length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Which kind of value was being built.
        kind: &'static str,
        /// Required width.
        expected: usize,
        /// Width actually supplied.
        got: usize,
    },

    /// The seed is empty or not in the canonical text form.
    #[error("invalid seed: {0}")]
    InvalidSeed(String),

    /// The identity string is malformed or its checksum does not match.
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),
}

fn fixed<const N: usize>(kind: &'static str, slice: &[u8]) -> Result<[u8; N], KeyError> {
    if slice.len() != N {
        return Err(KeyError::InvalidLength {
            kind,
            expected: N,
            got: slice.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    Ok(out)
}

// ---------------------------------------------------------------------------
// Seed
// ---------------------------------------------------------------------------

/// The root secret. Opaque bytes supplied by the caller.
///
/// Ledger wallets usually carry seeds as 55 lowercase letters; use
/// [`Seed::from_text`] for those. Any other non-empty byte string is
/// accepted by [`Seed::from_bytes`].
pub struct Seed {
    bytes: Vec<u8>,
}

impl Seed {
    /// Wrap raw seed bytes. Empty input is rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.is_empty() {
            return Err(KeyError::InvalidSeed("seed is empty".into()));
        }
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    /// Parse a canonical text seed: exactly 55 characters `a`–`z`.
    ///
    /// Each letter becomes its alphabet index (`a` = 0 … `z` = 25); the
    /// resulting 55 bytes are the seed material.
    pub fn from_text(text: &str) -> Result<Self, KeyError> {
        if text.len() != TEXT_SEED_LENGTH {
            return Err(KeyError::InvalidSeed(format!(
                "expected {} letters, got {}",
                TEXT_SEED_LENGTH,
                text.len()
            )));
        }
        let mut bytes = Vec::with_capacity(TEXT_SEED_LENGTH);
        for (position, c) in text.bytes().enumerate() {
            if !c.is_ascii_lowercase() {
                return Err(KeyError::InvalidSeed(format!(
                    "character at position {} is not in a-z",
                    position
                )));
            }
            bytes.push(c - b'a');
        }
        Ok(Self { bytes })
    }

    /// Generate a fresh text seed from the OS RNG.
    ///
    /// Returns the text form; the caller decides where (and whether) it is
    /// stored. Feed it back through [`Seed::from_text`] to use it.
    pub fn generate_text() -> String {
        let mut rng = OsRng;
        (0..TEXT_SEED_LENGTH)
            .map(|_| (b'a' + rng.gen_range(0..26u8)) as char)
            .collect()
    }

    /// The raw seed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed(<redacted {} bytes>)", self.bytes.len())
    }
}

impl Drop for Seed {
    fn drop(&mut self) {
        self.bytes.fill(0);
    }
}

// ---------------------------------------------------------------------------
// SubSeed / PrivateKey
// ---------------------------------------------------------------------------

/// First one-way expansion of a [`Seed`].
pub struct SubSeed {
    bytes: [u8; KEY_LENGTH],
}

impl SubSeed {
    /// Wrap exactly 32 bytes.
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Validate and wrap a 32-byte slice.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        fixed("sub-seed", slice).map(Self::from_bytes)
    }

    /// The raw bytes. Handle with care.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.bytes
    }
}

impl fmt::Debug for SubSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SubSeed(<redacted>)")
    }
}

impl Drop for SubSeed {
    fn drop(&mut self) {
        self.bytes.fill(0);
    }
}

/// The signing secret. Produced from a [`SubSeed`], consumed by a
/// [`SignatureScheme`](super::SignatureScheme).
pub struct PrivateKey {
    bytes: [u8; KEY_LENGTH],
}

impl PrivateKey {
    /// Wrap exactly 32 bytes.
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Validate and wrap a 32-byte slice.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        fixed("private key", slice).map(Self::from_bytes)
    }

    /// Parse a hex-encoded private key.
    ///
    /// For test fixtures and devnet tooling. Please don't keep hex private
    /// keys in config files for anything that holds real value.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str)
            .map_err(|_| KeyError::InvalidLength {
                kind: "private key",
                expected: KEY_LENGTH,
                got: hex_str.len() / 2,
            })?;
        Self::try_from_slice(&bytes)
    }

    /// The raw bytes. Handle with extreme care.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.bytes
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.bytes.fill(0);
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// The public half of a key pair. Safe to share, log, print.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey {
    bytes: [u8; KEY_LENGTH],
}

impl PublicKey {
    /// Wrap exactly 32 bytes.
    pub const fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Validate and wrap a 32-byte slice.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        fixed("public key", slice).map(Self::from_bytes)
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.bytes
    }

    /// Hex-encoded representation. 64 characters for 32 bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse a hex-encoded public key.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidLength {
            kind: "public key",
            expected: KEY_LENGTH,
            got: s.len() / 2,
        })?;
        Self::try_from_slice(&bytes)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(D::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// A 64-byte signature over a transaction digest.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    bytes: [u8; SIGNATURE_LENGTH],
}

impl Signature {
    /// Wrap exactly 64 bytes.
    pub const fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Validate and wrap a 64-byte slice.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        fixed("signature", slice).map(Self::from_bytes)
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.bytes
    }

    /// Hex-encoded signature. 128 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse a hex-encoded signature.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidLength {
            kind: "signature",
            expected: SIGNATURE_LENGTH,
            got: s.len() / 2,
        })?;
        Self::try_from_slice(&bytes)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        write!(f, "Signature({}...{})", &hex_str[..8], &hex_str[120..])
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(D::Error::custom)
    }
}
