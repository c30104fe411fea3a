//! # Hashing Utilities
//!
//! The codec needs exactly one kind of hash: a fixed 32-byte digest, with an
//! optional domain tag so that different derivation stages can reuse the
//! same primitive without their outputs ever colliding.
//!
//! That need is expressed as the [`HashFunction`] trait. Two implementations
//! ship with the crate:
//!
//! - **BLAKE3** ([`Blake3Hasher`]) — the default. Domain separation uses
//!   BLAKE3's built-in `derive_key` mode.
//! - **SHA-256** ([`Sha256Hasher`]) — for deployments that must match an
//!   external SHA-256 pipeline. Domain separation prefixes a length-tagged
//!   domain string.
//! - **KangarooTwelve** (`K12Hasher`, behind the `k12` feature) for ledgers
//!   whose native digest is K12. Domain tags are length-prefixed as for
//!   SHA-256.
//!
//! If the ledger you talk to digests transactions with something else, write
//! a third implementation. Nothing else in the crate needs to change.

use sha2::{Digest as _, Sha256};

use crate::config::DIGEST_LENGTH;

/// A fixed-width hash output.
pub type Digest = [u8; DIGEST_LENGTH];

/// A fixed-output hash function, optionally domain-separated.
///
/// Implementations must be pure: the same input always yields the same
/// digest, on every platform, forever.
pub trait HashFunction: Send + Sync {
    /// Short, stable name used in logs.
    fn name(&self) -> &'static str;

    /// Hash `data` with no domain tag.
    fn hash(&self, data: &[u8]) -> Digest;

    /// Hash `data` under `domain`. Different domains must never produce
    /// related outputs for the same data.
    fn hash_with_domain(&self, domain: &str, data: &[u8]) -> Digest;
}

/// BLAKE3-backed [`HashFunction`]. Zero-sized, stateless.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake3Hasher;

impl HashFunction for Blake3Hasher {
    fn name(&self) -> &'static str {
        "BLAKE3"
    }

    fn hash(&self, data: &[u8]) -> Digest {
        blake3_hash(data)
    }

    fn hash_with_domain(&self, domain: &str, data: &[u8]) -> Digest {
        domain_separated_hash(domain, data)
    }
}

/// SHA-256-backed [`HashFunction`]. Zero-sized, stateless.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha256Hasher;

impl HashFunction for Sha256Hasher {
    fn name(&self) -> &'static str {
        "SHA-256"
    }

    fn hash(&self, data: &[u8]) -> Digest {
        sha256_array(data)
    }

    fn hash_with_domain(&self, domain: &str, data: &[u8]) -> Digest {
        // Length-prefix the tag so ("ab", "c..") and ("a", "bc..") differ.
        let mut hasher = Sha256::new();
        hasher.update((domain.len() as u32).to_le_bytes());
        hasher.update(domain.as_bytes());
        hasher.update(data);
        let mut output = [0u8; DIGEST_LENGTH];
        output.copy_from_slice(&hasher.finalize());
        output
    }
}

/// KangarooTwelve-backed [`HashFunction`] with a 32-byte output.
#[cfg(feature = "k12")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct K12Hasher;

#[cfg(feature = "k12")]
impl HashFunction for K12Hasher {
    fn name(&self) -> &'static str {
        "K12"
    }

    fn hash(&self, data: &[u8]) -> Digest {
        k12_array(&[data])
    }

    fn hash_with_domain(&self, domain: &str, data: &[u8]) -> Digest {
        let tag_len = (domain.len() as u32).to_le_bytes();
        k12_array(&[&tag_len, domain.as_bytes(), data])
    }
}

#[cfg(feature = "k12")]
fn k12_array(parts: &[&[u8]]) -> Digest {
    use k12::digest::{ExtendableOutput, Update, XofReader};

    let mut hasher = k12::KangarooTwelve::default();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; DIGEST_LENGTH];
    hasher.finalize_xof().read(&mut output);
    output
}

/// Compute the BLAKE3 hash of the input data.
///
/// # Example
///
/// ```
/// use qbridge_protocol::crypto::hash::blake3_hash;
///
/// let hash = blake3_hash(b"tick 21395500");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn blake3_hash(data: &[u8]) -> Digest {
    *blake3::hash(data).as_bytes()
}

/// Compute the SHA-256 hash and return a fixed-size array.
pub fn sha256_array(data: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let mut output = [0u8; DIGEST_LENGTH];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// Compute a domain-separated hash using BLAKE3 with a context string.
///
/// `derive_key` mode uses an internal IV derived from the context, so
/// `domain_separated_hash("a", x)` and `domain_separated_hash("b", x)` are
/// unrelated by construction.
pub fn domain_separated_hash(context: &str, data: &[u8]) -> Digest {
    let mut hasher = blake3::Hasher::new_derive_key(context);
    hasher.update(data);
    *hasher.finalize().as_bytes()
}
