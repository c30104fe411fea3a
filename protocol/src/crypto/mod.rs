//! # Cryptographic Primitives
//!
//! Every key, every digest, every signature in the codec flows through here.
//!
//! - **hash** — The [`HashFunction`] capability plus BLAKE3 and SHA-256
//!   implementations.
//! - **keys** — Typed seeds, sub-seeds, private keys, public keys, signatures.
//! - **derivation** — The one-way seed → private key chain.
//! - **signatures** — The [`SignatureScheme`] capability and its Ed25519
//!   implementation.
//!
//! [`CryptoSuite`] bundles one scheme with one hash function so the rest of
//! the crate can pass a single value around.
//!
//! ## A note on "rolling your own crypto"
//!
//! We don't. Everything here is a thin, type-safe wrapper around audited
//! implementations.

pub mod derivation;
pub mod hash;
pub mod keys;
pub mod signatures;

pub use derivation::{derive_private_key, derive_public_key, derive_sub_seed};
pub use hash::{Blake3Hasher, Digest, HashFunction, Sha256Hasher};
#[cfg(feature = "k12")]
pub use hash::K12Hasher;
pub use keys::{KeyError, PrivateKey, PublicKey, Seed, Signature, SubSeed};
pub use signatures::{Ed25519Scheme, SignatureError, SignatureScheme};

use crate::identity::{public_key_to_identity, Identity};

/// A signature scheme paired with the hash function used for key derivation,
/// identity checksums and transaction digests.
///
/// Stateless. Copy it, share it across threads, construct it per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct CryptoSuite<S = Ed25519Scheme, H = Blake3Hasher> {
    /// Signs, verifies, derives public keys.
    pub scheme: S,
    /// Digests and derives.
    pub hasher: H,
}

impl<S: SignatureScheme, H: HashFunction> CryptoSuite<S, H> {
    /// Pair a scheme with a hash function.
    pub fn new(scheme: S, hasher: H) -> Self {
        Self { scheme, hasher }
    }

    /// Seed → private key.
    pub fn private_key(&self, seed: &Seed) -> PrivateKey {
        derivation::private_key_from_seed(seed, &self.hasher)
    }

    /// Seed → public key.
    pub fn public_key(&self, seed: &Seed) -> Result<PublicKey, SignatureError> {
        derivation::public_key_from_seed(seed, &self.scheme, &self.hasher)
    }

    /// Public key → identity.
    pub fn identity(&self, public_key: &PublicKey) -> Identity {
        public_key_to_identity(public_key, &self.hasher)
    }

    /// Seed → identity, the whole chain. Nothing secret survives the call.
    pub fn identity_from_seed(&self, seed: &Seed) -> Result<Identity, SignatureError> {
        let public_key = self.public_key(seed)?;
        Ok(self.identity(&public_key))
    }
}
