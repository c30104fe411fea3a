//! # Signature Engine
//!
//! The codec never talks to a curve library directly. It talks to a
//! [`SignatureScheme`]: derive a public key, sign a digest, verify a digest.
//! Swapping the curve means writing one new impl, not touching the
//! transaction code.
//!
//! [`Ed25519Scheme`] is the implementation we ship, backed by
//! `ed25519-dalek`. It holds no state; every call stands alone.
//!
//! ## What gets signed
//!
//! Always a 32-byte digest, never a raw transaction. The transaction module
//! computes the digest; this module only sees the result.

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use thiserror::Error;

use super::hash::Digest;
use super::keys::{PrivateKey, PublicKey, Signature};

/// Errors from the underlying signature primitive.
///
/// Intentionally vague. We don't hand attackers a detailed error oracle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// The private key was rejected by the curve implementation.
    #[error("private key rejected by {scheme}")]
    InvalidPrivateKey {
        /// Scheme that rejected it.
        scheme: &'static str,
    },

    /// The primitive refused to produce a signature.
    #[error("signing failed: {0}")]
    SigningFailed(String),
}

/// A signature capability: public key derivation, signing, verification.
///
/// Implementations must be stateless and deterministic for derivation.
/// Signing should be deterministic too; the codec does not depend on it,
/// but reproducible test vectors do.
pub trait SignatureScheme: Send + Sync {
    /// Short, stable scheme name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Derive the public key belonging to `private_key`.
    fn derive_public_key(&self, private_key: &PrivateKey) -> Result<PublicKey, SignatureError>;

    /// Sign a digest.
    fn sign(&self, digest: &Digest, private_key: &PrivateKey) -> Result<Signature, SignatureError>;

    /// Verify a signature. Returns `false` for any failure, including a
    /// malformed public key; the caller only needs yes or no.
    fn verify(&self, digest: &Digest, signature: &Signature, public_key: &PublicKey) -> bool;
}

/// Ed25519 via `ed25519-dalek`. The 32-byte private key is the Ed25519
/// secret seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ed25519Scheme;

impl Ed25519Scheme {
    fn signing_key(private_key: &PrivateKey) -> SigningKey {
        SigningKey::from_bytes(private_key.as_bytes())
    }
}

impl SignatureScheme for Ed25519Scheme {
    fn name(&self) -> &'static str {
        "Ed25519"
    }

    fn derive_public_key(&self, private_key: &PrivateKey) -> Result<PublicKey, SignatureError> {
        let signing_key = Self::signing_key(private_key);
        Ok(PublicKey::from_bytes(signing_key.verifying_key().to_bytes()))
    }

    fn sign(&self, digest: &Digest, private_key: &PrivateKey) -> Result<Signature, SignatureError> {
        let signing_key = Self::signing_key(private_key);
        let signature = signing_key
            .try_sign(digest)
            .map_err(|e| SignatureError::SigningFailed(e.to_string()))?;
        Ok(Signature::from_bytes(signature.to_bytes()))
    }

    fn verify(&self, digest: &Digest, signature: &Signature, public_key: &PublicKey) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(public_key.as_bytes()) else {
            return false;
        };
        let dalek_sig = DalekSignature::from_bytes(signature.as_bytes());
        verifying_key.verify(digest, &dalek_sig).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::blake3_hash;

    fn key(byte: u8) -> PrivateKey {
        PrivateKey::from_bytes([byte; 32])
    }

    #[test]
    fn test_sign_and_verify() {
        let scheme = Ed25519Scheme;
        let sk = key(1);
        let pk = scheme.derive_public_key(&sk).unwrap();
        let digest = blake3_hash(b"hello, world");
        let sig = scheme.sign(&digest, &sk).unwrap();
        assert!(scheme.verify(&digest, &sig, &pk));
    }

    #[test]
    fn test_wrong_digest_fails() {
        let scheme = Ed25519Scheme;
        let sk = key(2);
        let pk = scheme.derive_public_key(&sk).unwrap();
        let sig = scheme.sign(&blake3_hash(b"correct"), &sk).unwrap();
        assert!(!scheme.verify(&blake3_hash(b"wrong"), &sig, &pk));
    }

    #[test]
    fn test_wrong_key_fails() {
        let scheme = Ed25519Scheme;
        let digest = blake3_hash(b"test message");
        let sig = scheme.sign(&digest, &key(3)).unwrap();
        let other = scheme.derive_public_key(&key(4)).unwrap();
        assert!(!scheme.verify(&digest, &sig, &other));
    }

    #[test]
    fn test_deterministic_signatures() {
        let scheme = Ed25519Scheme;
        let digest = blake3_hash(b"determinism is underrated");
        let sig1 = scheme.sign(&digest, &key(5)).unwrap();
        let sig2 = scheme.sign(&digest, &key(5)).unwrap();
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn derive_public_key_is_deterministic() {
        let scheme = Ed25519Scheme;
        assert_eq!(
            scheme.derive_public_key(&key(6)).unwrap(),
            scheme.derive_public_key(&key(6)).unwrap()
        );
        assert_ne!(
            scheme.derive_public_key(&key(6)).unwrap(),
            scheme.derive_public_key(&key(7)).unwrap()
        );
    }

    #[test]
    fn rfc8032_test_vector_public_key() {
        // RFC 8032, section 7.1, TEST 1.
        let sk = PrivateKey::from_hex(
            "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60",
        )
        .unwrap();
        let pk = Ed25519Scheme.derive_public_key(&sk).unwrap();
        assert_eq!(
            pk.to_hex(),
            "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"
        );
    }

    #[test]
    fn malformed_public_key_verifies_false() {
        // Not every 32-byte string decompresses to a curve point; verify
        // must answer false rather than panic.
        let digest = blake3_hash(b"doesn't matter");
        let sig = Signature::from_bytes([0u8; 64]);
        let pk = PublicKey::from_bytes([0xFF; 32]);
        assert!(!Ed25519Scheme.verify(&digest, &sig, &pk));
    }
}
