//! # Identities
//!
//! An identity is the human-facing form of a public key: 60 uppercase
//! letters, checksummed, unambiguous to read aloud.
//!
//! ```text
//! public_key (32 bytes)
//!     -> 4 × u64 little-endian fragments
//!     -> 14 base-26 digits per fragment, least significant first   (56 letters)
//!     -> low 18 bits of hash(public_key), 4 base-26 digits          (4 letters)
//! ```
//!
//! The encoding is lossless; [`Identity::to_public_key`] inverts it.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::config::{
    IDENTITY_CHECKSUM_LETTERS, IDENTITY_CHECKSUM_MASK, IDENTITY_FRAGMENT_LETTERS, IDENTITY_LENGTH,
    KEY_LENGTH,
};
use crate::crypto::hash::{Blake3Hasher, HashFunction};
use crate::crypto::keys::{KeyError, PublicKey};

/// A validated 60-letter identity string.
///
/// Construction goes through [`public_key_to_identity`] or [`Identity::parse`];
/// both guarantee the length and alphabet invariants. Only
/// [`Identity::to_public_key`] checks the checksum, because that needs the
/// hash function.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(String);

impl Identity {
    /// Validate length and alphabet. Does not check the checksum.
    pub fn parse(s: &str) -> Result<Self, KeyError> {
        if s.len() != IDENTITY_LENGTH {
            return Err(KeyError::InvalidIdentity(format!(
                "expected {} letters, got {}",
                IDENTITY_LENGTH,
                s.len()
            )));
        }
        if let Some(pos) = s.bytes().position(|b| !b.is_ascii_uppercase()) {
            return Err(KeyError::InvalidIdentity(format!(
                "character at position {} is not in A-Z",
                pos
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// Decode back to the public key, verifying the checksum with `hasher`.
    pub fn to_public_key<H>(&self, hasher: &H) -> Result<PublicKey, KeyError>
    where
        H: HashFunction + ?Sized,
    {
        let letters = self.0.as_bytes();
        let mut bytes = [0u8; KEY_LENGTH];

        for (i, chunk) in bytes.chunks_exact_mut(8).enumerate() {
            let start = i * IDENTITY_FRAGMENT_LETTERS;
            let digits = &letters[start..start + IDENTITY_FRAGMENT_LETTERS];
            let mut fragment: u64 = 0;
            // Most significant digit is last; fold from the end.
            for &letter in digits.iter().rev() {
                fragment = fragment
                    .checked_mul(26)
                    .and_then(|f| f.checked_add(u64::from(letter - b'A')))
                    .ok_or_else(|| {
                        KeyError::InvalidIdentity(format!("fragment {} overflows 64 bits", i))
                    })?;
            }
            chunk.copy_from_slice(&fragment.to_le_bytes());
        }

        let public_key = PublicKey::from_bytes(bytes);
        let expected = identity_checksum(&public_key, hasher);
        let body = 4 * IDENTITY_FRAGMENT_LETTERS;
        let found = letters[body..]
            .iter()
            .rev()
            .fold(0u32, |acc, &letter| acc * 26 + u32::from(letter - b'A'));
        if found != expected {
            return Err(KeyError::InvalidIdentity("checksum mismatch".into()));
        }
        Ok(public_key)
    }

    /// The identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Encode a public key as a 60-letter identity.
///
/// # Example
///
/// ```
/// use qbridge_protocol::crypto::{Blake3Hasher, PublicKey};
/// use qbridge_protocol::identity::public_key_to_identity;
///
/// let id = public_key_to_identity(&PublicKey::from_bytes([0xAA; 32]), &Blake3Hasher);
/// assert_eq!(id.as_str().len(), 60);
/// assert!(id.as_str().bytes().all(|b| b.is_ascii_uppercase()));
/// ```
pub fn public_key_to_identity<H>(public_key: &PublicKey, hasher: &H) -> Identity
where
    H: HashFunction + ?Sized,
{
    let mut out = String::with_capacity(IDENTITY_LENGTH);

    for chunk in public_key.as_bytes().chunks_exact(8) {
        let mut fragment_bytes = [0u8; 8];
        fragment_bytes.copy_from_slice(chunk);
        let mut fragment = u64::from_le_bytes(fragment_bytes);
        for _ in 0..IDENTITY_FRAGMENT_LETTERS {
            out.push(letter(fragment % 26));
            fragment /= 26;
        }
    }

    let mut checksum = identity_checksum(public_key, hasher);
    for _ in 0..IDENTITY_CHECKSUM_LETTERS {
        out.push(letter(u64::from(checksum % 26)));
        checksum /= 26;
    }

    Identity(out)
}

fn letter(digit: u64) -> char {
    (b'A' + digit as u8) as char
}

/// Low 18 bits of the little-endian integer formed by the first three bytes
/// of `hash(public_key)`.
fn identity_checksum<H: HashFunction + ?Sized>(public_key: &PublicKey, hasher: &H) -> u32 {
    let digest = hasher.hash(public_key.as_bytes());
    u32::from_le_bytes([digest[0], digest[1], digest[2], 0]) & IDENTITY_CHECKSUM_MASK
}

impl FromStr for Identity {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.0)
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl From<&PublicKey> for Identity {
    /// Uses the default BLAKE3 checksum.
    fn from(public_key: &PublicKey) -> Self {
        public_key_to_identity(public_key, &Blake3Hasher)
    }
}
