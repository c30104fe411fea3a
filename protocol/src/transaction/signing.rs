//! Signing, and the sealed [`SignedTransaction`] it produces.
//!
//! Signing consumes the [`UnsignedTransaction`]. The returned
//! [`SignedTransaction`] has getters and no setters, so there is no code
//! path that edits a transaction after its signature was computed.
//!
//! Wire form of a signed transaction:
//!
//! ```text
//! header (80) || payload (input_size) || signature (64)
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::builder::UnsignedTransaction;
use super::error::TransactionError;
use super::header::TransactionHeader;
use super::transport::TransportCodec;
use crate::config::{SIGNATURE_LENGTH, TX_HEADER_LENGTH};
use crate::crypto::hash::{Digest, HashFunction};
use crate::crypto::keys::{PrivateKey, Seed, Signature};
use crate::crypto::signatures::SignatureScheme;
use crate::crypto::{derivation, CryptoSuite};

impl UnsignedTransaction {
    /// Sign with `private_key` and seal the transaction.
    ///
    /// 1. Re-check `payload.len() == input_size` (a `set_payload` after
    ///    building may have broken it).
    /// 2. Digest `header || payload` with `hasher`.
    /// 3. Sign the digest with `scheme`.
    ///
    /// The caller is responsible for `private_key` belonging to the source;
    /// use [`sign_transaction`] to have that checked.
    pub fn sign<S, H>(
        self,
        scheme: &S,
        hasher: &H,
        private_key: &PrivateKey,
    ) -> Result<SignedTransaction, TransactionError>
    where
        S: SignatureScheme + ?Sized,
        H: HashFunction + ?Sized,
    {
        let digest = self.compute_unsigned_digest(hasher)?;
        let signature = scheme.sign(&digest, private_key)?;
        debug!(
            scheme = scheme.name(),
            tick = self.header.tick,
            digest = %hex::encode(digest),
            "transaction sealed"
        );
        Ok(SignedTransaction {
            header: self.header,
            payload: self.payload,
            signature,
        })
    }
}

/// Sign `tx` with the key chain rooted at `seed`.
///
/// Derives the private key, checks its public key is the transaction's
/// source, signs, and drops the key material before returning.
pub fn sign_transaction<S, H>(
    tx: UnsignedTransaction,
    seed: &Seed,
    suite: &CryptoSuite<S, H>,
) -> Result<SignedTransaction, TransactionError>
where
    S: SignatureScheme,
    H: HashFunction,
{
    let private_key = derivation::private_key_from_seed(seed, &suite.hasher);
    let public_key = suite.scheme.derive_public_key(&private_key)?;
    if public_key != tx.header.source_public_key {
        return Err(TransactionError::SourceMismatch);
    }
    tx.sign(&suite.scheme, &suite.hasher, &private_key)
}

// ---------------------------------------------------------------------------
// SignedTransaction
// ---------------------------------------------------------------------------

/// A sealed transaction. Read-only.
///
/// Deserializing checks `payload.len() == input_size`, the same as
/// [`SignedTransaction::deserialize`] does for the wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSignedTransaction")]
pub struct SignedTransaction {
    header: TransactionHeader,
    #[serde(with = "hex_bytes")]
    payload: Vec<u8>,
    signature: Signature,
}

/// Unchecked JSON form of [`SignedTransaction`].
#[derive(Deserialize)]
struct RawSignedTransaction {
    header: TransactionHeader,
    #[serde(with = "hex_bytes")]
    payload: Vec<u8>,
    signature: Signature,
}

impl TryFrom<RawSignedTransaction> for SignedTransaction {
    type Error = TransactionError;

    fn try_from(raw: RawSignedTransaction) -> Result<Self, Self::Error> {
        if raw.payload.len() != raw.header.payload_len() {
            return Err(TransactionError::Serialization {
                declared: raw.header.input_size,
                actual: raw.payload.len(),
            });
        }
        Ok(Self {
            header: raw.header,
            payload: raw.payload,
            signature: raw.signature,
        })
    }
}

impl SignedTransaction {
    /// The header fields.
    pub fn header(&self) -> &TransactionHeader {
        &self.header
    }

    /// The payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Serialized length: `80 + input_size + 64`.
    pub fn serialized_len(&self) -> usize {
        TX_HEADER_LENGTH + self.payload.len() + SIGNATURE_LENGTH
    }

    /// `header || payload || signature`, ready for broadcast.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.serialized_len());
        buf.extend_from_slice(&self.header.encode());
        buf.extend_from_slice(&self.payload);
        buf.extend_from_slice(self.signature.as_bytes());
        buf
    }

    /// Parse the wire form. The buffer must be exactly
    /// `80 + input_size + 64` bytes.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, TransactionError> {
        let header = TransactionHeader::decode(bytes)?;
        let payload_end = TX_HEADER_LENGTH + header.payload_len();
        let expected = payload_end + SIGNATURE_LENGTH;
        if bytes.len() < expected {
            return Err(TransactionError::Truncated {
                what: "signed transaction",
                needed: expected,
                available: bytes.len(),
            });
        }
        if bytes.len() > expected {
            return Err(TransactionError::TrailingData {
                expected,
                got: bytes.len(),
            });
        }
        Ok(Self {
            header,
            payload: bytes[TX_HEADER_LENGTH..payload_end].to_vec(),
            signature: Signature::try_from_slice(&bytes[payload_end..expected])?,
        })
    }

    /// Digest of `header || payload`, the value the signature covers.
    pub fn digest<H: HashFunction + ?Sized>(&self, hasher: &H) -> Digest {
        let mut buf = Vec::with_capacity(TX_HEADER_LENGTH + self.payload.len());
        buf.extend_from_slice(&self.header.encode());
        buf.extend_from_slice(&self.payload);
        hasher.hash(&buf)
    }

    /// Hex digest, used as the transaction id in logs and receipts.
    pub fn id<H: HashFunction + ?Sized>(&self, hasher: &H) -> String {
        hex::encode(self.digest(hasher))
    }

    /// Check the signature against the source public key.
    pub fn verify<S, H>(&self, scheme: &S, hasher: &H) -> bool
    where
        S: SignatureScheme + ?Sized,
        H: HashFunction + ?Sized,
    {
        scheme.verify(
            &self.digest(hasher),
            &self.signature,
            &self.header.source_public_key,
        )
    }

    /// Serialize and encode for transport in one step.
    pub fn encode_transport<C: TransportCodec + ?Sized>(&self, codec: &C) -> String {
        codec.encode(&self.serialize())
    }

    /// Decode transport text and parse the result.
    pub fn decode_transport<C: TransportCodec + ?Sized>(
        text: &str,
        codec: &C,
    ) -> Result<Self, TransactionError> {
        let bytes = codec.decode(text)?;
        Self::deserialize(&bytes)
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
