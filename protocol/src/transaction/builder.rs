//! Transaction construction via the builder pattern.
//!
//! [`TransactionBuilder`] is a plain bag of settings: call setters in any
//! order, then `.build()`. Out-of-range values don't panic and don't wrap;
//! the first problem is remembered and `.build()` reports it.
//!
//! The result is an [`UnsignedTransaction`]. It can still be edited (a
//! wallet may bump the tick before signing), but it cannot be serialized
//! for broadcast. Only [`UnsignedTransaction::sign`] produces something
//! that can, and it consumes the unsigned value on the way.

use std::fmt;

use tracing::debug;

use super::error::TransactionError;
use super::header::TransactionHeader;
use crate::config::{TX_HEADER_LENGTH, TX_MAX_INPUT_SIZE};
use crate::crypto::hash::{Digest, HashFunction};
use crate::crypto::keys::PublicKey;
use crate::identity::Identity;

// ---------------------------------------------------------------------------
// UnsignedTransaction
// ---------------------------------------------------------------------------

/// A fully specified transaction that has not been signed yet.
///
/// Mutable through the `set_*` methods. `set_payload` deliberately leaves
/// `input_size` alone; if the two drift apart, digesting and signing fail
/// with [`TransactionError::Serialization`] instead of guessing which one
/// the caller meant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub(crate) header: TransactionHeader,
    pub(crate) payload: Vec<u8>,
}

impl UnsignedTransaction {
    /// The header fields.
    pub fn header(&self) -> &TransactionHeader {
        &self.header
    }

    /// The payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Change the amount.
    pub fn set_amount(&mut self, amount: u64) {
        self.header.amount = amount;
    }

    /// Change the tick.
    pub fn set_tick(&mut self, tick: u32) {
        self.header.tick = tick;
    }

    /// Change the destination.
    pub fn set_destination(&mut self, destination: PublicKey) {
        self.header.destination_public_key = destination;
    }

    /// Change the input type.
    pub fn set_input_type(&mut self, input_type: u16) {
        self.header.input_type = input_type;
    }

    /// Change the declared input size. Does not touch the payload.
    pub fn set_input_size(&mut self, input_size: u16) {
        self.header.input_size = input_size;
    }

    /// Replace the payload. Does not touch the declared input size.
    pub fn set_payload(&mut self, payload: Vec<u8>) {
        self.payload = payload;
    }

    /// Fail if the payload length disagrees with `input_size`.
    pub fn check_size_invariant(&self) -> Result<(), TransactionError> {
        if self.payload.len() != self.header.payload_len() {
            return Err(TransactionError::Serialization {
                declared: self.header.input_size,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    /// `header || payload`: exactly the bytes that get digested.
    ///
    /// Length is `80 + input_size`. This is not a broadcastable form; the
    /// network wants the signature appended.
    pub fn to_unsigned_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        self.check_size_invariant()?;
        let mut buf = Vec::with_capacity(TX_HEADER_LENGTH + self.payload.len());
        buf.extend_from_slice(&self.header.encode());
        buf.extend_from_slice(&self.payload);
        Ok(buf)
    }

    /// Digest of `header || payload` under `hasher`. This is what gets signed.
    pub fn compute_unsigned_digest<H: HashFunction + ?Sized>(
        &self,
        hasher: &H,
    ) -> Result<Digest, TransactionError> {
        let bytes = self.to_unsigned_bytes()?;
        Ok(hasher.hash(&bytes))
    }
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`UnsignedTransaction`].
///
/// # Usage
///
/// ```
/// use qbridge_protocol::crypto::PublicKey;
/// use qbridge_protocol::transaction::TransactionBuilder;
///
/// let tx = TransactionBuilder::new()
///     .source(PublicKey::from_bytes([0u8; 32]))
///     .destination(PublicKey::from_bytes([0xAA; 32]))
///     .amount(5_100)
///     .tick(21_395_500)
///     .input_type(1)
///     .payload(vec![7u8; 73])
///     .build()
///     .unwrap();
///
/// assert_eq!(tx.to_unsigned_bytes().unwrap().len(), 153);
/// ```
///
/// `amount`, `tick` and `input_type` accept any integer type. A negative or
/// too-large value (say, `-1` or `1u64 << 40` for a tick) is caught here
/// rather than silently wrapped.
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    source: Option<PublicKey>,
    destination: Option<PublicKey>,
    amount: u64,
    tick: u32,
    input_type: u16,
    input_size: Option<u16>,
    payload: Vec<u8>,
    error: Option<TransactionError>,
}

fn narrow<T, U>(field: &str, value: T) -> Result<U, TransactionError>
where
    T: TryInto<U> + fmt::Display + Copy,
{
    value
        .try_into()
        .map_err(|_| TransactionError::Validation(format!("{} out of range: {}", field, value)))
}

impl TransactionBuilder {
    /// Start with everything zeroed and no keys set.
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, err: TransactionError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Set the source (payer and signer) public key.
    pub fn source(mut self, public_key: PublicKey) -> Self {
        self.source = Some(public_key);
        self
    }

    /// Set the destination public key.
    pub fn destination(mut self, public_key: PublicKey) -> Self {
        self.destination = Some(public_key);
        self
    }

    /// Set the destination from an identity, validating its checksum.
    pub fn destination_identity<H>(mut self, identity: &Identity, hasher: &H) -> Self
    where
        H: HashFunction + ?Sized,
    {
        match identity.to_public_key(hasher) {
            Ok(pk) => self.destination = Some(pk),
            Err(e) => self.record(e.into()),
        }
        self
    }

    /// Set the amount. Must fit in `u64`.
    pub fn amount<T>(mut self, amount: T) -> Self
    where
        T: TryInto<u64> + fmt::Display + Copy,
    {
        match narrow("amount", amount) {
            Ok(v) => self.amount = v,
            Err(e) => self.record(e),
        }
        self
    }

    /// Set the tick. Must fit in `u32`.
    pub fn tick<T>(mut self, tick: T) -> Self
    where
        T: TryInto<u32> + fmt::Display + Copy,
    {
        match narrow("tick", tick) {
            Ok(v) => self.tick = v,
            Err(e) => self.record(e),
        }
        self
    }

    /// Set the input type. Must fit in `u16`.
    pub fn input_type<T>(mut self, input_type: T) -> Self
    where
        T: TryInto<u16> + fmt::Display + Copy,
    {
        match narrow("input type", input_type) {
            Ok(v) => self.input_type = v,
            Err(e) => self.record(e),
        }
        self
    }

    /// Declare the input size explicitly. When set, the payload must match
    /// it exactly; when not set, it is taken from the payload length.
    pub fn input_size<T>(mut self, input_size: T) -> Self
    where
        T: TryInto<u16> + fmt::Display + Copy,
    {
        match narrow("input size", input_size) {
            Ok(v) => self.input_size = Some(v),
            Err(e) => self.record(e),
        }
        self
    }

    /// Attach the payload. Empty is fine.
    pub fn payload(mut self, data: Vec<u8>) -> Self {
        self.payload = data;
        self
    }

    /// Validate everything and produce an [`UnsignedTransaction`].
    pub fn build(self) -> Result<UnsignedTransaction, TransactionError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let source = self
            .source
            .ok_or_else(|| TransactionError::Validation("source public key not set".into()))?;
        let destination = self
            .destination
            .ok_or_else(|| TransactionError::Validation("destination public key not set".into()))?;

        if self.payload.len() > TX_MAX_INPUT_SIZE {
            return Err(TransactionError::Validation(format!(
                "payload of {} bytes exceeds the {}-byte maximum",
                self.payload.len(),
                TX_MAX_INPUT_SIZE
            )));
        }
        let actual = self.payload.len() as u16;
        let input_size = match self.input_size {
            Some(declared) if declared != actual => {
                return Err(TransactionError::Validation(format!(
                    "inputSize is {} but payload has {} bytes",
                    declared, actual
                )));
            }
            Some(declared) => declared,
            None => actual,
        };

        let tx = UnsignedTransaction {
            header: TransactionHeader {
                source_public_key: source,
                destination_public_key: destination,
                amount: self.amount,
                tick: self.tick,
                input_type: self.input_type,
                input_size,
            },
            payload: self.payload,
        };

        debug!(
            amount = tx.header.amount,
            tick = tx.header.tick,
            input_type = tx.header.input_type,
            input_size = tx.header.input_size,
            "built unsigned transaction"
        );
        Ok(tx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::{Blake3Hasher, Sha256Hasher};
    use crate::identity::public_key_to_identity;

    fn base() -> TransactionBuilder {
        TransactionBuilder::new()
            .source(PublicKey::from_bytes([0u8; 32]))
            .destination(PublicKey::from_bytes([0xAA; 32]))
            .amount(5_100)
            .tick(21_395_500)
    }

    #[test]
    fn zero_payload_is_eighty_bytes() {
        let tx = base().build().unwrap();
        assert_eq!(tx.header().input_size, 0);
        assert_eq!(tx.to_unsigned_bytes().unwrap().len(), 80);
    }

    #[test]
    fn input_size_inferred_from_payload() {
        let tx = base().payload(vec![1, 2, 3]).build().unwrap();
        assert_eq!(tx.header().input_size, 3);
    }

    #[test]
    fn declared_size_mismatch_is_validation_error() {
        let err = base().input_size(10).payload(vec![0; 9]).build().unwrap_err();
        assert!(matches!(err, TransactionError::Validation(_)));
    }

    #[test]
    fn negative_amount_rejected() {
        let err = base().amount(-1).build().unwrap_err();
        assert_eq!(
            err,
            TransactionError::Validation("amount out of range: -1".into())
        );
    }

    #[test]
    fn tick_out_of_range_rejected() {
        let err = base().tick(1u64 << 40).build().unwrap_err();
        assert!(matches!(err, TransactionError::Validation(ref m) if m.contains("tick")));
        assert!(base().tick(-5i64).build().is_err());
    }

    #[test]
    fn first_error_wins() {
        let err = base().amount(-1).tick(-1).build().unwrap_err();
        assert!(matches!(err, TransactionError::Validation(ref m) if m.starts_with("amount")));
    }

    #[test]
    fn missing_keys_rejected() {
        assert!(TransactionBuilder::new()
            .destination(PublicKey::from_bytes([1; 32]))
            .build()
            .is_err());
        assert!(TransactionBuilder::new()
            .source(PublicKey::from_bytes([1; 32]))
            .build()
            .is_err());
    }

    #[test]
    fn oversized_payload_rejected() {
        let err = base().payload(vec![0; TX_MAX_INPUT_SIZE + 1]).build().unwrap_err();
        assert!(matches!(err, TransactionError::Validation(_)));
    }

    #[test]
    fn unsigned_bytes_are_header_then_payload() {
        let tx = base().input_type(1).payload(vec![0xEE; 5]).build().unwrap();
        let bytes = tx.to_unsigned_bytes().unwrap();
        assert_eq!(&bytes[..80], &tx.header().encode());
        assert_eq!(&bytes[80..], &[0xEE; 5]);
    }

    #[test]
    fn editing_payload_breaks_size_invariant() {
        let mut tx = base().payload(vec![0; 4]).build().unwrap();
        tx.set_payload(vec![0; 5]);
        assert_eq!(
            tx.to_unsigned_bytes().unwrap_err(),
            TransactionError::Serialization {
                declared: 4,
                actual: 5
            }
        );
        tx.set_input_size(5);
        assert!(tx.check_size_invariant().is_ok());
    }

    #[test]
    fn digest_depends_on_every_field() {
        let tx = base().payload(vec![1]).build().unwrap();
        let d0 = tx.compute_unsigned_digest(&Blake3Hasher).unwrap();

        let mut t = tx.clone();
        t.set_tick(21_395_501);
        assert_ne!(t.compute_unsigned_digest(&Blake3Hasher).unwrap(), d0);

        let mut t = tx.clone();
        t.set_amount(5_101);
        assert_ne!(t.compute_unsigned_digest(&Blake3Hasher).unwrap(), d0);

        let mut t = tx.clone();
        t.set_payload(vec![2]);
        assert_ne!(t.compute_unsigned_digest(&Blake3Hasher).unwrap(), d0);

        assert_ne!(tx.compute_unsigned_digest(&Sha256Hasher).unwrap(), d0);
    }

    #[test]
    fn destination_from_identity() {
        let pk = PublicKey::from_bytes([0x33; 32]);
        let id = public_key_to_identity(&pk, &Blake3Hasher);
        let tx = TransactionBuilder::new()
            .source(PublicKey::from_bytes([0; 32]))
            .destination_identity(&id, &Blake3Hasher)
            .build()
            .unwrap();
        assert_eq!(tx.header().destination_public_key, pk);
    }

    #[test]
    fn destination_identity_with_bad_checksum() {
        let id = Identity::parse(&"B".repeat(60)).unwrap();
        let err = TransactionBuilder::new()
            .source(PublicKey::from_bytes([0; 32]))
            .destination_identity(&id, &Blake3Hasher)
            .build()
            .unwrap_err();
        assert!(matches!(err, TransactionError::Key(_)));
    }
}
