//! Error types for transaction construction, signing and encoding.

use thiserror::Error;

use crate::crypto::keys::KeyError;
use crate::crypto::signatures::SignatureError;

/// Everything that can go wrong between "here are some fields" and "here
/// are the bytes to broadcast".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// A field was missing, out of range, or inconsistent at build time.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The payload no longer matches the declared input size.
    #[error("size invariant violated: inputSize is {declared} but payload has {actual} bytes")]
    Serialization {
        /// The header's `inputSize`.
        declared: u16,
        /// The payload length actually present.
        actual: usize,
    },

    /// A byte buffer ended before the structure it should contain.
    #[error("truncated {what}: need {needed} bytes, have {available}")]
    Truncated {
        /// The structure being read.
        what: &'static str,
        /// Bytes required.
        needed: usize,
        /// Bytes present.
        available: usize,
    },

    /// A buffer carried more bytes than its header accounts for.
    #[error("trailing data: expected {expected} bytes, got {got}")]
    TrailingData {
        /// Length implied by the header.
        expected: usize,
        /// Length of the buffer.
        got: usize,
    },

    /// The signing key does not belong to the transaction's source.
    #[error("signing key does not match the transaction source")]
    SourceMismatch,

    /// The signature primitive failed.
    #[error("signing error: {0}")]
    Signing(#[from] SignatureError),

    /// Key material was malformed.
    #[error("key error: {0}")]
    Key(#[from] KeyError),

    /// The transport text could not be decoded.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Errors from transport text codecs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The text is not valid for the codec's alphabet or padding.
    #[error("invalid {codec} text: {reason}")]
    InvalidText {
        /// Codec name.
        codec: &'static str,
        /// What the decoder complained about.
        reason: String,
    },
}
