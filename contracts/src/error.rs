//! Error types for contract decoding.
//!
//! [`DecodeError`] covers buffers that don't match the layout.
//! [`LayoutError`] covers layouts that don't make sense on their own.

use qbridge_protocol::transaction::TransportError;
use thiserror::Error;

/// Errors raised while reading a response buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer ends before a scalar field does.
    #[error("buffer truncated at field `{field}`: need {needed} bytes, have {available}")]
    Truncated {
        /// Name of the field being read.
        field: String,
        /// `offset + width` for that field.
        needed: usize,
        /// Buffer length.
        available: usize,
    },

    /// The buffer ends before an order slot does.
    #[error(
        "buffer truncated at order slot offset {offset}: need {needed} bytes, have {available}"
    )]
    TruncatedSlot {
        /// Byte offset of the slot.
        offset: usize,
        /// `offset + record width`.
        needed: usize,
        /// Buffer length.
        available: usize,
    },

    /// A field the typed decoder requires is absent from the layout.
    #[error("layout has no field named `{0}`")]
    MissingField(String),

    /// A field decoded to a different kind than the typed decoder expects.
    #[error("field `{field}` has the wrong kind: expected {expected}")]
    FieldKind {
        /// Field name.
        field: String,
        /// What the typed decoder wanted.
        expected: &'static str,
    },

    /// A query request payload cannot be described by a u16 input size.
    #[error("request payload of {0} bytes exceeds the u16 input size")]
    RequestTooLarge(usize),

    /// The layout itself is inconsistent.
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// The response text could not be decoded to bytes.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Errors raised while validating or loading a [`ContractLayout`](crate::layout::ContractLayout).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Two fields share a name.
    #[error("duplicate field name `{0}`")]
    DuplicateField(String),

    /// A field's width does not match its kind.
    #[error("field `{field}` declares width {width}, but its kind needs {expected}")]
    FieldWidth {
        /// Field name.
        field: String,
        /// Declared width.
        width: usize,
        /// Width implied by the kind.
        expected: usize,
    },

    /// Two regions of the buffer overlap.
    #[error("`{first}` overlaps `{second}`")]
    Overlap {
        /// First region.
        first: String,
        /// Second region.
        second: String,
    },

    /// Order records narrower than the fixed record would overlap.
    #[error("order record width {0} is smaller than the 115-byte record")]
    RecordWidth(usize),

    /// The meaningful address prefix must fit the 64-byte address field.
    #[error("address width {0} must be between 1 and 64")]
    AddressWidth(usize),

    /// More order slots than any contract holds.
    #[error("order capacity {capacity} exceeds the maximum of {max}")]
    Capacity {
        /// Declared slot count.
        capacity: usize,
        /// The limit.
        max: usize,
    },

    /// Offsets so large they overflow `usize`.
    #[error("region `{0}` overflows the address space")]
    OffsetOverflow(String),

    /// The layout JSON failed to parse.
    #[error("invalid layout JSON: {0}")]
    Json(String),
}
