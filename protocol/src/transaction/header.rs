//! The fixed 80-byte transaction header.
//!
//! ```text
//! offset  width  field
//!      0     32  source public key
//!     32     32  destination public key
//!     64      8  amount        (u64, little-endian)
//!     72      4  tick          (u32, little-endian)
//!     76      2  input type    (u16, little-endian)
//!     78      2  input size    (u16, little-endian)
//! ```
//!
//! Offsets come from [`crate::config`]; this file only moves bytes.

use serde::{Deserialize, Serialize};

use super::error::TransactionError;
use crate::config::{
    KEY_LENGTH, TX_AMOUNT_OFFSET, TX_DESTINATION_OFFSET, TX_HEADER_LENGTH, TX_INPUT_SIZE_OFFSET,
    TX_INPUT_TYPE_OFFSET, TX_SOURCE_OFFSET, TX_TICK_OFFSET,
};
use crate::crypto::keys::PublicKey;

/// The header fields of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionHeader {
    /// Who pays, and who must sign.
    pub source_public_key: PublicKey,
    /// Who receives the amount (or which contract receives the call).
    pub destination_public_key: PublicKey,
    /// Amount in the ledger's smallest unit.
    pub amount: u64,
    /// Tick at which the transaction is valid.
    pub tick: u32,
    /// Contract procedure selector; 0 for a plain transfer.
    pub input_type: u16,
    /// Payload length in bytes.
    pub input_size: u16,
}

impl TransactionHeader {
    /// Pack the header into its 80-byte wire form.
    pub fn encode(&self) -> [u8; TX_HEADER_LENGTH] {
        let mut buf = [0u8; TX_HEADER_LENGTH];
        buf[TX_SOURCE_OFFSET..TX_SOURCE_OFFSET + KEY_LENGTH]
            .copy_from_slice(self.source_public_key.as_bytes());
        buf[TX_DESTINATION_OFFSET..TX_DESTINATION_OFFSET + KEY_LENGTH]
            .copy_from_slice(self.destination_public_key.as_bytes());
        buf[TX_AMOUNT_OFFSET..TX_AMOUNT_OFFSET + 8].copy_from_slice(&self.amount.to_le_bytes());
        buf[TX_TICK_OFFSET..TX_TICK_OFFSET + 4].copy_from_slice(&self.tick.to_le_bytes());
        buf[TX_INPUT_TYPE_OFFSET..TX_INPUT_TYPE_OFFSET + 2]
            .copy_from_slice(&self.input_type.to_le_bytes());
        buf[TX_INPUT_SIZE_OFFSET..TX_INPUT_SIZE_OFFSET + 2]
            .copy_from_slice(&self.input_size.to_le_bytes());
        buf
    }

    /// Read a header from the front of `bytes`. Extra bytes are ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self, TransactionError> {
        if bytes.len() < TX_HEADER_LENGTH {
            return Err(TransactionError::Truncated {
                what: "transaction header",
                needed: TX_HEADER_LENGTH,
                available: bytes.len(),
            });
        }

        let mut src = [0u8; KEY_LENGTH];
        src.copy_from_slice(&bytes[TX_SOURCE_OFFSET..TX_SOURCE_OFFSET + KEY_LENGTH]);
        let mut dst = [0u8; KEY_LENGTH];
        dst.copy_from_slice(&bytes[TX_DESTINATION_OFFSET..TX_DESTINATION_OFFSET + KEY_LENGTH]);
        let mut amount = [0u8; 8];
        amount.copy_from_slice(&bytes[TX_AMOUNT_OFFSET..TX_AMOUNT_OFFSET + 8]);
        let mut tick = [0u8; 4];
        tick.copy_from_slice(&bytes[TX_TICK_OFFSET..TX_TICK_OFFSET + 4]);

        Ok(Self {
            source_public_key: PublicKey::from_bytes(src),
            destination_public_key: PublicKey::from_bytes(dst),
            amount: u64::from_le_bytes(amount),
            tick: u32::from_le_bytes(tick),
            input_type: u16::from_le_bytes([
                bytes[TX_INPUT_TYPE_OFFSET],
                bytes[TX_INPUT_TYPE_OFFSET + 1],
            ]),
            input_size: u16::from_le_bytes([
                bytes[TX_INPUT_SIZE_OFFSET],
                bytes[TX_INPUT_SIZE_OFFSET + 1],
            ]),
        })
    }

    /// Payload length as a `usize`.
    pub fn payload_len(&self) -> usize {
        usize::from(self.input_size)
    }
}
