//! Bridge order records and their classification.
//!
//! An order slot is a fixed 115-byte record:
//!
//! | bytes | field |
//! |---|---|
//! | 0..32 | origin identity (public key) |
//! | 32..96 | counterparty address, zero padded |
//! | 96..104 | order id, u64 LE |
//! | 104..112 | amount, u64 LE |
//! | 112 | order kind |
//! | 113 | status |
//! | 114 | direction |
//!
//! The contract never shrinks its array, so a snapshot mixes live orders
//! with slots that were never written, slots marked empty, and slots in
//! some half-written state. [`classify`] tells them apart.

use std::fmt;

use qbridge_protocol::crypto::PublicKey;
use serde::{Serialize, Serializer};

use crate::error::DecodeError;

/// Width of one order record.
pub const ORDER_RECORD_LENGTH: usize = 115;
/// Width of the counterparty address field, padding included.
pub const COUNTERPARTY_ADDRESS_LENGTH: usize = 64;

const ORIGIN_OFFSET: usize = 0;
const COUNTERPARTY_OFFSET: usize = 32;
const ORDER_ID_OFFSET: usize = 96;
const AMOUNT_OFFSET: usize = 104;
const ORDER_KIND_OFFSET: usize = 112;
const STATUS_OFFSET: usize = 113;
const DIRECTION_OFFSET: usize = 114;

/// Status byte that marks a slot as empty no matter what else it holds.
pub const EMPTY_STATUS: u8 = 255;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Created,
    Completed,
    Refunded,
    /// The reserved sentinel, 255.
    Empty,
    /// Any byte the contract isn't known to write.
    Unknown(u8),
}

impl OrderStatus {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => OrderStatus::Created,
            1 => OrderStatus::Completed,
            2 => OrderStatus::Refunded,
            EMPTY_STATUS => OrderStatus::Empty,
            other => OrderStatus::Unknown(other),
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            OrderStatus::Created => 0,
            OrderStatus::Completed => 1,
            OrderStatus::Refunded => 2,
            OrderStatus::Empty => EMPTY_STATUS,
            OrderStatus::Unknown(byte) => byte,
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, OrderStatus::Unknown(_))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Created => f.write_str("created"),
            OrderStatus::Completed => f.write_str("completed"),
            OrderStatus::Refunded => f.write_str("refunded"),
            OrderStatus::Empty => f.write_str("empty"),
            OrderStatus::Unknown(byte) => write!(f, "unknown({})", byte),
        }
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One decoded order record. Plain data; nothing here is validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeOrder {
    /// Identity that opened the order.
    pub origin: PublicKey,
    /// Full 64-byte address field. See [`BridgeOrder::counterparty`].
    #[serde(serialize_with = "serialize_hex")]
    pub counterparty_address: [u8; COUNTERPARTY_ADDRESS_LENGTH],
    pub order_id: u64,
    pub amount: u64,
    /// Raw order kind byte. The contract assigns its meaning.
    pub order_kind: u8,
    pub status: OrderStatus,
    /// Raw direction flag.
    pub direction: bool,
}

impl BridgeOrder {
    /// The meaningful prefix of the counterparty address.
    ///
    /// `address_width` comes from the layout and is clamped to 64.
    pub fn counterparty(&self, address_width: usize) -> &[u8] {
        &self.counterparty_address[..address_width.min(COUNTERPARTY_ADDRESS_LENGTH)]
    }
}

/// Something off about a partially populated slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "anomaly", content = "status", rename_all = "camelCase")]
pub enum Anomaly {
    /// Order id is zero.
    MissingOrderId,
    /// Amount is zero.
    MissingAmount,
    /// Status byte set on a record without an order behind it.
    UnexpectedStatus(OrderStatus),
}

/// What a slot turned out to be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "anomalies", rename_all = "camelCase")]
pub enum Classification {
    /// Status is the 255 sentinel.
    Empty,
    /// Non-zero order id and non-zero amount.
    Valid,
    /// Some fields set, not enough to be an order. Surfaced, not dropped.
    Partial(Vec<Anomaly>),
    /// All zero: a slot the contract never wrote.
    Unused,
}

impl Classification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Classification::Valid)
    }
}

/// An order together with where it came from and what it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedOrder {
    /// Slot index in the array.
    pub slot: usize,
    /// Byte offset of the slot in the response buffer.
    pub offset: usize,
    /// Counterparty address trimmed to the layout's address width.
    #[serde(serialize_with = "serialize_prefixed_hex")]
    pub counterparty: Vec<u8>,
    pub order: BridgeOrder,
    pub classification: Classification,
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode the 115-byte record starting at `slot_offset`.
///
/// # Errors
///
/// [`DecodeError::TruncatedSlot`] if the buffer ends before the record does.
pub fn decode_order_slot(buffer: &[u8], slot_offset: usize) -> Result<BridgeOrder, DecodeError> {
    let needed = slot_offset.saturating_add(ORDER_RECORD_LENGTH);
    if needed > buffer.len() {
        return Err(DecodeError::TruncatedSlot {
            offset: slot_offset,
            needed,
            available: buffer.len(),
        });
    }
    let record = &buffer[slot_offset..needed];

    let mut origin = [0u8; 32];
    origin.copy_from_slice(&record[ORIGIN_OFFSET..COUNTERPARTY_OFFSET]);
    let mut counterparty_address = [0u8; COUNTERPARTY_ADDRESS_LENGTH];
    counterparty_address.copy_from_slice(&record[COUNTERPARTY_OFFSET..ORDER_ID_OFFSET]);

    Ok(BridgeOrder {
        origin: PublicKey::from_bytes(origin),
        counterparty_address,
        order_id: read_u64_le(record, ORDER_ID_OFFSET),
        amount: read_u64_le(record, AMOUNT_OFFSET),
        order_kind: record[ORDER_KIND_OFFSET],
        status: OrderStatus::from_byte(record[STATUS_OFFSET]),
        direction: record[DIRECTION_OFFSET] != 0,
    })
}

/// Classify a decoded order.
///
/// The rules apply in order, first match wins:
///
/// 1. status 255 → [`Classification::Empty`]
/// 2. order id > 0 and amount > 0 → [`Classification::Valid`]
/// 3. order id > 0 or amount > 0 or status ≠ 0 → [`Classification::Partial`]
/// 4. otherwise → [`Classification::Unused`]
pub fn classify(order: &BridgeOrder) -> Classification {
    if order.status == OrderStatus::Empty {
        return Classification::Empty;
    }
    if order.order_id > 0 && order.amount > 0 {
        return Classification::Valid;
    }
    if order.order_id > 0 || order.amount > 0 || order.status != OrderStatus::Created {
        let mut anomalies = Vec::with_capacity(3);
        if order.order_id == 0 {
            anomalies.push(Anomaly::MissingOrderId);
        }
        if order.amount == 0 {
            anomalies.push(Anomaly::MissingAmount);
        }
        if order.status != OrderStatus::Created {
            anomalies.push(Anomaly::UnexpectedStatus(order.status));
        }
        return Classification::Partial(anomalies);
    }
    Classification::Unused
}

fn read_u64_le(record: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&record[offset..offset + 8]);
    u64::from_le_bytes(bytes)
}

fn serialize_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

fn serialize_prefixed_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("0x{}", hex::encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(order_id: u64, amount: u64, status: u8) -> Vec<u8> {
        let mut buf = vec![0u8; ORDER_RECORD_LENGTH];
        buf[ORDER_ID_OFFSET..ORDER_ID_OFFSET + 8].copy_from_slice(&order_id.to_le_bytes());
        buf[AMOUNT_OFFSET..AMOUNT_OFFSET + 8].copy_from_slice(&amount.to_le_bytes());
        buf[STATUS_OFFSET] = status;
        buf
    }

    #[test]
    fn decodes_every_field() {
        let mut buf = record(9, 42, 1);
        buf[..32].copy_from_slice(&[0x11; 32]);
        buf[32..52].copy_from_slice(&[0xEE; 20]);
        buf[ORDER_KIND_OFFSET] = 3;
        buf[DIRECTION_OFFSET] = 1;

        let order = decode_order_slot(&buf, 0).unwrap();
        assert_eq!(order.origin, PublicKey::from_bytes([0x11; 32]));
        assert_eq!(order.counterparty(20), &[0xEE; 20]);
        assert!(order.counterparty_address[20..].iter().all(|&b| b == 0));
        assert_eq!(order.order_id, 9);
        assert_eq!(order.amount, 42);
        assert_eq!(order.order_kind, 3);
        assert_eq!(order.status, OrderStatus::Completed);
        assert!(order.direction);
    }

    #[test]
    fn reads_at_offset() {
        let mut buf = vec![0xFFu8; 10];
        buf.extend(record(1, 2, 0));
        let order = decode_order_slot(&buf, 10).unwrap();
        assert_eq!((order.order_id, order.amount), (1, 2));
    }

    #[test]
    fn short_buffer_is_truncated_slot() {
        let buf = vec![0u8; 114];
        assert_eq!(
            decode_order_slot(&buf, 0),
            Err(DecodeError::TruncatedSlot {
                offset: 0,
                needed: 115,
                available: 114,
            })
        );
    }

    #[test]
    fn sentinel_wins_over_everything() {
        let order = decode_order_slot(&record(7, 7, 255), 0).unwrap();
        assert_eq!(classify(&order), Classification::Empty);
    }

    #[test]
    fn valid_regardless_of_status() {
        let order = decode_order_slot(&record(1, 5000, 2), 0).unwrap();
        assert_eq!(classify(&order), Classification::Valid);
    }

    #[test]
    fn partial_lists_anomalies() {
        let order = decode_order_slot(&record(0, 0, 7), 0).unwrap();
        assert_eq!(order.status, OrderStatus::Unknown(7));
        assert_eq!(
            classify(&order),
            Classification::Partial(vec![
                Anomaly::MissingOrderId,
                Anomaly::MissingAmount,
                Anomaly::UnexpectedStatus(OrderStatus::Unknown(7)),
            ])
        );

        let order = decode_order_slot(&record(4, 0, 0), 0).unwrap();
        assert_eq!(
            classify(&order),
            Classification::Partial(vec![Anomaly::MissingAmount])
        );
    }

    #[test]
    fn all_zero_is_unused() {
        let order = decode_order_slot(&record(0, 0, 0), 0).unwrap();
        assert_eq!(classify(&order), Classification::Unused);
    }

    #[test]
    fn status_bytes_roundtrip() {
        for byte in 0..=255u8 {
            assert_eq!(OrderStatus::from_byte(byte).as_byte(), byte);
        }
        assert!(!OrderStatus::from_byte(3).is_known());
    }

    #[test]
    fn classification_serializes_tagged() {
        let partial = Classification::Partial(vec![Anomaly::MissingAmount]);
        let json = serde_json::to_value(partial).unwrap();
        assert_eq!(json["kind"], "partial");
        assert_eq!(json["anomalies"][0]["anomaly"], "missingAmount");
    }
}
