//! Scalar fields at the head of the response buffer.

use std::collections::BTreeMap;

use qbridge_protocol::crypto::{HashFunction, PublicKey};
use qbridge_protocol::identity::{public_key_to_identity, Identity};
use serde::{Serialize, Serializer};
use tracing::trace;

use crate::error::DecodeError;
use crate::layout::{ContractLayout, FieldKind, FieldSpec};

const ADMIN: &str = "admin";
const NEXT_ORDER_ID: &str = "nextOrderId";
const LOCKED_TOKENS: &str = "lockedTokens";
const TOTAL_RECEIVED_TOKENS: &str = "totalReceivedTokens";
const EARNED_FEES: &str = "earnedFees";
const TRADE_FEE_BILLIONTHS: &str = "tradeFeeBillionths";

/// One decoded scalar, typed by its [`FieldKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Bool(bool),
    #[serde(serialize_with = "serialize_hex")]
    Bytes(Vec<u8>),
}

/// The bridge's counters and totals.
///
/// Fields the typed view doesn't know about are kept in `extra`, so a newer
/// layout with more scalars still decodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractScalars {
    /// Admin identity, as its public key.
    pub admin: PublicKey,
    pub next_order_id: u64,
    pub locked_tokens: u64,
    pub total_received_tokens: u64,
    pub earned_fees: u64,
    /// Trade fee in billionths of the amount.
    pub trade_fee_billionths: u32,
    pub extra: BTreeMap<String, FieldValue>,
}

impl ContractScalars {
    /// The admin's 60-letter identity.
    pub fn admin_identity<H: HashFunction + ?Sized>(&self, hasher: &H) -> Identity {
        public_key_to_identity(&self.admin, hasher)
    }
}

/// Read one field from the buffer.
///
/// # Errors
///
/// [`DecodeError::Truncated`] if `offset + width` runs past the buffer.
/// [`DecodeError::FieldKind`] if a fixed-width kind has the wrong width.
pub fn read_field(buffer: &[u8], spec: &FieldSpec) -> Result<FieldValue, DecodeError> {
    let needed = spec.offset.saturating_add(spec.width);
    if needed > buffer.len() {
        return Err(DecodeError::Truncated {
            field: spec.name.clone(),
            needed,
            available: buffer.len(),
        });
    }
    let bytes = &buffer[spec.offset..needed];

    if let Some(width) = spec.kind.fixed_width() {
        if width != spec.width {
            return Err(DecodeError::FieldKind {
                field: spec.name.clone(),
                expected: spec.kind.label(),
            });
        }
    }

    let value = match spec.kind {
        FieldKind::U8 => FieldValue::U8(bytes[0]),
        FieldKind::Bool => FieldValue::Bool(bytes[0] != 0),
        FieldKind::U16Le => FieldValue::U16(u16::from_le_bytes([bytes[0], bytes[1]])),
        FieldKind::U32Le => {
            FieldValue::U32(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
        }
        FieldKind::U64Le => {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(bytes);
            FieldValue::U64(u64::from_le_bytes(raw))
        }
        FieldKind::Bytes => FieldValue::Bytes(bytes.to_vec()),
    };
    trace!(field = %spec.name, offset = spec.offset, "read scalar field");
    Ok(value)
}

/// Decode every scalar the layout lists, then pick out the typed view.
///
/// # Errors
///
/// - [`DecodeError::Truncated`] naming the first field that runs past the buffer.
/// - [`DecodeError::MissingField`] if a field the typed view needs is absent.
/// - [`DecodeError::FieldKind`] if it is present with the wrong kind.
pub fn decode_scalar_fields(
    buffer: &[u8],
    layout: &ContractLayout,
) -> Result<ContractScalars, DecodeError> {
    let mut values = BTreeMap::new();
    for spec in &layout.fields {
        values.insert(spec.name.clone(), read_field(buffer, spec)?);
    }

    let admin = match values.remove(ADMIN) {
        Some(FieldValue::Bytes(bytes)) => {
            PublicKey::try_from_slice(&bytes).map_err(|_| DecodeError::FieldKind {
                field: ADMIN.to_string(),
                expected: "32 bytes",
            })?
        }
        Some(_) => {
            return Err(DecodeError::FieldKind {
                field: ADMIN.to_string(),
                expected: "32 bytes",
            })
        }
        None => return Err(DecodeError::MissingField(ADMIN.to_string())),
    };

    Ok(ContractScalars {
        admin,
        next_order_id: take_u64(&mut values, NEXT_ORDER_ID)?,
        locked_tokens: take_u64(&mut values, LOCKED_TOKENS)?,
        total_received_tokens: take_u64(&mut values, TOTAL_RECEIVED_TOKENS)?,
        earned_fees: take_u64(&mut values, EARNED_FEES)?,
        trade_fee_billionths: take_u32(&mut values, TRADE_FEE_BILLIONTHS)?,
        extra: values,
    })
}

fn take_u64(values: &mut BTreeMap<String, FieldValue>, name: &str) -> Result<u64, DecodeError> {
    match values.remove(name) {
        Some(FieldValue::U64(v)) => Ok(v),
        Some(_) => Err(DecodeError::FieldKind {
            field: name.to_string(),
            expected: FieldKind::U64Le.label(),
        }),
        None => Err(DecodeError::MissingField(name.to_string())),
    }
}

fn take_u32(values: &mut BTreeMap<String, FieldValue>, name: &str) -> Result<u32, DecodeError> {
    match values.remove(name) {
        Some(FieldValue::U32(v)) => Ok(v),
        Some(_) => Err(DecodeError::FieldKind {
            field: name.to_string(),
            expected: FieldKind::U32Le.label(),
        }),
        None => Err(DecodeError::MissingField(name.to_string())),
    }
}

fn serialize_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}
