//! Contract layout tables.
//!
//! A [`ContractLayout`] says where every scalar lives in a query response and
//! how the order array is laid out after them. The decoders never hard-code
//! an offset; they read this table. When the contract changes, ship a new
//! table (JSON works) with a new `version`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::order::{COUNTERPARTY_ADDRESS_LENGTH, ORDER_RECORD_LENGTH};

/// Version string of the built-in bridge layout.
pub const BRIDGE_V1: &str = "bridge_v1";

/// Upper bound on order slots a layout may declare.
pub const MAX_ORDER_CAPACITY: usize = 1 << 16;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How the bytes of a scalar field are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    U8,
    U16Le,
    U32Le,
    U64Le,
    /// One byte, zero is false.
    Bool,
    /// Raw bytes of any non-zero width.
    Bytes,
}

impl FieldKind {
    /// The width this kind requires, or `None` for [`FieldKind::Bytes`].
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            FieldKind::U8 | FieldKind::Bool => Some(1),
            FieldKind::U16Le => Some(2),
            FieldKind::U32Le => Some(4),
            FieldKind::U64Le => Some(8),
            FieldKind::Bytes => None,
        }
    }

    /// Human-readable name used in errors.
    pub fn label(self) -> &'static str {
        match self {
            FieldKind::U8 => "u8",
            FieldKind::U16Le => "u16 little-endian",
            FieldKind::U32Le => "u32 little-endian",
            FieldKind::U64Le => "u64 little-endian",
            FieldKind::Bool => "bool",
            FieldKind::Bytes => "bytes",
        }
    }
}

/// One scalar field of the response buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Field name, unique within a layout.
    pub name: String,
    /// Byte offset from the start of the buffer.
    pub offset: usize,
    /// Width in bytes.
    pub width: usize,
    /// Interpretation.
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Build a field spec.
    pub fn new(name: impl Into<String>, offset: usize, width: usize, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            offset,
            width,
            kind,
        }
    }

    /// One past the last byte, if it fits in `usize`.
    pub fn end(&self) -> Option<usize> {
        self.offset.checked_add(self.width)
    }
}

/// Where the fixed-capacity order array sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderArrayLayout {
    /// Offset of slot 0.
    pub base_offset: usize,
    /// Distance between consecutive slots. At least the 115-byte record.
    pub record_width: usize,
    /// Number of slots.
    pub capacity: usize,
    /// Meaningful prefix of the 64-byte counterparty address field.
    pub address_width: usize,
}

impl OrderArrayLayout {
    /// Offset of slot `index`, if it fits in `usize`.
    pub fn slot_offset(&self, index: usize) -> Option<usize> {
        index
            .checked_mul(self.record_width)
            .and_then(|delta| self.base_offset.checked_add(delta))
    }

    /// One past the last byte of the last slot.
    pub fn end(&self) -> Option<usize> {
        self.slot_offset(self.capacity)
    }
}

/// The complete layout of one contract's query response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractLayout {
    /// Layout version, e.g. `bridge_v1`.
    pub version: String,
    /// Scalar fields, in any order.
    pub fields: Vec<FieldSpec>,
    /// The order array.
    pub orders: OrderArrayLayout,
}

// ---------------------------------------------------------------------------
// Construction & validation
// ---------------------------------------------------------------------------

impl ContractLayout {
    /// The layout of the deployed bridge contract.
    ///
    /// | field | offset | width |
    /// |---|---|---|
    /// | admin | 0 | 32 |
    /// | nextOrderId | 32 | 8 |
    /// | lockedTokens | 40 | 8 |
    /// | totalReceivedTokens | 48 | 8 |
    /// | earnedFees | 56 | 8 |
    /// | tradeFeeBillionths | 64 | 4 |
    ///
    /// Sixteen 115-byte order slots follow at offset 72.
    pub fn bridge_v1() -> Self {
        Self {
            version: BRIDGE_V1.to_string(),
            fields: vec![
                FieldSpec::new("admin", 0, 32, FieldKind::Bytes),
                FieldSpec::new("nextOrderId", 32, 8, FieldKind::U64Le),
                FieldSpec::new("lockedTokens", 40, 8, FieldKind::U64Le),
                FieldSpec::new("totalReceivedTokens", 48, 8, FieldKind::U64Le),
                FieldSpec::new("earnedFees", 56, 8, FieldKind::U64Le),
                FieldSpec::new("tradeFeeBillionths", 64, 4, FieldKind::U32Le),
            ],
            orders: OrderArrayLayout {
                base_offset: 72,
                record_width: ORDER_RECORD_LENGTH,
                capacity: 16,
                address_width: 20,
            },
        }
    }

    /// Parse a layout from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let layout: Self =
            serde_json::from_str(json).map_err(|e| LayoutError::Json(e.to_string()))?;
        layout.validate()?;
        Ok(layout)
    }

    /// Pretty JSON, suitable for checking into a config directory.
    pub fn to_json(&self) -> Result<String, LayoutError> {
        serde_json::to_string_pretty(self).map_err(|e| LayoutError::Json(e.to_string()))
    }

    /// Smallest buffer that holds every scalar and every order slot.
    pub fn min_buffer_len(&self) -> Option<usize> {
        self.fields
            .iter()
            .map(FieldSpec::end)
            .chain(std::iter::once(self.orders.end()))
            .try_fold(0usize, |acc, end| end.map(|e| acc.max(e)))
    }

    /// Reject layouts that cannot describe a real buffer.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::DuplicateField`] for a repeated name.
    /// - [`LayoutError::FieldWidth`] when width and kind disagree.
    /// - [`LayoutError::RecordWidth`] when slots would overlap.
    /// - [`LayoutError::AddressWidth`] outside `1..=64`.
    /// - [`LayoutError::Capacity`] above [`MAX_ORDER_CAPACITY`].
    /// - [`LayoutError::Overlap`] when two regions share bytes.
    /// - [`LayoutError::OffsetOverflow`] when a region ends past `usize::MAX`.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(LayoutError::DuplicateField(field.name.clone()));
            }
            let expected = field.kind.fixed_width().unwrap_or(field.width.max(1));
            if field.width != expected {
                return Err(LayoutError::FieldWidth {
                    field: field.name.clone(),
                    width: field.width,
                    expected,
                });
            }
        }

        if self.orders.record_width < ORDER_RECORD_LENGTH {
            return Err(LayoutError::RecordWidth(self.orders.record_width));
        }
        if self.orders.address_width == 0
            || self.orders.address_width > COUNTERPARTY_ADDRESS_LENGTH
        {
            return Err(LayoutError::AddressWidth(self.orders.address_width));
        }
        if self.orders.capacity > MAX_ORDER_CAPACITY {
            return Err(LayoutError::Capacity {
                capacity: self.orders.capacity,
                max: MAX_ORDER_CAPACITY,
            });
        }

        let mut regions = Vec::with_capacity(self.fields.len() + 1);
        for field in &self.fields {
            let end = field
                .end()
                .ok_or_else(|| LayoutError::OffsetOverflow(field.name.clone()))?;
            regions.push((field.offset, end, field.name.as_str()));
        }
        let orders_end = self
            .orders
            .end()
            .ok_or_else(|| LayoutError::OffsetOverflow("orders".to_string()))?;
        if self.orders.capacity > 0 {
            regions.push((self.orders.base_offset, orders_end, "orders"));
        }

        regions.sort_by_key(|&(start, _, _)| start);
        for pair in regions.windows(2) {
            let (_, first_end, first) = pair[0];
            let (second_start, _, second) = pair[1];
            if second_start < first_end {
                return Err(LayoutError::Overlap {
                    first: first.to_string(),
                    second: second.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for ContractLayout {
    fn default() -> Self {
        Self::bridge_v1()
    }
}
