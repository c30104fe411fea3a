//! Full contract state: scalars plus every classified order slot.

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::error::DecodeError;
use crate::layout::ContractLayout;
use crate::order::{Classification, ClassifiedOrder};
use crate::scalars::{decode_scalar_fields, ContractScalars};
use crate::slots::OrderSlots;

/// A slot that failed to decode, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorruptSlot {
    pub slot: usize,
    #[serde(serialize_with = "serialize_display")]
    pub error: DecodeError,
}

/// One decoded snapshot of the bridge contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractState {
    /// Version of the layout the snapshot was decoded with.
    pub layout_version: String,
    pub scalars: ContractScalars,
    /// Every slot that decoded, in slot order, whatever its classification.
    pub orders: Vec<ClassifiedOrder>,
    pub corrupt_slots: Vec<CorruptSlot>,
}

/// Slot counts per classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSummary {
    pub capacity: usize,
    pub valid: usize,
    pub partial: usize,
    pub empty: usize,
    pub unused: usize,
    pub corrupt: usize,
    /// Decoded orders whose status byte is not one the contract writes.
    pub unknown_status: usize,
}

impl ContractState {
    /// Orders classified as valid.
    pub fn active_orders(&self) -> impl Iterator<Item = &ClassifiedOrder> {
        self.orders.iter().filter(|o| o.classification.is_valid())
    }

    /// Orders that need a human to look at them.
    pub fn partial_orders(&self) -> impl Iterator<Item = &ClassifiedOrder> {
        self.orders
            .iter()
            .filter(|o| matches!(o.classification, Classification::Partial(_)))
    }

    pub fn summary(&self) -> StateSummary {
        let mut summary = StateSummary {
            capacity: self.orders.len() + self.corrupt_slots.len(),
            corrupt: self.corrupt_slots.len(),
            ..StateSummary::default()
        };
        for order in &self.orders {
            if !order.order.status.is_known() {
                summary.unknown_status += 1;
            }
            match order.classification {
                Classification::Valid => summary.valid += 1,
                Classification::Partial(_) => summary.partial += 1,
                Classification::Empty => summary.empty += 1,
                Classification::Unused => summary.unused += 1,
            }
        }
        summary
    }
}

/// Decode scalars and every order slot.
///
/// The layout is validated first. A truncated scalar region fails the whole
/// decode; a truncated slot is recorded in `corrupt_slots` and the remaining
/// slots are still decoded.
pub fn decode_contract_state(
    buffer: &[u8],
    layout: &ContractLayout,
) -> Result<ContractState, DecodeError> {
    layout.validate()?;
    let scalars = decode_scalar_fields(buffer, layout)?;
    if let Some(expected) = layout.min_buffer_len().filter(|&n| n > buffer.len()) {
        debug!(expected, buffer_len = buffer.len(), "buffer shorter than the layout");
    }

    // Never reserve more slots than the buffer could hold.
    let fits = buffer.len() / layout.orders.record_width + 1;
    let mut orders = Vec::with_capacity(layout.orders.capacity.min(fits));
    let mut corrupt_slots = Vec::new();
    for (slot, item) in OrderSlots::from_layout(buffer, &layout.orders).enumerate() {
        match item {
            Ok(order) => orders.push(order),
            Err(error) => corrupt_slots.push(CorruptSlot { slot, error }),
        }
    }

    let state = ContractState {
        layout_version: layout.version.clone(),
        scalars,
        orders,
        corrupt_slots,
    };
    debug!(
        version = %state.layout_version,
        buffer_len = buffer.len(),
        summary = ?state.summary(),
        "decoded contract state"
    );
    Ok(state)
}

fn serialize_display<S: Serializer>(error: &DecodeError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}
