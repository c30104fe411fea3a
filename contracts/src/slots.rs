//! Lazy iteration over the order array.

use std::iter::FusedIterator;

use tracing::debug;

use crate::error::DecodeError;
use crate::layout::OrderArrayLayout;
use crate::order::{classify, decode_order_slot, ClassifiedOrder, COUNTERPARTY_ADDRESS_LENGTH};

/// Iterator over the slots of an order array.
///
/// Yields exactly `capacity` items. A slot that runs past the end of the
/// buffer yields an `Err` and the iterator moves on to the next one. Clone it
/// to walk the array again from the same position.
#[derive(Debug, Clone)]
pub struct OrderSlots<'a> {
    buffer: &'a [u8],
    base_offset: usize,
    record_width: usize,
    capacity: usize,
    address_width: usize,
    next: usize,
}

impl<'a> OrderSlots<'a> {
    /// Iterate the array described by a layout, trimming counterparties to
    /// its address width.
    pub fn from_layout(buffer: &'a [u8], layout: &OrderArrayLayout) -> Self {
        decode_order_array(buffer, layout.base_offset, layout.record_width, layout.capacity)
            .with_address_width(layout.address_width)
    }

    /// Trim each yielded counterparty to `address_width` bytes (at most 64).
    pub fn with_address_width(mut self, address_width: usize) -> Self {
        self.address_width = address_width.min(COUNTERPARTY_ADDRESS_LENGTH);
        self
    }

    /// Slots not yet yielded.
    pub fn remaining(&self) -> usize {
        self.capacity - self.next
    }
}

/// Iterate `capacity` order slots starting at `base_offset`, `record_width`
/// bytes apart.
///
/// Nothing is decoded until the iterator is advanced. Counterparties keep
/// all 64 bytes unless [`OrderSlots::with_address_width`] says otherwise.
pub fn decode_order_array(
    buffer: &[u8],
    base_offset: usize,
    record_width: usize,
    capacity: usize,
) -> OrderSlots<'_> {
    OrderSlots {
        buffer,
        base_offset,
        record_width,
        capacity,
        address_width: COUNTERPARTY_ADDRESS_LENGTH,
        next: 0,
    }
}

impl<'a> Iterator for OrderSlots<'a> {
    type Item = Result<ClassifiedOrder, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.capacity {
            return None;
        }
        let slot = self.next;
        self.next += 1;

        let offset = slot
            .saturating_mul(self.record_width)
            .saturating_add(self.base_offset);
        let item = decode_order_slot(self.buffer, offset).map(|order| ClassifiedOrder {
            slot,
            offset,
            counterparty: order.counterparty(self.address_width).to_vec(),
            classification: classify(&order),
            order,
        });
        if let Err(ref e) = item {
            debug!(slot, offset, error = %e, "order slot did not decode");
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for OrderSlots<'_> {}

impl FusedIterator for OrderSlots<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{Classification, ORDER_RECORD_LENGTH};

    fn slot(order_id: u64, amount: u64, status: u8) -> Vec<u8> {
        let mut buf = vec![0u8; ORDER_RECORD_LENGTH];
        buf[96..104].copy_from_slice(&order_id.to_le_bytes());
        buf[104..112].copy_from_slice(&amount.to_le_bytes());
        buf[113] = status;
        buf
    }

    #[test]
    fn yields_exactly_capacity() {
        let mut buf = slot(1, 10, 0);
        buf.extend(slot(0, 0, 255));
        let slots = decode_order_array(&buf, 0, ORDER_RECORD_LENGTH, 2);
        assert_eq!(slots.len(), 2);

        let classes: Vec<_> = slots.map(|r| r.unwrap().classification).collect();
        assert_eq!(classes, vec![Classification::Valid, Classification::Empty]);
    }

    #[test]
    fn zero_capacity_is_empty() {
        assert_eq!(decode_order_array(&[], 0, ORDER_RECORD_LENGTH, 0).count(), 0);
    }

    #[test]
    fn record_width_padding_is_skipped() {
        let mut buf = slot(1, 1, 0);
        buf.extend([0xAB; 5]);
        buf.extend(slot(2, 2, 0));
        let orders: Vec<_> = decode_order_array(&buf, 0, ORDER_RECORD_LENGTH + 5, 2)
            .map(|r| r.unwrap().order.order_id)
            .collect();
        assert_eq!(orders, vec![1, 2]);
    }

    #[test]
    fn counterparty_follows_address_width() {
        let mut buf = slot(1, 1, 0);
        buf[32..96].copy_from_slice(&[0xCD; 64]);

        let full = decode_order_array(&buf, 0, ORDER_RECORD_LENGTH, 1)
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(full.counterparty.len(), 64);

        let trimmed = decode_order_array(&buf, 0, ORDER_RECORD_LENGTH, 1)
            .with_address_width(20)
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(trimmed.counterparty, vec![0xCD; 20]);
    }

    #[test]
    fn len_shrinks_as_consumed() {
        let buf = slot(0, 0, 0).repeat(3);
        let mut slots = decode_order_array(&buf, 0, ORDER_RECORD_LENGTH, 3);
        slots.next();
        assert_eq!(slots.len(), 2);
        slots.next();
        slots.next();
        assert_eq!(slots.len(), 0);
        assert!(slots.next().is_none());
    }
}
