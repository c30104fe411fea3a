//! Integration tests for the contract state decoder.
//!
//! Buffers are assembled byte by byte, the way the contract lays them out,
//! then run through the public decoding API.

use qbridge_contracts::{
    classify, decode_contract_state, decode_order_array, decode_order_slot, decode_scalar_fields,
    Anomaly, BroadcastRequest, Classification, ContractLayout, DecodeError, LayoutError,
    OrderStatus, QueryResponse, MAX_ORDER_CAPACITY,
};
use qbridge_protocol::crypto::{Blake3Hasher, Ed25519Scheme, PrivateKey, PublicKey};
use qbridge_protocol::transaction::{
    encode_transport, Base64Codec, SignedTransaction, TransactionBuilder,
};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const RECORD: usize = 115;

fn order_record(order_id: u64, amount: u64, status: u8) -> Vec<u8> {
    let mut buf = vec![0u8; RECORD];
    buf[..32].copy_from_slice(&[0x0A; 32]);
    buf[96..104].copy_from_slice(&order_id.to_le_bytes());
    buf[104..112].copy_from_slice(&amount.to_le_bytes());
    buf[113] = status;
    buf
}

fn scalar_head() -> Vec<u8> {
    let mut buf = vec![0u8; 72];
    buf[..32].copy_from_slice(&[0x42; 32]);
    buf[32..40].copy_from_slice(&4u64.to_le_bytes());
    buf[40..48].copy_from_slice(&15_000u64.to_le_bytes());
    buf[48..56].copy_from_slice(&99_000u64.to_le_bytes());
    buf[56..64].copy_from_slice(&45u64.to_le_bytes());
    buf[64..68].copy_from_slice(&3_000_000u32.to_le_bytes());
    buf
}

/// A small layout: the bridge scalars followed by `capacity` slots.
fn layout_with_capacity(capacity: usize) -> ContractLayout {
    let mut layout = ContractLayout::bridge_v1();
    layout.orders.capacity = capacity;
    layout
}

// ---------------------------------------------------------------------------
// Single slots
// ---------------------------------------------------------------------------

#[test]
fn sentinel_status_is_empty() {
    let mut buf = order_record(12, 9_000, 0);
    buf[113] = 255;
    let order = decode_order_slot(&buf, 0).unwrap();
    assert_eq!(order.status, OrderStatus::Empty);
    assert_eq!(classify(&order), Classification::Empty);
}

#[test]
fn populated_slot_is_valid() {
    let order = decode_order_slot(&order_record(1, 5000, 0), 0).unwrap();
    assert_eq!(classify(&order), Classification::Valid);
    assert_eq!(order.origin, PublicKey::from_bytes([0x0A; 32]));
}

#[test]
fn stray_status_is_partial_not_fatal() {
    let order = decode_order_slot(&order_record(0, 0, 7), 0).unwrap();
    match classify(&order) {
        Classification::Partial(anomalies) => {
            assert!(anomalies.contains(&Anomaly::UnexpectedStatus(OrderStatus::Unknown(7))));
        }
        other => panic!("expected partial, got {:?}", other),
    }
}

#[test]
fn short_slot_buffer_reports_slot() {
    let buf = vec![0u8; 200];
    assert_eq!(
        decode_order_slot(&buf, 100),
        Err(DecodeError::TruncatedSlot {
            offset: 100,
            needed: 215,
            available: 200,
        })
    );
}

// ---------------------------------------------------------------------------
// Arrays
// ---------------------------------------------------------------------------

#[test]
fn iteration_continues_past_truncated_slot() {
    let mut buf = order_record(1, 10, 0);
    buf.extend(order_record(2, 20, 1));
    buf.extend(&order_record(3, 30, 0)[..50]);

    let items: Vec<_> = decode_order_array(&buf, 0, RECORD, 4).collect();
    assert_eq!(items.len(), 4);
    assert!(items[0].is_ok());
    assert!(items[1].is_ok());
    assert!(matches!(items[2], Err(DecodeError::TruncatedSlot { offset: 230, .. })));
    assert!(matches!(items[3], Err(DecodeError::TruncatedSlot { offset: 345, .. })));
}

#[test]
fn cloned_iterator_restarts_from_same_position() {
    let mut buf = order_record(1, 10, 0);
    buf.extend(order_record(2, 20, 0));
    buf.extend(order_record(3, 30, 0));

    let mut slots = decode_order_array(&buf, 0, RECORD, 3);
    slots.next();
    let replay = slots.clone();

    let first: Vec<u64> = slots.map(|r| r.unwrap().order.order_id).collect();
    let second: Vec<u64> = replay.map(|r| r.unwrap().order.order_id).collect();
    assert_eq!(first, vec![2, 3]);
    assert_eq!(first, second);
}

// ---------------------------------------------------------------------------
// Scalars & full state
// ---------------------------------------------------------------------------

#[test]
fn truncated_scalar_region_names_field() {
    let buf = &scalar_head()[..66];
    assert_eq!(
        decode_scalar_fields(buf, &ContractLayout::bridge_v1()),
        Err(DecodeError::Truncated {
            field: "tradeFeeBillionths".into(),
            needed: 68,
            available: 66,
        })
    );
}

#[test]
fn full_state_classifies_every_slot() {
    let mut buf = scalar_head();
    buf.extend(order_record(1, 5_000, 0));
    buf.extend(order_record(0, 0, 255));
    buf.extend(order_record(0, 0, 7));
    buf.extend(vec![0u8; RECORD]);
    buf.extend(&order_record(4, 1, 0)[..RECORD - 1]);

    let state = decode_contract_state(&buf, &layout_with_capacity(5)).unwrap();
    assert_eq!(state.scalars.next_order_id, 4);
    assert_eq!(state.scalars.trade_fee_billionths, 3_000_000);

    let summary = state.summary();
    assert_eq!(summary.capacity, 5);
    assert_eq!(summary.valid, 1);
    assert_eq!(summary.empty, 1);
    assert_eq!(summary.partial, 1);
    assert_eq!(summary.unused, 1);
    assert_eq!(summary.corrupt, 1);
    assert_eq!(state.corrupt_slots[0].slot, 4);
    assert_eq!(state.active_orders().next().map(|o| o.slot), Some(0));
    assert_eq!(state.partial_orders().next().map(|o| o.slot), Some(2));
}

#[test]
fn state_from_query_response() {
    let mut buf = scalar_head();
    buf.extend(order_record(1, 5_000, 0));
    let response = QueryResponse {
        response_data: encode_transport(&buf),
    };

    let bytes = response.decode(&Base64Codec).unwrap();
    let state = decode_contract_state(&bytes, &layout_with_capacity(1)).unwrap();
    assert_eq!(state.summary().valid, 1);
    assert_eq!(state.scalars.admin_identity(&Blake3Hasher).as_str().len(), 60);
}

// ---------------------------------------------------------------------------
// Layouts
// ---------------------------------------------------------------------------

#[test]
fn layout_json_roundtrip() {
    let layout = ContractLayout::bridge_v1();
    let json = layout.to_json().unwrap();
    assert!(json.contains("\"baseOffset\": 72"));
    assert_eq!(ContractLayout::from_json(&json).unwrap(), layout);
}

#[test]
fn layout_from_json_validates() {
    let json = r#"{
        "version": "broken",
        "fields": [
            { "name": "a", "offset": 0, "width": 8, "kind": "u64Le" },
            { "name": "b", "offset": 4, "width": 4, "kind": "u32Le" }
        ],
        "orders": { "baseOffset": 8, "recordWidth": 115, "capacity": 1, "addressWidth": 20 }
    }"#;
    assert_eq!(
        ContractLayout::from_json(json),
        Err(LayoutError::Overlap {
            first: "a".into(),
            second: "b".into(),
        })
    );
    assert!(matches!(
        ContractLayout::from_json("{ nope"),
        Err(LayoutError::Json(_))
    ));
}

#[test]
fn shifted_layout_decodes_same_records() {
    let mut layout = ContractLayout::bridge_v1();
    layout.orders.base_offset = 80;
    layout.orders.capacity = 1;

    let mut buf = scalar_head();
    buf.extend([0u8; 8]);
    buf.extend(order_record(6, 60, 2));
    let state = decode_contract_state(&buf, &layout).unwrap();
    assert_eq!(state.orders[0].order.order_id, 6);
    assert_eq!(state.orders[0].order.status, OrderStatus::Refunded);
}

#[test]
fn counterparty_trimmed_to_layout_address_width() {
    let mut record = order_record(3, 30, 0);
    record[32..96].copy_from_slice(&[0xEE; 64]);
    let mut buf = scalar_head();
    buf.extend(record);

    let state = decode_contract_state(&buf, &layout_with_capacity(1)).unwrap();
    assert_eq!(state.orders[0].counterparty, vec![0xEE; 20]);

    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["orders"][0]["counterparty"], format!("0x{}", "ee".repeat(20)));
}

#[test]
fn huge_capacity_is_rejected_before_decoding() {
    let json = r#"{
        "version": "huge",
        "fields": [],
        "orders": {
            "baseOffset": 0,
            "recordWidth": 115,
            "capacity": 72057594037927936,
            "addressWidth": 20
        }
    }"#;
    assert!(matches!(
        ContractLayout::from_json(json),
        Err(LayoutError::Capacity { capacity: 72_057_594_037_927_936, .. })
    ));

    let layout = layout_with_capacity(1 << 56);
    assert_eq!(
        decode_contract_state(&[0u8; 72], &layout),
        Err(DecodeError::Layout(LayoutError::Capacity {
            capacity: 1 << 56,
            max: MAX_ORDER_CAPACITY,
        }))
    );
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

#[test]
fn broadcast_request_carries_transport_text() {
    let signed = TransactionBuilder::new()
        .source(PublicKey::from_bytes([0u8; 32]))
        .destination(PublicKey::from_bytes([0xAA; 32]))
        .amount(5100)
        .tick(21_395_500)
        .build()
        .unwrap()
        .sign(&Ed25519Scheme, &Blake3Hasher, &PrivateKey::from_bytes([0x11; 32]))
        .unwrap();

    let request = BroadcastRequest::new(&signed, &Base64Codec);
    let json = serde_json::to_value(&request).unwrap();
    let text = json["encodedTransaction"].as_str().unwrap();
    let back = SignedTransaction::decode_transport(text, &Base64Codec).unwrap();
    assert_eq!(back, signed);
}
