// Copyright (c) 2026 QBridge Contributors. MIT License.
// See LICENSE for details.

//! # QBridge Contract Decoding
//!
//! Turns the raw bytes a bridge contract returns from a query into typed,
//! classified records. Read-only: nothing here writes to the contract, and
//! nothing here fetches the bytes either.
//!
//! - **layout** — The offset/width table, versioned alongside the contract.
//! - **scalars** — Counters and totals read through the table.
//! - **order** — One 115-byte order record and its classification.
//! - **slots** — Lazy iteration over the fixed-capacity order array.
//! - **state** — Everything above, bundled into a [`ContractState`].
//! - **query** — Request/response envelopes for the caller's RPC transport.
//!
//! ## Design Principles
//!
//! 1. Offsets live in data, not code. A contract layout change is a table
//!    edit (or a JSON file), not a patch.
//! 2. A short buffer is an error that names the field. Never zero-fill.
//! 3. Storage slots come in four flavours: empty, valid, partial, unused.
//!    We report which one we saw. Deciding what to do about it is the
//!    caller's job.
//! 4. One corrupt slot never hides the others.

pub mod error;
pub mod layout;
pub mod order;
pub mod query;
pub mod scalars;
pub mod slots;
pub mod state;

pub use error::{DecodeError, LayoutError};
pub use layout::{ContractLayout, FieldKind, FieldSpec, OrderArrayLayout, MAX_ORDER_CAPACITY};
pub use order::{
    classify, decode_order_slot, Anomaly, BridgeOrder, Classification, ClassifiedOrder,
    OrderStatus,
};
pub use query::{BroadcastRequest, QueryRequest, QueryResponse};
pub use scalars::{decode_scalar_fields, ContractScalars, FieldValue};
pub use slots::{decode_order_array, OrderSlots};
pub use state::{decode_contract_state, ContractState, CorruptSlot, StateSummary};
