//! # Transaction Module
//!
//! Construction, signing and wire encoding for ledger transactions.
//!
//! ## Architecture
//!
//! ```text
//! header.rs    — The fixed 80-byte header and its offset table
//! builder.rs   — TransactionBuilder and the editable UnsignedTransaction
//! signing.rs   — Sealing into SignedTransaction, (de)serialization, verify
//! transport.rs — Text encodings for RPC transport (base64, hex)
//! error.rs     — TransactionError / TransportError
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build** — [`TransactionBuilder`] validates ranges and sizes.
//! 2. **Sign** — [`UnsignedTransaction::sign`] or [`sign_transaction`]
//!    consumes the unsigned value and returns a [`SignedTransaction`].
//! 3. **Encode** — [`SignedTransaction::encode_transport`] gives the text
//!    the caller's broadcast endpoint wants.
//!
//! ## Design Decisions
//!
//! - All integers are little-endian, fixed width. No varints, no padding.
//! - The digest covers `header || payload` and nothing else.
//! - Unsigned transactions have no broadcast serializer. A transaction the
//!   network would reject can't be produced by accident.

pub mod builder;
pub mod error;
pub mod header;
pub mod signing;
pub mod transport;

pub use builder::{TransactionBuilder, UnsignedTransaction};
pub use error::{TransactionError, TransportError};
pub use header::TransactionHeader;
pub use signing::{sign_transaction, SignedTransaction};
pub use transport::{decode_transport, encode_transport, Base64Codec, HexCodec, TransportCodec};
