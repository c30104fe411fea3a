//! Request and response envelopes for contract queries and broadcasts.
//!
//! These are what goes over the wire to the ledger's RPC endpoint. Sending
//! them is somebody else's job; here we only build and unpack them.

use qbridge_protocol::transaction::{SignedTransaction, TransportCodec};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// A read-only contract function call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    /// Index of the contract on the ledger.
    pub contract_index: u32,
    /// Contract function selector.
    pub input_type: u16,
    /// Length of the decoded `request_data`.
    pub input_size: u16,
    /// Encoded request payload.
    pub request_data: String,
}

impl QueryRequest {
    /// Encode a request payload.
    ///
    /// # Errors
    ///
    /// [`DecodeError::RequestTooLarge`] if the payload exceeds `u16::MAX` bytes.
    pub fn new<C: TransportCodec + ?Sized>(
        contract_index: u32,
        input_type: u16,
        data: &[u8],
        codec: &C,
    ) -> Result<Self, DecodeError> {
        let input_size =
            u16::try_from(data.len()).map_err(|_| DecodeError::RequestTooLarge(data.len()))?;
        Ok(Self {
            contract_index,
            input_type,
            input_size,
            request_data: codec.encode(data),
        })
    }
}

/// The endpoint's answer to a [`QueryRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    /// Encoded contract state buffer.
    pub response_data: String,
}

impl QueryResponse {
    /// Decode the response text to the raw state buffer.
    pub fn decode<C: TransportCodec + ?Sized>(&self, codec: &C) -> Result<Vec<u8>, DecodeError> {
        Ok(codec.decode(&self.response_data)?)
    }
}

/// A signed transaction ready for the broadcast endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastRequest {
    pub encoded_transaction: String,
}

impl BroadcastRequest {
    pub fn new<C: TransportCodec + ?Sized>(transaction: &SignedTransaction, codec: &C) -> Self {
        Self {
            encoded_transaction: transaction.encode_transport(codec),
        }
    }
}
