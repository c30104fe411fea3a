//! Transport text encodings.
//!
//! RPC endpoints carry binary payloads as text. [`Base64Codec`] (standard
//! alphabet, padded) is what the ledger's HTTP API expects; [`HexCodec`] is
//! handy for logs and fixtures. Both round-trip exactly.

use super::error::TransportError;

/// A reversible bytes ↔ text encoding.
pub trait TransportCodec: Send + Sync {
    /// Codec name for errors and logs.
    fn name(&self) -> &'static str;

    /// Encode bytes as text.
    fn encode(&self, bytes: &[u8]) -> String;

    /// Decode text back to bytes.
    fn decode(&self, text: &str) -> Result<Vec<u8>, TransportError>;
}

/// Standard padded base64.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Base64Codec;

impl TransportCodec for Base64Codec {
    fn name(&self) -> &'static str {
        "base64"
    }

    fn encode(&self, bytes: &[u8]) -> String {
        base64::encode(bytes)
    }

    fn decode(&self, text: &str) -> Result<Vec<u8>, TransportError> {
        base64::decode(text.trim()).map_err(|e| TransportError::InvalidText {
            codec: self.name(),
            reason: e.to_string(),
        })
    }
}

/// Lowercase hex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HexCodec;

impl TransportCodec for HexCodec {
    fn name(&self) -> &'static str {
        "hex"
    }

    fn encode(&self, bytes: &[u8]) -> String {
        hex::encode(bytes)
    }

    fn decode(&self, text: &str) -> Result<Vec<u8>, TransportError> {
        hex::decode(text.trim()).map_err(|e| TransportError::InvalidText {
            codec: self.name(),
            reason: e.to_string(),
        })
    }
}

/// Encode with the default codec (base64).
pub fn encode_transport(bytes: &[u8]) -> String {
    Base64Codec.encode(bytes)
}

/// Decode with the default codec (base64).
pub fn decode_transport(text: &str) -> Result<Vec<u8>, TransportError> {
    Base64Codec.decode(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_known_vector() {
        assert_eq!(encode_transport(b"foobar"), "Zm9vYmFy");
        assert_eq!(decode_transport("Zm9vYg==").unwrap(), b"foob");
    }

    #[test]
    fn roundtrip_all_byte_values() {
        let bytes: Vec<u8> = (0..=255u8).collect();
        for codec in [&Base64Codec as &dyn TransportCodec, &HexCodec] {
            assert_eq!(codec.decode(&codec.encode(&bytes)).unwrap(), bytes);
        }
    }

    #[test]
    fn empty_roundtrip() {
        assert_eq!(encode_transport(&[]), "");
        assert_eq!(decode_transport("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn surrounding_whitespace_tolerated() {
        assert_eq!(decode_transport("  Zm9v\n").unwrap(), b"foo");
    }

    #[test]
    fn invalid_text_reports_codec() {
        let err = decode_transport("not base64!!").unwrap_err();
        assert!(matches!(err, TransportError::InvalidText { codec: "base64", .. }));
        let err = HexCodec.decode("zz").unwrap_err();
        assert!(matches!(err, TransportError::InvalidText { codec: "hex", .. }));
    }
}
