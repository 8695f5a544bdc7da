//! Wire types for the internal POST `/internal/reverse` transport.
//!
//! Bodies are `MsgPack` maps with named fields, produced by
//! `rmp_serde::to_vec_named()`, so either side can add optional fields
//! without breaking positional decoding.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Path of the internal reverse endpoint.
pub const REVERSE_PATH: &str = "/internal/reverse";

/// Content type of every body on the internal transport.
pub const MSGPACK_CONTENT_TYPE: &str = "application/msgpack";

/// Header carrying the caller's remaining call budget in milliseconds.
pub const CALL_TIMEOUT_HEADER: &str = "x-call-timeout-ms";

/// Header carrying the inbound request id across the hop.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Body of a reverse call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseRequest {
    /// Text to reverse.
    pub text: String,
}

/// Successful reply to a reverse call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseResponse {
    /// The reversed text.
    pub reversed: String,
}

/// Error reply from the internal endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub message: String,
}

/// Errors from encoding or decoding a wire body.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to encode msgpack body: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("failed to decode msgpack body: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

/// Encodes a wire value as a named-field `MsgPack` map.
///
/// # Errors
///
/// Returns `CodecError::Encode` if serialization fails.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    Ok(rmp_serde::to_vec_named(value)?)
}

/// Decodes a wire value from `MsgPack` bytes.
///
/// # Errors
///
/// Returns `CodecError::Decode` if the bytes are not a valid encoding of `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    Ok(rmp_serde::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_request_uses_named_fields() {
        let bytes = encode(&ReverseRequest {
            text: "abc".to_string(),
        })
        .unwrap();

        // fixmap(1) { "text": "abc" }
        assert_eq!(bytes[0], 0x81);
        let decoded: ReverseRequest = decode(&bytes).unwrap();
        assert_eq!(decoded.text, "abc");
    }

    #[test]
    fn multibyte_text_survives_the_wire() {
        let original = ReverseResponse {
            reversed: "oll\u{e9}h \u{1f600}".to_string(),
        };
        let decoded: ReverseResponse = decode(&encode(&original).unwrap()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn garbage_fails_to_decode() {
        let result = decode::<ReverseRequest>(&[0xc1, 0x00, 0xff]);
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }

    #[test]
    fn wrong_shape_fails_to_decode() {
        let bytes = encode(&ErrorResponse {
            message: "nope".to_string(),
        })
        .unwrap();
        assert!(decode::<ReverseResponse>(&bytes).is_err());
    }
}
