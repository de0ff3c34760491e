//! Pluggable body encoding and decoding.
//!
//! An [`Encoder`] turns a value into request bytes and a [`Decoder`] turns
//! response bytes back into a value. Types that always travel in the same
//! format can name their codec once through [`TopLevelEncodable`] and
//! [`TopLevelDecodable`].

use crate::failure::Failure;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Codec errors. Surface to callers as [`Failure::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("failed to encode body: {0}")]
    Encode(String),

    #[error("failed to decode body: {0}")]
    Decode(String),
}

impl From<CodecError> for Failure {
    fn from(e: CodecError) -> Self {
        Failure::Unknown(e.to_string())
    }
}

/// Value to bytes.
pub trait Encoder {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Bytes, CodecError>;
}

/// Bytes to value.
pub trait Decoder {
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError>;
}

/// A type with a canonical encoder.
pub trait TopLevelEncodable: Serialize {
    type Encoder: Encoder;

    fn encoder() -> Self::Encoder;
}

/// A type with a canonical decoder.
pub trait TopLevelDecodable: DeserializeOwned {
    type Decoder: Decoder;

    fn decoder() -> Self::Decoder;
}

/// Both directions.
pub trait TopLevelCodable: TopLevelEncodable + TopLevelDecodable {}

impl<T: TopLevelEncodable + TopLevelDecodable> TopLevelCodable for T {}

/// JSON via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit indented JSON when encoding.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Encoder for JsonCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Bytes, CodecError> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        encoded
            .map(Bytes::from)
            .map_err(|e| CodecError::Encode(e.to_string()))
    }
}

impl Decoder for JsonCodec {
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }
}

/// Encode a request body, mapping codec errors into [`Failure`].
pub fn encode_body<E, T>(encoder: &E, value: &T) -> Result<Bytes, Failure>
where
    E: Encoder,
    T: Serialize + ?Sized,
{
    encoder.encode(value).map_err(Failure::from)
}

/// Encode with the type's canonical encoder.
pub fn encode_canonical<T: TopLevelEncodable>(value: &T) -> Result<Bytes, Failure> {
    encode_body(&T::encoder(), value)
}

/// Decoding layered on top of a byte-level result.
pub trait DecodeResultExt {
    /// Decode a successful body with `decoder`; failures pass through.
    fn decode_with<T, D>(self, decoder: &D) -> Result<T, Failure>
    where
        T: DeserializeOwned,
        D: Decoder;

    /// Decode with the target type's canonical decoder.
    fn decode_canonical<T: TopLevelDecodable>(self) -> Result<T, Failure>;
}

impl DecodeResultExt for Result<Bytes, Failure> {
    fn decode_with<T, D>(self, decoder: &D) -> Result<T, Failure>
    where
        T: DeserializeOwned,
        D: Decoder,
    {
        let bytes = self?;
        decoder.decode(&bytes).map_err(|e| {
            tracing::warn!(error = %e, len = bytes.len(), "response body did not decode");
            Failure::from(e)
        })
    }

    fn decode_canonical<T: TopLevelDecodable>(self) -> Result<T, Failure> {
        self.decode_with(&T::decoder())
    }
}
