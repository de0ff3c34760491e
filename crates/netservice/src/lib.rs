//! Typed HTTP helpers over a pluggable transport.
//!
//! [`NetworkService`] offers GET/PUT/POST/DELETE in byte-level and typed
//! forms. Every form funnels into a single [`NetworkServiceClient::start`]
//! call, so swapping the real [`ReqwestTransport`] for a test double changes
//! nothing else. All public operations return `Result<_, Failure>`.

pub mod client;
pub mod codec;
pub mod config;
pub mod failure;
pub mod request;
pub mod service;
pub mod transport;

pub use client::ReqwestTransport;
pub use codec::{
    encode_body, encode_canonical, CodecError, DecodeResultExt, Decoder, Encoder, JsonCodec,
    TopLevelCodable, TopLevelDecodable, TopLevelEncodable,
};
pub use config::{ConfigError, HttpConfig, StatusRange};
pub use failure::{Failure, StatusClass, TransportErrorKind};
pub use request::{headers, HttpHeader, HttpMethod, Request};
pub use service::NetworkService;
pub use transport::NetworkServiceClient;

pub use bytes::Bytes;
pub use url::Url;
