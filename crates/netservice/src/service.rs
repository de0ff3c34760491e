//! GET/PUT/POST/DELETE over any [`NetworkServiceClient`].

use crate::client::ReqwestTransport;
use crate::codec::{encode_body, DecodeResultExt, Decoder, Encoder};
use crate::config::HttpConfig;
use crate::failure::Failure;
use crate::request::{HttpHeader, HttpMethod, Request};
use crate::transport::NetworkServiceClient;
use bytes::Bytes;
use netservice_log::spans;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::Instrument;
use url::Url;

/// Makes network requests and processes the responses.
///
/// Byte-level methods ([`get`](Self::get), [`put`](Self::put),
/// [`post`](Self::post), [`delete`](Self::delete)) send bodies untouched.
/// Typed methods add an encode step before and a decode step after; they all
/// end in [`send`](Self::send).
#[derive(Debug, Clone)]
pub struct NetworkService<T = ReqwestTransport> {
    transport: T,
}

impl NetworkService<ReqwestTransport> {
    /// Service over the real network with default config.
    pub fn new() -> Result<Self, Failure> {
        Ok(Self::with_transport(ReqwestTransport::new()?))
    }

    pub fn with_config(config: HttpConfig) -> Result<Self, Failure> {
        Ok(Self::with_transport(ReqwestTransport::with_config(config)?))
    }
}

impl<T: NetworkServiceClient> NetworkService<T> {
    /// Service over an injected transport.
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn session(&self) -> &T::Session {
        self.transport.session()
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// The byte-level primitive.
    pub async fn send(
        &self,
        method: HttpMethod,
        url: &Url,
        headers: &[HttpHeader],
        body: Option<Bytes>,
    ) -> Result<Bytes, Failure> {
        let span = spans::request_span(method.as_str(), url.as_str());
        let request = Request::build(url.clone(), body, headers.to_vec(), method);

        async move {
            let timer = spans::Timer::start("http_request");
            let result = self.transport.start(request).await;
            timer.finish();

            match &result {
                Ok(bytes) => tracing::debug!(len = bytes.len(), "request succeeded"),
                Err(failure) => {
                    if let Some(status) = failure.status() {
                        spans::record_status(status);
                    }
                    spans::record_error(failure);
                    tracing::warn!(error = %failure, "request failed");
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    // MARK: byte-level

    pub async fn get(&self, url: &Url, headers: &[HttpHeader]) -> Result<Bytes, Failure> {
        self.send(HttpMethod::Get, url, headers, None).await
    }

    pub async fn delete(&self, url: &Url, headers: &[HttpHeader]) -> Result<Bytes, Failure> {
        self.send(HttpMethod::Delete, url, headers, None).await
    }

    pub async fn put(
        &self,
        body: impl Into<Bytes>,
        url: &Url,
        headers: &[HttpHeader],
    ) -> Result<Bytes, Failure> {
        self.send(HttpMethod::Put, url, headers, Some(body.into())).await
    }

    pub async fn post(
        &self,
        body: impl Into<Bytes>,
        url: &Url,
        headers: &[HttpHeader],
    ) -> Result<Bytes, Failure> {
        self.send(HttpMethod::Post, url, headers, Some(body.into())).await
    }

    // MARK: typed

    /// GET and decode the response body.
    pub async fn get_decoded<R, D>(
        &self,
        url: &Url,
        headers: &[HttpHeader],
        decoder: &D,
    ) -> Result<R, Failure>
    where
        R: DeserializeOwned,
        D: Decoder,
    {
        self.get(url, headers).await.decode_with(decoder)
    }

    /// DELETE and decode the response body.
    pub async fn delete_decoded<R, D>(
        &self,
        url: &Url,
        headers: &[HttpHeader],
        decoder: &D,
    ) -> Result<R, Failure>
    where
        R: DeserializeOwned,
        D: Decoder,
    {
        self.delete(url, headers).await.decode_with(decoder)
    }

    /// PUT an encoded body; the response stays raw.
    pub async fn put_with_encoder<B, E>(
        &self,
        body: &B,
        url: &Url,
        headers: &[HttpHeader],
        encoder: &E,
    ) -> Result<Bytes, Failure>
    where
        B: Serialize + ?Sized,
        E: Encoder,
    {
        let body = encode_body(encoder, body)?;
        self.put(body, url, headers).await
    }

    /// POST an encoded body; the response stays raw.
    pub async fn post_with_encoder<B, E>(
        &self,
        body: &B,
        url: &Url,
        headers: &[HttpHeader],
        encoder: &E,
    ) -> Result<Bytes, Failure>
    where
        B: Serialize + ?Sized,
        E: Encoder,
    {
        let body = encode_body(encoder, body)?;
        self.post(body, url, headers).await
    }

    /// PUT an encoded body and decode the response.
    pub async fn put_encoded<B, R, E, D>(
        &self,
        body: &B,
        url: &Url,
        headers: &[HttpHeader],
        encoder: &E,
        decoder: &D,
    ) -> Result<R, Failure>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
        E: Encoder,
        D: Decoder,
    {
        self.put_with_encoder(body, url, headers, encoder)
            .await
            .decode_with(decoder)
    }

    /// POST an encoded body and decode the response.
    pub async fn post_encoded<B, R, E, D>(
        &self,
        body: &B,
        url: &Url,
        headers: &[HttpHeader],
        encoder: &E,
        decoder: &D,
    ) -> Result<R, Failure>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
        E: Encoder,
        D: Decoder,
    {
        self.post_with_encoder(body, url, headers, encoder)
            .await
            .decode_with(decoder)
    }
}
