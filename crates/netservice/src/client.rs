//! Real-network transport backed by `reqwest`.

use crate::config::HttpConfig;
use crate::failure::{Failure, TransportErrorKind};
use crate::request::{HttpHeader, Request};
use crate::transport::NetworkServiceClient;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, ClientBuilder};

/// Build a configured `reqwest` client.
pub fn build_client(config: &HttpConfig) -> Result<Client, Failure> {
    let mut builder = ClientBuilder::new()
        .connect_timeout(config.connect_timeout())
        .timeout(config.request_timeout())
        .user_agent(&config.user_agent)
        .pool_max_idle_per_host(config.pool_max_idle_per_host);

    if config.gzip {
        builder = builder.gzip(true);
    }

    builder.build().map_err(Failure::from)
}

impl From<reqwest::Error> for Failure {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return Failure::HttpResponse {
                status: status.as_u16(),
                headers: vec![],
                body: Bytes::new(),
            };
        }

        let kind = if e.is_timeout() {
            TransportErrorKind::Timeout
        } else if e.is_connect() {
            TransportErrorKind::Connect
        } else if e.is_redirect() {
            TransportErrorKind::Redirect
        } else if e.is_body() || e.is_decode() {
            TransportErrorKind::Body
        } else if e.is_builder() {
            TransportErrorKind::Builder
        } else if e.is_request() {
            TransportErrorKind::Request
        } else {
            TransportErrorKind::Other
        };
        Failure::Transport {
            kind,
            message: e.to_string(),
        }
    }
}

/// [`NetworkServiceClient`] performing real HTTP exchanges.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: Client,
    config: HttpConfig,
}

impl ReqwestTransport {
    /// Create a transport with default config.
    pub fn new() -> Result<Self, Failure> {
        Self::with_config(HttpConfig::default())
    }

    /// Create a transport with custom config.
    pub fn with_config(config: HttpConfig) -> Result<Self, Failure> {
        let inner = build_client(&config)?;
        Ok(Self { inner, config })
    }

    /// Wrap an already configured client.
    pub fn from_client(inner: Client, config: HttpConfig) -> Self {
        Self { inner, config }
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    fn to_reqwest(&self, request: Request) -> reqwest::RequestBuilder {
        let mut builder = self.inner.request(request.method.into(), request.url);
        for header in &request.headers {
            builder = builder.header(header.name.as_str(), header.value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        builder
    }

    /// Check the status and read the body.
    async fn check_response(&self, response: reqwest::Response) -> Result<Bytes, Failure> {
        let status = response.status().as_u16();

        if !(100..=599).contains(&status) {
            tracing::warn!(status, "status outside the HTTP range");
            return Err(Failure::UrlResponseInvalid);
        }

        if self.config.success_status.contains(status) {
            return response.bytes().await.map_err(Failure::from);
        }

        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                HttpHeader::new(name.as_str(), String::from_utf8_lossy(value.as_bytes()))
            })
            .collect();
        let body = response.bytes().await.map_err(Failure::from)?;

        Err(Failure::HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl NetworkServiceClient for ReqwestTransport {
    type Session = Client;

    fn session(&self) -> &Client {
        &self.inner
    }

    async fn start(&self, request: Request) -> Result<Bytes, Failure> {
        let method = request.method;
        let url = request.url.to_string();
        tracing::debug!("Making {} request to: {}", method, url);

        let response = self.to_reqwest(request).send().await.map_err(Failure::from)?;
        tracing::debug!("{} response: {} {}", method, response.status(), url);

        self.check_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StatusRange;

    #[test]
    fn test_transport_creation() {
        let transport = ReqwestTransport::new();
        assert!(transport.is_ok());
    }

    #[test]
    fn test_transport_with_custom_config() {
        let config = HttpConfig {
            connect_timeout_ms: 5_000,
            request_timeout_ms: 15_000,
            user_agent: "test-agent".to_string(),
            pool_max_idle_per_host: 5,
            gzip: false,
            success_status: StatusRange { min: 200, max: 299 },
        };

        let transport = ReqwestTransport::with_config(config.clone()).unwrap();
        assert_eq!(transport.config(), &config);
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(&HttpConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_connect_failure_maps_to_transport_error() {
        // Port 9 (discard) on loopback is not expected to accept HTTP.
        let transport = ReqwestTransport::new().unwrap();
        let request = Request::build(
            url::Url::parse("http://127.0.0.1:9/").unwrap(),
            None,
            vec![],
            crate::request::HttpMethod::Get,
        );

        match transport.start(request).await {
            Err(Failure::Transport { kind, .. }) => {
                assert!(matches!(
                    kind,
                    TransportErrorKind::Connect | TransportErrorKind::Request
                ));
            }
            other => panic!("expected a transport failure, got {:?}", other),
        }
    }
}
