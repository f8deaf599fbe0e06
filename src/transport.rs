//! Transport boundary.
//!
//! The engine treats the transport as an opaque asynchronous send: it does
//! not retry, pool connections, or manage TLS. [`ReqwestTransport`] is the
//! default production transport; [`StubTransport`] answers synthetically for
//! offline tests.

use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::WaymarkError;
use crate::types::{HttpConfig, HttpRequest, TransportResponse};

/// Sends one prepared request and returns the raw response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<TransportResponse, WaymarkError>;
}

/// Production transport backed by `reqwest`.
#[derive(Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Wrap an existing reqwest client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a transport from client-wide configuration.
    pub fn from_config(config: &HttpConfig) -> Result<Self, WaymarkError> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| WaymarkError::Configuration(format!("invalid proxy URL: {e}")))?;
            builder = builder.proxy(proxy);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent);
        }
        if !config.headers.is_empty() {
            let mut headers = HeaderMap::new();
            for (key, value) in &config.headers {
                let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                    WaymarkError::Configuration(format!("invalid header name `{key}`: {e}"))
                })?;
                let value = HeaderValue::from_str(value).map_err(|e| {
                    WaymarkError::Configuration(format!("invalid header value for `{key}`: {e}"))
                })?;
                headers.insert(name, value);
            }
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .map_err(|e| WaymarkError::Configuration(format!("failed to build client: {e}")))?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<TransportResponse, WaymarkError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers)
            .timeout(request.timeout);
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder.send().await.map_err(WaymarkError::from)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(WaymarkError::from)?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

enum StubReply {
    Response {
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
    },
    Failure(String),
}

/// Transport double that records every request and answers with a canned
/// reply. Pairs with [`Endpoint::sample_data`](crate::endpoint::Endpoint::sample_data)
/// for offline tests.
pub struct StubTransport {
    reply: StubReply,
    seen: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    /// Reply `200 OK` with the given body.
    pub fn ok<B: Into<Bytes>>(body: B) -> Self {
        Self::with_status(StatusCode::OK, body)
    }

    /// Reply with the given status and body.
    pub fn with_status<B: Into<Bytes>>(status: StatusCode, body: B) -> Self {
        Self {
            reply: StubReply::Response {
                status,
                headers: HeaderMap::new(),
                body: body.into(),
            },
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Fail every send with a transport error wrapping `message`.
    pub fn failure<S: Into<String>>(message: S) -> Self {
        Self {
            reply: StubReply::Failure(message.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Add a canned response header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        if let StubReply::Response { headers, .. } = &mut self.reply {
            headers.insert(name, value);
        }
        self
    }

    /// Requests this transport has been asked to send, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        match self.seen.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: HttpRequest) -> Result<TransportResponse, WaymarkError> {
        match self.seen.lock() {
            Ok(mut guard) => guard.push(request),
            Err(poisoned) => poisoned.into_inner().push(request),
        }
        match &self.reply {
            StubReply::Response {
                status,
                headers,
                body,
            } => Ok(TransportResponse {
                status: *status,
                headers: headers.clone(),
                body: body.clone(),
            }),
            StubReply::Failure(message) => {
                Err(WaymarkError::transport(std::io::Error::other(message.clone())))
            }
        }
    }
}
