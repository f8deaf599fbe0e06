//! Core value types shared across the pipeline.
//!
//! `HttpRequest` and `DataResponse` are plain values: each interceptor
//! consumes the previous one and returns a replacement, forming a linear
//! revision chain rather than mutating shared state.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::WaymarkError;

/// Transport-ready representation of one outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub timeout: Duration,
}

impl HttpRequest {
    /// Return a copy of this request with one header inserted, replacing any
    /// previous value. Convenient for interceptors that decorate requests.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Raw result handed back by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// A received response, paired with the request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct DataResponse {
    /// The final request as it left the pre-send chain.
    pub request: HttpRequest,
    /// Raw body bytes.
    pub data: Bytes,
    pub status: StatusCode,
    pub headers: HeaderMap,
}

impl DataResponse {
    pub fn new(request: HttpRequest, raw: TransportResponse) -> Self {
        Self {
            request,
            data: raw.body,
            status: raw.status,
            headers: raw.headers,
        }
    }

    /// Body decoded as lossy UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }

    /// Body deserialized from JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, WaymarkError> {
        serde_json::from_slice(&self.data).map_err(|e| WaymarkError::DecodingFailed(e.to_string()))
    }
}

/// Client-wide HTTP configuration, applied when building the default
/// reqwest-backed transport. Per-request timeout comes from the endpoint.
#[derive(Debug, Clone, Default)]
pub struct HttpConfig {
    /// Fallback request timeout for the underlying client.
    pub timeout: Option<Duration>,
    /// Connection timeout.
    pub connect_timeout: Option<Duration>,
    /// Default headers attached to every request.
    pub headers: HashMap<String, String>,
    /// Proxy URL.
    pub proxy: Option<String>,
    /// User agent string.
    pub user_agent: Option<String>,
}

impl HttpConfig {
    pub fn builder() -> HttpConfigBuilder {
        HttpConfigBuilder::default()
    }
}

/// Builder for [`HttpConfig`].
#[derive(Debug, Clone, Default)]
pub struct HttpConfigBuilder {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    headers: HashMap<String, String>,
    proxy: Option<String>,
    user_agent: Option<String>,
}

impl HttpConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = Some(connect_timeout);
        self
    }

    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn proxy<S: Into<String>>(mut self, proxy: S) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> HttpConfig {
        HttpConfig {
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            headers: self.headers,
            proxy: self.proxy,
            user_agent: self.user_agent,
        }
    }
}
