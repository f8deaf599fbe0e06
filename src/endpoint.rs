//! Declarative endpoint descriptions.
//!
//! An [`Endpoint`] describes one API call: where it goes, which method it
//! uses, how its body and query are encoded, and which status codes count as
//! success. Endpoints are read-only values; the pipeline never mutates them.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::time::Duration;

use bytes::Bytes;
use reqwest::{Method, Url};
use serde::Serialize;

use crate::encoding::query::UrlQueryEncoder;
use crate::error::WaymarkError;

/// JSON parameter map used for bodies and query strings.
pub type Parameters = serde_json::Map<String, serde_json::Value>;

/// Declarative description of one API call.
///
/// Only `base_url` and `route` are required; everything else has a safe
/// default. The trait is object safe so interceptors can receive
/// `&dyn Endpoint` without knowing the concrete type.
pub trait Endpoint: Send + Sync {
    /// Base address of the remote service.
    fn base_url(&self) -> Url;

    /// HTTP method and path, relative to the base address.
    fn route(&self) -> Route;

    /// How the request body and query string are built.
    fn task(&self) -> HttpTask {
        HttpTask::Plain
    }

    /// Extra headers; these override any headers set by the task.
    fn headers(&self) -> Option<HashMap<String, String>> {
        None
    }

    /// Per-request timeout, delegated to the transport.
    fn timeout(&self) -> Duration {
        Duration::from_secs(300)
    }

    /// Accepted status codes; anything outside fails validation.
    /// Both bounds are inclusive.
    fn validation_codes(&self) -> RangeInclusive<u16> {
        200..=300
    }

    /// Canned payload for offline testing against a stub transport.
    fn sample_data(&self) -> Bytes {
        Bytes::new()
    }

    /// Query-string encoder used when the task carries query parameters.
    fn query_encoder(&self) -> UrlQueryEncoder {
        UrlQueryEncoder::default()
    }
}

impl<E: Endpoint + ?Sized> Endpoint for Box<E> {
    fn base_url(&self) -> Url {
        (**self).base_url()
    }
    fn route(&self) -> Route {
        (**self).route()
    }
    fn task(&self) -> HttpTask {
        (**self).task()
    }
    fn headers(&self) -> Option<HashMap<String, String>> {
        (**self).headers()
    }
    fn timeout(&self) -> Duration {
        (**self).timeout()
    }
    fn validation_codes(&self) -> RangeInclusive<u16> {
        (**self).validation_codes()
    }
    fn sample_data(&self) -> Bytes {
        (**self).sample_data()
    }
    fn query_encoder(&self) -> UrlQueryEncoder {
        (**self).query_encoder()
    }
}

/// HTTP method plus the path appended to the endpoint's base address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Get(String),
    Head(String),
    Post(String),
    Put(String),
    Patch(String),
    Delete(String),
    Options(String),
    Trace(String),
    Connect(String),
}

impl Route {
    pub fn method(&self) -> Method {
        match self {
            Self::Get(_) => Method::GET,
            Self::Head(_) => Method::HEAD,
            Self::Post(_) => Method::POST,
            Self::Put(_) => Method::PUT,
            Self::Patch(_) => Method::PATCH,
            Self::Delete(_) => Method::DELETE,
            Self::Options(_) => Method::OPTIONS,
            Self::Trace(_) => Method::TRACE,
            Self::Connect(_) => Method::CONNECT,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Get(path)
            | Self::Head(path)
            | Self::Post(path)
            | Self::Put(path)
            | Self::Patch(path)
            | Self::Delete(path)
            | Self::Options(path)
            | Self::Trace(path)
            | Self::Connect(path) => path,
        }
    }
}

/// Body and query description for one request.
#[derive(Debug, Clone)]
pub enum HttpTask {
    /// No body; only a default content type.
    Plain,
    /// Optional JSON body and optional query parameters.
    Parameters {
        body: Option<Parameters>,
        query: Option<Parameters>,
    },
    /// A structured JSON body, with optional query parameters.
    Json {
        body: serde_json::Value,
        query: Option<Parameters>,
    },
    /// A `multipart/form-data` upload.
    Multipart(Vec<MultipartFormData>),
}

impl HttpTask {
    /// Build a [`HttpTask::Json`] task from any serializable value.
    ///
    /// Serialization happens here, before the call starts; a failure surfaces
    /// as an encoding error and no partial request is ever produced.
    pub fn json<T: Serialize>(body: &T) -> Result<Self, WaymarkError> {
        Ok(Self::Json {
            body: serde_json::to_value(body)
                .map_err(|e| WaymarkError::EncodingFailed(e.to_string()))?,
            query: None,
        })
    }

    /// Like [`HttpTask::json`], with query parameters appended to the URL.
    pub fn json_with_query<T: Serialize>(
        body: &T,
        query: Parameters,
    ) -> Result<Self, WaymarkError> {
        match Self::json(body)? {
            Self::Json { body, .. } => Ok(Self::Json {
                body,
                query: Some(query),
            }),
            _ => unreachable!("HttpTask::json always returns HttpTask::Json"),
        }
    }
}

/// One section of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartFormData {
    pub field: String,
    pub data: Bytes,
    pub file_name: Option<String>,
}

impl MultipartFormData {
    pub fn new<F: Into<String>, D: Into<Bytes>>(field: F, data: D) -> Self {
        Self {
            field: field.into(),
            data: data.into(),
            file_name: None,
        }
    }

    pub fn with_file_name<S: Into<String>>(mut self, file_name: S) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}
