//! # Waymark - Declarative HTTP Endpoint Client
//!
//! Waymark turns a typed endpoint description into an outgoing HTTP request,
//! drives it through an ordered interceptor chain, sends it over a pluggable
//! transport, and returns a typed response.
//!
#![deny(unsafe_code)]
//!
//! ## Features
//!
//! - **Declarative Endpoints**: Describe an API call once - base URL, route,
//!   body/query encoding, headers, timeout, accepted status range.
//! - **Interceptor Chain**: Any number of independently authored interceptors
//!   observe or rewrite the request before send and the response after, in
//!   registration order, short-circuiting on the first failure.
//! - **One Engine, Three Front Ends**: The same pipeline is exposed through a
//!   callback, an `async` call, and a single-shot stream - identical outcomes,
//!   different delivery.
//! - **Pluggable Transport**: reqwest in production, a recording stub in
//!   tests; the engine never does its own I/O.
//! - **Closed Error Taxonomy**: Every call resolves to exactly one terminal
//!   outcome; errors are never swallowed mid-chain.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use waymark::prelude::*;
//!
//! struct GetUser {
//!     id: u64,
//! }
//!
//! impl Endpoint for GetUser {
//!     fn base_url(&self) -> Url {
//!         Url::parse("https://api.example.com").unwrap()
//!     }
//!     fn route(&self) -> Route {
//!         Route::Get(format!("users/{}", self.id))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WaymarkClient::builder()
//!         .user_agent("my-app/1.0")
//!         .with_interceptor(std::sync::Arc::new(LoggingInterceptor))
//!         .build()?;
//!
//!     let response = client.request(GetUser { id: 7 }).await?;
//!     println!("status: {}, body: {}", response.status, response.text());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod encoding;
pub mod endpoint;
pub mod error;
pub mod interceptor;
mod pipeline;
pub mod transport;
pub mod types;

pub use client::{ResponseStream, WaymarkClient, WaymarkClientBuilder};
pub use endpoint::{Endpoint, HttpTask, MultipartFormData, Parameters, Route};
pub use error::WaymarkError;
pub use interceptor::{Interceptor, LoggingInterceptor};
pub use transport::{ReqwestTransport, StubTransport, Transport};
pub use types::{DataResponse, HttpConfig, HttpRequest, TransportResponse};

/// Commonly used types, in one import.
pub mod prelude {
    pub use crate::client::{ResponseStream, WaymarkClient, WaymarkClientBuilder};
    pub use crate::encoding::query::{ArrayEncoding, BoolEncoding, UrlQueryEncoder};
    pub use crate::endpoint::{Endpoint, HttpTask, MultipartFormData, Parameters, Route};
    pub use crate::error::WaymarkError;
    pub use crate::interceptor::{Interceptor, LoggingInterceptor};
    pub use crate::transport::{ReqwestTransport, StubTransport, Transport};
    pub use crate::types::{DataResponse, HttpConfig, HttpRequest, TransportResponse};

    pub use reqwest::{Method, StatusCode, Url};
}
