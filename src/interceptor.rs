//! Interceptor capability.
//!
//! An interceptor is a pluggable middleware unit: it can observe or rewrite
//! the request before it is sent and the response after it returns. Every
//! operation has a safe no-op default, so implementors override only what
//! they need. Registration order is call order; there is no priority system.

use async_trait::async_trait;

use crate::endpoint::Endpoint;
use crate::error::WaymarkError;
use crate::types::{DataResponse, HttpRequest};

/// Middleware hooks for one call, in invocation order:
/// `will_request` → `prepare` → (transport) → `did_receive` → `process`.
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Read-only notification fired immediately before [`prepare`].
    ///
    /// [`prepare`]: Interceptor::prepare
    fn will_request(&self, _request: &HttpRequest, _endpoint: &dyn Endpoint) {}

    /// Rewrite the outgoing request, or fail the whole chain.
    ///
    /// Each interceptor consumes the previous request and returns its
    /// replacement; an error aborts the chain and no later interceptor runs.
    async fn prepare(
        &self,
        request: HttpRequest,
        _endpoint: &dyn Endpoint,
    ) -> Result<HttpRequest, WaymarkError> {
        Ok(request)
    }

    /// Read-only notification fired immediately before [`process`].
    ///
    /// [`process`]: Interceptor::process
    fn did_receive(&self, _result: &Result<DataResponse, WaymarkError>, _endpoint: &dyn Endpoint) {}

    /// Rewrite the incoming result.
    ///
    /// A successful response may be rewritten or demoted into a failure. A
    /// failure may be translated into another failure but never erased: the
    /// engine discards any `Ok` returned against a carried failure and keeps
    /// the failure instead.
    async fn process(
        &self,
        result: Result<DataResponse, WaymarkError>,
        _endpoint: &dyn Endpoint,
    ) -> Result<DataResponse, WaymarkError> {
        result
    }
}

/// A simple logging interceptor backed by `tracing` (no sensitive data).
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingInterceptor;

#[async_trait]
impl Interceptor for LoggingInterceptor {
    fn will_request(&self, request: &HttpRequest, _endpoint: &dyn Endpoint) {
        tracing::debug!(target: "waymark::http", method = %request.method, url = %request.url, "sending request");
    }

    fn did_receive(&self, result: &Result<DataResponse, WaymarkError>, _endpoint: &dyn Endpoint) {
        match result {
            Ok(response) => {
                tracing::debug!(target: "waymark::http", status = %response.status, url = %response.request.url, "response received");
            }
            Err(error) => {
                tracing::debug!(target: "waymark::http", err = %error, "request failed");
            }
        }
    }
}
