//! Client facade.
//!
//! `WaymarkClient` owns the interceptor list and the transport handle, and
//! exposes one pipeline through three front ends: callback, async/await, and
//! a single-shot stream. All three are observably identical in outcome; they
//! differ only in how completion is delivered.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use futures::stream::BoxStream;

use crate::endpoint::Endpoint;
use crate::error::WaymarkError;
use crate::interceptor::Interceptor;
use crate::pipeline;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{DataResponse, HttpConfig};

/// A cold stream yielding exactly one terminal value per subscription.
pub type ResponseStream = BoxStream<'static, Result<DataResponse, WaymarkError>>;

pub(crate) struct ClientInner {
    interceptors: RwLock<Vec<Arc<dyn Interceptor>>>,
    transport: Arc<dyn Transport>,
}

/// Declarative endpoint client.
///
/// Cloning is cheap and shares the interceptor list and transport. A call
/// whose every owning clone has been dropped resolves to
/// [`WaymarkError::ChainCollapsed`] rather than leaking its completion.
///
/// The callback and async front ends require a running Tokio runtime.
#[derive(Clone)]
pub struct WaymarkClient {
    inner: Arc<ClientInner>,
}

impl WaymarkClient {
    /// Create a client over the given transport with no interceptors.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_interceptors(transport, Vec::new())
    }

    /// Create a client over the given transport and interceptor list.
    pub fn with_interceptors(
        transport: Arc<dyn Transport>,
        interceptors: Vec<Arc<dyn Interceptor>>,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                interceptors: RwLock::new(interceptors),
                transport,
            }),
        }
    }

    pub fn builder() -> WaymarkClientBuilder {
        WaymarkClientBuilder::new()
    }

    /// Replace the whole interceptor list. In-flight calls keep the snapshot
    /// they took at invocation.
    pub fn set_interceptors(&self, interceptors: Vec<Arc<dyn Interceptor>>) {
        *self.write_interceptors() = interceptors;
    }

    /// Append one interceptor; it runs after everything already registered.
    pub fn add_interceptor(&self, interceptor: Arc<dyn Interceptor>) {
        self.write_interceptors().push(interceptor);
    }

    /// Remove every registered interceptor.
    pub fn clear_interceptors(&self) {
        self.write_interceptors().clear();
    }

    /// Issue a call and deliver its terminal outcome to `completion`, which
    /// is invoked exactly once, on success or failure.
    pub fn request_with_callback<E, F>(&self, endpoint: E, completion: F)
    where
        E: Endpoint + 'static,
        F: FnOnce(Result<DataResponse, WaymarkError>) + Send + 'static,
    {
        let owner = Arc::downgrade(&self.inner);
        let interceptors = self.snapshot();
        let transport = self.inner.transport.clone();
        tokio::spawn(async move {
            let result = pipeline::run_call(owner, interceptors, transport, &endpoint).await;
            completion(result);
        });
    }

    /// Issue a call and await its terminal outcome.
    pub async fn request<E>(&self, endpoint: E) -> Result<DataResponse, WaymarkError>
    where
        E: Endpoint + 'static,
    {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.request_with_callback(endpoint, move |result| {
            let _ = tx.send(result);
        });
        rx.await.unwrap_or(Err(WaymarkError::ChainCollapsed))
    }

    /// Issue a call as a cold stream: nothing happens until the stream is
    /// polled, and it emits exactly one terminal value.
    pub fn request_stream<E>(&self, endpoint: E) -> ResponseStream
    where
        E: Endpoint + 'static,
    {
        let owner = Arc::downgrade(&self.inner);
        let interceptors = self.snapshot();
        let transport = self.inner.transport.clone();
        Box::pin(async_stream::stream! {
            yield pipeline::run_call(owner, interceptors, transport, &endpoint).await;
        })
    }

    /// Point-in-time snapshot of the interceptor list.
    fn snapshot(&self) -> Vec<Arc<dyn Interceptor>> {
        match self.inner.interceptors.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn write_interceptors(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Arc<dyn Interceptor>>> {
        match self.inner.interceptors.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Builder for [`WaymarkClient`].
///
/// Without an explicit transport, `build` constructs a
/// [`ReqwestTransport`] from the accumulated HTTP configuration.
#[derive(Default)]
pub struct WaymarkClientBuilder {
    config: HttpConfig,
    interceptors: Vec<Arc<dyn Interceptor>>,
    transport: Option<Arc<dyn Transport>>,
}

impl WaymarkClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client-wide fallback timeout; per-request timeout comes from the
    /// endpoint.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.config.connect_timeout = Some(connect_timeout);
        self
    }

    /// Default header attached to every request.
    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.config.headers.insert(key.into(), value.into());
        self
    }

    pub fn proxy<S: Into<String>>(mut self, proxy: S) -> Self {
        self.config.proxy = Some(proxy.into());
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Register an interceptor; registration order is call order.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Use a custom transport instead of the default reqwest-backed one.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<WaymarkClient, WaymarkError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::from_config(&self.config)?),
        };
        Ok(WaymarkClient::with_interceptors(transport, self.interceptors))
    }
}
