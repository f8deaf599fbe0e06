//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use waymark::prelude::*;

/// Endpoint fixture with every knob overridable per test.
pub struct TestEndpoint {
    pub base: Url,
    pub route: Route,
    pub task: HttpTask,
    pub headers: Option<HashMap<String, String>>,
    pub timeout: Duration,
    pub validation: RangeInclusive<u16>,
    pub sample: Bytes,
    pub encoder: UrlQueryEncoder,
}

impl TestEndpoint {
    pub fn new(base: &str, route: Route) -> Self {
        Self {
            base: Url::parse(base).expect("valid base url"),
            route,
            task: HttpTask::Plain,
            headers: None,
            timeout: Duration::from_secs(300),
            validation: 200..=300,
            sample: Bytes::new(),
            encoder: UrlQueryEncoder::default(),
        }
    }

    pub fn with_task(mut self, task: HttpTask) -> Self {
        self.task = task;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_validation(mut self, validation: RangeInclusive<u16>) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_sample<B: Into<Bytes>>(mut self, sample: B) -> Self {
        self.sample = sample.into();
        self
    }

    pub fn with_query_encoder(mut self, encoder: UrlQueryEncoder) -> Self {
        self.encoder = encoder;
        self
    }
}

impl Endpoint for TestEndpoint {
    fn base_url(&self) -> Url {
        self.base.clone()
    }
    fn route(&self) -> Route {
        self.route.clone()
    }
    fn task(&self) -> HttpTask {
        self.task.clone()
    }
    fn headers(&self) -> Option<HashMap<String, String>> {
        self.headers.clone()
    }
    fn timeout(&self) -> Duration {
        self.timeout
    }
    fn validation_codes(&self) -> RangeInclusive<u16> {
        self.validation.clone()
    }
    fn sample_data(&self) -> Bytes {
        self.sample.clone()
    }
    fn query_encoder(&self) -> UrlQueryEncoder {
        self.encoder
    }
}

/// Interceptor that records every hook invocation into a shared log.
pub struct RecordingInterceptor {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl RecordingInterceptor {
    pub fn new(name: &'static str, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self { name, log }
    }

    fn record(&self, hook: &str) {
        self.log.lock().unwrap().push(format!("{}:{hook}", self.name));
    }
}

#[async_trait]
impl Interceptor for RecordingInterceptor {
    fn will_request(&self, _request: &HttpRequest, _endpoint: &dyn Endpoint) {
        self.record("will_request");
    }

    async fn prepare(
        &self,
        request: HttpRequest,
        _endpoint: &dyn Endpoint,
    ) -> Result<HttpRequest, WaymarkError> {
        self.record("prepare");
        Ok(request)
    }

    fn did_receive(&self, result: &Result<DataResponse, WaymarkError>, _endpoint: &dyn Endpoint) {
        self.record(if result.is_ok() {
            "did_receive(ok)"
        } else {
            "did_receive(err)"
        });
    }

    async fn process(
        &self,
        result: Result<DataResponse, WaymarkError>,
        _endpoint: &dyn Endpoint,
    ) -> Result<DataResponse, WaymarkError> {
        self.record("process");
        result
    }
}

pub fn shared_log() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn log_entries(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    log.lock().unwrap().clone()
}
