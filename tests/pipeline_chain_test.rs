//! Interceptor chain behavior: ordering, short-circuit, failure carrying,
//! and end-of-chain status validation.

mod support;

use std::sync::Arc;

use async_trait::async_trait;
use waymark::prelude::*;

use support::{RecordingInterceptor, TestEndpoint, log_entries, shared_log};

fn endpoint() -> TestEndpoint {
    TestEndpoint::new("https://api.example.com", Route::Get("ping".into()))
}

#[tokio::test]
async fn interceptors_run_in_registration_order_in_both_phases() {
    let log = shared_log();
    let client = WaymarkClient::builder()
        .with_transport(Arc::new(StubTransport::ok("pong")))
        .with_interceptor(Arc::new(RecordingInterceptor::new("a", log.clone())))
        .with_interceptor(Arc::new(RecordingInterceptor::new("b", log.clone())))
        .with_interceptor(Arc::new(RecordingInterceptor::new("c", log.clone())))
        .build()
        .unwrap();

    client.request(endpoint()).await.unwrap();

    assert_eq!(
        log_entries(&log),
        vec![
            "a:will_request",
            "a:prepare",
            "b:will_request",
            "b:prepare",
            "c:will_request",
            "c:prepare",
            "a:did_receive(ok)",
            "a:process",
            "b:did_receive(ok)",
            "b:process",
            "c:did_receive(ok)",
            "c:process",
        ]
    );
}

struct FailingPrepare;

#[async_trait]
impl Interceptor for FailingPrepare {
    async fn prepare(
        &self,
        _request: HttpRequest,
        _endpoint: &dyn Endpoint,
    ) -> Result<HttpRequest, WaymarkError> {
        Err(WaymarkError::EncodingFailed("denied by b".into()))
    }
}

#[tokio::test]
async fn prepare_failure_short_circuits_and_propagates_verbatim() {
    let log = shared_log();
    let client = WaymarkClient::builder()
        .with_transport(Arc::new(StubTransport::ok("pong")))
        .with_interceptor(Arc::new(RecordingInterceptor::new("a", log.clone())))
        .with_interceptor(Arc::new(FailingPrepare))
        .with_interceptor(Arc::new(RecordingInterceptor::new("c", log.clone())))
        .build()
        .unwrap();

    let err = client.request(endpoint()).await.unwrap_err();
    match err {
        WaymarkError::EncodingFailed(message) => assert_eq!(message, "denied by b"),
        other => panic!("unexpected error: {other:?}"),
    }
    // c never ran, in either phase.
    assert_eq!(log_entries(&log), vec!["a:will_request", "a:prepare"]);
}

struct RewriteStatus(StatusCode);

#[async_trait]
impl Interceptor for RewriteStatus {
    async fn process(
        &self,
        result: Result<DataResponse, WaymarkError>,
        _endpoint: &dyn Endpoint,
    ) -> Result<DataResponse, WaymarkError> {
        result.map(|mut response| {
            response.status = self.0;
            response
        })
    }
}

#[tokio::test]
async fn validation_runs_after_the_whole_chain() {
    // The stub answers 404, but the final interceptor rewrites the status to
    // 200: the call must succeed, proving validation sees the post-chain
    // response.
    let client = WaymarkClient::builder()
        .with_transport(Arc::new(StubTransport::with_status(
            StatusCode::NOT_FOUND,
            "missing",
        )))
        .with_interceptor(Arc::new(RewriteStatus(StatusCode::OK)))
        .build()
        .unwrap();

    let response = client.request(endpoint()).await.unwrap();
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "missing");
}

#[tokio::test]
async fn unacceptable_status_carries_the_rejected_response() {
    let client = WaymarkClient::builder()
        .with_transport(Arc::new(StubTransport::with_status(
            StatusCode::NOT_FOUND,
            "missing",
        )))
        .build()
        .unwrap();

    let err = client.request(endpoint()).await.unwrap_err();
    let response = err.response().expect("rejected response");
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.text(), "missing");
}

#[tokio::test]
async fn custom_validation_range_is_honored() {
    let client = WaymarkClient::builder()
        .with_transport(Arc::new(StubTransport::with_status(
            StatusCode::NOT_FOUND,
            "",
        )))
        .build()
        .unwrap();

    let endpoint = endpoint().with_validation(200..=499);
    let response = client.request(endpoint).await.unwrap();
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn transport_failure_flows_through_every_interceptor() {
    let log = shared_log();
    let client = WaymarkClient::builder()
        .with_transport(Arc::new(StubTransport::failure("socket closed")))
        .with_interceptor(Arc::new(RecordingInterceptor::new("a", log.clone())))
        .with_interceptor(Arc::new(RecordingInterceptor::new("b", log.clone())))
        .build()
        .unwrap();

    let err = client.request(endpoint()).await.unwrap_err();
    assert_eq!(
        err.underlying_error().map(|cause| cause.to_string()),
        Some("socket closed".to_string())
    );
    // Both interceptors observed the carried failure.
    assert_eq!(
        log_entries(&log),
        vec![
            "a:will_request",
            "a:prepare",
            "b:will_request",
            "b:prepare",
            "a:did_receive(err)",
            "a:process",
            "b:did_receive(err)",
            "b:process",
        ]
    );
}

#[tokio::test]
async fn endpoint_query_encoder_override_reaches_the_wire() {
    let stub = Arc::new(StubTransport::ok("pong"));
    let client = WaymarkClient::builder()
        .with_transport(stub.clone())
        .build()
        .unwrap();

    let mut query = Parameters::new();
    query.insert(
        "tag".to_string(),
        serde_json::json!(["rust", "http"]),
    );
    query.insert("draft".to_string(), serde_json::json!(true));
    let endpoint = endpoint()
        .with_task(HttpTask::Parameters {
            body: None,
            query: Some(query),
        })
        .with_query_encoder(UrlQueryEncoder::new(
            ArrayEncoding::Brackets,
            BoolEncoding::Numeric,
        ));

    client.request(endpoint).await.unwrap();

    let sent = stub.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].url.query(),
        Some("draft=1&tag%5B%5D=rust&tag%5B%5D=http")
    );
}

struct FailingProcess;

#[async_trait]
impl Interceptor for FailingProcess {
    async fn process(
        &self,
        result: Result<DataResponse, WaymarkError>,
        _endpoint: &dyn Endpoint,
    ) -> Result<DataResponse, WaymarkError> {
        result.and_then(|_| Err(WaymarkError::EncodingFailed("rejected in process".into())))
    }
}

#[tokio::test]
async fn process_failure_aborts_the_remainder_of_the_phase() {
    let log = shared_log();
    let client = WaymarkClient::builder()
        .with_transport(Arc::new(StubTransport::ok("pong")))
        .with_interceptor(Arc::new(FailingProcess))
        .with_interceptor(Arc::new(RecordingInterceptor::new("after", log.clone())))
        .build()
        .unwrap();

    let err = client.request(endpoint()).await.unwrap_err();
    assert!(matches!(err, WaymarkError::EncodingFailed(_)));
    // "after" ran pre-send, but never saw the response phase.
    assert_eq!(
        log_entries(&log),
        vec!["after:will_request", "after:prepare"]
    );
}

struct EraseFailure;

#[async_trait]
impl Interceptor for EraseFailure {
    async fn process(
        &self,
        result: Result<DataResponse, WaymarkError>,
        _endpoint: &dyn Endpoint,
    ) -> Result<DataResponse, WaymarkError> {
        match result {
            Ok(response) => Ok(response),
            // Try to fabricate a success out of a carried failure.
            Err(_) => Ok(DataResponse {
                request: HttpRequest {
                    method: Method::GET,
                    url: Url::parse("https://api.example.com/fake").unwrap(),
                    headers: Default::default(),
                    body: Default::default(),
                    timeout: std::time::Duration::from_secs(1),
                },
                data: Default::default(),
                status: StatusCode::OK,
                headers: Default::default(),
            }),
        }
    }
}

#[tokio::test]
async fn carried_failures_cannot_be_erased() {
    let client = WaymarkClient::builder()
        .with_transport(Arc::new(StubTransport::failure("socket closed")))
        .with_interceptor(Arc::new(EraseFailure))
        .build()
        .unwrap();

    let err = client.request(endpoint()).await.unwrap_err();
    assert!(err.underlying_error().is_some(), "transport failure survives");
}

struct AuthHeader;

#[async_trait]
impl Interceptor for AuthHeader {
    async fn prepare(
        &self,
        request: HttpRequest,
        _endpoint: &dyn Endpoint,
    ) -> Result<HttpRequest, WaymarkError> {
        Ok(request.with_header(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_static("Bearer token"),
        ))
    }
}

#[tokio::test]
async fn prepared_requests_form_a_linear_revision_chain() {
    let stub = Arc::new(StubTransport::ok("pong"));
    let client = WaymarkClient::builder()
        .with_transport(stub.clone())
        .with_interceptor(Arc::new(AuthHeader))
        .build()
        .unwrap();

    let response = client.request(endpoint()).await.unwrap();

    // The transport saw the rewritten request, and the response carries it.
    let sent = stub.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].headers.get(reqwest::header::AUTHORIZATION).unwrap(),
        "Bearer token"
    );
    assert_eq!(response.request, sent[0]);
}
