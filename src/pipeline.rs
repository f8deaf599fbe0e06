//! The request/response pipeline engine.
//!
//! One callback-shaped primitive, [`run_call`], drives every front end:
//! encode the endpoint, walk the pre-send chain, send over the transport,
//! walk the post-send chain, then validate the status code exactly once.
//!
//! Owner liveness is checked before every interceptor step and before the
//! send. The engine holds only a `Weak` reference to the client internals,
//! so a caller that releases the client mid-chain gets a `ChainCollapsed`
//! error instead of a leaked or dangling completion.

use std::sync::{Arc, Weak};

use crate::client::ClientInner;
use crate::encoding;
use crate::endpoint::Endpoint;
use crate::error::WaymarkError;
use crate::interceptor::Interceptor;
use crate::transport::Transport;
use crate::types::{DataResponse, HttpRequest};

/// Execute one complete call against a snapshot of the interceptor list.
pub(crate) async fn run_call(
    owner: Weak<ClientInner>,
    interceptors: Vec<Arc<dyn Interceptor>>,
    transport: Arc<dyn Transport>,
    endpoint: &dyn Endpoint,
) -> Result<DataResponse, WaymarkError> {
    let request = encoding::encode_request(endpoint)?;
    let request = prepare_chain(&owner, &interceptors, endpoint, request).await?;

    ensure_alive(&owner)?;
    tracing::trace!(target: "waymark::http", method = %request.method, url = %request.url, "dispatching to transport");
    let outcome = match transport.send(request.clone()).await {
        Ok(raw) => Ok(DataResponse::new(request, raw)),
        Err(error) => Err(error),
    };

    let outcome = process_chain(&owner, &interceptors, endpoint, outcome).await?;
    validate(endpoint, outcome)
}

/// Walk the pre-send chain in registration order, short-circuiting on the
/// first `prepare` failure.
async fn prepare_chain(
    owner: &Weak<ClientInner>,
    interceptors: &[Arc<dyn Interceptor>],
    endpoint: &dyn Endpoint,
    mut request: HttpRequest,
) -> Result<HttpRequest, WaymarkError> {
    for interceptor in interceptors {
        ensure_alive(owner)?;
        interceptor.will_request(&request, endpoint);
        request = interceptor.prepare(request, endpoint).await?;
    }
    Ok(request)
}

/// Walk the post-send chain in registration order.
///
/// The carried value is a `Result`: a transport failure flows through every
/// interceptor, which may translate it into another failure but never erase
/// it (an `Ok` returned against a carried failure is discarded). A `process`
/// failure raised against a successful response aborts the remainder of the
/// phase and propagates verbatim via the outer `Err`.
async fn process_chain(
    owner: &Weak<ClientInner>,
    interceptors: &[Arc<dyn Interceptor>],
    endpoint: &dyn Endpoint,
    mut outcome: Result<DataResponse, WaymarkError>,
) -> Result<Result<DataResponse, WaymarkError>, WaymarkError> {
    for interceptor in interceptors {
        ensure_alive(owner)?;
        interceptor.did_receive(&outcome, endpoint);
        outcome = match outcome {
            Ok(response) => match interceptor.process(Ok(response), endpoint).await {
                Ok(next) => Ok(next),
                Err(error) => return Err(error),
            },
            Err(carried) => match interceptor.process(Err(carried.clone()), endpoint).await {
                Err(translated) => Err(translated),
                Ok(_) => Err(carried),
            },
        };
    }
    Ok(outcome)
}

/// Validate the final response's status code against the endpoint's accepted
/// range. Runs exactly once, after the whole post-send chain.
fn validate(
    endpoint: &dyn Endpoint,
    outcome: Result<DataResponse, WaymarkError>,
) -> Result<DataResponse, WaymarkError> {
    match outcome {
        Ok(response) if !endpoint.validation_codes().contains(&response.status.as_u16()) => {
            Err(WaymarkError::UnacceptableStatus(Box::new(response)))
        }
        other => other,
    }
}

fn ensure_alive(owner: &Weak<ClientInner>) -> Result<(), WaymarkError> {
    if owner.strong_count() == 0 {
        return Err(WaymarkError::ChainCollapsed);
    }
    Ok(())
}
