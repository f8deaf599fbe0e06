//! Request encoding.
//!
//! Pure transformation from an [`Endpoint`] description to a transport-ready
//! [`HttpRequest`]. Encoding never produces a partial request: any failure
//! surfaces as an error before the pipeline starts.

pub mod json;
pub mod multipart;
pub mod query;

use bytes::Bytes;
use reqwest::Url;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use crate::endpoint::{Endpoint, HttpTask, Parameters};
use crate::error::WaymarkError;
use crate::types::HttpRequest;

const APPLICATION_JSON: HeaderValue = HeaderValue::from_static("application/json");

/// Turn an endpoint description into a transport-ready request.
pub fn encode_request(endpoint: &dyn Endpoint) -> Result<HttpRequest, WaymarkError> {
    let route = endpoint.route();
    let mut url = join_route(endpoint.base_url(), route.path())?;
    let mut headers = HeaderMap::new();
    let mut body = Bytes::new();

    match endpoint.task() {
        HttpTask::Plain => {
            headers.insert(CONTENT_TYPE, APPLICATION_JSON);
        }
        HttpTask::Parameters {
            body: parameters,
            query,
        } => {
            if let Some(parameters) = parameters {
                body = json::encode_body(&parameters)?;
                headers.insert(CONTENT_TYPE, APPLICATION_JSON);
            }
            apply_query(endpoint, &mut url, &mut headers, query);
        }
        HttpTask::Json { body: value, query } => {
            body = json::encode_body(&value)?;
            headers.insert(CONTENT_TYPE, APPLICATION_JSON);
            apply_query(endpoint, &mut url, &mut headers, query);
        }
        HttpTask::Multipart(parts) => {
            let boundary = multipart::random_boundary();
            let content_type = format!("multipart/form-data; boundary={boundary}");
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_str(&content_type)
                    .map_err(|e| WaymarkError::EncodingFailed(e.to_string()))?,
            );
            body = multipart::encode_parts(&parts, &boundary);
        }
    }

    // Endpoint headers override anything the task set.
    if let Some(extra) = endpoint.headers() {
        for (key, value) in &extra {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                WaymarkError::EncodingFailed(format!("invalid header name `{key}`: {e}"))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                WaymarkError::EncodingFailed(format!("invalid header value for `{key}`: {e}"))
            })?;
            headers.insert(name, value);
        }
    }

    Ok(HttpRequest {
        method: route.method(),
        url,
        headers,
        body,
        timeout: endpoint.timeout(),
    })
}

fn apply_query(
    endpoint: &dyn Endpoint,
    url: &mut Url,
    headers: &mut HeaderMap,
    query: Option<Parameters>,
) {
    if let Some(query) = query {
        endpoint.query_encoder().apply(url, &query);
        headers.insert(ACCEPT, APPLICATION_JSON);
    }
}

fn join_route(base: Url, path: &str) -> Result<Url, WaymarkError> {
    if path.is_empty() {
        return Ok(base);
    }
    let display = base.as_str().to_string();
    let mut url = base;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| WaymarkError::InvalidUrl(format!("cannot append a path to `{display}`")))?;
        segments.pop_if_empty();
        segments.extend(path.split('/').filter(|segment| !segment.is_empty()));
    }
    Ok(url)
}
