//! `multipart/form-data` body framing.
//!
//! Sections are emitted in part-list order; that order is observable on the
//! wire and callers rely on it. The boundary token is regenerated per request
//! so bodies can never collide across calls.

use bytes::{BufMut, Bytes, BytesMut};

use crate::endpoint::MultipartFormData;

/// Generate a fresh boundary token of the form
/// `request.boundary.<8-hex><8-hex>`.
pub fn random_boundary() -> String {
    format!(
        "request.boundary.{:08x}{:08x}",
        rand::random::<u32>(),
        rand::random::<u32>()
    )
}

/// Best-effort content type for one part, from its file name extension.
fn part_content_type(part: &MultipartFormData) -> String {
    part.file_name
        .as_deref()
        .and_then(|name| mime_guess::from_path(name).first_raw())
        .unwrap_or("application/octet-stream")
        .to_string()
}

/// Frame the given parts into a complete multipart body.
pub fn encode_parts(parts: &[MultipartFormData], boundary: &str) -> Bytes {
    let mut body = BytesMut::new();
    for part in parts {
        body.put_slice(format!("--{boundary}\r\n").as_bytes());
        match part.file_name.as_deref().filter(|name| !name.is_empty()) {
            Some(file_name) => body.put_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{file_name}\"\r\n",
                    part.field
                )
                .as_bytes(),
            ),
            None => body.put_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.field).as_bytes(),
            ),
        }
        body.put_slice(format!("Content-Type: {}\r\n\r\n", part_content_type(part)).as_bytes());
        body.put_slice(&part.data);
        body.put_slice(b"\r\n");
    }
    body.put_slice(format!("--{boundary}--\r\n").as_bytes());
    body.freeze()
}
