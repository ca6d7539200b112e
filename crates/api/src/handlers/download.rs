//! File download responses for exported images.

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cameo_pipeline::Export;

/// Serve an export as an attachment.
pub fn attachment(export: Export) -> Response {
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, export.mime_type),
            (CONTENT_DISPOSITION, content_disposition(&export.filename)),
        ],
        export.bytes,
    )
        .into_response()
}

/// `attachment` disposition with an ASCII fallback name, plus an RFC 5987
/// `filename*` when the real name is not plain ASCII.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();

    if fallback == filename {
        return format!("attachment; filename=\"{fallback}\"");
    }

    let mut encoded = String::with_capacity(filename.len() * 3);
    for byte in filename.bytes() {
        if byte.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}
