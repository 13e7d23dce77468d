//! HTTP response building module
//!
//! Builders for the handful of responses both servers send.

use super::body::{self, ResponseBody};
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Response, StatusCode};

/// Exact body of every 404 response
pub const NOT_FOUND_BODY: &str = "Error 404: resource not found.";

/// Build 404 Not Found response
pub fn build_404_response() -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(CONTENT_TYPE, "text/plain")
        .body(body::full(NOT_FOUND_BODY))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            not_found_fallback()
        })
}

/// 404 assembled without the builder, so it cannot fail
fn not_found_fallback() -> Response<ResponseBody> {
    let mut resp = Response::new(body::full(NOT_FOUND_BODY));
    *resp.status_mut() = StatusCode::NOT_FOUND;
    resp.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    resp
}

/// Build 200 response for a file held in memory
pub fn build_file_response(data: Bytes, content_type: &str) -> Response<ResponseBody> {
    let content_length = data.len();

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .body(body::full(data))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(body::empty())
        })
}

/// Build 200 response whose body is produced incrementally
pub fn build_stream_response(body: ResponseBody, content_type: &str) -> Response<ResponseBody> {
    match Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .body(body)
    {
        Ok(response) => response,
        Err(e) => {
            log_build_error("200 stream", &e);
            Response::new(body::empty())
        }
    }
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
