//! HTTP response building module
//!
//! Plain-text responses for the webhook listener.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::logger;

/// Build 200 OK response with an empty body
pub fn build_ok_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(200)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 401 Unauthorized response
pub fn build_401_response() -> Response<Full<Bytes>> {
    build_text_response(401, "401 Unauthorized")
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_text_response(404, "404 Not Found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "POST")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    build_text_response(413, "413 Payload Too Large")
}

fn build_text_response(status: u16, text: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from(text)))
        .unwrap_or_else(|e| {
            log_build_error(text, &e);
            Response::new(Full::new(Bytes::from(text)))
        })
}

fn log_build_error(kind: &str, err: &impl std::fmt::Display) {
    logger::log_error(&format!("Failed to build {kind} response: {err}"));
}
