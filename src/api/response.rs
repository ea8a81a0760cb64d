// API response utility functions module
// Every response leaves through here so the CORS headers are never missed

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::logger;

const ALLOW_ORIGIN: &str = "*";
const ALLOW_METHODS: &str = "GET, PATCH, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type";

/// Response builder preloaded with the permissive cross-origin headers
fn cors_builder(status: StatusCode) -> hyper::http::response::Builder {
    Response::builder()
        .status(status)
        .header("Access-Control-Allow-Origin", ALLOW_ORIGIN)
        .header("Access-Control-Allow-Methods", ALLOW_METHODS)
        .header("Access-Control-Allow-Headers", ALLOW_HEADERS)
}

/// Build JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = match serde_json::to_string(body) {
        Ok(j) => j,
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            return internal_error();
        }
    };

    cors_builder(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build response: {e}"));
            Response::new(Full::new(Bytes::from("Error")))
        })
}

/// JSON error body with a single `error` field
fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    json_response(status, &serde_json::json!({ "error": message }))
}

/// 404 for paths and methods outside the wire contract
pub fn not_found() -> Response<Full<Bytes>> {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

/// 404 for a well-formed id that matches no row
pub fn user_not_found() -> Response<Full<Bytes>> {
    error_response(StatusCode::NOT_FOUND, "User not found")
}

/// 400 Bad Request response
pub fn bad_request(message: &str) -> Response<Full<Bytes>> {
    error_response(StatusCode::BAD_REQUEST, message)
}

/// 413 for bodies the configured limit rejects before reading
pub fn payload_too_large() -> Response<Full<Bytes>> {
    error_response(StatusCode::PAYLOAD_TOO_LARGE, "Payload too large")
}

/// 500 with a fixed body; built by hand so a serializer failure cannot recurse
pub fn internal_error() -> Response<Full<Bytes>> {
    cors_builder(StatusCode::INTERNAL_SERVER_ERROR)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(r#"{"error":"Internal server error"}"#)))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Error"))))
}

/// 204 preflight response; only the CORS headers travel, no body
pub fn preflight() -> Response<Full<Bytes>> {
    cors_builder(StatusCode::NO_CONTENT)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build preflight response: {e}"));
            Response::new(Full::new(Bytes::new()))
        })
}
