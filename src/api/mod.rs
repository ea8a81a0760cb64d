// API module entry
// Routes the two user operations and the preflight short-circuit

mod handlers;
mod response;
pub mod types;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppState;
use crate::logger;

/// Main entry point for HTTP request handling
///
/// Dispatches on method and path; everything outside the wire contract
/// falls through to the 404 body.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
{
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);

    let response = dispatch(req, &state).await;

    if state.config.logging.access_log {
        let mut entry = logger::AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            path,
        );
        entry.query = query;
        entry.status = response.status().as_u16();
        entry.body_bytes = body_len(&response);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn dispatch<B>(req: Request<B>, state: &Arc<AppState>) -> Response<Full<Bytes>>
where
    B: Body,
{
    // Preflight never reaches resource logic, whatever the path.
    if req.method() == Method::OPTIONS {
        return response::preflight();
    }

    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return resp;
    }

    let method = req.method().clone();
    let Some(id) = parse_user_path(req.uri().path()).map(ToString::to_string) else {
        return response::not_found();
    };

    match method {
        Method::GET => handlers::get_user(state, &id).await,
        Method::PATCH => handlers::patch_user(req, state, &id).await,
        // An unsupported method on a matching path is the same 404 as an
        // unmatched path; this surface does not speak 405.
        _ => response::not_found(),
    }
}

/// Extract the `{id}` segment from `/api/users/{id}`.
///
/// The segment must be one or more decimal digits with nothing after it.
fn parse_user_path(path: &str) -> Option<&str> {
    let id = path.strip_prefix("/api/users/")?;
    if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
        Some(id)
    } else {
        None
    }
}

/// Validate Content-Length and reject oversized bodies before reading them
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    let size_str = content_length.to_str().ok()?;
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(response::payload_too_large())
        }
        _ => None,
    }
}

fn body_len(response: &Response<Full<Bytes>>) -> usize {
    usize::try_from(response.body().size_hint().exact().unwrap_or(0)).unwrap_or(usize::MAX)
}
