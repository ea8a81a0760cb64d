// User resource handlers module

use http_body_util::BodyExt;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use serde_json::Value;
use std::sync::Arc;

use super::response;
use super::types::UserPatch;
use crate::config::AppState;
use crate::db::{users, StoreError};
use crate::logger;

/// GET /api/users/{id}
///
/// One read against storage, no mutation.
pub async fn get_user(state: &Arc<AppState>, id: &str) -> Response<Full<Bytes>> {
    match users::get(state.db.pool(), id).await {
        Ok(Some(user)) => response::json_response(StatusCode::OK, &user),
        Ok(None) => response::user_not_found(),
        Err(e) => storage_error("fetch", &e),
    }
}

/// PATCH /api/users/{id}
///
/// Reads the body, queues whitelisted assignments, writes them in one
/// statement, then re-reads the row so the response reflects exactly
/// what is stored.
pub async fn patch_user<B>(
    req: Request<B>,
    state: &Arc<AppState>,
    id: &str,
) -> Response<Full<Bytes>>
where
    B: Body,
{
    let raw = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => {
            logger::log_warning("Failed to read request body");
            return response::bad_request("Failed to read request body");
        }
    };

    // An absent body counts as an empty object on this wire.
    let body: Value = if raw.is_empty() {
        Value::Object(serde_json::Map::new())
    } else {
        match serde_json::from_slice(&raw) {
            Ok(v) => v,
            Err(_) => return response::bad_request("Invalid JSON"),
        }
    };

    let patch = UserPatch::from_body(&body);
    if patch.is_empty() {
        return response::bad_request("No fields provided");
    }

    if let Err(e) = users::apply_patch(state.db.pool(), id, &patch).await {
        return storage_error("update", &e);
    }

    match users::get(state.db.pool(), id).await {
        Ok(Some(user)) => response::json_response(StatusCode::OK, &user),
        // Zero rows took the update: the id never existed, or a
        // concurrent delete won the race between write and re-read.
        Ok(None) => response::user_not_found(),
        Err(e) => storage_error("reload", &e),
    }
}

/// Convert a storage failure into the fixed 500 body, with the detail
/// kept on the error log only.
fn storage_error(operation: &str, err: &StoreError) -> Response<Full<Bytes>> {
    logger::log_error(&format!("User {operation} failed: {err}"));
    response::internal_error()
}
