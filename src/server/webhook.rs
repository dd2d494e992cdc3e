//! Webhook request handling
//!
//! Validates a pushed update (method, path, secret token, size) and forwards
//! it to the dispatcher queue. Anything that passes validation but does not
//! parse as an update is dropped and still acknowledged, so Telegram does not
//! redeliver it.

use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Bytes, Incoming};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tokio::sync::mpsc;

use crate::config::WebhookConfig;
use crate::error::FetchError;
use crate::http;
use crate::logger;
use crate::telegram::Update;

pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Shared by every webhook connection
pub struct WebhookContext {
    pub config: WebhookConfig,
    pub updates: mpsc::Sender<Update>,
}

/// Main entry point for webhook requests
pub async fn handle_webhook(
    req: Request<Incoming>,
    ctx: Arc<WebhookContext>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };
    let secret = header(SECRET_HEADER);
    let content_length = header("content-length");

    if let Some(resp) = check_request(
        req.method(),
        req.uri().path(),
        secret.as_deref(),
        content_length.as_deref(),
        &ctx.config,
    ) {
        return Ok(resp);
    }

    let limit = usize::try_from(ctx.config.max_body_size).unwrap_or(usize::MAX);
    let body = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_warning(&format!("Rejected webhook body: {e}"));
            return Ok(http::build_413_response());
        }
    };

    Ok(accept_payload(&body, &ctx.updates).await)
}

/// Validate everything known before reading the body
///
/// Returns `Some(response)` to reject, `None` to continue.
pub fn check_request(
    method: &Method,
    path: &str,
    secret: Option<&str>,
    content_length: Option<&str>,
    config: &WebhookConfig,
) -> Option<Response<Full<Bytes>>> {
    if path != config.path {
        return Some(http::build_404_response());
    }
    if *method != Method::POST {
        logger::log_warning(&format!("Method not allowed on webhook: {method}"));
        return Some(http::build_405_response());
    }
    if let Some(expected) = config.secret_token.as_deref() {
        if !secret_matches(secret, expected) {
            logger::log_warning("Webhook request with missing or wrong secret token");
            return Some(http::build_401_response());
        }
    }
    if let Some(size) = content_length.and_then(|v| v.parse::<u64>().ok()) {
        if size > config.max_body_size {
            logger::log_error(&format!(
                "Webhook body too large: {size} bytes (max: {})",
                config.max_body_size
            ));
            return Some(http::build_413_response());
        }
    }
    None
}

/// Compare the presented secret without leaking where it differs
fn secret_matches(presented: Option<&str>, expected: &str) -> bool {
    presented.is_some_and(|p| bool::from(p.as_bytes().ct_eq(expected.as_bytes())))
}

/// Parse the body and queue the update
pub async fn accept_payload(body: &[u8], updates: &mpsc::Sender<Update>) -> Response<Full<Bytes>> {
    match serde_json::from_slice::<Update>(body) {
        Ok(update) => {
            if updates.send(update).await.is_err() {
                logger::log_error("Dispatcher queue closed; dropping webhook update");
            }
        }
        Err(e) => {
            logger::log_debug(&format!("{}: {e}", FetchError::MalformedUpdate));
        }
    }
    http::build_ok_response()
}
