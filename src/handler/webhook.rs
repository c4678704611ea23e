//! Order webhook acknowledgement
//!
//! The ordering platform only needs a 200 to stop retrying; payloads are not
//! stored or processed.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response, StatusCode};
use serde_json::{json, Value};

use super::router::{BodyError, RequestContext};
use crate::config::{AppState, WebhookGetMode};
use crate::http;

const NOTICE_PAGE: &str = "<!DOCTYPE html>\n<html><head><title>Order webhook</title></head>\
<body><p>This endpoint receives order notifications and only accepts POST requests.</p></body></html>\n";

pub fn handle(
    ctx: &RequestContext<'_>,
    body: Result<Bytes, BodyError>,
    state: &AppState,
) -> Response<Full<Bytes>> {
    let get_mode = state.config.webhook.get_mode;
    let allow = if get_mode == WebhookGetMode::Reject {
        "POST, OPTIONS"
    } else {
        "POST, OPTIONS, GET"
    };

    let mut response = match (ctx.method, get_mode) {
        (&Method::OPTIONS, _) => http::build_no_content_response(),
        (&Method::POST, _) => acknowledge(body),
        (&Method::GET, WebhookGetMode::Notice) => {
            http::build_html_response(NOTICE_PAGE.to_string(), false)
        }
        (&Method::GET, WebhookGetMode::Redirect) => {
            http::build_redirect_response(&state.config.webhook.redirect_target)
        }
        _ => http::build_method_not_allowed(ctx.method.as_str(), allow),
    };
    state.cors.apply(&mut response, ctx.origin, allow);
    response
}

fn acknowledge(body: Result<Bytes, BodyError>) -> Response<Full<Bytes>> {
    match body {
        Ok(bytes) => {
            tracing::info!(bytes = bytes.len(), shape = payload_shape(&bytes), "order webhook received");
            http::build_json_response(StatusCode::OK, &json!({ "message": "Received" }))
        }
        Err(e) => {
            tracing::error!(error = %e, "order webhook body unreadable");
            http::build_json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({ "message": "Server error" }),
            )
        }
    }
}

/// JSON kind of the payload, or `non-json`
fn payload_shape(body: &[u8]) -> &'static str {
    if body.is_empty() {
        return "empty";
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(_)) => "object",
        Ok(Value::Array(_)) => "array",
        Ok(Value::String(_)) => "string",
        Ok(Value::Number(_)) => "number",
        Ok(Value::Bool(_)) => "bool",
        Ok(Value::Null) => "null",
        Err(_) => "non-json",
    }
}
