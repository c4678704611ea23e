//! Contact form endpoint
//!
//! OPTIONS answers the preflight, POST validates and relays one email,
//! everything else is 405.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response, StatusCode};
use serde_json::json;

use super::router::{BodyError, RequestContext};
use crate::config::AppState;
use crate::contact::{self, ContactForm, MailRelay};
use crate::http;

const ALLOW: &str = "POST, OPTIONS";
const SENT: &str = "Email sent successfully! We'll get back to you soon.";
const INVALID_BODY: &str = "Invalid request body.";

pub async fn handle(
    ctx: &RequestContext<'_>,
    body: Result<Bytes, BodyError>,
    state: &AppState,
) -> Response<Full<Bytes>> {
    let mut response = match *ctx.method {
        Method::OPTIONS => http::build_no_content_response(),
        Method::POST => submit(body, state.relay.as_ref()).await,
        _ => http::build_method_not_allowed(ctx.method.as_str(), ALLOW),
    };
    state.cors.apply(&mut response, ctx.origin, ALLOW);
    response
}

async fn submit(body: Result<Bytes, BodyError>, relay: &dyn MailRelay) -> Response<Full<Bytes>> {
    let body = match body {
        Ok(b) => b,
        Err(BodyError::TooLarge(_)) => return http::build_413_response(),
        Err(e) => {
            tracing::warn!(error = %e, "contact submission unreadable");
            return bad_request(INVALID_BODY);
        }
    };

    // Field types only; the contents are not echoed anywhere
    let form: ContactForm = match serde_json::from_slice(&body) {
        Ok(f) => f,
        Err(e) => {
            tracing::info!(line = e.line(), column = e.column(), "contact body is not a valid form");
            return bad_request(INVALID_BODY);
        }
    };

    let submission = match form.validate() {
        Ok(s) => s,
        Err(e) => {
            tracing::info!(code = e.code(), "contact submission rejected");
            return bad_request(&e.to_string());
        }
    };

    let message = contact::compose(&submission);
    match relay.send(&message).await {
        Ok(()) => {
            tracing::info!(category = %submission.category_label(), "contact email relayed");
            http::build_json_response(StatusCode::OK, &json!({ "message": SENT, "success": true }))
        }
        Err(e) => {
            tracing::error!(code = e.code(), error = %e, "failed to relay contact email");
            http::build_json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({ "message": e.user_message(), "success": false }),
            )
        }
    }
}

fn bad_request(message: &str) -> Response<Full<Bytes>> {
    http::build_json_response(StatusCode::BAD_REQUEST, &json!({ "message": message }))
}
