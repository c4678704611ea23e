//! Response builders
//!
//! Every builder falls back to a bare response (and logs) if the builder
//! rejects a header value, so request paths never panic.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderName, ALLOW, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, ETAG, LOCATION,
};
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Short `text/plain` response with optional extra headers
fn text_response(
    status: StatusCode,
    text: &'static str,
    headers: &[(HeaderName, &str)],
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain");
    for (name, value) in headers {
        builder = builder.header(name.clone(), *value);
    }
    builder.body(Full::new(Bytes::from(text))).unwrap_or_else(|e| {
        log_build_error(status.as_str(), &e);
        Response::new(Full::new(Bytes::from(text)))
    })
}

/// 304 for a matching `If-None-Match`
pub fn build_304_response(etag: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(ETAG, etag)
        .header(CACHE_CONTROL, "public, max-age=3600")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

pub fn build_404_response() -> Response<Full<Bytes>> {
    text_response(StatusCode::NOT_FOUND, "404 Not Found", &[])
}

/// 405 for the asset side of the site, which only reads
pub fn build_405_response() -> Response<Full<Bytes>> {
    text_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "405 Method Not Allowed",
        &[(ALLOW, "GET, HEAD")],
    )
}

/// JSON 405 for an API endpoint
///
/// `allow` must list exactly the methods the endpoint serves.
pub fn build_method_not_allowed(method: &str, allow: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "message": format!("Method {method} Not Allowed") });
    let mut response = build_json_response(StatusCode::METHOD_NOT_ALLOWED, &body);
    match allow.parse() {
        Ok(value) => {
            response.headers_mut().insert(ALLOW, value);
        }
        Err(e) => crate::logger::log_error(&format!("Invalid Allow header '{allow}': {e}")),
    }
    response
}

/// Empty 204, used for CORS preflight
pub fn build_no_content_response() -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = StatusCode::NO_CONTENT;
    response
}

pub fn build_413_response() -> Response<Full<Bytes>> {
    text_response(StatusCode::PAYLOAD_TOO_LARGE, "413 Payload Too Large", &[])
}

/// 302 to `target`
pub fn build_redirect_response(target: &str) -> Response<Full<Bytes>> {
    text_response(StatusCode::FOUND, "Redirecting...", &[(LOCATION, target)])
}

/// Liveness/readiness probe answer
pub fn build_health_response() -> Response<Full<Bytes>> {
    text_response(StatusCode::OK, "ok", &[(CACHE_CONTROL, "no-cache")])
}

/// 200 HTML page; HEAD keeps the length but drops the body
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

pub fn build_json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = match serde_json::to_vec(body) {
        Ok(j) => j,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            return Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header(CONTENT_TYPE, "application/json")
                .body(Full::new(Bytes::from(r#"{"message":"Server error"}"#)))
                .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Error"))));
        }
    };

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::from("Error")))
        })
}

/// 200 for a stored asset, revalidated by `ETag`
pub fn build_cached_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .header(ETAG, etag)
        .header(CACHE_CONTROL, "public, max-age=3600")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
