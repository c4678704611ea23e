//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: body size checks, route
//! matching, dispatch and access logging.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{
    HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH, IF_NONE_MATCH, ORIGIN, REFERER, SERVER,
    USER_AGENT,
};
use hyper::{Method, Request, Response};
use thiserror::Error;

use super::{assets, contact, env_check, webhook};
use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    /// `Origin` header, used by the CORS policy
    pub origin: Option<&'a str>,
    pub if_none_match: Option<&'a str>,
}

impl RequestContext<'_> {
    pub fn is_head(&self) -> bool {
        *self.method == Method::HEAD
    }
}

#[derive(Debug, Error)]
pub enum BodyError {
    #[error("request body exceeds {0} bytes")]
    TooLarge(usize),
    #[error("failed to read request body: {0}")]
    Read(String),
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes> + Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    let header = |name: HeaderName| header_str(&parts.headers, name);

    let ctx = RequestContext {
        method: &parts.method,
        path: parts.uri.path(),
        origin: header(ORIGIN),
        if_none_match: header(IF_NONE_MATCH),
    };

    let max_body_size = state.config.http.max_body_size;
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let declared_too_large = exceeds_limit(header(CONTENT_LENGTH), max_body_size);
    let routes = &state.config.routes;
    let answers_own_errors = ctx.path == routes.contact_path || ctx.path == routes.webhook_path;

    let mut response = if declared_too_large && !answers_own_errors {
        http::build_413_response()
    } else {
        // Only POST bodies are ever looked at; the API handlers answer an
        // oversized one themselves, with their CORS headers
        let body = if declared_too_large {
            Err(BodyError::TooLarge(limit))
        } else if *ctx.method == Method::POST {
            read_body(body, limit).await
        } else {
            Ok(Bytes::new())
        };
        route_request(&ctx, body, &state).await
    };
    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if state.config.logging.access_log {
        let target = parts.uri.path_and_query().map_or(ctx.path, |pq| pq.as_str());
        let mut entry = AccessLogEntry::new(peer_addr.ip(), parts.method.as_str(), target.to_string());
        entry.protocol = format!("{:?}", parts.version);
        entry.status = response.status().as_u16();
        entry.bytes_sent = response.body().size_hint().lower();
        entry.referer = header(REFERER).map(ToString::to_string);
        entry.user_agent = header(USER_AGENT).map(ToString::to_string);
        entry.duration_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, state.config.logging.access_log_format);
    }

    Ok(response)
}

fn header_str(headers: &HeaderMap, name: HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// True when `Content-Length` announces more than the limit
fn exceeds_limit(content_length: Option<&str>, max_body_size: u64) -> bool {
    let Some(size_str) = content_length else {
        return false;
    };
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            true
        }
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            false
        }
        _ => false,
    }
}

/// Collect a body, enforcing the size limit for chunked uploads too
async fn read_body<B>(body: B, limit: usize) -> Result<Bytes, BodyError>
where
    B: Body<Data = Bytes> + Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => Err(BodyError::TooLarge(limit)),
        Err(e) => Err(BodyError::Read(e.to_string())),
    }
}

/// Route request based on path and configuration
async fn route_request(
    ctx: &RequestContext<'_>,
    body: Result<Bytes, BodyError>,
    state: &AppState,
) -> Response<Full<Bytes>> {
    let routes = &state.config.routes;

    // Health check endpoints (highest priority, always fast)
    if routes.health.enabled
        && (ctx.path == routes.health.liveness_path || ctx.path == routes.health.readiness_path)
    {
        return http::build_health_response();
    }

    if ctx.path == routes.contact_path {
        return contact::handle(ctx, body, state).await;
    }
    if ctx.path == routes.webhook_path {
        return webhook::handle(ctx, body, state);
    }
    if ctx.path == routes.env_check_path {
        return env_check::handle(&state.config.mail);
    }

    assets::handle(ctx, state).await
}
