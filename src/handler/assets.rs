//! Site asset serving
//!
//! Everything not claimed by an API route: the generated service worker and
//! the built single-page app, served cache-first through the asset cache.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Method, Response, StatusCode};

use super::router::RequestContext;
use crate::asset_cache::{self, Asset, FetchError, Source};
use crate::config::AppState;
use crate::http::{self, cache};
use crate::logger;

pub async fn handle(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    if !matches!(*ctx.method, Method::GET | Method::HEAD) {
        return http::build_405_response();
    }

    if ctx.path == state.config.assets.service_worker_path {
        return serve_service_worker(state, ctx.is_head());
    }

    match load(ctx.path, state).await {
        Some(asset) => build_asset_response(ctx, &asset),
        None => http::build_404_response(),
    }
}

/// Cache-first lookup with the client-side routing fallback
async fn load(path: &str, state: &AppState) -> Option<Asset> {
    match state.assets.fetch(path, state.origin.as_ref()).await {
        Ok((asset, source)) => {
            tracing::debug!(path, cached = source == Source::Cache, "asset served");
            Some(asset)
        }
        Err(FetchError::NotFound(_)) if is_app_route(path) => {
            match state.assets.fetch("/", state.origin.as_ref()).await {
                Ok((asset, _)) => Some(asset),
                Err(e) => {
                    logger::log_warning(&format!("Index unavailable for {path}: {e}"));
                    None
                }
            }
        }
        Err(FetchError::Io { path: file, source }) => {
            logger::log_error(&format!("Failed to read asset {file}: {source}"));
            None
        }
        Err(_) => None,
    }
}

/// Paths without a file extension belong to the client-side router
fn is_app_route(path: &str) -> bool {
    let last = path.rsplit('/').next().unwrap_or_default();
    !last.contains('.')
}

fn build_asset_response(ctx: &RequestContext<'_>, asset: &Asset) -> Response<Full<Bytes>> {
    if cache::check_etag_match(ctx.if_none_match, &asset.etag) {
        return http::build_304_response(&asset.etag);
    }
    http::build_cached_response(asset.body.clone(), asset.content_type, &asset.etag, ctx.is_head())
}

fn serve_service_worker(state: &AppState, is_head: bool) -> Response<Full<Bytes>> {
    let script =
        asset_cache::render_service_worker(state.assets.name(), state.assets.manifest());
    let content_length = script.len();
    let body = if is_head { Bytes::new() } else { Bytes::from(script) };

    // Revalidated on every load since it embeds the bucket name
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/javascript; charset=utf-8")
        .header(CONTENT_LENGTH, content_length)
        .header(CACHE_CONTROL, "no-cache")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build service worker response: {e}"));
            Response::new(Full::new(Bytes::new()))
        })
}
