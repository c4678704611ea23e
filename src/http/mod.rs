//! HTTP protocol layer module
//!
//! Response builders, CORS policy and cache validators shared by the
//! API endpoints and the asset side of the site.

pub mod cache;
pub mod cors;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use cors::CorsPolicy;
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_cached_response, build_health_response, build_html_response, build_json_response,
    build_method_not_allowed, build_no_content_response, build_redirect_response,
};
