//! Cross-origin policy
//!
//! One policy object shared by every API endpoint. Origins are echoed only
//! when allow-listed; credentials are allowed, so the wildcard is never sent.

use hyper::header::{
    HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, VARY,
};
use hyper::Response;

use crate::config::CorsConfig;
use crate::logger;

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    default_origin: String,
    allowed_origins: Vec<String>,
    allowed_headers: String,
    max_age: u64,
}

impl CorsPolicy {
    pub fn from_config(config: &CorsConfig) -> Self {
        Self {
            default_origin: config.default_origin.clone(),
            allowed_origins: config.allowed_origins.clone(),
            allowed_headers: config.allowed_headers.join(", "),
            max_age: config.max_age,
        }
    }

    /// Origin to advertise for a request carrying `request_origin`
    pub fn allow_origin<'a>(&'a self, request_origin: Option<&'a str>) -> &'a str {
        match request_origin {
            Some(origin) if self.is_allowed(origin) => origin,
            _ => &self.default_origin,
        }
    }

    fn is_allowed(&self, origin: &str) -> bool {
        origin == self.default_origin || self.allowed_origins.iter().any(|o| o == origin)
    }

    /// Stamp the CORS headers onto an endpoint response
    ///
    /// `methods` is the endpoint's own method list, e.g. `"POST, OPTIONS"`.
    pub fn apply<B>(&self, response: &mut Response<B>, request_origin: Option<&str>, methods: &str) {
        let origin = self.allow_origin(request_origin);
        let headers = response.headers_mut();

        let pairs: [(HeaderName, &str); 4] = [
            (ACCESS_CONTROL_ALLOW_ORIGIN, origin),
            (ACCESS_CONTROL_ALLOW_METHODS, methods),
            (ACCESS_CONTROL_ALLOW_HEADERS, &self.allowed_headers),
            (VARY, "Origin"),
        ];
        for (name, value) in pairs {
            match HeaderValue::from_str(value) {
                Ok(v) => {
                    headers.insert(name, v);
                }
                Err(e) => logger::log_warning(&format!("Skipping CORS header {name}: {e}")),
            }
        }
        headers.insert(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from(self.max_age));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> CorsPolicy {
        CorsPolicy::from_config(&CorsConfig {
            default_origin: "https://brooklinpub.com".to_string(),
            allowed_origins: vec!["https://www.brooklinpub.com".to_string()],
            allowed_headers: vec!["Content-Type".to_string(), "Accept".to_string()],
            max_age: 600,
        })
    }

    #[test]
    fn test_echoes_allow_listed_origin() {
        let p = policy();
        assert_eq!(
            p.allow_origin(Some("https://www.brooklinpub.com")),
            "https://www.brooklinpub.com"
        );
        assert_eq!(p.allow_origin(Some("https://brooklinpub.com")), "https://brooklinpub.com");
    }

    #[test]
    fn test_unknown_origin_falls_back_to_default() {
        let p = policy();
        assert_eq!(p.allow_origin(Some("https://evil.test")), "https://brooklinpub.com");
        assert_eq!(p.allow_origin(None), "https://brooklinpub.com");
        assert_eq!(p.allow_origin(Some("*")), "https://brooklinpub.com");
    }

    #[test]
    fn test_apply_headers() {
        let mut response = Response::new(());
        policy().apply(&mut response, Some("https://evil.test"), "POST, OPTIONS");
        let h = response.headers();
        assert_eq!(h[ACCESS_CONTROL_ALLOW_ORIGIN], "https://brooklinpub.com");
        assert_eq!(h[ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(h[ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
        assert_eq!(h[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type, Accept");
        assert_eq!(h[ACCESS_CONTROL_MAX_AGE], "600");
        assert_eq!(h[VARY], "Origin");
    }
}
