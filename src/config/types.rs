// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

use crate::logger::AccessLogFormat;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub cors: CorsConfig,
    #[serde(default)]
    pub mail: MailConfig,
    pub webhook: WebhookConfig,
    pub routes: RoutesConfig,
    pub assets: AssetsConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// Subscriber output: `compact` or `json`
    pub format: String,
    pub access_log: bool,
    /// Access log format: combined, common or json; anything else is combined
    #[serde(default)]
    pub access_log_format: AccessLogFormat,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub max_body_size: u64,
}

/// Cross-origin policy shared by the API endpoints
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    /// Origin sent back when the request origin is not allow-listed
    pub default_origin: String,
    /// Extra origins echoed back verbatim
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_allowed_headers")]
    pub allowed_headers: Vec<String>,
    pub max_age: u64,
}

fn default_allowed_headers() -> Vec<String> {
    [
        "X-CSRF-Token",
        "X-Requested-With",
        "Accept",
        "Accept-Version",
        "Content-Length",
        "Content-MD5",
        "Content-Type",
        "Date",
        "X-Api-Version",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Transactional mail relay settings
///
/// All fields are optional so the server starts without secrets; the
/// contact endpoint reports a relay failure until they are provided.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct MailConfig {
    /// HTTP endpoint of the relay's send API
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub pass: Option<String>,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub bcc: Option<String>,
}

/// How the order webhook answers a browser GET
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WebhookGetMode {
    /// 200 with a short HTML notice
    Notice,
    /// 302 to `redirect_target`
    Redirect,
    /// 405 like any other unsupported method
    Reject,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebhookConfig {
    pub get_mode: WebhookGetMode,
    pub redirect_target: String,
}

/// Routes configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RoutesConfig {
    pub contact_path: String,
    pub webhook_path: String,
    pub env_check_path: String,
    /// Health check configuration
    #[serde(default)]
    pub health: HealthConfig,
}

/// Health check configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HealthConfig {
    /// Enable health check endpoints
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    /// Liveness probe path (default: /healthz)
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
    /// Readiness probe path (default: /readyz)
    #[serde(default = "default_readyz_path")]
    pub readiness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_healthz_path() -> String {
    "/healthz".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_readyz_path() -> String {
    "/readyz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            liveness_path: default_healthz_path(),
            readiness_path: default_readyz_path(),
        }
    }
}

/// Built site and offline cache settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AssetsConfig {
    /// Directory holding the built single-page app
    pub root: String,
    pub index_file: String,
    /// Bucket name; bump it to invalidate every cached asset
    pub cache_name: String,
    pub service_worker_path: String,
    pub install_on_startup: bool,
    #[serde(default = "default_manifest")]
    pub manifest: Vec<String>,
}

/// Files the site ships from `public/`; bundled scripts and styles carry
/// content hashes in their names, so they are fetched on demand instead
fn default_manifest() -> Vec<String> {
    [
        "/",
        "/images/brooklinpub-logo.png",
        "/brands/3speed.webp",
        "/brands/alexkeith.webp",
        "/brands/budl.webp",
        "/brands/budwei.webp",
        "/brands/goose.webp",
        "/brands/guineess.webp",
        "/brands/harpp.webp",
        "/brands/landshark.webp",
        "/brands/mitchelob.webp",
        "/brands/perioni.webp",
        "/brands/somerbby.webp",
        "/brands/stella.webp",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
