// Configuration module entry point
// Manages application configuration and runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    AssetsConfig, Config, CorsConfig, HealthConfig, HttpConfig, LoggingConfig, MailConfig,
    PerformanceConfig, RoutesConfig, ServerConfig, WebhookConfig, WebhookGetMode,
};

/// Unprefixed variables the deployment platform already defines
const LEGACY_ENV_KEYS: [(&str, &str); 5] = [
    ("ALLOWED_ORIGIN", "cors.default_origin"),
    ("EMAIL_ENDPOINT", "mail.endpoint"),
    ("EMAIL_USER", "mail.user"),
    ("EMAIL_PASS", "mail.pass"),
    ("RECIPIENT_EMAIL", "mail.recipient"),
];

/// Config keys set by the legacy variables `lookup` knows about; empty values count as unset
fn legacy_overrides(
    lookup: impl Fn(&str) -> Option<String>,
) -> Vec<(&'static str, Option<String>)> {
    LEGACY_ENV_KEYS
        .iter()
        .map(|(var, key)| (*key, lookup(var).filter(|v| !v.is_empty())))
        .collect()
}

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let overrides = legacy_overrides(|var| std::env::var(var).ok());
        Self::load_with_overrides(config_path, &overrides)
    }

    /// Same as [`Config::load_from`] with explicit top-priority overrides
    pub fn load_with_overrides(
        config_path: &str,
        overrides: &[(&str, Option<String>)],
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SITE").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "compact")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "brooklin-site")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("cors.default_origin", "https://brooklinpub.com")?
            .set_default("cors.max_age", 86_400)?
            .set_default("webhook.get_mode", "notice")?
            .set_default("webhook.redirect_target", "/")?
            .set_default("routes.contact_path", "/api/send-email")?
            .set_default("routes.webhook_path", "/api/order-onlinegf")?
            .set_default("routes.env_check_path", "/api/test-env")?
            .set_default("assets.root", "dist")?
            .set_default("assets.index_file", "index.html")?
            .set_default("assets.cache_name", "brooklin-pub-v1")?
            .set_default("assets.service_worker_path", "/sw.js")?
            .set_default("assets.install_on_startup", true)?;

        for (key, value) in overrides {
            builder = builder.set_override_option(*key, value.clone())?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
impl Config {
    /// Defaults only, ignoring the process environment's legacy variables
    pub fn test_default() -> Self {
        Self::load_with_overrides("__no_such_config__", &[])
            .expect("default configuration must deserialize")
    }
}
