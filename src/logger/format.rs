//! Access log lines
//!
//! `combined` and `common` follow the Apache/Nginx layouts; `json` emits one
//! object per request for log shippers.

use std::fmt;
use std::net::IpAddr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Layout of access log lines, `logging.access_log_format`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLogFormat {
    Common,
    Json,
    /// Unrecognized names land here too
    #[default]
    #[serde(other)]
    Combined,
}

/// One served request
#[derive(Debug, Clone, Serialize)]
pub struct AccessLogEntry {
    pub client: IpAddr,
    pub received_at: DateTime<Local>,
    pub method: String,
    /// Path plus `?query` when present
    pub target: String,
    /// e.g. `HTTP/1.1`
    pub protocol: String,
    pub status: u16,
    pub bytes_sent: u64,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub duration_us: u64,
}

impl AccessLogEntry {
    /// Entry stamped with the current local time
    pub fn new(client: IpAddr, method: &str, target: String) -> Self {
        Self {
            client,
            received_at: Local::now(),
            method: method.to_string(),
            target,
            protocol: "HTTP/1.1".to_string(),
            status: 200,
            bytes_sent: 0,
            referer: None,
            user_agent: None,
            duration_us: 0,
        }
    }

    pub fn render(&self, format: AccessLogFormat) -> String {
        match format {
            AccessLogFormat::Common => Common(self).to_string(),
            AccessLogFormat::Combined => format!(
                "{} \"{}\" \"{}\"",
                Common(self),
                self.referer.as_deref().unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            AccessLogFormat::Json => serde_json::to_string(self)
                .unwrap_or_else(|_| self.render(AccessLogFormat::Combined)),
        }
    }
}

/// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
struct Common<'a>(&'a AccessLogEntry);

impl fmt::Display for Common<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = self.0;
        write!(
            f,
            "{} - - [{}] \"{} {} {}\" {} {}",
            e.client,
            e.received_at.format("%d/%b/%Y:%H:%M:%S %z"),
            e.method,
            e.target,
            e.protocol,
            e.status,
            e.bytes_sent,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact_post() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "203.0.113.9".parse().unwrap(),
            "POST",
            "/api/send-email?lang=en".to_string(),
        );
        entry.bytes_sent = 64;
        entry.referer = Some("https://brooklinpub.com/contact".to_string());
        entry.user_agent = Some("Mozilla/5.0".to_string());
        entry.duration_us = 1500;
        entry
    }

    #[test]
    fn test_combined() {
        let line = contact_post().render(AccessLogFormat::Combined);
        assert!(line.starts_with("203.0.113.9 - - ["));
        assert!(line.contains("\"POST /api/send-email?lang=en HTTP/1.1\" 200 64"));
        assert!(line.ends_with("\"https://brooklinpub.com/contact\" \"Mozilla/5.0\""));
    }

    #[test]
    fn test_common_omits_client_headers() {
        let line = contact_post().render(AccessLogFormat::Common);
        assert!(line.ends_with("\"POST /api/send-email?lang=en HTTP/1.1\" 200 64"));
        assert!(!line.contains("Mozilla"));
    }

    #[test]
    fn test_json() {
        let line = contact_post().render(AccessLogFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["client"], "203.0.113.9");
        assert_eq!(value["status"], 200);
        assert_eq!(value["duration_us"], 1500);
        assert!(value["referer"].is_string());
    }

    #[test]
    fn test_format_names() {
        let parse = |name: &str| -> AccessLogFormat {
            serde_json::from_value(serde_json::Value::from(name)).unwrap()
        };
        assert_eq!(parse("json"), AccessLogFormat::Json);
        assert_eq!(parse("common"), AccessLogFormat::Common);
        assert_eq!(parse("$remote_addr $status"), AccessLogFormat::Combined);
    }
}
