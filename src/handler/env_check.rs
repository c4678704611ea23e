//! Mail settings presence check
//!
//! Reports only whether each setting is present, never its value.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::config::MailConfig;
use crate::http;

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct EnvReport {
    email_endpoint: &'static str,
    email_user: &'static str,
    email_pass: &'static str,
    recipient_email: &'static str,
}

fn status(value: Option<&String>) -> &'static str {
    match value {
        Some(v) if !v.is_empty() => "Set",
        _ => "Not set",
    }
}

/// Any method gets the same report
pub fn handle(mail: &MailConfig) -> Response<Full<Bytes>> {
    let report = EnvReport {
        email_endpoint: status(mail.endpoint.as_ref()),
        email_user: status(mail.user.as_ref()),
        email_pass: status(mail.pass.as_ref()),
        recipient_email: status(mail.recipient.as_ref()),
    };
    http::build_json_response(StatusCode::OK, &report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn report(mail: &MailConfig) -> serde_json::Value {
        let bytes = handle(mail).into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_nothing_configured() {
        let body = report(&MailConfig::default()).await;
        assert_eq!(
            body,
            serde_json::json!({
                "emailEndpoint": "Not set",
                "emailUser": "Not set",
                "emailPass": "Not set",
                "recipientEmail": "Not set",
            })
        );
    }

    #[tokio::test]
    async fn test_values_are_never_echoed() {
        let mail = MailConfig {
            user: Some("relay-user".to_string()),
            pass: Some("hunter2".to_string()),
            recipient: Some(String::new()),
            ..MailConfig::default()
        };
        let response = handle(&mail);
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!text.contains("relay-user"));
        assert!(!text.contains("hunter2"));

        let body: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body["emailUser"], "Set");
        assert_eq!(body["emailPass"], "Set");
        assert_eq!(body["recipientEmail"], "Not set");
    }

    #[tokio::test]
    async fn test_missing_endpoint_is_reported() {
        let mail = MailConfig {
            user: Some("relay-user".to_string()),
            pass: Some("hunter2".to_string()),
            recipient: Some("owner@example.com".to_string()),
            ..MailConfig::default()
        };
        let body = report(&mail).await;
        assert_eq!(body["emailEndpoint"], "Not set");
        assert_eq!(body["recipientEmail"], "Set");

        let configured = MailConfig {
            endpoint: Some("https://relay.example.com/send".to_string()),
            ..mail
        };
        assert_eq!(report(&configured).await["emailEndpoint"], "Set");
    }
}
