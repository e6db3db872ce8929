//! Outbound relay seams for the workflow pipeline.
//!
//! The summary and mail actions go through traits so the pipeline can run
//! against stubs in tests. The production implementation posts JSON to
//! configured relay endpoints; with no endpoint configured it falls back to
//! a deterministic local behavior so the pipeline stays runnable.

use async_trait::async_trait;
use serde_json::json;

use crate::errors::AppError;

/// Generates a text summary for a completed meeting.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, title: &str, notes: &str) -> Result<String, AppError>;
}

/// Sends an email to a list of recipients.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &[String], subject: &str, body: &str) -> Result<(), AppError>;
}

/// Maximum length of the local-fallback summary.
const FALLBACK_SUMMARY_CHARS: usize = 280;

/// HTTP relay client for the summary and mail endpoints.
pub struct RelayClient {
    http: reqwest::Client,
    summary_endpoint: Option<String>,
    mail_endpoint: Option<String>,
}

impl RelayClient {
    pub fn new(summary_endpoint: Option<String>, mail_endpoint: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            summary_endpoint,
            mail_endpoint,
        }
    }
}

#[async_trait]
impl Summarizer for RelayClient {
    async fn summarize(&self, title: &str, notes: &str) -> Result<String, AppError> {
        let Some(endpoint) = &self.summary_endpoint else {
            // Local fallback: truncated notes
            let summary: String = notes.chars().take(FALLBACK_SUMMARY_CHARS).collect();
            return Ok(summary);
        };

        let response = self
            .http
            .post(endpoint)
            .json(&json!({ "title": title, "notes": notes }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Summary endpoint returned {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response.json().await?;
        body["summary"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                AppError::Upstream("Summary endpoint response missing 'summary'".to_string())
            })
    }
}

#[async_trait]
impl Mailer for RelayClient {
    async fn send(&self, to: &[String], subject: &str, body: &str) -> Result<(), AppError> {
        let Some(endpoint) = &self.mail_endpoint else {
            // Local fallback: log and report success
            tracing::info!(recipients = to.len(), subject, "Mail relay not configured; skipping send");
            return Ok(());
        };

        let response = self
            .http
            .post(endpoint)
            .json(&json!({ "to": to, "subject": subject, "body": body }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Mail endpoint returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fallback_summary_truncates_notes() {
        let relay = RelayClient::new(None, None);
        let notes = "n".repeat(1000);
        let summary = relay.summarize("Standup", &notes).await.unwrap();
        assert_eq!(summary.len(), FALLBACK_SUMMARY_CHARS);
    }

    #[tokio::test]
    async fn fallback_mail_succeeds() {
        let relay = RelayClient::new(None, None);
        let result = relay
            .send(&["a@example.com".to_string()], "Hi", "Body")
            .await;
        assert!(result.is_ok());
    }
}
