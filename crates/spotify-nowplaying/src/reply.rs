//! Delivery of replies to the chat platform.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::ReplyError;
use crate::models::Reply;

/// Sends a reply to a reply destination (`response_url`).
#[async_trait::async_trait]
pub trait ReplySink: Send + Sync {
    /// Deliver `reply` to `response_url`.
    async fn send(&self, response_url: &str, reply: Reply) -> Result<(), ReplyError>;
}

/// Posts replies as JSON to the chat platform's response URL.
#[derive(Clone, Debug)]
pub struct HttpReplySink {
    client: reqwest::Client,
}

impl HttpReplySink {
    /// Create a sink using the given timeout.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(timeout: std::time::Duration) -> Result<Self, ReplyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl ReplySink for HttpReplySink {
    async fn send(&self, response_url: &str, reply: Reply) -> Result<(), ReplyError> {
        if response_url.is_empty() {
            return Err(ReplyError::NoDestination);
        }

        let response = self.client.post(response_url).json(&reply).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ReplyError::Rejected(status.as_u16()));
        }
        Ok(())
    }
}

/// Keeps every reply in memory. Used by tests and dry runs.
#[derive(Clone, Debug, Default)]
pub struct RecordingReplySink {
    sent: Arc<Mutex<Vec<(String, Reply)>>>,
}

impl RecordingReplySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All replies sent so far, with their destinations.
    pub async fn sent(&self) -> Vec<(String, Reply)> {
        self.sent.lock().await.clone()
    }

    /// Texts of all replies sent so far.
    pub async fn texts(&self) -> Vec<String> {
        self.sent.lock().await.iter().map(|(_, r)| r.text.clone()).collect()
    }
}

#[async_trait::async_trait]
impl ReplySink for RecordingReplySink {
    async fn send(&self, response_url: &str, reply: Reply) -> Result<(), ReplyError> {
        if response_url.is_empty() {
            return Err(ReplyError::NoDestination);
        }
        self.sent.lock().await.push((response_url.to_string(), reply));
        Ok(())
    }
}
