//! Pending authorization created when a user starts the OAuth handshake.

use serde::{Deserialize, Serialize};

use super::duration_nanos;

/// Correlates an OAuth `state` parameter with the user who asked for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingState {
    /// Opaque state identifier sent through the authorize URL.
    pub id: String,

    /// Chat user who started the handshake.
    pub user_id: String,

    /// Where replies about this handshake are delivered.
    pub response_url: String,

    /// Absolute expiry as Unix nanoseconds.
    pub expires_at: i64,
}

impl PendingState {
    /// Start a new handshake for `user_id` with a fresh random state id.
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        response_url: impl Into<String>,
        ttl: std::time::Duration,
        now: i64,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            response_url: response_url.into(),
            expires_at: now.saturating_add(duration_nanos(ttl)),
        }
    }

    /// A state is invalid once `now` is past its expiry.
    #[must_use]
    pub fn is_expired(&self, now: i64) -> bool {
        now > self.expires_at
    }
}
