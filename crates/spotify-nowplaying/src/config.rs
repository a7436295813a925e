//! Configuration for the Spotify now-playing handler.

use std::time::Duration;

/// Spotify endpoint and protocol constants.
pub mod api {
    use std::time::Duration;

    /// Base URL for the Spotify Accounts service (authorize + token).
    pub const ACCOUNTS_URL: &str = "https://accounts.spotify.com";

    /// Base URL for the Spotify Web API.
    pub const API_URL: &str = "https://api.spotify.com";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// How long a pending authorization stays valid (15 minutes).
    pub const AUTH_STATE_TTL: Duration = Duration::from_secs(15 * 60);

    /// Inbound messages buffered per handler loop.
    pub const CHANNEL_CAPACITY: usize = 64;
}

/// OAuth scopes requested on every authorization.
pub mod scopes {
    pub const PLAYLIST_MODIFY_PUBLIC: &str = "playlist-modify-public";
    pub const PLAYLIST_MODIFY_PRIVATE: &str = "playlist-modify-private";
    pub const USER_READ_CURRENTLY_PLAYING: &str = "user-read-currently-playing";

    /// Scopes sent with the authorize URL.
    pub const REQUIRED: &[&str] =
        &[PLAYLIST_MODIFY_PUBLIC, PLAYLIST_MODIFY_PRIVATE, USER_READ_CURRENTLY_PLAYING];
}

/// Name of the webhook Spotify redirects back to.
pub const AUTHORIZE_WEBHOOK: &str = "spotifyAuthorize";

/// Handler configuration.
#[derive(Clone)]
pub struct Config {
    /// Spotify application client id.
    pub client_id: String,

    /// Spotify application client secret.
    pub client_secret: String,

    /// Public root under which webhooks are reachable (e.g. `https://bot.example.com/webhooks`).
    pub webhook_root: String,

    /// Base URL for the Accounts service (for testing with mock servers).
    pub accounts_url: String,

    /// Base URL for the Web API (for testing with mock servers).
    pub api_url: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Lifetime of a pending authorization.
    pub auth_state_ttl: Duration,

    /// Capacity of each handler's inbound channel.
    pub channel_capacity: usize,
}

impl Config {
    /// Create a configuration pointing at the real Spotify endpoints.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        webhook_root: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            webhook_root: webhook_root.into().trim_end_matches('/').to_string(),
            accounts_url: api::ACCOUNTS_URL.to_string(),
            api_url: api::API_URL.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            auth_state_ttl: api::AUTH_STATE_TTL,
            channel_capacity: api::CHANNEL_CAPACITY,
        }
    }

    /// Create a test configuration with both Spotify services served from `base_url`.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            webhook_root: "https://bot.example.com/webhooks".to_string(),
            accounts_url: base_url.to_string(),
            api_url: base_url.to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            auth_state_ttl: api::AUTH_STATE_TTL,
            channel_capacity: 8,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if a required variable is missing.
    pub fn from_env() -> anyhow::Result<Self> {
        let client_id = std::env::var("SPOTIFY_CLIENT_ID")
            .map_err(|_| anyhow::anyhow!("SPOTIFY_CLIENT_ID is not set"))?;
        let client_secret = std::env::var("SPOTIFY_CLIENT_SECRET")
            .map_err(|_| anyhow::anyhow!("SPOTIFY_CLIENT_SECRET is not set"))?;
        let webhook_root = std::env::var("WEBHOOK_ROOT")
            .map_err(|_| anyhow::anyhow!("WEBHOOK_ROOT is not set"))?;
        Ok(Self::new(client_id, client_secret, webhook_root))
    }

    /// Redirect URI registered with Spotify; the authorize webhook under `webhook_root`.
    #[must_use]
    pub fn redirect_uri(&self) -> String {
        format!("{}/{}", self.webhook_root, AUTHORIZE_WEBHOOK)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("webhook_root", &self.webhook_root)
            .field("accounts_url", &self.accounts_url)
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_uri_strips_trailing_slash() {
        let config = Config::new("id", "secret", "https://bot.example.com/webhooks/");
        assert_eq!(config.redirect_uri(), "https://bot.example.com/webhooks/spotifyAuthorize");
    }

    #[test]
    fn test_auth_state_ttl_is_fifteen_minutes() {
        let config = Config::new("id", "secret", "https://bot.example.com");
        assert_eq!(config.auth_state_ttl, Duration::from_secs(900));
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = Config::for_testing("http://localhost");
        let debug = format!("{config:?}");
        assert!(debug.contains("test-client"));
        assert!(!debug.contains("test-secret"));
    }

    #[test]
    fn test_required_scopes() {
        assert_eq!(scopes::REQUIRED.len(), 3);
        assert!(scopes::REQUIRED.contains(&"user-read-currently-playing"));
    }
}
