//! Spotify Accounts and Web API client.
//!
//! Covers exactly what the handlers need:
//! - Authorize URL construction and code-for-token exchange (see [`oauth`])
//! - Access token refresh
//! - Currently-playing lookup
//!
//! Calls are never retried; any failure is returned to the caller.

mod oauth;

use reqwest::Client;

use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::{CurrentlyPlaying, TokenRecord, TokenResponse, now_nanos};

/// Spotify API client.
#[derive(Clone)]
pub struct SpotifyClient {
    /// HTTP client.
    client: Client,

    /// Application client id.
    client_id: String,

    /// Application client secret.
    client_secret: String,

    /// Accounts service base URL.
    accounts_url: String,

    /// Web API base URL.
    api_url: String,

    /// Redirect URI registered with Spotify.
    redirect_uri: String,
}

impl SpotifyClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            accounts_url: config.accounts_url.trim_end_matches('/').to_string(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            redirect_uri: config.redirect_uri(),
        })
    }

    /// Return a usable token, refreshing it first when it has expired.
    ///
    /// `Ok(Some(_))` carries the refreshed record, which the caller should
    /// persist; `Ok(None)` means the stored token is still valid.
    ///
    /// # Errors
    ///
    /// Returns error if a refresh is needed but fails.
    pub async fn refresh_if_expired(&self, token: &TokenRecord) -> ClientResult<Option<TokenRecord>> {
        let now = now_nanos();
        if !token.is_expired(now) {
            return Ok(None);
        }
        if token.refresh_token.is_empty() {
            return Err(ClientError::MissingRefreshToken);
        }

        tracing::debug!("Access token expired, refreshing");
        let response = self.refresh(&token.refresh_token).await?;
        Ok(Some(TokenRecord::from_response(response, now_nanos(), &token.refresh_token)))
    }

    /// Get the item the user is currently playing.
    ///
    /// Returns `None` when nothing is playing (HTTP 204).
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn currently_playing(
        &self,
        token: &TokenRecord,
    ) -> ClientResult<Option<CurrentlyPlaying>> {
        let url = format!("{}/v1/me/player/currently-playing", self.api_url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, token.authorization_header())
            .send()
            .await?;

        let response = Self::handle_response(response).await?;
        if response.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// POST a form to the token endpoint with client credentials.
    async fn token_request(&self, form: &[(&str, &str)]) -> ClientResult<TokenResponse> {
        let url = format!("{}/api/token", self.accounts_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(form)
            .send()
            .await?;

        let response = Self::handle_response(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Handle API response status codes.
    async fn handle_response(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            429 => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60);

                Err(ClientError::rate_limited(retry_after))
            }
            401 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::Unauthorized { message: text })
            }
            400 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::bad_request(text))
            }
            500..=599 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::server(status.as_u16(), text))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
            }
        }
    }
}

impl std::fmt::Debug for SpotifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyClient")
            .field("client_id", &self.client_id)
            .field("accounts_url", &self.accounts_url)
            .field("api_url", &self.api_url)
            .finish()
    }
}
