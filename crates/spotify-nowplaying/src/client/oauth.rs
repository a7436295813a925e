//! Authorization code grant against the Spotify Accounts service.

use url::Url;

use super::SpotifyClient;
use crate::config::scopes;
use crate::error::{ClientError, ClientResult};
use crate::models::{TokenResponse, WebhookMessage};

impl SpotifyClient {
    /// Build the URL a user visits to grant access, carrying `state`.
    ///
    /// # Errors
    ///
    /// Returns error if the configured accounts URL is invalid.
    pub fn authorize_url(&self, state: &str) -> ClientResult<Url> {
        let mut url = Url::parse(&format!("{}/authorize", self.accounts_url))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", &scopes::REQUIRED.join(" "))
            .append_pair("state", state);
        Ok(url)
    }

    /// Exchange the code carried by an OAuth redirect for a token.
    ///
    /// The redirect's `state` must equal `state_id`. A redirect carrying an
    /// `error` (e.g. the user pressed "Cancel") or no `code` is rejected
    /// without contacting Spotify.
    ///
    /// # Errors
    ///
    /// Returns error if the redirect is unusable or the token request fails.
    pub async fn exchange_code(
        &self,
        state_id: &str,
        redirect: &WebhookMessage,
    ) -> ClientResult<TokenResponse> {
        if redirect.param("state") != Some(state_id) {
            return Err(ClientError::callback("redirect state parameter doesn't match"));
        }
        if let Some(error) = redirect.param("error") {
            return Err(ClientError::callback(format!("authorization denied: {error}")));
        }
        let code = redirect
            .param("code")
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ClientError::callback("didn't get access code"))?;

        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &self.redirect_uri),
        ])
        .await
    }

    /// Obtain a new access token with a refresh token.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn refresh(&self, refresh_token: &str) -> ClientResult<TokenResponse> {
        self.token_request(&[("grant_type", "refresh_token"), ("refresh_token", refresh_token)])
            .await
    }
}
