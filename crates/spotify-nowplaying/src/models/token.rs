//! OAuth token record stored per chat user.

use serde::{Deserialize, Serialize};

use super::duration_nanos;

/// Tokens are treated as expired this long before their real expiry.
const EXPIRY_DELTA_NANOS: i64 = 10 * 1_000_000_000;

/// Durable credential for one chat user.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Bearer token sent to the Web API. Empty means "not authenticated".
    pub access_token: String,

    /// Token type reported by Spotify (normally `Bearer`).
    pub token_type: String,

    /// Token used to obtain a new access token.
    pub refresh_token: String,

    /// Absolute expiry as Unix nanoseconds; `0` when Spotify sent no lifetime.
    pub expires_at: i64,
}

impl TokenRecord {
    /// Build a record from a token endpoint response received at `now`.
    ///
    /// A response without a refresh token keeps `previous_refresh`, matching
    /// Spotify's habit of omitting it on refresh grants.
    #[must_use]
    pub fn from_response(response: TokenResponse, now: i64, previous_refresh: &str) -> Self {
        let expires_at = response
            .expires_in
            .map(|secs| now.saturating_add(duration_nanos(std::time::Duration::from_secs(secs))))
            .unwrap_or(0);

        Self {
            access_token: response.access_token,
            token_type: response.token_type,
            refresh_token: response
                .refresh_token
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| previous_refresh.to_string()),
            expires_at,
        }
    }

    /// Whether this record carries a usable access token.
    #[must_use]
    pub fn is_present(&self) -> bool {
        !self.access_token.is_empty()
    }

    /// Whether the access token must be refreshed before use at `now`.
    #[must_use]
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at != 0 && now.saturating_add(EXPIRY_DELTA_NANOS) >= self.expires_at
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        let token_type =
            if self.token_type.is_empty() || self.token_type.eq_ignore_ascii_case("bearer") {
                "Bearer"
            } else {
                self.token_type.as_str()
            };
        format!("{} {}", token_type, self.access_token)
    }
}

/// Body of a successful Spotify token endpoint response.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,

    #[serde(default)]
    pub token_type: String,

    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,

    #[serde(default)]
    pub refresh_token: Option<String>,

    #[serde(default)]
    pub scope: Option<String>,
}

impl std::fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRecord")
            .field("token_type", &self.token_type)
            .field("has_refresh_token", &!self.refresh_token.is_empty())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Authorization status of a chat user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// No record, or a record with an empty access token.
    Unauthenticated,
    /// A usable token is stored.
    Authorized(TokenRecord),
}

impl From<Option<TokenRecord>> for Authorization {
    fn from(record: Option<TokenRecord>) -> Self {
        match record {
            Some(token) if token.is_present() => Self::Authorized(token),
            _ => Self::Unauthenticated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: i64 = 1_000_000_000;

    fn response(refresh: Option<&str>) -> TokenResponse {
        TokenResponse {
            access_token: "access".into(),
            token_type: "Bearer".into(),
            expires_in: Some(3600),
            refresh_token: refresh.map(String::from),
            scope: None,
        }
    }

    #[test]
    fn test_from_response_computes_expiry() {
        let record = TokenRecord::from_response(response(Some("refresh")), 1_000, "");
        assert_eq!(record.expires_at, 1_000 + 3600 * SECOND);
        assert_eq!(record.refresh_token, "refresh");
    }

    #[test]
    fn test_from_response_keeps_previous_refresh_token() {
        let record = TokenRecord::from_response(response(None), 0, "old-refresh");
        assert_eq!(record.refresh_token, "old-refresh");
    }

    #[test]
    fn test_empty_token_is_unauthenticated() {
        assert_eq!(Authorization::from(None), Authorization::Unauthenticated);
        assert_eq!(
            Authorization::from(Some(TokenRecord::default())),
            Authorization::Unauthenticated
        );

        let token = TokenRecord { access_token: "a".into(), ..TokenRecord::default() };
        assert_eq!(Authorization::from(Some(token.clone())), Authorization::Authorized(token));
    }

    #[test]
    fn test_expiry_includes_delta() {
        let token = TokenRecord {
            access_token: "a".into(),
            expires_at: 100 * SECOND,
            ..TokenRecord::default()
        };
        assert!(!token.is_expired(80 * SECOND));
        assert!(token.is_expired(91 * SECOND));
        assert!(token.is_expired(100 * SECOND));
    }

    #[test]
    fn test_zero_expiry_never_expires() {
        let token = TokenRecord { access_token: "a".into(), ..TokenRecord::default() };
        assert!(!token.is_expired(i64::MAX));
    }

    #[test]
    fn test_authorization_header() {
        let token = TokenRecord {
            access_token: "abc".into(),
            token_type: "bearer".into(),
            ..TokenRecord::default()
        };
        assert_eq!(token.authorization_header(), "Bearer abc");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let token = TokenRecord {
            access_token: "secret-access".into(),
            token_type: "Bearer".into(),
            refresh_token: "secret-refresh".into(),
            expires_at: 5,
        };
        let debug = format!("{:?}", Authorization::Authorized(token));
        assert!(!debug.contains("secret-access"));
        assert!(!debug.contains("secret-refresh"));
        assert!(debug.contains("expires_at: 5"));

        let debug = format!("{:?}", response(Some("secret-refresh")));
        assert!(!debug.contains("access"));
        assert!(!debug.contains("secret-refresh"));
    }
}
