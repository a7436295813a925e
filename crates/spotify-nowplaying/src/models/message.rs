//! Inbound chat commands, inbound webhook requests and outbound replies.

use serde::{Deserialize, Serialize};

/// A slash command issued by a chat user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandMessage {
    /// Command name without the leading slash.
    pub command: String,

    /// Issuing user.
    pub user_id: String,

    /// Reply destination handed out by the chat platform.
    pub response_url: String,

    /// Text following the command.
    #[serde(default)]
    pub text: String,
}

impl CommandMessage {
    #[must_use]
    pub fn new(
        command: impl Into<String>,
        user_id: impl Into<String>,
        response_url: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            user_id: user_id.into(),
            response_url: response_url.into(),
            text: String::new(),
        }
    }
}

/// An HTTP request delivered to a named webhook. The body is never read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookMessage {
    /// Webhook name from the request path.
    pub name: String,

    /// Full request URL, kept for logging.
    pub url: String,

    /// Decoded query parameters in request order.
    pub query: Vec<(String, String)>,
}

impl WebhookMessage {
    /// Build a message from a request URL, decoding its query string.
    ///
    /// # Errors
    ///
    /// Returns error if `url` is not an absolute URL.
    pub fn from_url(name: impl Into<String>, url: &str) -> Result<Self, url::ParseError> {
        let parsed = url::Url::parse(url)?;
        let query = parsed.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();
        Ok(Self { name: name.into(), url: url.to_string(), query })
    }

    /// First value of a query parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}

/// Who can see a reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Visible to the whole channel.
    InChannel,
    /// Visible only to the requesting user.
    #[default]
    Ephemeral,
}

/// A text reply to a chat user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,

    #[serde(rename = "response_type")]
    pub visibility: Visibility,
}

impl Reply {
    /// Reply only the requester sees.
    #[must_use]
    pub fn private(text: impl Into<String>) -> Self {
        Self { text: text.into(), visibility: Visibility::Ephemeral }
    }

    /// Reply the whole channel sees.
    #[must_use]
    pub fn in_channel(text: impl Into<String>) -> Self {
        Self { text: text.into(), visibility: Visibility::InChannel }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_params_decoded() {
        let msg = WebhookMessage::from_url(
            "spotifyAuthorize",
            "https://bot.example.com/webhooks/spotifyAuthorize?code=a%2Fb&state=S1&state=S2",
        )
        .unwrap();
        assert_eq!(msg.param("code"), Some("a/b"));
        assert_eq!(msg.param("state"), Some("S1"));
        assert_eq!(msg.param("error"), None);
    }

    #[test]
    fn test_reply_wire_format() {
        let json = serde_json::to_value(Reply::in_channel("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"text": "hi", "response_type": "in_channel"}));

        let json = serde_json::to_value(Reply::private("psst")).unwrap();
        assert_eq!(json["response_type"], "ephemeral");
    }
}
