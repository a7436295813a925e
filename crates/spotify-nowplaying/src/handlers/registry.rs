//! Name → handler table, validated once at startup.

use std::collections::BTreeMap;

use super::{HandlerContext, handle_authorize_callback, handle_now_playing};
use crate::config::AUTHORIZE_WEBHOOK;
use crate::error::{HandlerResult, RegistryError};
use crate::models::{CommandMessage, WebhookMessage};

/// Chat commands this service implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    NowPlaying,
}

impl CommandKind {
    /// Handle one command message.
    pub async fn handle(self, ctx: &HandlerContext, msg: &CommandMessage) -> HandlerResult<()> {
        match self {
            Self::NowPlaying => handle_now_playing(ctx, msg).await,
        }
    }
}

/// Webhooks this service implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookKind {
    SpotifyAuthorize,
}

impl WebhookKind {
    /// Handle one webhook request.
    pub async fn handle(self, ctx: &HandlerContext, msg: &WebhookMessage) -> HandlerResult<()> {
        match self {
            Self::SpotifyAuthorize => handle_authorize_callback(ctx, msg).await,
        }
    }
}

/// A registrable handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Command(CommandKind),
    Webhook(WebhookKind),
}

/// Validated registration table. Commands and webhooks have separate namespaces.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    commands: BTreeMap<String, CommandKind>,
    webhooks: BTreeMap<String, WebhookKind>,
}

impl Registry {
    /// Build a registry, rejecting empty and duplicate names.
    pub fn new<I, S>(entries: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (S, HandlerKind)>,
        S: Into<String>,
    {
        let mut registry = Self::default();

        for (name, kind) in entries {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(RegistryError::EmptyName);
            }

            let duplicate = match kind {
                HandlerKind::Command(cmd) => registry.commands.insert(name.clone(), cmd).is_some(),
                HandlerKind::Webhook(hook) => registry.webhooks.insert(name.clone(), hook).is_some(),
            };
            if duplicate {
                return Err(RegistryError::Duplicate(name));
            }
        }

        Ok(registry)
    }

    /// The `nowplaying` command and the Spotify authorize webhook.
    pub fn spotify() -> Result<Self, RegistryError> {
        Self::new([
            ("nowplaying", HandlerKind::Command(CommandKind::NowPlaying)),
            (AUTHORIZE_WEBHOOK, HandlerKind::Webhook(WebhookKind::SpotifyAuthorize)),
        ])
    }

    /// Look up a command.
    #[must_use]
    pub fn command(&self, name: &str) -> Option<CommandKind> {
        self.commands.get(name).copied()
    }

    /// Look up a webhook.
    #[must_use]
    pub fn webhook(&self, name: &str) -> Option<WebhookKind> {
        self.webhooks.get(name).copied()
    }

    /// All registered commands.
    pub fn commands(&self) -> impl Iterator<Item = (&str, CommandKind)> {
        self.commands.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    /// All registered webhooks.
    pub fn webhooks(&self) -> impl Iterator<Item = (&str, WebhookKind)> {
        self.webhooks.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len() + self.webhooks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spotify_registry() {
        let registry = Registry::spotify().unwrap();
        assert_eq!(registry.command("nowplaying"), Some(CommandKind::NowPlaying));
        assert_eq!(registry.webhook("spotifyAuthorize"), Some(WebhookKind::SpotifyAuthorize));
        assert_eq!(registry.command("spotifyAuthorize"), None);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = Registry::new([
            ("nowplaying", HandlerKind::Command(CommandKind::NowPlaying)),
            ("nowplaying", HandlerKind::Command(CommandKind::NowPlaying)),
        ])
        .unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("nowplaying".into()));
    }

    #[test]
    fn test_same_name_in_both_namespaces_allowed() {
        let registry = Registry::new([
            ("spotify", HandlerKind::Command(CommandKind::NowPlaying)),
            ("spotify", HandlerKind::Webhook(WebhookKind::SpotifyAuthorize)),
        ])
        .unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = Registry::new([(" ", HandlerKind::Command(CommandKind::NowPlaying))]).unwrap_err();
        assert_eq!(err, RegistryError::EmptyName);
    }
}
