//! Command and webhook handlers.
//!
//! Each handler processes one inbound message inside one store transaction
//! and reports problems to the user with fixed texts only; the returned
//! error is for logging at the loop boundary.

mod auth_flow;
mod callback;
mod now_playing;
mod registry;

pub use auth_flow::start_authorization;
pub use callback::handle_authorize_callback;
pub use now_playing::handle_now_playing;
pub use registry::{CommandKind, HandlerKind, Registry, WebhookKind};

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::client::SpotifyClient;
use crate::config::Config;
use crate::models::Reply;
use crate::reply::ReplySink;
use crate::store::KvStore;

/// Texts sent to chat users.
pub mod messages {
    /// Private reply asking the user to authorize.
    #[must_use]
    pub fn needs_login(url: &str) -> String {
        format!("You need to be authenticate to Spotify to continue. Please visit {url} to do this.")
    }

    /// Channel reply naming the playing track.
    #[must_use]
    pub fn listening(user_id: &str, uri: &str) -> String {
        format!("<@{user_id}> is listening to {uri}")
    }

    /// Channel reply when nothing is playing.
    #[must_use]
    pub fn not_listening(user_id: &str) -> String {
        format!("<@{user_id}> is not listening to anything right now.")
    }

    pub const AUTH_ERROR: &str = "There was an error authenticating to Spotify.";
    pub const RUN_FAILED: &str = "Unable to run now playing.";
    pub const PLAYING_FAILED: &str = "Unable to get currently playing.";
    pub const LOGIN_FAILED: &str = "Sorry! There was an error logging you into Spotify.";
    pub const LOGIN_SUCCESS: &str = "Successfully logged into Spotify. Try your command again please.";
}

/// Everything a handler needs, passed explicitly to every call.
#[derive(Clone)]
pub struct HandlerContext {
    /// Transactional store.
    pub store: KvStore,

    /// Where replies go.
    pub replies: Arc<dyn ReplySink>,

    /// Spotify client.
    pub spotify: Arc<SpotifyClient>,

    /// Lifetime of a pending authorization.
    pub auth_state_ttl: Duration,

    /// Stops the handler loops.
    pub cancel: CancellationToken,
}

impl HandlerContext {
    /// Create a context from configuration.
    #[must_use]
    pub fn new(
        config: &Config,
        store: KvStore,
        replies: Arc<dyn ReplySink>,
        spotify: Arc<SpotifyClient>,
    ) -> Self {
        Self {
            store,
            replies,
            spotify,
            auth_state_ttl: config.auth_state_ttl,
            cancel: CancellationToken::new(),
        }
    }

    /// Send a reply, logging delivery failures.
    pub async fn reply(&self, response_url: &str, reply: Reply) {
        if let Err(e) = self.replies.send(response_url, reply).await {
            tracing::warn!(error = %e, "Failed to deliver reply");
        }
    }
}

impl std::fmt::Debug for HandlerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerContext")
            .field("store", &self.store)
            .field("auth_state_ttl", &self.auth_state_ttl)
            .finish()
    }
}
