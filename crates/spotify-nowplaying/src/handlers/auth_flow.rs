//! Starting the OAuth handshake for a user without a token.

use super::{HandlerContext, messages};
use crate::error::HandlerResult;
use crate::models::{PendingState, Reply, now_nanos};
use crate::store::{TokenStore, Transaction};

/// Record a pending authorization for `user_id` and send them the authorize URL.
///
/// Consumes the caller's transaction: the pending state is committed before
/// the URL is sent, so a user never receives a link whose state was not stored.
pub async fn start_authorization(
    ctx: &HandlerContext,
    mut txn: Transaction<'_>,
    user_id: &str,
    response_url: &str,
) -> HandlerResult<()> {
    let state = PendingState::new(user_id, response_url, ctx.auth_state_ttl, now_nanos());

    let url = match ctx.spotify.authorize_url(&state.id) {
        Ok(url) => url,
        Err(e) => {
            ctx.reply(response_url, Reply::private(messages::AUTH_ERROR)).await;
            return Err(e.into());
        }
    };

    let stored = match txn.put_pending_state(&state.id, &state) {
        Ok(()) => txn.commit().await,
        Err(e) => Err(e),
    };
    if let Err(e) = stored {
        tracing::error!(user_id, error = %e, "Error storing auth state");
        ctx.reply(response_url, Reply::private(messages::AUTH_ERROR)).await;
        return Err(e.into());
    }

    tracing::info!(user_id, state_id = %state.id, "Started Spotify authorization");

    ctx.reply(response_url, Reply::private(messages::needs_login(url.as_str()))).await;
    Ok(())
}
