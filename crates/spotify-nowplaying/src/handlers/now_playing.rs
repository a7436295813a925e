//! `nowplaying` command.

use super::{HandlerContext, messages, start_authorization};
use crate::error::HandlerResult;
use crate::models::{Authorization, CommandMessage, Reply};
use crate::store::TokenStore;

/// Reply with what the user is listening to, or start authorization.
pub async fn handle_now_playing(ctx: &HandlerContext, cmd: &CommandMessage) -> HandlerResult<()> {
    let user_id = cmd.user_id.as_str();
    let mut txn = ctx.store.begin();

    let record = match txn.get(user_id).await {
        Ok(record) => record,
        Err(e) => {
            tracing::error!(user_id, error = %e, "Error unmarshalling auth token");
            ctx.reply(&cmd.response_url, Reply::private(messages::RUN_FAILED)).await;
            return Err(e.into());
        }
    };

    let token = match Authorization::from(record) {
        Authorization::Unauthenticated => {
            return start_authorization(ctx, txn, user_id, &cmd.response_url).await;
        }
        Authorization::Authorized(token) => token,
    };

    // Stored before the query: Spotify may have rotated the refresh token.
    let token = match ctx.spotify.refresh_if_expired(&token).await {
        Ok(Some(refreshed)) => {
            let stored = match txn.put(user_id, &refreshed) {
                Ok(()) => txn.commit().await,
                Err(e) => Err(e),
            };
            if let Err(e) = stored {
                tracing::warn!(user_id, error = %e, "Failed to persist refreshed token");
            }
            refreshed
        }
        Ok(None) => token,
        Err(e) => {
            tracing::error!(user_id, error = %e, "Error refreshing Spotify token");
            ctx.reply(&cmd.response_url, Reply::private(messages::PLAYING_FAILED)).await;
            return Err(e.into());
        }
    };

    let playing = match ctx.spotify.currently_playing(&token).await {
        Ok(playing) => playing,
        Err(e) => {
            tracing::error!(user_id, error = %e, "Error getting currently playing");
            ctx.reply(&cmd.response_url, Reply::private(messages::PLAYING_FAILED)).await;
            return Err(e.into());
        }
    };

    let text = match playing.as_ref().and_then(|p| p.uri()) {
        Some(uri) => messages::listening(user_id, uri),
        None => messages::not_listening(user_id),
    };
    ctx.reply(&cmd.response_url, Reply::in_channel(text)).await;
    Ok(())
}
