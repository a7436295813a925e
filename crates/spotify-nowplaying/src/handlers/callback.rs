//! OAuth redirect handling: the second half of the handshake.
//!
//! A pending authorization moves to exactly one of two outcomes:
//! - authorized: token stored for the pending state's user
//! - unauthenticated: expired, denied or failed exchange
//!
//! Either way the pending record is deleted once it has been read.

use super::{HandlerContext, messages};
use crate::error::{HandlerError, HandlerResult};
use crate::models::{Reply, TokenRecord, WebhookMessage, now_nanos};
use crate::store::{TokenStore, Transaction};

/// Complete an authorization from Spotify's redirect.
pub async fn handle_authorize_callback(
    ctx: &HandlerContext,
    redirect: &WebhookMessage,
) -> HandlerResult<()> {
    let Some(state_id) = redirect.param("state") else {
        tracing::error!(url = %redirect.url, "Invalid callback url");
        return Err(HandlerError::missing_parameter("state"));
    };

    let mut txn = ctx.store.begin();

    let pending = match txn.get_pending_state(state_id).await {
        Ok(Some(pending)) => pending,
        Ok(None) => {
            return Err(HandlerError::UnknownState { state_id: state_id.to_string() });
        }
        Err(e) => {
            // Nobody to tell: the reply destination lives inside the corrupt record.
            txn.delete_pending_state(state_id);
            discard_pending(txn, state_id).await;
            return Err(e.into());
        }
    };

    txn.delete_pending_state(state_id);

    if pending.is_expired(now_nanos()) {
        discard_pending(txn, state_id).await;
        ctx.reply(&pending.response_url, Reply::private(messages::LOGIN_FAILED)).await;
        return Err(HandlerError::ExpiredState { state_id: state_id.to_string() });
    }

    let response = match ctx.spotify.exchange_code(state_id, redirect).await {
        Ok(response) => response,
        Err(e) => {
            discard_pending(txn, state_id).await;
            ctx.reply(&pending.response_url, Reply::private(messages::LOGIN_FAILED)).await;
            return Err(e.into());
        }
    };

    let record = TokenRecord::from_response(response, now_nanos(), "");
    let stored = match txn.put(&pending.user_id, &record) {
        Ok(()) => txn.commit().await,
        Err(e) => Err(e),
    };
    if let Err(e) = stored {
        tracing::error!(user_id = %pending.user_id, error = %e, "Error storing auth token");
        let mut cleanup = ctx.store.begin();
        cleanup.delete_pending_state(state_id);
        discard_pending(cleanup, state_id).await;
        ctx.reply(&pending.response_url, Reply::private(messages::LOGIN_FAILED)).await;
        return Err(e.into());
    }

    tracing::info!(user_id = %pending.user_id, state_id, "Stored Spotify token");

    ctx.reply(&pending.response_url, Reply::private(messages::LOGIN_SUCCESS)).await;
    Ok(())
}

/// Commit a transaction whose only staged change is the pending-state delete.
async fn discard_pending(txn: Transaction<'_>, state_id: &str) {
    if let Err(e) = txn.commit().await {
        tracing::warn!(state_id, error = %e, "Failed to delete consumed auth state");
    }
}
