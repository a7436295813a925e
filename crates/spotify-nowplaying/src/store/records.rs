//! Typed access to token records and pending authorizations.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::Transaction;
use crate::error::{StoreError, StoreResult};
use crate::models::{PendingState, TokenRecord};

const TOKEN_PREFIX: &str = "authtoken-";
const STATE_PREFIX: &str = "authstate-";

/// Key of a user's token record.
#[must_use]
pub fn token_key(user_id: &str) -> String {
    format!("{TOKEN_PREFIX}{user_id}")
}

/// Key of a pending authorization.
#[must_use]
pub fn state_key(state_id: &str) -> String {
    format!("{STATE_PREFIX}{state_id}")
}

/// Record-level view of a transaction.
#[async_trait::async_trait]
pub trait TokenStore {
    /// Load a user's token record.
    async fn get(&self, user_id: &str) -> StoreResult<Option<TokenRecord>>;

    /// Stage a user's token record.
    fn put(&mut self, user_id: &str, record: &TokenRecord) -> StoreResult<()>;

    /// Load a pending authorization.
    async fn get_pending_state(&self, state_id: &str) -> StoreResult<Option<PendingState>>;

    /// Stage a pending authorization.
    fn put_pending_state(&mut self, state_id: &str, state: &PendingState) -> StoreResult<()>;

    /// Stage removal of a pending authorization.
    fn delete_pending_state(&mut self, state_id: &str);
}

#[async_trait::async_trait]
impl TokenStore for Transaction<'_> {
    async fn get(&self, user_id: &str) -> StoreResult<Option<TokenRecord>> {
        decode(self, &token_key(user_id)).await
    }

    fn put(&mut self, user_id: &str, record: &TokenRecord) -> StoreResult<()> {
        self.put_raw(token_key(user_id), encode(record)?);
        Ok(())
    }

    async fn get_pending_state(&self, state_id: &str) -> StoreResult<Option<PendingState>> {
        decode(self, &state_key(state_id)).await
    }

    fn put_pending_state(&mut self, state_id: &str, state: &PendingState) -> StoreResult<()> {
        self.put_raw(state_key(state_id), encode(state)?);
        Ok(())
    }

    fn delete_pending_state(&mut self, state_id: &str) {
        self.delete_raw(state_key(state_id));
    }
}

fn encode<T: Serialize>(value: &T) -> StoreResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(StoreError::Encode)
}

async fn decode<T: DeserializeOwned>(txn: &Transaction<'_>, key: &str) -> StoreResult<Option<T>> {
    txn.get_raw(key)
        .await?
        .map(|bytes| {
            serde_json::from_slice(&bytes)
                .map_err(|source| StoreError::Decode { key: key.to_string(), source })
        })
        .transpose()
}
