//! Shared setup for handler tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use spotify_nowplaying::models::{PendingState, TokenRecord, now_nanos};
use spotify_nowplaying::reply::RecordingReplySink;
use spotify_nowplaying::store::TokenStore;
use spotify_nowplaying::{Config, HandlerContext, KvStore, SpotifyClient};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use wiremock::MockServer;

pub const RESPONSE_URL: &str = "https://hooks.example.com/respond/U1";

pub struct Harness {
    pub ctx: HandlerContext,
    pub store: KvStore,
    pub replies: RecordingReplySink,
}

pub async fn harness(mock_server: &MockServer) -> Harness {
    harness_with_store(mock_server, KvStore::in_memory().await.unwrap())
}

pub fn harness_with_store(mock_server: &MockServer, store: KvStore) -> Harness {
    let config = Config::for_testing(&mock_server.uri());
    let spotify = Arc::new(SpotifyClient::new(&config).unwrap());
    let replies = RecordingReplySink::new();
    let ctx = HandlerContext::new(&config, store.clone(), Arc::new(replies.clone()), spotify);
    Harness { ctx, store, replies }
}

pub fn valid_token(access_token: &str) -> TokenRecord {
    TokenRecord {
        access_token: access_token.to_string(),
        token_type: "Bearer".to_string(),
        refresh_token: "refresh-1".to_string(),
        expires_at: now_nanos() + 3_600 * 1_000_000_000,
    }
}

pub async fn seed_token(store: &KvStore, user_id: &str, record: &TokenRecord) {
    let mut txn = store.begin();
    txn.put(user_id, record).unwrap();
    txn.commit().await.unwrap();
}

pub async fn seed_pending(store: &KvStore, state: &PendingState) {
    let mut txn = store.begin();
    txn.put_pending_state(&state.id, state).unwrap();
    txn.commit().await.unwrap();
}

/// Make every later insert of a key starting with `prefix` fail, through a
/// second connection to the database file at `path`.
pub async fn reject_inserts(path: &Path, prefix: &str) {
    let pool = SqlitePool::connect_with(SqliteConnectOptions::new().filename(path)).await.unwrap();
    sqlx::query(&format!(
        "CREATE TRIGGER reject_inserts BEFORE INSERT ON kv WHEN NEW.key LIKE '{prefix}%' \
         BEGIN SELECT RAISE(ABORT, 'disk full'); END"
    ))
    .execute(&pool)
    .await
    .unwrap();
    pool.close().await;
}

pub fn pending(id: &str, user_id: &str, expires_at: i64) -> PendingState {
    PendingState {
        id: id.to_string(),
        user_id: user_id.to_string(),
        response_url: RESPONSE_URL.to_string(),
        expires_at,
    }
}

pub fn playing_body(uri: &str) -> serde_json::Value {
    serde_json::json!({
        "is_playing": true,
        "progress_ms": 1200,
        "currently_playing_type": "track",
        "item": {
            "uri": uri,
            "name": "Ping Pong",
            "artists": [{"name": "Tomoyasu Hotei"}]
        }
    })
}
