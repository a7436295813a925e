//! Property-based tests for stored records and expiry rules.

use proptest::prelude::*;

use spotify_nowplaying::KvStore;
use spotify_nowplaying::models::{PendingState, TokenRecord};
use spotify_nowplaying::store::{TokenStore, state_key, token_key};

fn arb_token() -> impl Strategy<Value = TokenRecord> {
    (
        "[A-Za-z0-9._-]{0,64}", // access_token
        "(Bearer|bearer|)",     // token_type
        "[A-Za-z0-9._-]{0,64}", // refresh_token
        any::<i64>(),           // expires_at
    )
        .prop_map(|(access_token, token_type, refresh_token, expires_at)| TokenRecord {
            access_token,
            token_type,
            refresh_token,
            expires_at,
        })
}

fn arb_pending() -> impl Strategy<Value = PendingState> {
    ("[a-f0-9-]{36}", "U[A-Z0-9]{1,10}", "https://hooks\\.example\\.com/[a-z0-9]{1,20}", any::<i64>())
        .prop_map(|(id, user_id, response_url, expires_at)| PendingState {
            id,
            user_id,
            response_url,
            expires_at,
        })
}

proptest! {
    /// A pending state is rejected exactly when now is past its expiry.
    #[test]
    fn pending_state_expiry(expires_at in any::<i64>(), now in any::<i64>()) {
        let state = PendingState {
            id: "S".into(),
            user_id: "U".into(),
            response_url: "https://hooks/1".into(),
            expires_at,
        };
        prop_assert_eq!(state.is_expired(now), now > expires_at);
    }

    /// A token with an expiry is never reported valid at or after that expiry.
    #[test]
    fn token_expired_at_or_after_expiry(expires_at in 1i64.., offset in 0i64..1_000_000_000_000) {
        let token = TokenRecord { access_token: "a".into(), expires_at, ..Default::default() };
        prop_assert!(token.is_expired(expires_at.saturating_add(offset)));
    }

    /// A token without an expiry never needs refreshing.
    #[test]
    fn token_without_expiry_never_expires(now in any::<i64>()) {
        let token = TokenRecord { access_token: "a".into(), expires_at: 0, ..Default::default() };
        prop_assert!(!token.is_expired(now));
    }

    /// Stored token records read back unchanged, byte for byte.
    #[test]
    fn token_record_store_roundtrip(user in "U[A-Z0-9]{1,10}", token in arb_token()) {
        tokio_test::block_on(async {
            let store = KvStore::in_memory().await.unwrap();
            let mut txn = store.begin();
            txn.put(&user, &token).unwrap();
            let bytes = txn.get_raw(&token_key(&user)).await.unwrap().unwrap();
            txn.commit().await.unwrap();

            let mut txn = store.begin();
            let loaded = txn.get(&user).await.unwrap().unwrap();
            assert_eq!(loaded, token);

            txn.put(&user, &loaded).unwrap();
            assert_eq!(txn.get_raw(&token_key(&user)).await.unwrap(), Some(bytes));
        });
    }

    /// Stored pending states read back unchanged.
    #[test]
    fn pending_state_store_roundtrip(state in arb_pending()) {
        tokio_test::block_on(async {
            let store = KvStore::in_memory().await.unwrap();
            let mut txn = store.begin();
            txn.put_pending_state(&state.id, &state).unwrap();
            txn.commit().await.unwrap();

            let txn = store.begin();
            assert!(txn.get_raw(&state_key(&state.id)).await.unwrap().is_some());
            assert_eq!(txn.get_pending_state(&state.id).await.unwrap(), Some(state.clone()));
        });
    }

    /// Decoding arbitrary bytes as a token record never panics.
    #[test]
    fn token_decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        tokio_test::block_on(async {
            let store = KvStore::in_memory().await.unwrap();
            let mut txn = store.begin();
            txn.put_raw(token_key("U1"), bytes);
            let _ = txn.get("U1").await;
        });
    }
}
