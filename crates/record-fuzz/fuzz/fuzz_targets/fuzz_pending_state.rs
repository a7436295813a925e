#![no_main]

use libfuzzer_sys::fuzz_target;
use spotify_nowplaying::models::PendingState;

fuzz_target!(|data: &[u8]| {
    if let Ok(state) = serde_json::from_slice::<PendingState>(data) {
        let _ = state.is_expired(i64::MIN);
        let _ = state.is_expired(i64::MAX);
    }
});
