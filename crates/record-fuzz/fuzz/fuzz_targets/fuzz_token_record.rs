#![no_main]

use libfuzzer_sys::fuzz_target;
use spotify_nowplaying::models::{Authorization, TokenRecord};

fuzz_target!(|data: &[u8]| {
    // Corrupt records must decode to an error, never panic
    if let Ok(record) = serde_json::from_slice::<TokenRecord>(data) {
        let _ = record.is_expired(i64::MAX);
        let _ = record.authorization_header();
        let _ = Authorization::from(Some(record));
    }
});
