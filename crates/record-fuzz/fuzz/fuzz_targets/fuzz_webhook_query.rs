#![no_main]

use libfuzzer_sys::fuzz_target;
use spotify_nowplaying::models::WebhookMessage;

fuzz_target!(|data: &[u8]| {
    let Ok(query) = std::str::from_utf8(data) else {
        return;
    };

    let url = format!("https://bot.example.com/webhooks/spotifyAuthorize?{query}");
    if let Ok(msg) = WebhookMessage::from_url("spotifyAuthorize", &url) {
        let _ = msg.param("state");
        let _ = msg.param("code");
        let _ = msg.param("error");
    }
});
