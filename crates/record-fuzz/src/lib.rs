//! Fuzzing library for spotify-nowplaying.
//!
//! Targets cover decoding of stored token records and pending
//! authorizations, and query parsing of OAuth redirects.
//!
//! # Usage
//!
//! ```bash
//! cd crates/record-fuzz
//! cargo +nightly fuzz run fuzz_token_record -- -max_total_time=60
//! ```

pub use spotify_nowplaying::models;
