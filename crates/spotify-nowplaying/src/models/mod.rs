//! Data models for stored records, Spotify API payloads and chat messages.
//!
//! Stored records are encoded as JSON bytes; decoding is strict so that a
//! corrupted record surfaces as an error instead of a silently empty value.

mod message;
mod playing;
mod state;
mod token;

pub use message::{CommandMessage, Reply, Visibility, WebhookMessage};
pub use playing::{Artist, CurrentlyPlaying, PlayingItem};
pub use state::PendingState;
pub use token::{Authorization, TokenRecord, TokenResponse};

/// Current wall-clock time as Unix nanoseconds.
///
/// Saturates at `i64::MAX` past the year 2262.
#[must_use]
pub fn now_nanos() -> i64 {
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}

/// Convert a duration into nanoseconds, saturating at `i64::MAX`.
#[must_use]
pub fn duration_nanos(duration: std::time::Duration) -> i64 {
    i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX)
}
