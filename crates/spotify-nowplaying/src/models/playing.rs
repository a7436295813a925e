//! Currently-playing payload matching the Spotify Web API schema.

use serde::{Deserialize, Serialize};

/// Response of `GET /v1/me/player/currently-playing`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentlyPlaying {
    /// Whether playback is active (false when paused).
    #[serde(default)]
    pub is_playing: bool,

    /// Playback position in milliseconds.
    #[serde(default)]
    pub progress_ms: Option<u64>,

    /// `track`, `episode`, `ad` or `unknown`.
    #[serde(default)]
    pub currently_playing_type: Option<String>,

    /// The playing item; null for ads and private sessions.
    #[serde(default)]
    pub item: Option<PlayingItem>,
}

/// A track or episode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayingItem {
    /// Spotify URI, e.g. `spotify:track:4uLU6hMCjMI75M1A2tKUQC`.
    pub uri: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub artists: Vec<Artist>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
}

impl CurrentlyPlaying {
    /// URI of the playing item, if any.
    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        self.item.as_ref().map(|item| item.uri.as_str())
    }
}
