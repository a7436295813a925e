//! Spotify Now-Playing Bot
//!
//! A chat command and webhook handler that lets users link their Spotify
//! account through OAuth2 and share what they are currently listening to.
//!
//! # Flow
//!
//! - `/nowplaying` without a stored token replies with an authorize URL and
//!   records a pending authorization (valid for 15 minutes)
//! - Spotify redirects to the `spotifyAuthorize` webhook; the code is
//!   exchanged for a token which is stored for the user
//! - `/nowplaying` with a token replies in channel with the playing track
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use spotify_nowplaying::{
//!     Config, HandlerContext, KvStore, Registry, SpotifyClient, reply::HttpReplySink,
//!     server::Bot,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let spotify = Arc::new(SpotifyClient::new(&config)?);
//!     let replies = Arc::new(HttpReplySink::new(config.request_timeout)?);
//!     let ctx = HandlerContext::new(&config, KvStore::in_memory().await?, replies, spotify);
//!
//!     let bot = Bot::start(&Registry::spotify()?, &ctx, config.channel_capacity);
//!     bot.run_http(8000).await
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod reply;
pub mod server;
pub mod store;

pub use client::SpotifyClient;
pub use config::Config;
pub use error::{ClientError, HandlerError, RegistryError, ReplyError, StoreError};
pub use handlers::{HandlerContext, Registry};
pub use store::KvStore;
