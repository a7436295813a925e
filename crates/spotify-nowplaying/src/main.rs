//! Spotify Now-Playing Bot - Entry Point
//!
//! Serves slash commands and OAuth redirects over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use spotify_nowplaying::{
    Config, HandlerContext, KvStore, Registry, SpotifyClient, reply::HttpReplySink, server::Bot,
};

#[derive(Parser, Debug)]
#[command(name = "spotify-nowplaying")]
#[command(about = "Chat bot that shares what you are listening to on Spotify")]
#[command(version)]
struct Cli {
    /// Spotify application client id
    #[arg(long, env = "SPOTIFY_CLIENT_ID")]
    client_id: String,

    /// Spotify application client secret
    #[arg(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,

    /// Public URL under which webhooks are served (e.g., https://bot.example.com/webhooks)
    #[arg(long, env = "WEBHOOK_ROOT")]
    webhook_root: String,

    /// HTTP server port
    #[arg(long, default_value = "8000", env = "PORT")]
    port: u16,

    /// SQLite database for tokens and pending authorizations; in-memory when omitted
    #[arg(long, env = "STORE_PATH")]
    store_path: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        webhook_root = %cli.webhook_root,
        "Starting Spotify now-playing bot"
    );

    let config = Config::new(cli.client_id, cli.client_secret, cli.webhook_root);
    let store = match cli.store_path {
        Some(path) => KvStore::open(path).await?,
        None => {
            tracing::warn!("No --store-path given, tokens will be lost on exit");
            KvStore::in_memory().await?
        }
    };

    let spotify = Arc::new(SpotifyClient::new(&config)?);
    let replies = Arc::new(HttpReplySink::new(config.request_timeout)?);
    let ctx = HandlerContext::new(&config, store, replies, spotify);

    let registry = Registry::spotify()?;
    let bot = Bot::start(&registry, &ctx, config.channel_capacity);

    tracing::info!(port = cli.port, redirect_uri = %config.redirect_uri(), "Running in HTTP mode");
    bot.run_http(cli.port).await
}
