//! Runtime: handler loops plus the HTTP ingress feeding them.
//!
//! ## Lifecycle
//!
//! - `Bot::start` spawns one loop per handler of a validated `Registry`
//! - `run_http` serves slash commands and webhooks until Ctrl+C
//! - `shutdown` cancels every loop and waits for them to exit

mod dispatch;
pub mod transport;

pub use dispatch::Dispatcher;

use std::net::SocketAddr;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::handlers::{HandlerContext, Registry};

/// Running handler loops.
pub struct Bot {
    dispatcher: Dispatcher,
    tasks: Vec<JoinHandle<()>>,
    cancel: CancellationToken,
}

impl Bot {
    /// Spawn one loop per registered handler, each with a channel of `capacity`.
    #[must_use]
    pub fn start(registry: &Registry, ctx: &HandlerContext, capacity: usize) -> Self {
        let (dispatcher, tasks) = dispatch::spawn_loops(registry, ctx, capacity);

        tracing::info!(handlers = tasks.len(), "Started handler loops");

        Self { dispatcher, tasks, cancel: ctx.cancel.clone() }
    }

    /// Handle for routing inbound messages.
    #[must_use]
    pub fn dispatcher(&self) -> Dispatcher {
        self.dispatcher.clone()
    }

    /// Serve the HTTP ingress on `port` until Ctrl+C, then stop the loops.
    ///
    /// # Errors
    ///
    /// Returns error on server failure.
    pub async fn run_http(self, port: u16) -> anyhow::Result<()> {
        let router = transport::create_router(self.dispatcher());
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        tracing::info!("HTTP server listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        self.shutdown().await;
        Ok(())
    }

    /// Cancel every loop and wait for it to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        for task in self.tasks {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Handler loop panicked");
            }
        }
        tracing::info!("Handler loops stopped");
    }
}

impl std::fmt::Debug for Bot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bot").field("loops", &self.tasks.len()).finish()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
