//! Handler loops and the dispatcher feeding them.
//!
//! Every registered handler gets one task and one bounded channel. A task
//! handles one message at a time; cancellation is only observed between
//! messages, so an in-flight transaction always runs to completion.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::error::RegistryError;
use crate::handlers::{CommandKind, HandlerContext, Registry, WebhookKind};
use crate::models::{CommandMessage, WebhookMessage};

/// Routes inbound messages to handler loops by name.
#[derive(Clone, Debug, Default)]
pub struct Dispatcher {
    commands: Arc<HashMap<String, mpsc::Sender<CommandMessage>>>,
    webhooks: Arc<HashMap<String, mpsc::Sender<WebhookMessage>>>,
}

impl Dispatcher {
    /// Queue a command for its handler.
    pub fn dispatch_command(&self, msg: CommandMessage) -> Result<(), RegistryError> {
        let tx = self
            .commands
            .get(&msg.command)
            .ok_or_else(|| RegistryError::Unknown(msg.command.clone()))?;
        let name = msg.command.clone();
        tx.try_send(msg).map_err(|e| unavailable(name, &e))
    }

    /// Queue a webhook request for its handler.
    pub fn dispatch_webhook(&self, msg: WebhookMessage) -> Result<(), RegistryError> {
        let tx =
            self.webhooks.get(&msg.name).ok_or_else(|| RegistryError::Unknown(msg.name.clone()))?;
        let name = msg.name.clone();
        tx.try_send(msg).map_err(|e| unavailable(name, &e))
    }
}

fn unavailable<T>(name: String, err: &TrySendError<T>) -> RegistryError {
    match err {
        TrySendError::Full(_) => tracing::warn!(handler = %name, "Handler backlog full"),
        TrySendError::Closed(_) => tracing::warn!(handler = %name, "Handler loop has stopped"),
    }
    RegistryError::Unavailable(name)
}

/// Spawn one loop per registered handler.
pub(crate) fn spawn_loops(
    registry: &Registry,
    ctx: &HandlerContext,
    capacity: usize,
) -> (Dispatcher, Vec<JoinHandle<()>>) {
    let mut commands = HashMap::new();
    let mut webhooks = HashMap::new();
    let mut tasks = Vec::with_capacity(registry.len());

    for (name, kind) in registry.commands() {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        commands.insert(name.to_string(), tx);
        tasks.push(tokio::spawn(run_command_loop(name.to_string(), kind, ctx.clone(), rx)));
    }

    for (name, kind) in registry.webhooks() {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        webhooks.insert(name.to_string(), tx);
        tasks.push(tokio::spawn(run_webhook_loop(name.to_string(), kind, ctx.clone(), rx)));
    }

    (Dispatcher { commands: Arc::new(commands), webhooks: Arc::new(webhooks) }, tasks)
}

async fn run_command_loop(
    name: String,
    kind: CommandKind,
    ctx: HandlerContext,
    mut rx: mpsc::Receiver<CommandMessage>,
) {
    tracing::debug!(command = %name, "Command loop started");

    loop {
        let msg = tokio::select! {
            biased;
            () = ctx.cancel.cancelled() => {
                tracing::info!(command = %name, "Exiting command loop");
                return;
            }
            msg = rx.recv() => match msg {
                Some(msg) => msg,
                None => {
                    tracing::info!(command = %name, "Command channel closed");
                    return;
                }
            },
        };

        if let Err(e) = kind.handle(&ctx, &msg).await {
            tracing::error!(
                command = %name,
                user_id = %msg.user_id,
                kind = e.kind(),
                error = %e,
                "Command failed"
            );
        }
    }
}

async fn run_webhook_loop(
    name: String,
    kind: WebhookKind,
    ctx: HandlerContext,
    mut rx: mpsc::Receiver<WebhookMessage>,
) {
    tracing::debug!(webhook = %name, "Webhook loop started");

    loop {
        let msg = tokio::select! {
            biased;
            () = ctx.cancel.cancelled() => {
                tracing::info!(webhook = %name, "Exiting webhook loop");
                return;
            }
            msg = rx.recv() => match msg {
                Some(msg) => msg,
                None => {
                    tracing::info!(webhook = %name, "Webhook channel closed");
                    return;
                }
            },
        };

        if let Err(e) = kind.handle(&ctx, &msg).await {
            tracing::error!(
                webhook = %name,
                kind = e.kind(),
                error = %e,
                "Webhook failed"
            );
        }
    }
}
