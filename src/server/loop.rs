// Server loop module
// Webhook accept loop and the sequential dispatch loop

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use super::webhook::WebhookContext;
use crate::handler::{Dispatcher, ReplySink};
use crate::logger;
use crate::telegram::Update;

/// Accept webhook connections until shutdown
pub async fn start_webhook_loop(
    listener: TcpListener,
    ctx: Arc<WebhookContext>,
    signals: Arc<SignalHandler>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &ctx),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }
            () = signals.wait() => {
                logger::log_info("[Webhook] Listener closed");
                break;
            }
        }
    }
}

/// Drain the update queue one update at a time
///
/// An update is always handled to completion; shutdown is only observed
/// between updates.
pub async fn start_dispatch_loop<S: ReplySink>(
    dispatcher: &Dispatcher,
    mut updates: mpsc::Receiver<Update>,
    sink: &mut S,
    signals: &SignalHandler,
) {
    loop {
        let update = tokio::select! {
            received = updates.recv() => match received {
                Some(update) => update,
                None => break,
            },
            () = signals.wait() => break,
        };
        dispatcher.handle_update(&update, sink).await;
    }
}
