// Server module entry
// Wires an update source (long polling or webhook) to the sequential dispatcher

pub mod connection;
pub mod listener;
pub mod polling;
pub mod signal;
pub mod webhook;

// `loop` is a keyword, so the module is exposed as server_loop
#[path = "loop.rs"]
pub mod server_loop;

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::{AppState, UpdateMode};
use crate::handler::Dispatcher;
use crate::logger;
use crate::telegram::BotClient;

pub use listener::create_reusable_listener;
pub use server_loop::{start_dispatch_loop, start_webhook_loop};
pub use signal::{start_signal_handler, SignalHandler};
pub use webhook::WebhookContext;

/// Updates buffered between the source and the dispatcher
const UPDATE_QUEUE_DEPTH: usize = 64;

/// Run the bot until shutdown is requested
///
/// Must be called inside a `LocalSet`: the update source and webhook
/// connections are spawned with `spawn_local`.
pub async fn run(
    state: Arc<AppState>,
    client: BotClient,
    bot_username: Option<String>,
    signals: Arc<SignalHandler>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = mpsc::channel(UPDATE_QUEUE_DEPTH);

    match state.config.bot.mode {
        UpdateMode::Polling => {
            tokio::task::spawn_local(polling::run_polling(
                client.clone(),
                state.config.bot.clone(),
                tx,
                Arc::clone(&signals),
            ));
        }
        UpdateMode::Webhook => {
            let webhook = &state.config.webhook;
            let addr = state.config.get_webhook_addr()?;
            let listener = create_reusable_listener(addr)?;
            logger::log_info(&format!(
                "[Webhook] Listening on http://{addr}{}",
                webhook.path
            ));

            if let Some(public_url) = webhook.public_url.as_deref() {
                client
                    .set_webhook(public_url, webhook.secret_token.as_deref())
                    .await?;
                logger::log_info(&format!("[Webhook] Registered {public_url}"));
            }

            let ctx = Arc::new(WebhookContext {
                config: webhook.clone(),
                updates: tx,
            });
            tokio::task::spawn_local(start_webhook_loop(listener, ctx, Arc::clone(&signals)));
        }
    }

    let dispatcher = Dispatcher::new(state, bot_username);
    let mut sink = client;
    start_dispatch_loop(&dispatcher, rx, &mut sink, &signals).await;

    logger::log_info("Shutdown complete");
    Ok(())
}
