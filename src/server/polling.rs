// Long-polling update source
// Pulls updates with getUpdates and queues them for the dispatcher

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use super::signal::SignalHandler;
use crate::config::BotConfig;
use crate::error::FetchError;
use crate::logger;
use crate::telegram::{BotClient, Update};

/// Extra time the HTTP call may take beyond the long-poll timeout
const POLL_GRACE_SECS: u64 = 10;

/// Poll until shutdown or until the dispatcher queue closes
pub async fn run_polling(
    client: BotClient,
    config: BotConfig,
    updates: mpsc::Sender<Update>,
    signals: Arc<SignalHandler>,
) {
    // getUpdates is refused while a webhook is registered
    if let Err(e) = client.delete_webhook().await {
        logger::log_warning(&format!("deleteWebhook failed, polling anyway: {e}"));
    }

    let request_timeout = Duration::from_secs(config.poll_timeout + POLL_GRACE_SECS);
    let retry_delay = Duration::from_secs(config.retry_delay);
    let mut offset: i64 = 0;

    while !signals.is_shutdown() {
        let poll = tokio::time::timeout(
            request_timeout,
            client.get_updates(offset, config.poll_timeout),
        );
        let result = tokio::select! {
            result = poll => result,
            () = signals.wait() => break,
        };

        let raw = match result {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                logger::log_error(&format!("getUpdates failed: {e}"));
                if wait_or_shutdown(retry_delay, &signals).await {
                    break;
                }
                continue;
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "getUpdates gave no answer within {}s",
                    request_timeout.as_secs()
                ));
                continue;
            }
        };

        let (next, batch) = decode_batch(offset, raw);
        offset = next;
        for update in batch {
            if updates.send(update).await.is_err() {
                logger::log_error("Dispatcher queue closed; stopping poller");
                return;
            }
        }
    }
}

/// Decode a getUpdates batch entry by entry
///
/// Returns the offset acknowledging every entry that carries an
/// `update_id`, including ones that fail to decode, so a malformed update
/// is dropped instead of being fetched again.
fn decode_batch(mut offset: i64, raw: Vec<serde_json::Value>) -> (i64, Vec<Update>) {
    let mut batch = Vec::with_capacity(raw.len());
    for entry in raw {
        let id = entry.get("update_id").and_then(serde_json::Value::as_i64);
        if let Some(id) = id {
            offset = offset.max(id + 1);
        }
        match serde_json::from_value::<Update>(entry) {
            Ok(update) => batch.push(update),
            Err(e) => {
                let id = id.map_or_else(|| "without id".to_string(), |id| id.to_string());
                logger::log_debug(&format!(
                    "Dropping update {id}: {}: {e}",
                    FetchError::MalformedUpdate
                ));
            }
        }
    }
    (offset, batch)
}

/// Sleep for `delay`; returns true if shutdown arrived first
async fn wait_or_shutdown(delay: Duration, signals: &SignalHandler) -> bool {
    tokio::select! {
        () = tokio::time::sleep(delay) => false,
        () = signals.wait() => true,
    }
}
