// Connection handling module
// Serves one webhook TCP connection

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::sync::Arc;

use super::webhook::{self, WebhookContext};
use crate::logger;

/// Handle a single connection in a spawned local task.
///
/// This function:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Serves HTTP/1.1 with the webhook handler
/// 3. Applies the configured timeout to the whole connection
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    ctx: &Arc<WebhookContext>,
) {
    logger::log_debug(&format!("[Webhook] Accepted connection from {peer_addr}"));
    let ctx = Arc::clone(ctx);

    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);
        let timeout_duration = std::time::Duration::from_secs(ctx.config.timeout);

        let conn = http1::Builder::new().serve_connection(
            io,
            service_fn(move |req| {
                let ctx = Arc::clone(&ctx);
                async move { webhook::handle_webhook(req, ctx).await }
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                logger::log_error(&format!("Failed to serve webhook connection: {err:?}"));
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Webhook connection from {peer_addr} timed out after {} seconds",
                    timeout_duration.as_secs()
                ));
            }
        }
    });
}
