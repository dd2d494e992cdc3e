//! Update dispatch
//!
//! Entry point for inbound commands: parse, guard, resolve, respond. One
//! request runs to completion before the caller hands over the next update.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use super::command::{Command, Request};
use super::{files, replies, Document, Reply, ReplySink};
use crate::config::AppState;
use crate::error::FetchError;
use crate::logger::{self, AccessLogEntry};
use crate::telegram::Update;

pub struct Dispatcher {
    state: Arc<AppState>,
    /// Our own username, for filtering `/cmd@otherbot`
    bot_username: Option<String>,
}

impl Dispatcher {
    pub const fn new(state: Arc<AppState>, bot_username: Option<String>) -> Self {
        Self {
            state,
            bot_username,
        }
    }

    /// Handle one raw update; malformed updates are dropped without a reply
    pub async fn handle_update<S: ReplySink>(&self, update: &Update, sink: &mut S) {
        match Request::from_update(update, self.bot_username.as_deref()) {
            Ok(Some(request)) => self.handle_request(&request, sink).await,
            Ok(None) => {}
            Err(e) => {
                logger::log_debug(&format!("Dropping update {}: {e}", update.update_id));
            }
        }
    }

    /// Run a parsed request through the pipeline
    pub async fn handle_request<S: ReplySink>(&self, request: &Request, sink: &mut S) {
        match &request.command {
            Command::Start => deliver(sink, request.chat_id, replies::start()).await,
            Command::Help => deliver(sink, request.chat_id, replies::help()).await,
            Command::Fetch(tokens) => {
                let inner = &mut *sink;
                let guarded = self
                    .state
                    .guard
                    .privileged(&request.requester, move || {
                        self.fetch(request, tokens, inner)
                    })
                    .await;

                if let Err(err) = guarded {
                    self.log_access(request, None, None, &Err(&err), Instant::now());
                    if let Some(reply) = err.user_reply() {
                        deliver(sink, request.chat_id, reply).await;
                    }
                }
            }
        }
    }

    /// `/fetch` body, run only for allowed requesters
    async fn fetch<S: ReplySink>(&self, request: &Request, tokens: &[String], sink: &mut S) {
        if tokens.is_empty() {
            deliver(sink, request.chat_id, replies::usage()).await;
            return;
        }

        for token in tokens {
            let started = Instant::now();
            let path = match self.state.resolver.resolve(token) {
                Ok(path) => path,
                Err(err) => {
                    self.finish_token(request, token, None, Err(err), started, sink)
                        .await;
                    continue;
                }
            };

            let result =
                files::load_document(&path, token, self.state.config.bot.max_file_size).await;
            self.finish_token(request, token, Some(&path), result, started, sink)
                .await;
        }
    }

    /// Log the outcome of one token and deliver whatever reply it produced
    async fn finish_token<S: ReplySink>(
        &self,
        request: &Request,
        token: &str,
        path: Option<&Path>,
        result: Result<Document, FetchError>,
        started: Instant,
        sink: &mut S,
    ) {
        let name = request.requester.display_name();
        match result {
            Ok(document) => {
                logger::log_info(&format!("Sending {} to {name}", document.path.display()));
                self.log_access(request, Some(token), path, &Ok(document.bytes.len()), started);
                deliver(sink, request.chat_id, Reply::Document(document)).await;
            }
            Err(err) => {
                if matches!(err, FetchError::Io { .. }) {
                    logger::log_warning(&format!("Fetch of '{token}' for {name} failed: {err}"));
                } else {
                    logger::log_info(&format!("Fetch of '{token}' for {name} refused: {err}"));
                }
                self.log_access(request, Some(token), path, &Err(&err), started);
                if let Some(reply) = err.user_reply() {
                    deliver(sink, request.chat_id, reply).await;
                }
            }
        }
    }

    fn log_access(
        &self,
        request: &Request,
        token: Option<&str>,
        path: Option<&Path>,
        outcome: &Result<usize, &FetchError>,
        started: Instant,
    ) {
        let logging = &self.state.config.logging;
        if !logging.access_log {
            return;
        }

        let mut entry = AccessLogEntry::new(
            request.requester.id,
            request.requester.username.clone(),
            request.command.name(),
        );
        entry.token = token.map(ToString::to_string);
        entry.path = path.map(|p| p.display().to_string());
        match outcome {
            Ok(bytes) => {
                entry.outcome = "sent";
                entry.bytes_sent = *bytes;
            }
            Err(err) => entry.outcome = err.outcome(),
        }
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &logging.access_log_format);
    }
}

/// Hand a reply to the sink; delivery failures are logged, never propagated
async fn deliver<S: ReplySink>(sink: &mut S, chat_id: i64, reply: Reply) {
    if let Err(e) = sink.send(chat_id, reply).await {
        logger::log_error(&format!("Failed to deliver reply to chat {chat_id}: {e}"));
    }
}
