use thiserror::Error;

/// Failure talking to the Bot API server
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid request: {0}")]
    Request(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read response body: {0}")]
    Body(#[from] hyper::Error),

    #[error("unexpected response (HTTP {status}): {source}")]
    Json {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("Bot API error {code}: {description}")]
    Api { code: i64, description: String },
}
