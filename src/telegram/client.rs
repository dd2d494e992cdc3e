//! Bot API HTTP client
//!
//! Thin wrapper over the hyper-util legacy client. Each method posts to
//! `<api_url>/bot<token>/<method>` and unwraps the `{ok, result}` envelope.

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::fmt;

use super::multipart::Form;
use super::types::{ApiResponse, User};
use super::TransportError;
use crate::handler::{Document, ParseMode, Reply, ReplySink};

/// Handle to a Bot API server
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct BotClient {
    http: Client<HttpConnector, Full<Bytes>>,
    /// `<api_url>/bot<token>`; never logged
    base_url: String,
}

impl fmt::Debug for BotClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotClient")
            .field("base_url", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl BotClient {
    pub fn new(api_url: &str, token: &str) -> Self {
        let http = Client::builder(TokioExecutor::new()).build_http();
        Self {
            http,
            base_url: format!("{}/bot{token}", api_url.trim_end_matches('/')),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url)
    }

    /// Identity of the bot owning the token
    pub async fn get_me(&self) -> Result<User, TransportError> {
        self.call_json("getMe", &json!({})).await
    }

    /// Long-poll for updates starting at `offset`
    ///
    /// Entries are returned undecoded so one bad update cannot reject the
    /// whole batch.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<serde_json::Value>, TransportError> {
        self.call_json(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": timeout_secs,
                "allowed_updates": ["message"],
            }),
        )
        .await
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<(), TransportError> {
        let mut payload = json!({ "chat_id": chat_id, "text": text });
        if let Some(mode) = parse_mode {
            payload["parse_mode"] = json!(mode);
        }
        self.call_json::<serde_json::Value>("sendMessage", &payload)
            .await
            .map(drop)
    }

    /// Upload a file as a document message
    pub async fn send_document(
        &self,
        chat_id: i64,
        document: &Document,
    ) -> Result<(), TransportError> {
        let form = Form::new()
            .text("chat_id", &chat_id.to_string())
            .text("caption", &document.caption)
            .text("parse_mode", "Markdown")
            .file(
                "document",
                &document.file_name,
                document.content_type,
                &document.bytes,
            );
        let content_type = form.content_type();
        self.post::<serde_json::Value>("sendDocument", &content_type, form.finish())
            .await
            .map(drop)
    }

    /// Register a webhook URL, optionally with a secret token
    pub async fn set_webhook(
        &self,
        url: &str,
        secret_token: Option<&str>,
    ) -> Result<bool, TransportError> {
        let mut payload = json!({ "url": url, "allowed_updates": ["message"] });
        if let Some(secret) = secret_token {
            payload["secret_token"] = json!(secret);
        }
        self.call_json("setWebhook", &payload).await
    }

    /// Remove any webhook so `getUpdates` is allowed
    pub async fn delete_webhook(&self) -> Result<bool, TransportError> {
        self.call_json("deleteWebhook", &json!({})).await
    }

    async fn call_json<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: &serde_json::Value,
    ) -> Result<T, TransportError> {
        let body = Bytes::from(payload.to_string());
        self.post(method, "application/json", body).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        method: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<T, TransportError> {
        let req = Request::builder()
            .method(Method::POST)
            .uri(self.method_url(method))
            .header("Content-Type", content_type)
            .body(Full::new(body))
            .map_err(|e| TransportError::Request(format!("{method}: {e}")))?;

        let resp = self.http.request(req).await?;
        let status = resp.status().as_u16();
        let bytes = resp.into_body().collect().await?.to_bytes();

        let envelope: ApiResponse<T> = serde_json::from_slice(&bytes)
            .map_err(|source| TransportError::Json { status, source })?;
        envelope.into_result()
    }
}

impl ReplySink for BotClient {
    type Error = TransportError;

    async fn send(&mut self, chat_id: i64, reply: Reply) -> Result<(), Self::Error> {
        match reply {
            Reply::Text { text, parse_mode } => {
                self.send_message(chat_id, &text, parse_mode).await
            }
            Reply::Document(document) => self.send_document(chat_id, &document).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::body::Incoming;
    use hyper::server::conn::http1;
    use hyper::service::service_fn;
    use hyper::Response;
    use hyper_util::rt::TokioIo;
    use std::convert::Infallible;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// What the fake Bot API server saw
    struct Captured {
        path: String,
        content_type: String,
        body: Bytes,
    }

    /// Serve exactly one request with a canned JSON body
    async fn fake_api(reply: &'static str) -> (String, oneshot::Receiver<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();
        let tx = Arc::new(Mutex::new(Some(tx)));

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let service = service_fn(move |req: hyper::Request<Incoming>| {
                let tx = Arc::clone(&tx);
                async move {
                    let path = req.uri().path().to_string();
                    let content_type = req
                        .headers()
                        .get("content-type")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    let body = req.into_body().collect().await.unwrap().to_bytes();
                    if let Some(tx) = tx.lock().unwrap().take() {
                        let _ = tx.send(Captured {
                            path,
                            content_type,
                            body,
                        });
                    }
                    Ok::<_, Infallible>(Response::new(Full::new(Bytes::from(reply))))
                }
            });
            let _ = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await;
        });

        (format!("http://{addr}"), rx)
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = BotClient::new("http://127.0.0.1:8081", "123:SECRET");
        assert!(!format!("{client:?}").contains("SECRET"));
    }

    #[test]
    fn test_method_url() {
        let client = BotClient::new("http://127.0.0.1:8081/", "123:abc");
        assert_eq!(
            client.method_url("getMe"),
            "http://127.0.0.1:8081/bot123:abc/getMe"
        );
    }

    #[tokio::test]
    async fn test_get_me() {
        let (url, rx) = fake_api(concat!(
            r#"{"ok":true,"result":{"id":1,"is_bot":true,"#,
            r#""first_name":"Squire","username":"squire_bot"}}"#
        ))
        .await;
        let client = BotClient::new(&url, "T");
        let me = client.get_me().await.unwrap();
        assert_eq!(me.username.as_deref(), Some("squire_bot"));

        let captured = rx.await.unwrap();
        assert_eq!(captured.path, "/botT/getMe");
        assert_eq!(captured.content_type, "application/json");
    }

    #[tokio::test]
    async fn test_send_document_uploads_multipart() {
        let (url, rx) = fake_api(r#"{"ok":true,"result":{"message_id":9}}"#).await;
        let mut client = BotClient::new(&url, "T");
        let document = Document {
            path: PathBuf::from("logs/squire.log"),
            file_name: "squire.log".to_string(),
            content_type: "text/plain; charset=utf-8",
            bytes: Bytes::from_static(b"hello log"),
            caption: "Your `logs/squire.log`, sir!".to_string(),
        };
        client.send(42, Reply::Document(document)).await.unwrap();

        let captured = rx.await.unwrap();
        assert_eq!(captured.path, "/botT/sendDocument");
        assert!(captured.content_type.starts_with("multipart/form-data; boundary="));
        let body = String::from_utf8(captured.body.to_vec()).unwrap();
        assert!(body.contains("name=\"chat_id\"\r\n\r\n42\r\n"));
        assert!(body.contains("Your `logs/squire.log`, sir!"));
        assert!(body.contains("filename=\"squire.log\""));
        assert!(body.contains("hello log"));
    }

    #[tokio::test]
    async fn test_api_error_surfaces() {
        let (url, _rx) =
            fake_api(r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#)
                .await;
        let client = BotClient::new(&url, "T");
        let err = client.send_message(1, "hi", None).await.unwrap_err();
        assert!(matches!(err, TransportError::Api { code: 400, .. }));
    }
}
