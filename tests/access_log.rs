// Log output of privileged commands, captured through the global log writer

use std::convert::Infallible;
use std::fs;
use std::sync::Arc;

use file_squire::config::{AppState, Config};
use file_squire::handler::{Command, Dispatcher, Reply, ReplySink, Request, Requester};
use file_squire::logger::{self, writer, Level};

#[derive(Default)]
struct Recorder {
    sent: Vec<Reply>,
}

impl ReplySink for Recorder {
    type Error = Infallible;

    async fn send(&mut self, _chat_id: i64, reply: Reply) -> Result<(), Self::Error> {
        self.sent.push(reply);
        Ok(())
    }
}

fn fetch(id: i64, username: &str, tokens: &[&str]) -> Request {
    Request {
        requester: Requester {
            id,
            username: Some(username.to_string()),
        },
        chat_id: id,
        command: Command::Fetch(tokens.iter().map(ToString::to_string).collect()),
    }
}

/// Access entries (JSON lines) for one requester, in write order
fn access_entries(log: &str, requester_id: i64) -> Vec<serde_json::Value> {
    log.lines()
        .filter(|line| line.starts_with('{'))
        .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap())
        .filter(|entry| entry["requester_id"] == requester_id)
        .collect()
}

// The writer is process-global, so everything runs in one test
#[tokio::test]
async fn startup_attempts_and_fetches_are_logged() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("squire.log");
    writer::init(log_path.to_str(), None, Level::Debug).unwrap();

    let served = dir.path().join("served.log");
    fs::write(&served, b"twelve bytes").unwrap();
    let toml = format!(
        r#"
[bot]
token = "123:TEST"

[access]
allow_list = [42]

[paths.aliases]
me = '{me}'
gone = '{gone}'

[logging]
access_log = true
access_log_format = "json"
"#,
        me = served.display(),
        gone = dir.path().join("missing.log").display(),
    );
    let config = Config::from_toml_str(&toml).unwrap();
    let state = Arc::new(AppState::new(config));
    logger::log_bot_start(&state, Some("squire_bot"));
    let dispatcher = Dispatcher::new(state, None);

    let mut sink = Recorder::default();
    dispatcher
        .handle_request(&fetch(7, "mallory", &["me"]), &mut sink)
        .await;
    dispatcher
        .handle_request(&fetch(42, "alice", &["me", "nope", "gone"]), &mut sink)
        .await;
    assert_eq!(sink.sent.len(), 4);

    let log = fs::read_to_string(&log_path).unwrap();

    // Every attempt is logged at INFO, a denial additionally at WARNING
    let has_line = |suffix: &str| log.lines().any(|l| l.ends_with(suffix));
    assert!(has_line(
        " - file_squire - INFO - @mallory (7) is trying to access a privileged command"
    ));
    assert!(has_line(
        " - file_squire - WARNING - Unauthorized access denied for mallory."
    ));
    assert!(has_line(
        " - file_squire - INFO - @alice (42) is trying to access a privileged command"
    ));
    assert!(!log.contains("Unauthorized access denied for alice."));

    assert!(has_line(" - INFO - BOT DEPLOYED as @squire_bot"));
    assert!(has_line(" - INFO - Allow list: 1 user(s)"));
    assert!(has_line(" - INFO - Path mode: alias (2 configured): gone, me"));

    let denied = access_entries(&log, 7);
    assert_eq!(denied.len(), 1);
    assert_eq!(denied[0]["outcome"], "denied");
    assert!(denied[0]["token"].is_null());

    let allowed = access_entries(&log, 42);
    let outcomes: Vec<&str> = allowed
        .iter()
        .map(|e| e["outcome"].as_str().unwrap())
        .collect();
    assert_eq!(outcomes, ["sent", "alias_not_found", "file_not_found"]);
    let tokens: Vec<&str> = allowed
        .iter()
        .map(|e| e["token"].as_str().unwrap())
        .collect();
    assert_eq!(tokens, ["me", "nope", "gone"]);
    assert_eq!(allowed[0]["bytes_sent"], 12);
    assert_eq!(allowed[0]["command"], "/fetch");
}
