use std::sync::Arc;

use file_squire::config::{AppState, Config};
use file_squire::logger;
use file_squire::server::{self, SignalHandler};
use file_squire::telegram::BotClient;

/// Config path used when none is given; the extension is optional
const DEFAULT_CONFIG: &str = "squire";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Create the Tokio runtime, sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.bot.workers {
        runtime_builder.worker_threads(workers);
        logger::log_debug(&format!("[CONFIG] Using {workers} worker threads"));
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let client = BotClient::new(&cfg.bot.api_url, &cfg.bot.token);
    let me = client.get_me().await?;
    let state = Arc::new(AppState::new(cfg));
    logger::log_bot_start(&state, me.username.as_deref());

    let signals = Arc::new(SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::run(state, client, me.username, signals))
        .await
}
