use anyhow::Context;
use std::sync::Arc;
use subscription_console::config::Config;
use subscription_console::database;
use subscription_console::services::commands::ProcessRunner;
use subscription_console::tasks;
use subscription_console::transport::telegram::TelegramApi;
use subscription_console::transport::{BotCommand, ChatApi};
use subscription_console::ui::texts;
use subscription_console::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Arc::new(Config::from_env().context("loading configuration")?);
    let db = database::connect(&config.db_path)
        .await
        .with_context(|| format!("opening store at {}", config.db_path.display()))?;
    let chat: Arc<dyn ChatApi> = Arc::new(TelegramApi::new(&config.bot_token).context("building chat client")?);
    let state = AppState::new(db, config, chat, Arc::new(ProcessRunner));

    let start = BotCommand {
        command: "start".into(),
        description: texts::START_COMMAND_DESCRIPTION.into(),
    };
    if let Err(e) = state.chat.set_commands(&[start]).await {
        tracing::warn!(target = "startup", error = %e, "setMyCommands failed");
    }

    tracing::info!(
        target = "startup",
        db = %state.config.db_path.display(),
        registry = %state.registry.path().display(),
        "subscription console starting"
    );
    let _background = tasks::spawn_background(&state);
    tasks::ingest::run(state).await;
    Ok(())
}
