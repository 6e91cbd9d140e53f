//! The shared state handed to every handler and background task.

use crate::config::Config;
use crate::database::DbPool;
use crate::services::commands::{CommandRunner, ExternalCommands};
use crate::services::lifecycle::Lifecycle;
use crate::services::registry::Registry;
use crate::transport::ChatApi;
use std::sync::Arc;

/// Cheap to clone; every field is a handle.
#[derive(Clone)]
pub struct AppState {
    /// The store pool; the only channel between the concurrent tasks.
    pub db: DbPool,
    pub config: Arc<Config>,
    pub chat: Arc<dyn ChatApi>,
    pub commands: ExternalCommands,
    pub registry: Registry,
    pub lifecycle: Lifecycle,
}

impl AppState {
    pub fn new(db: DbPool, config: Arc<Config>, chat: Arc<dyn ChatApi>, runner: Arc<dyn CommandRunner>) -> Self {
        let commands = ExternalCommands::new(runner, config.clone());
        let registry = Registry::new(config.clients_json.clone());
        let lifecycle = Lifecycle::new(registry.clone(), commands.clone());
        Self {
            db,
            config,
            chat,
            commands,
            registry,
            lifecycle,
        }
    }
}
