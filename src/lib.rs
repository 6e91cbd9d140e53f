// Library entry so integration tests can reach the same modules the binary runs.
pub mod config;
pub mod constants;
pub mod database;
pub mod handler;
pub mod interactions;
pub mod model;
pub mod services;
pub mod tasks;
pub mod transport;
pub mod ui;
pub mod util;

pub use model::AppState;
