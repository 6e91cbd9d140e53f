//! This module acts as a central hub for all store access.
//! Each table gets its own submodule, e.g. `database::jobs::claim_next`.

pub mod init;
pub mod jobs;
pub mod models;
pub mod notices;
pub mod sessions;
pub mod subscribers;

pub use init::{DbPool, connect};
