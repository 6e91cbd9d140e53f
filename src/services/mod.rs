//! Adapters over the collaborators that live outside the bot process:
//! the external commands, the account registry file, and the lifecycle
//! mutations composed from both.

pub mod commands;
pub mod lifecycle;
pub mod payments;
pub mod registry;
