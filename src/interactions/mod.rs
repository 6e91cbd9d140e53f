//! This module holds every conversational flow.
//!
//! `handler.rs` decides which flow an inbound event belongs to and delegates
//! here: user-facing screens live in `user_flow`, the admin sections in
//! `admin_menu`, and the multi-step admin dialogue in `admin_flow` (with its
//! persisted state in `session` and the account picker in `selector`).

pub mod admin_flow;
pub mod admin_menu;
pub mod ids;
pub mod selector;
pub mod session;
pub mod user_flow;
pub mod util;
