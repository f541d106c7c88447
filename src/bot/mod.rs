//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: Handles incoming text and document messages
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `menu`: Maps reply keyboard labels to helpdesk actions
//! - `ui_builder`: Creates keyboards and formats messages

pub mod callback_handler;
pub mod menu;
pub mod message_handler;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::{message_handler, new_members_handler};

pub use menu::MenuAction;
