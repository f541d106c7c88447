//! # AnbesaPlus Helper Bot
//!
//! Support-channel Telegram bot for the mobile banking app. Customers' issue
//! reports are captured through a guided name/phone intake into daily,
//! category-tagged CSV logs, and operators can look up whether a reported
//! phone number has been resolved.

pub mod attachment_guard;
pub mod bot;
pub mod config;
pub mod dialogue;
pub mod errors;
pub mod helpdesk;
pub mod intake;
pub mod lookup;
pub mod lookup_index;
pub mod phone;
pub mod report_store;
pub mod session;
