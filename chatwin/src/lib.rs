//! `chatwin`: chat-window facade over a QQ-style bot adapter.
//!
//! A window binds one contact (friend, group or group member) and turns
//! caller intent into adapter calls, folding remote failures into plain
//! outcomes and recording sent messages.

pub mod adapter;
pub mod config;
pub mod readonly;
pub mod store;
pub mod window;
