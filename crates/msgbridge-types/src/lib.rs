//! Shared domain types for msgbridge.
//!
//! This crate contains the types used across the bridge: chats, messages,
//! per-chat activity counts, query arguments, and their associated error
//! types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod query;
