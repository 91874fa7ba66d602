//! Infrastructure layer for msgbridge.
//!
//! Contains the concrete [`msgbridge_core::store::MessageStore`]
//! implementation (an HTTP JSON client for the conversation-bridge
//! service) and the `config.toml` loader.

pub mod config;
pub mod http_store;
