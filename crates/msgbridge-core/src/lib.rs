//! Cache synchronization core for msgbridge.
//!
//! This crate defines the "port" (the [`store::MessageStore`] trait) that
//! the infrastructure layer implements, plus the stateful sync subsystem:
//! the per-chat activity tracker, the single-slot active-query cache, the
//! background poll loop, and the facade service that request handlers call.
//! It depends only on `msgbridge-types` -- never on `msgbridge-infra` or
//! any IO crate.

pub mod observe;
pub mod service;
pub mod store;
pub mod sync;

#[cfg(test)]
pub(crate) mod testing;
