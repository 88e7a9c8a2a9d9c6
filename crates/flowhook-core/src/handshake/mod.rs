//! Webhook handshake detection and execution.
//!
//! - `strategy` -- pure strategy resolution against a payload
//! - `cache` -- optional cache of per-trigger handshake configurations
//! - `execution` -- runs a matched handshake through the trigger engine
//! - `dispatcher` -- the entry point tying lookup, resolution and execution together

pub mod cache;
pub mod dispatcher;
pub mod execution;
pub mod strategy;

#[cfg(test)]
mod test_support;

pub use dispatcher::{DispatcherOptions, HandshakeDispatcher, HandshakeRequest};
