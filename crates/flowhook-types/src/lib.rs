//! Shared domain types for flowhook.
//!
//! Flow versions, block metadata, handshake configuration, inbound payloads,
//! engine wire types, configuration and the error enums shared by every
//! other crate.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod block;
pub mod config;
pub mod error;
pub mod execution;
pub mod flow;
pub mod handshake;
