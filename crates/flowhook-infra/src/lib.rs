//! Infrastructure layer for flowhook.
//!
//! Contains implementations of the port traits defined in `flowhook-core`:
//! the HTTP block metadata client, the HTTP trigger engine client and the
//! configured webhook URL resolver, plus the `flowhook.toml` loader.

pub mod config;
pub mod engine;
pub mod http;
pub mod metadata;
pub mod webhook_url;
