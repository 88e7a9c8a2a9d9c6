//! Handshake negotiation and trigger-dispatch logic for flowhook.
//!
//! This crate defines the ports (collaborator traits) that the infrastructure
//! layer implements. It depends only on `flowhook-types`, never on
//! `flowhook-infra` or any HTTP client crate.

pub mod handshake;
pub mod ports;
