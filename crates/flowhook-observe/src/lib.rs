//! Observability setup for flowhook: structured logging and optional
//! OpenTelemetry trace export.

pub mod tracing_setup;
