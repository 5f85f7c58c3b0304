#![deny(missing_docs)]

//! Core library for the Rusty Roster student records service.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// OpenAPI document generation and the Swagger UI page.
pub mod docs;
/// Structured logging and tracing setup.
pub mod logging;
/// Store activity counters.
pub mod metrics;
/// In-memory student record store.
pub mod store;
/// Listener binding for the HTTP server.
pub mod server;
