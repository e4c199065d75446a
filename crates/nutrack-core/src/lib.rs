//! Ambient plumbing shared by Nutrack services.
//!
//! Config loading, tracing setup, health endpoints, request-id middleware,
//! and serde helpers. Nothing here knows about any particular service.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
