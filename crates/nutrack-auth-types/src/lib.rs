//! Auth types shared across Nutrack services.
//!
//! Provides JWT claims, access-token validation, and token lifetime constants.

pub mod token;
