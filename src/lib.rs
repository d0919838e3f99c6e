//! Signal relay - keeps a filtered tweet stream open and forwards every
//! matching tweet to a notification endpoint.
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod config;
pub mod error;
pub mod forwarder;
pub mod logging;
pub mod models;
pub mod parser;
pub mod session;
pub mod supervisor;
pub mod traits;
