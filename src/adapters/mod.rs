//! Concrete implementations of trait abstractions.
//!
//! This module provides the production adapters behind the traits defined in
//! `crate::traits`. The supervisor only sees the traits, so every adapter can
//! be swapped for a test double.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`EnvTokenProvider`] - Bearer token from the process environment
//! - [`TracingObserver`] - Logs forward outcomes
//! - [`ImmediateReconnect`] / [`ExponentialBackoff`] - Reconnect policies
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Scripted HTTP responses and streams
//! - [`mock::StaticTokenProvider`] - In-memory token
//! - [`mock::RecordingObserver`] - Captures forward outcomes

pub mod backoff;
pub mod env_credentials;
pub mod mock;
pub mod reqwest_http;
pub mod tracing_observer;

pub use backoff::{ExponentialBackoff, ImmediateReconnect};
pub use env_credentials::EnvTokenProvider;
pub use mock::{MockHttpClient, RecordingObserver, StaticTokenProvider};
pub use reqwest_http::ReqwestHttpClient;
pub use tracing_observer::TracingObserver;
