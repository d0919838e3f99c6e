//! Mock implementations for testing.
//!
//! This module provides mock implementations of all trait abstractions,
//! enabling unit testing without network dependencies or environment access.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with scripted responses and streams
//! - [`StaticTokenProvider`] - In-memory bearer token
//! - [`RecordingObserver`] - Collects forward outcomes

pub mod credentials;
pub mod http;
pub mod observer;

pub use credentials::StaticTokenProvider;
pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use observer::RecordingObserver;
