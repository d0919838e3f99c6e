//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - streaming GET and buffered POST
//! - [`TokenProvider`] - bearer token retrieval
//! - [`ForwardObserver`] - sink for forwarding outcomes
//! - [`ReconnectPolicy`] - delay between stream sessions

pub mod credentials;
pub mod http;
pub mod observer;
pub mod reconnect;

pub use credentials::{CredentialsError, TokenProvider};
pub use http::{ByteStream, Headers, HttpClient, HttpError, Response, StreamResponse};
pub use observer::ForwardObserver;
pub use reconnect::ReconnectPolicy;
