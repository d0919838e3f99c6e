//! Chunk parser for the upstream stream.
//!
//! Every chunk delivered by the transport is parsed on its own. The upstream
//! sends one JSON record per chunk and bare `\r\n` keep-alives in between.
//!
//! Known limitation: there is no buffering across chunk boundaries. A record
//! split over two chunks is lost as two malformed fragments.

use crate::error::ErrorCategory;
use crate::models::StreamEvent;

/// Result of looking at a single chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkKind {
    /// Nothing but whitespace; the connection is alive
    KeepAlive,
    /// A complete record
    Event(StreamEvent),
    /// Non-empty but not a record; carries the decode error
    Malformed(String),
}

impl ChunkKind {
    /// The failure category of this chunk, if it is one.
    pub fn error_category(&self) -> Option<ErrorCategory> {
        match self {
            ChunkKind::Malformed(_) => Some(ErrorCategory::Parse),
            ChunkKind::KeepAlive | ChunkKind::Event(_) => None,
        }
    }
}

/// Decode a chunk to text and drop every `\n`, `\t` and `\r`, then trim.
pub fn normalize_chunk(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    let stripped: String = text
        .chars()
        .filter(|c| !matches!(c, '\n' | '\t' | '\r'))
        .collect();
    stripped.trim().to_string()
}

/// Classify a chunk without logging.
pub fn classify_chunk(raw: &[u8]) -> ChunkKind {
    let body = normalize_chunk(raw);
    if body.is_empty() {
        return ChunkKind::KeepAlive;
    }

    match serde_json::from_str::<StreamEvent>(&body) {
        Ok(event) => ChunkKind::Event(event),
        Err(e) => ChunkKind::Malformed(e.to_string()),
    }
}

/// Parse a chunk into an event.
///
/// Returns `None` for keep-alives and for anything that does not decode;
/// decode failures are logged and otherwise ignored.
pub fn parse_chunk(raw: &[u8]) -> Option<StreamEvent> {
    let kind = classify_chunk(raw);
    let category = kind.error_category();
    match kind {
        ChunkKind::Event(event) => Some(event),
        ChunkKind::KeepAlive => {
            tracing::trace!("Keep-alive chunk");
            None
        }
        ChunkKind::Malformed(reason) => {
            tracing::warn!(
                bytes = raw.len(),
                category = category.as_ref().map(ErrorCategory::as_str),
                "Cannot parse JSON: {}",
                reason
            );
            None
        }
    }
}
