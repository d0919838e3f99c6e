//! Wire types for the upstream tweet stream and the downstream signal call.

use serde::{Deserialize, Serialize};

/// Trigger identifier sent with every forwarded event.
///
/// Names the downstream automation rule that should fire.
pub const TRIGGER_ID: &str = "when-someone-tweets";

/// Tweet fields carried under `data` in every stream record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventData {
    /// Tweet id
    pub id: String,
    /// Author's user id
    pub author_id: String,
    /// Tweet text
    pub text: String,
}

/// A filter rule that matched the tweet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingRule {
    pub id: String,
    /// Rule tag, when the rule was created with one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl MatchingRule {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: None,
        }
    }
}

/// One decoded record from the upstream stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamEvent {
    pub data: EventData,
    #[serde(default)]
    pub matching_rules: Vec<MatchingRule>,
}

impl StreamEvent {
    /// Ids of every rule that matched, in stream order.
    pub fn rule_ids(&self) -> impl Iterator<Item = &str> {
        self.matching_rules.iter().map(|rule| rule.id.as_str())
    }
}

/// Body of the downstream `/signal` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    #[serde(rename = "triggerId")]
    pub trigger_id: String,
    pub data: StreamEvent,
}

impl NotificationPayload {
    /// Wrap an event with the fixed [`TRIGGER_ID`].
    pub fn new(event: StreamEvent) -> Self {
        Self {
            trigger_id: TRIGGER_ID.to_string(),
            data: event,
        }
    }
}

/// Bearer token for the upstream stream.
///
/// Fetched once per session and never cached across sessions.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(***)")
    }
}
