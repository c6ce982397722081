//! Stored record shapes. Field names match the page's existing JSON.

use serde::{Deserialize, Serialize};

/// A journal post. Fields the page adds later are carried through untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub created_at: i64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    /// Anything that is not a video renders as a photo.
    #[serde(other)]
    Photo,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub data_url: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterMode {
    /// Time elapsed since the target.
    Since,
    /// Time left until the target.
    Until,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counter {
    pub title: String,
    pub mode: CounterMode,
    /// `YYYY-MM-DDTHH:MM`, local time.
    pub target_local: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub title: String,
    #[serde(default)]
    pub text: String,
    pub created_at: i64,
    pub event_local: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<serde_json::Value>,
}

pub fn default_counters() -> Vec<Counter> {
    vec![
        Counter {
            title: "How long we’ve been together ❤️".to_string(),
            mode: CounterMode::Since,
            target_local: "2025-09-21T00:00".to_string(),
        },
        Counter {
            title: "Until we see each other 🥺".to_string(),
            mode: CounterMode::Until,
            target_local: "2026-02-20T18:00".to_string(),
        },
    ]
}
