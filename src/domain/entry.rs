use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Title given to entries whose source item has none.
pub const UNTITLED: &str = "Untitled";

/// One normalized feed item. `link` is the identity key across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub link: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// UTC RFC 3339 with whole seconds, e.g. `2025-02-28T10:00:00Z`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub published: String,
}

impl Entry {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        description: impl Into<String>,
        published: &DateTime<Utc>,
    ) -> Self {
        let title = title.into();
        Self {
            title: if title.is_empty() {
                UNTITLED.to_string()
            } else {
                title
            },
            link: link.into(),
            description: description.into(),
            published: format_timestamp(published),
        }
    }

    /// Whether the entry carries a usable link.
    pub fn has_link(&self) -> bool {
        !self.link.trim().is_empty()
    }

    /// Re-reads `published`; `None` when the stored value is not RFC 3339.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(self.published.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }
}

/// Canonical textual form used for every persisted timestamp.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}
