use std::collections::HashSet;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{format_timestamp, Entry};

/// The deduplicated, append-only collection of entries.
///
/// Items are kept sorted ascending by `published`. `links` mirrors the set of
/// item links and is rebuilt by [`Archive::reindex`]; it is never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Archive {
    #[serde(default)]
    pub title: String,
    #[serde(default, with = "updated_format")]
    updated: Option<DateTime<Utc>>,
    #[serde(default)]
    items: Vec<Entry>,
    #[serde(skip)]
    links: HashSet<String>,
}

impl PartialEq for Archive {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.updated == other.updated && self.items == other.items
    }
}

impl Archive {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Builds an archive from already-ordered parts, enforcing the link invariants.
    pub fn from_parts(
        title: impl Into<String>,
        updated: Option<DateTime<Utc>>,
        items: Vec<Entry>,
    ) -> Self {
        let mut archive = Self {
            title: title.into(),
            updated,
            items,
            links: HashSet::new(),
        };
        archive.reindex();
        archive
    }

    /// Drops items without a link or with an already-seen link, rewrites
    /// readable `published` values in canonical form, restores the sort order
    /// and rebuilds the link index. Returns how many items were dropped.
    pub fn reindex(&mut self) -> usize {
        let before = self.items.len();
        let mut links = HashSet::with_capacity(before);
        self.items
            .retain(|item| item.has_link() && links.insert(item.link.clone()));
        self.links = links;

        for item in &mut self.items {
            if let Some(at) = item.published_at() {
                item.published = format_timestamp(&at);
            }
        }
        self.items.sort_by(|a, b| a.published.cmp(&b.published));

        before - self.items.len()
    }

    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated
    }

    pub fn items(&self) -> &[Entry] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, link: &str) -> bool {
        self.links.contains(link)
    }

    /// Takes the feed's title when the archive has none yet. Returns whether
    /// the title changed.
    pub fn adopt_title(&mut self, title: Option<&str>) -> bool {
        if !self.title.is_empty() {
            return false;
        }
        match title.filter(|t| !t.is_empty()) {
            Some(title) => {
                self.title = title.to_string();
                true
            }
            None => false,
        }
    }

    /// Merges `entries`, stamping `updated` with the current time on change.
    pub fn merge<I>(&mut self, entries: I) -> bool
    where
        I: IntoIterator<Item = Entry>,
    {
        self.merge_at(entries, Utc::now())
    }

    /// Appends every entry whose link is not yet known, in the given order.
    ///
    /// Returns `true` iff at least one entry was added; only then are items
    /// re-sorted (stable) and `updated` set to `now`.
    pub fn merge_at<I>(&mut self, entries: I, now: DateTime<Utc>) -> bool
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut changed = false;

        for entry in entries {
            if !entry.has_link() || self.links.contains(&entry.link) {
                continue;
            }
            self.links.insert(entry.link.clone());
            self.items.push(entry);
            changed = true;
        }

        if changed {
            self.items.sort_by(|a, b| a.published.cmp(&b.published));
            self.updated = Some(now.trunc_subsecs(0));
        }

        changed
    }
}

mod updated_format {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::domain::entry::format_timestamp;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&format_timestamp(dt)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(serde::de::Error::custom),
        }
    }
}
