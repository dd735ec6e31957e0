//! Weekly digest documents.
//!
//! The archive is split into ISO-week buckets (see [`week::bucket`]), one
//! document is rendered per bucket, and a summary document covers the most
//! recent week together with the total archive size. Rendering happens fully
//! in memory before anything is written.

pub mod render;
pub mod week;

use std::path::{Path, PathBuf};

use crate::app::{FeedDigestError, Result};
use crate::domain::{Archive, Entry};
use crate::store::write_atomic;

pub use render::{DocumentData, ItemView, Render, TemplateRenderer};
pub use week::{bucket, WeekBucket, WeekKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentId {
    Week(WeekKey),
    Summary,
}

impl DocumentId {
    /// `YYYY-WW` for weekly documents, `index` for the summary.
    pub fn name(&self) -> String {
        match self {
            DocumentId::Week(key) => key.to_string(),
            DocumentId::Summary => "index".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub body: String,
}

fn document_data<'a>(
    title: String,
    user_name: &'a str,
    items: &'a [Entry],
    count: usize,
    summary: bool,
) -> DocumentData<'a> {
    DocumentData {
        title,
        user_name,
        items: items.iter().map(ItemView::from).collect(),
        shown: items.len(),
        count,
        summary,
    }
}

/// Renders every weekly document in key order, then the summary.
///
/// Fails without producing any document if a single item's `published`
/// value cannot be read back as a timestamp.
pub fn generate(
    archive: &Archive,
    offset_hours: i64,
    user_name: &str,
    renderer: &dyn Render,
) -> Result<Vec<Document>> {
    let buckets = bucket(archive.items(), offset_hours)?;
    let mut documents = Vec::with_capacity(buckets.len() + 1);

    for b in &buckets {
        let data = document_data(b.key.to_string(), user_name, b.items, 0, false);
        documents.push(Document {
            id: DocumentId::Week(b.key),
            body: renderer.render(&data)?,
        });
    }

    let latest = buckets.last().map(|b| b.items).unwrap_or_default();
    let data = document_data(archive.title.clone(), user_name, latest, archive.len(), true);
    documents.push(Document {
        id: DocumentId::Summary,
        body: renderer.render(&data)?,
    });

    tracing::debug!(documents = documents.len(), "Generated digest");
    Ok(documents)
}

/// Maps documents to files under a base directory.
pub struct DigestWriter {
    base_dir: PathBuf,
    weekly_dir: PathBuf,
    summary_file: PathBuf,
}

impl DigestWriter {
    pub fn new(
        base_dir: impl Into<PathBuf>,
        weekly_dir: impl Into<PathBuf>,
        summary_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            base_dir: base_dir.into(),
            weekly_dir: weekly_dir.into(),
            summary_file: summary_file.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn path_for(&self, id: &DocumentId) -> PathBuf {
        match id {
            DocumentId::Week(key) => self
                .base_dir
                .join(&self.weekly_dir)
                .join(format!("{key}.md")),
            DocumentId::Summary => self.base_dir.join(&self.summary_file),
        }
    }

    /// Writes each document atomically; returns the written paths.
    pub fn write(&self, documents: &[Document]) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::with_capacity(documents.len());

        for document in documents {
            let path = self.path_for(&document.id);
            write_atomic(&path, document.body.as_bytes())
                .map_err(|source| FeedDigestError::DocumentWrite {
                    path: path.clone(),
                    source,
                })?;
            paths.push(path);
        }

        tracing::info!(
            base_dir = %self.base_dir.display(),
            documents = paths.len(),
            "Wrote digest"
        );
        Ok(paths)
    }
}
