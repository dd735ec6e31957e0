use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::app::{FeedDigestError, Result};
use crate::domain::Archive;
use crate::store::{write_atomic, Store};

/// Archive persisted as a single indented JSON document.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Four-space indented JSON with a trailing newline. `serde_json` leaves
    /// `&`, `<` and `>` unescaped.
    pub fn encode(archive: &Archive) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = Serializer::with_formatter(&mut buf, formatter);
        archive.serialize(&mut serializer)?;
        buf.push(b'\n');
        Ok(buf)
    }
}

impl Store for JsonStore {
    fn load(&self) -> Result<Archive> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No archive yet, starting empty");
                return Ok(Archive::default());
            }
            Err(source) => {
                return Err(FeedDigestError::StorageRead {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let mut archive: Archive =
            serde_json::from_slice(&data).map_err(|e| FeedDigestError::CorruptStorage {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        let dropped = archive.reindex();
        if dropped > 0 {
            tracing::warn!(
                path = %self.path.display(),
                dropped,
                "Dropped archived items without a unique link"
            );
        }

        tracing::debug!(path = %self.path.display(), items = archive.len(), "Loaded archive");
        Ok(archive)
    }

    fn save(&self, archive: &Archive) -> Result<()> {
        let data = Self::encode(archive)?;
        write_atomic(&self.path, &data).map_err(|source| FeedDigestError::StorageWrite {
            path: self.path.clone(),
            source,
        })?;

        tracing::info!(path = %self.path.display(), items = archive.len(), "Saved archive");
        Ok(())
    }
}
