pub mod json;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::app::Result;
use crate::domain::Archive;

pub use json::JsonStore;

pub trait Store {
    /// Loads the persisted archive, or an empty one when none exists yet.
    fn load(&self) -> Result<Archive>;

    /// Persists the archive, replacing the previous copy atomically.
    fn save(&self, archive: &Archive) -> Result<()>;
}

/// Path of the temporary sibling used while replacing `path`.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `contents` to a temporary file next to `path` and renames it into
/// place. The temporary file is removed when any step fails.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    let result = write_synced(&tmp, contents).and_then(|()| fs::rename(&tmp, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_synced(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(contents)?;
    file.sync_all()
}
