//! # File Store
//!
//! [`CartStore`] that keeps each key in its own JSON file, so a cart
//! outlives the process the way browser storage outlives a page.

use cart_core::{CartError, CartResult, CartStore};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory-backed key-value store
///
/// Reads and writes use blocking `std::fs` calls on the calling thread.
/// Meant for small blobs such as a cart; wrap it in
/// `tokio::task::spawn_blocking` before storing anything large.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }
}

/// Keys like `@RocketShoes:cart` are not valid file names everywhere
fn file_stem(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl CartStore for FileStore {
    fn get(&self, key: &str) -> CartResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CartError::Store(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&self, key: &str, blob: &str) -> CartResult<()> {
        let path = self.path_for(key);
        let store_err = |e: std::io::Error| {
            CartError::Store(format!("Failed to write {}: {}", path.display(), e))
        };

        fs::create_dir_all(&self.dir).map_err(store_err)?;

        // Write then rename so a crash never leaves half a blob behind
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, blob).map_err(store_err)?;
        fs::rename(&tmp, &path).map_err(store_err)?;

        debug!("Wrote {} bytes to {}", blob.len(), path.display());
        Ok(())
    }
}
