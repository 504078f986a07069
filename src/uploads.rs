//! Local storage for uploaded product images.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

/// Writes uploads under one directory, each under a fresh random name.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Saves `bytes` as `<dir>/<uuid>.<ext>` and returns that path.
    ///
    /// The extension is taken from `original_name`, lowercased; names without
    /// one are stored without an extension.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> io::Result<String> {
        let mut file_name = Uuid::new_v4().to_string();
        if let Some(ext) = Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
        {
            file_name.push('.');
            file_name.push_str(&ext.to_lowercase());
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, bytes).await?;

        let path = path.to_string_lossy().into_owned();
        debug!(%path, size = bytes.len(), "upload saved");
        Ok(path)
    }

    /// Deletes a previously saved upload. Failures are only logged.
    pub async fn remove(&self, path: &str) {
        if let Err(err) = tokio::fs::remove_file(path).await {
            warn!(%path, error = %err, "failed to delete upload");
        }
    }
}
