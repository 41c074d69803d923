use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use anyhow::Error;
use log::{debug, info, warn};
use uuid::Uuid;

/// An uploaded file kept on disk for the lifetime of one request.
///
/// The file is removed when the value drops, on every exit path.
#[derive(Debug)]
pub struct TransientFile {
    path: PathBuf,
}

impl TransientFile {
    /// create writes `contents` to a fresh `temp_<uuid>.jpg` inside `dir`.
    pub async fn create(dir: &Path, contents: &[u8]) -> Result<Self, Error> {
        let file = TransientFile {
            path: dir.join(format!("temp_{}.jpg", Uuid::new_v4().simple())),
        };
        tokio::fs::write(&file.path, contents)
            .await
            .map_err(|e| Error::msg(format!("failed to store upload at {}: {}", file.path.display(), e)))?;
        Ok(file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TransientFile {
    // Removed synchronously so the file is gone before the response goes out.
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => info!("Temporary file deleted: {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Temporary file already gone: {}", self.path.display())
            }
            Err(e) => warn!("Failed to delete temporary file {}: {}", self.path.display(), e),
        }
    }
}
