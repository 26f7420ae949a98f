//! Local filesystem data source.
//!
//! Reads the payload from a JSON file on disk via `tokio::fs`. The filesystem
//! has no notion of a content validator, so this source never exposes a
//! version tag and the freshness checker always falls back to a checksum.

use async_trait::async_trait;
use exn::ResultExt;
use std::path::{Path, PathBuf};
use tracing::instrument;

use crate::backend::{DataSource, Fetched};
use crate::error::{ErrorKind, Result};

/// JSON file data source.
///
/// # Examples
///
/// ```no_run
/// use emojidb_source::backend::LocalSource;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let source = LocalSource::new("/usr/share/emojidb/data.json")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LocalSource {
    path: PathBuf,
    url: String,
}
impl LocalSource {
    /// Create a new local file source.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute; a relative path would
    /// make the stored source identifier depend on the working directory.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_absolute() {
            exn::bail!(ErrorKind::NotFound(path.display().to_string()));
        }
        let url = format!("file://{}", path.display());
        Ok(Self { path, url })
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(path.display().to_string()),
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }
}

#[async_trait]
impl DataSource for LocalSource {
    fn url(&self) -> &str {
        &self.url
    }

    async fn probe_version_tag(&self) -> Result<Option<String>> {
        Ok(None)
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch_with_tag(&self) -> Result<Fetched> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| Self::map_io_error(e, &self.path))?;
        let payload = serde_json::from_slice(&bytes).or_raise(|| ErrorKind::InvalidPayload(self.url.clone()))?;
        tracing::debug!(bytes = bytes.len(), "Read emoji data from disk");
        Ok(Fetched { tag: None, payload })
    }
}
