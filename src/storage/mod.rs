//! Local image storage
//!
//! Uploaded originals and annotated results are written to a single images
//! directory, named after the uploaded file. Concurrent uploads of the same
//! name overwrite each other; the last write wins.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Prefix for annotated image file names
pub const ANNOTATED_PREFIX: &str = "highlighted_";

const FALLBACK_FILE_NAME: &str = "upload";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create images directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Images directory on the local filesystem
#[derive(Debug, Clone)]
pub struct ImageStore {
    base_path: PathBuf,
}

impl ImageStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Create the images directory if it does not exist
    pub async fn ensure_dir(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.base_path)
            .await
            .map_err(|source| StorageError::CreateDir {
                path: self.base_path.clone(),
                source,
            })
    }

    /// Path of the original upload for `file_name`
    pub fn original_path(&self, file_name: &str) -> PathBuf {
        self.base_path.join(sanitize_file_name(file_name))
    }

    /// Path of the annotated image for `file_name`
    pub fn annotated_path(&self, file_name: &str) -> PathBuf {
        self.base_path.join(annotated_file_name(file_name))
    }

    /// Persist the uploaded bytes
    pub async fn save_original(&self, file_name: &str, data: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.original_path(file_name);
        self.write(&path, data).await?;
        Ok(path)
    }

    /// Persist the PNG-encoded annotated image
    pub async fn save_annotated(&self, file_name: &str, png: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.annotated_path(file_name);
        self.write(&path, png).await?;
        Ok(path)
    }

    async fn write(&self, path: &Path, data: &[u8]) -> Result<(), StorageError> {
        self.ensure_dir().await?;
        tokio::fs::write(path, data)
            .await
            .map_err(|source| StorageError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(path = %path.display(), size = data.len(), "Stored image");
        Ok(())
    }
}

/// Reduce a client-supplied file name to a bare name inside the images directory
pub fn sanitize_file_name(file_name: &str) -> String {
    let normalized = file_name.replace('\\', "/");
    let base = normalized
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base == "." || base == ".." {
        FALLBACK_FILE_NAME.to_string()
    } else {
        base.to_string()
    }
}

/// `highlighted_<stem>.png` for an uploaded file name
pub fn annotated_file_name(file_name: &str) -> String {
    let name = sanitize_file_name(file_name);
    let stem = Path::new(&name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_FILE_NAME);

    format!("{}{}.png", ANNOTATED_PREFIX, stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("card.jpg"), "card.jpg");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\id.png"), "id.png");
        assert_eq!(sanitize_file_name("scans/"), "upload");
        assert_eq!(sanitize_file_name(".."), "upload");
        assert_eq!(sanitize_file_name(""), "upload");
    }

    #[test]
    fn test_annotated_file_name() {
        assert_eq!(annotated_file_name("german_id.jpg"), "highlighted_german_id.png");
        assert_eq!(annotated_file_name("scan.v2.png"), "highlighted_scan.v2.png");
        assert_eq!(annotated_file_name("noext"), "highlighted_noext.png");
        assert_eq!(annotated_file_name(""), "highlighted_upload.png");
    }

    #[tokio::test]
    async fn test_save_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = ImageStore::new(temp_dir.path().join("images"));

        let path = store.save_original("id.jpg", b"original").await.unwrap();

        assert_eq!(path, temp_dir.path().join("images").join("id.jpg"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"original");
    }

    #[tokio::test]
    async fn test_last_writer_wins() {
        let temp_dir = TempDir::new().unwrap();
        let store = ImageStore::new(temp_dir.path());

        store.save_annotated("id.jpg", b"first").await.unwrap();
        let path = store.save_annotated("id.jpg", b"second").await.unwrap();

        assert!(path.ends_with("highlighted_id.png"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_traversal_stays_inside_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = ImageStore::new(temp_dir.path().join("images"));

        let path = store.save_original("../escape.png", b"x").await.unwrap();
        assert_eq!(path.parent(), Some(temp_dir.path().join("images").as_path()));
    }
}
