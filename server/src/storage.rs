//! Thumbnail files in the public asset area.

use chrono::Utc;
use dapur_core::image::extension_for;
use dapur_core::ValidThumbnail;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

const THUMBNAIL_DIR: &str = "thumbnails";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write thumbnail: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes thumbnails under `{root}/thumbnails` and hands out their public URLs.
/// The root is served at `/storage`.
#[derive(Debug, Clone)]
pub struct ThumbnailStorage {
    root: PathBuf,
    public_url: String,
}

impl ThumbnailStorage {
    pub fn new(root: impl Into<PathBuf>, public_url: &str) -> Self {
        ThumbnailStorage {
            root: root.into(),
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write the file as `{unix_seconds}_{sanitized name}` and return its URL.
    /// A name already on disk gets a `-{n}` suffix before its extension, so
    /// every call owns the file it wrote.
    pub async fn store(&self, thumbnail: &ValidThumbnail) -> Result<String, StorageError> {
        let base = format!(
            "{}_{}",
            Utc::now().timestamp(),
            sanitize_file_name(&thumbnail.file_name, extension_for(thumbnail.format))
        );

        let dir = self.root.join(THUMBNAIL_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let mut attempt = 0u32;
        let (file_name, mut file) = loop {
            let candidate = numbered_name(&base, attempt);
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(dir.join(&candidate))
                .await
            {
                Ok(file) => break (candidate, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e.into()),
            }
        };
        file.write_all(&thumbnail.data).await?;
        file.flush().await?;

        Ok(format!(
            "{}/storage/{THUMBNAIL_DIR}/{file_name}",
            self.public_url
        ))
    }

    /// Remove a previously stored thumbnail. Failures are logged, not returned.
    pub async fn discard(&self, url: &str) {
        let Some(path) = self.path_for_url(url) else {
            tracing::warn!(%url, "thumbnail url is outside the storage area");
            return;
        };
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(error = %e, path = %path.display(), "failed to remove thumbnail");
        }
    }

    fn path_for_url(&self, url: &str) -> Option<PathBuf> {
        let prefix = format!("{}/storage/{THUMBNAIL_DIR}/", self.public_url);
        let file_name = url.strip_prefix(&prefix)?;
        if file_name.is_empty() || file_name.contains('/') || file_name.contains("..") {
            return None;
        }
        Some(self.root.join(THUMBNAIL_DIR).join(file_name))
    }
}

fn numbered_name(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        return base.to_string();
    }
    match base.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}-{attempt}.{ext}"),
        None => format!("{base}-{attempt}"),
    }
}

/// Keep the last path component of the client's file name, restricted to
/// `[A-Za-z0-9._-]`.
fn sanitize_file_name(original: &str, fallback_ext: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        format!("thumbnail.{fallback_ext}")
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dapur_core::image::ImageFormat;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("photo.png", "png"), "photo.png");
        assert_eq!(sanitize_file_name("../../etc/passwd", "png"), "passwd");
        assert_eq!(sanitize_file_name("C:\\pics\\my dish.jpg", "jpg"), "my_dish.jpg");
        assert_eq!(sanitize_file_name(".hidden.png", "png"), "hidden.png");
        assert_eq!(sanitize_file_name("", "jpg"), "thumbnail.jpg");
    }

    #[tokio::test]
    async fn test_store_and_discard() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ThumbnailStorage::new(dir.path(), "http://localhost:3000/");
        let thumbnail = ValidThumbnail {
            file_name: "rice.png".to_string(),
            format: ImageFormat::Png,
            data: vec![1, 2, 3],
        };

        let url = storage.store(&thumbnail).await.unwrap();
        assert!(url.starts_with("http://localhost:3000/storage/thumbnails/"));
        assert!(url.ends_with("_rice.png"));

        let path = storage.path_for_url(&url).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);

        storage.discard(&url).await;
        assert!(!path.exists());
    }

    #[test]
    fn test_numbered_name() {
        assert_eq!(numbered_name("17_rice.png", 0), "17_rice.png");
        assert_eq!(numbered_name("17_rice.png", 2), "17_rice-2.png");
        assert_eq!(numbered_name("17_rice", 1), "17_rice-1");
    }

    #[tokio::test]
    async fn test_same_name_gets_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ThumbnailStorage::new(dir.path(), "http://localhost:3000");
        let first = ValidThumbnail {
            file_name: "photo.png".to_string(),
            format: ImageFormat::Png,
            data: vec![1],
        };
        let second = ValidThumbnail {
            data: vec![2],
            ..first.clone()
        };

        let first_url = storage.store(&first).await.unwrap();
        let second_url = storage.store(&second).await.unwrap();
        assert_ne!(first_url, second_url);

        storage.discard(&second_url).await;
        let first_path = storage.path_for_url(&first_url).unwrap();
        assert_eq!(std::fs::read(first_path).unwrap(), vec![1]);
    }

    #[test]
    fn test_foreign_urls_are_ignored() {
        let storage = ThumbnailStorage::new("/srv/public", "http://localhost:3000");
        assert!(storage
            .path_for_url("https://elsewhere.example/storage/thumbnails/a.png")
            .is_none());
        assert!(storage
            .path_for_url("http://localhost:3000/storage/thumbnails/../secret")
            .is_none());
    }
}
