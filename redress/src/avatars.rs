//! Filesystem-backed storage for user avatar uploads.
//!
//! Avatars are written under `<media_root>/avatars/` with a generated UUID
//! filename, and the database stores the path relative to the media root
//! (e.g. `avatars/9f2c....png`). API responses never expose the stored path
//! directly; they carry a derived URL that is empty when the file is missing,
//! absolute when a `public_url` is configured, and root-relative otherwise.

use std::path::{Component, Path, PathBuf};

use tracing::{instrument, warn};
use url::Url;
use uuid::Uuid;

use crate::errors::{Error, Result};

/// URL prefix under which the media root is served.
pub const MEDIA_URL_PREFIX: &str = "/media";

const AVATAR_DIR: &str = "avatars";

/// Handle to the media directory that avatar uploads are written to.
#[derive(Debug, Clone)]
pub struct AvatarStore {
    media_root: PathBuf,
}

impl AvatarStore {
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
        }
    }

    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    /// Persist uploaded avatar bytes and return the path to store in the
    /// database, relative to the media root.
    ///
    /// The original filename is only consulted for its extension; the stored
    /// name is always a fresh UUID so concurrent uploads never collide.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn save(&self, original_filename: Option<&str>, bytes: &[u8]) -> Result<String> {
        let extension = original_filename
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            // Path::extension yields Some("") for names like "pic.", which
            // would store a filename ending in a bare dot.
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

        let filename = match extension {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext.to_ascii_lowercase()),
            None => Uuid::new_v4().to_string(),
        };

        let dir = self.media_root.join(AVATAR_DIR);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| Error::Internal {
            operation: format!("create avatar directory {}: {e}", dir.display()),
        })?;

        let path = dir.join(&filename);
        tokio::fs::write(&path, bytes).await.map_err(|e| Error::Internal {
            operation: format!("write avatar {}: {e}", path.display()),
        })?;

        Ok(format!("{AVATAR_DIR}/{filename}"))
    }

    /// Resolve a stored avatar path to its serving URL path
    /// (`/media/<relative>`), or None if the path escapes the media root or
    /// the file no longer exists on disk.
    pub fn url_path(&self, stored: &str) -> Option<String> {
        if stored.is_empty() {
            return None;
        }

        let relative = Path::new(stored);
        // Reject absolute paths and any traversal out of the media root
        let safe = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if !safe {
            warn!("Rejecting avatar path outside media root: {stored}");
            return None;
        }

        if !self.media_root.join(relative).is_file() {
            return None;
        }

        Some(format!("{MEDIA_URL_PREFIX}/{stored}"))
    }
}

/// Derive the avatar URL exposed in API responses.
///
/// - No avatar on record, or the file is missing: empty string
/// - `public_url` configured: absolute URL on that origin
/// - Otherwise: root-relative path
pub fn resolve_avatar_url(avatar: Option<&str>, store: &AvatarStore, public_url: Option<&Url>) -> String {
    let Some(path) = avatar.and_then(|stored| store.url_path(stored)) else {
        return String::new();
    };

    match public_url {
        Some(base) => match base.join(&path) {
            Ok(url) => url.to_string(),
            Err(e) => {
                warn!("Failed to join avatar path onto public_url: {e}");
                path
            }
        },
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test_log::test(tokio::test)]
    async fn test_save_generates_unique_relative_paths() {
        let dir = tempdir().unwrap();
        let store = AvatarStore::new(dir.path());

        let first = store.save(Some("me.png"), b"png bytes").await.unwrap();
        let second = store.save(Some("me.png"), b"png bytes").await.unwrap();

        assert!(first.starts_with("avatars/"));
        assert!(first.ends_with(".png"));
        assert_ne!(first, second);

        // Stored relative to the media root
        assert!(dir.path().join(&first).is_file());
    }

    #[tokio::test]
    async fn test_save_without_extension() {
        let dir = tempdir().unwrap();
        let store = AvatarStore::new(dir.path());

        let stored = store.save(None, b"bytes").await.unwrap();
        assert!(stored.starts_with("avatars/"));
        assert!(!stored.contains('.'));
    }

    #[tokio::test]
    async fn test_save_trailing_dot_filename_drops_extension() {
        let dir = tempdir().unwrap();
        let store = AvatarStore::new(dir.path());

        // "pic." has an empty extension; the stored name must not end in a
        // bare dot.
        let stored = store.save(Some("pic."), b"bytes").await.unwrap();
        assert!(stored.starts_with("avatars/"));
        assert!(!stored.contains('.'));
    }

    #[tokio::test]
    async fn test_url_path_for_existing_file() {
        let dir = tempdir().unwrap();
        let store = AvatarStore::new(dir.path());

        let stored = store.save(Some("pic.jpg"), b"jpeg").await.unwrap();
        let url = store.url_path(&stored).unwrap();
        assert_eq!(url, format!("/media/{stored}"));
    }

    #[test]
    fn test_url_path_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let store = AvatarStore::new(dir.path());

        assert!(store.url_path("avatars/does-not-exist.png").is_none());
    }

    #[test]
    fn test_url_path_rejects_traversal() {
        let dir = tempdir().unwrap();
        let store = AvatarStore::new(dir.path());

        assert!(store.url_path("../etc/passwd").is_none());
        assert!(store.url_path("/etc/passwd").is_none());
        assert!(store.url_path("avatars/../../secret").is_none());
    }

    #[test_log::test(tokio::test)]
    async fn test_resolve_avatar_url_relative_and_absolute() {
        let dir = tempdir().unwrap();
        let store = AvatarStore::new(dir.path());
        let stored = store.save(Some("pic.png"), b"png").await.unwrap();

        // No public_url: root-relative
        let relative = resolve_avatar_url(Some(&stored), &store, None);
        assert_eq!(relative, format!("/media/{stored}"));

        // public_url configured: absolute on that origin
        let base = Url::parse("https://complaints.example.com").unwrap();
        let absolute = resolve_avatar_url(Some(&stored), &store, Some(&base));
        assert_eq!(absolute, format!("https://complaints.example.com/media/{stored}"));
    }

    #[test]
    fn test_resolve_avatar_url_empty_cases() {
        let dir = tempdir().unwrap();
        let store = AvatarStore::new(dir.path());

        // No avatar on record
        assert_eq!(resolve_avatar_url(None, &store, None), "");
        // Avatar recorded but file gone
        assert_eq!(resolve_avatar_url(Some("avatars/gone.png"), &store, None), "");
    }
}
