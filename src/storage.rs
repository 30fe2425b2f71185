// SPDX-License-Identifier: MPL-2.0

//! Shared image storage for captured photos
//!
//! Photos land in `<XDG Pictures>/Kamera/` (or the configured override) under
//! a display name derived from the capture time. Entries are never
//! overwritten: a second capture within the same second gets a ` (1)`
//! suffix, the next ` (2)`, and so on.

use crate::constants::storage::{
    DISPLAY_NAME_FORMAT, JPEG_EXTENSION, JPEG_MIME_TYPE, MAX_NAME_COLLISIONS, PHOTO_SUBDIRECTORY,
};
use crate::errors::PhotoError;
use chrono::{DateTime, Local};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Display name for a photo captured at `time` (`yyyyMMdd_HHmmss`)
pub fn display_name_for(time: &DateTime<Local>) -> String {
    time.format(DISPLAY_NAME_FORMAT).to_string()
}

/// Opaque handle to a persisted photo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageReference {
    path: PathBuf,
    display_name: String,
    mime_type: String,
}

impl StorageReference {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display name the entry was requested with (without collision suffix)
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// `file://` URI of the entry
    pub fn uri(&self) -> String {
        format!("file://{}", self.path.display())
    }
}

/// Decoded image ready for display
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    /// Packed RGBA pixels
    pub rgba: Vec<u8>,
}

/// Directory-backed photo storage
#[derive(Debug, Clone)]
pub struct PhotoStorage {
    directory: PathBuf,
}

impl PhotoStorage {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Storage at `override_dir`, or `<XDG Pictures>/Kamera` when unset.
    ///
    /// Falls back to `~/Pictures` and finally the working directory when the
    /// XDG directories cannot be resolved.
    pub fn from_config(override_dir: Option<&Path>) -> Self {
        if let Some(dir) = override_dir {
            return Self::new(dir);
        }

        let pictures = dirs::picture_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(pictures.join(PHOTO_SUBDIRECTORY))
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Create a new entry and write `bytes` into it.
    ///
    /// Only `image/jpeg` is accepted. Existing files are never replaced.
    pub fn create_entry(
        &self,
        display_name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<StorageReference, PhotoError> {
        let extension = extension_for(mime_type)
            .ok_or_else(|| PhotoError::UnsupportedMimeType(mime_type.to_string()))?;

        std::fs::create_dir_all(&self.directory)?;

        for attempt in 0..=MAX_NAME_COLLISIONS {
            let file_name = if attempt == 0 {
                format!("{display_name}.{extension}")
            } else {
                format!("{display_name} ({attempt}).{extension}")
            };
            let path = self.directory.join(file_name);

            let mut file = match std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!(path = %path.display(), "Entry exists, trying next name");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if let Err(e) = file.write_all(bytes).and_then(|()| file.sync_all()) {
                // Never leave a truncated photo behind
                if let Err(remove_err) = std::fs::remove_file(&path) {
                    warn!(path = %path.display(), error = %remove_err, "Failed to remove partial photo");
                }
                return Err(e.into());
            }

            info!(path = %path.display(), size = bytes.len(), "Photo saved");
            return Ok(StorageReference {
                path,
                display_name: display_name.to_string(),
                mime_type: mime_type.to_string(),
            });
        }

        Err(PhotoError::SaveFailed(format!(
            "too many photos named {display_name}"
        )))
    }

    /// Async wrapper around [`Self::create_entry`] for JPEG data
    pub async fn save_jpeg(
        &self,
        display_name: String,
        bytes: Vec<u8>,
    ) -> Result<StorageReference, PhotoError> {
        let storage = self.clone();
        tokio::task::spawn_blocking(move || {
            storage.create_entry(&display_name, JPEG_MIME_TYPE, &bytes)
        })
        .await
        .map_err(|e| PhotoError::SaveFailed(format!("save task failed: {e}")))?
    }
}

fn extension_for(mime_type: &str) -> Option<&'static str> {
    (mime_type == JPEG_MIME_TYPE).then_some(JPEG_EXTENSION)
}

/// Decode the referenced photo fully into memory
pub async fn load_thumbnail(reference: StorageReference) -> Result<Thumbnail, PhotoError> {
    let bytes = tokio::fs::read(reference.path()).await?;

    tokio::task::spawn_blocking(move || {
        let img = image::load_from_memory(&bytes)?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        debug!(path = %reference.path().display(), width, height, "Decoded thumbnail");
        Ok(Thumbnail {
            width,
            height,
            rgba: rgba.into_raw(),
        })
    })
    .await
    .map_err(|e| PhotoError::EncodingFailed(format!("decode task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_display_name_format() {
        let time = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(display_name_for(&time), "20240307_090502");
    }

    #[test]
    fn test_rejects_unknown_mime_type() {
        let dir = tempfile::tempdir().unwrap();
        let storage = PhotoStorage::new(dir.path());
        let result = storage.create_entry("20240101_000000", "image/png", b"data");
        assert!(matches!(result, Err(PhotoError::UnsupportedMimeType(_))));
    }

    #[test]
    fn test_uri_is_file_scheme() {
        let dir = tempfile::tempdir().unwrap();
        let storage = PhotoStorage::new(dir.path());
        let reference = storage
            .create_entry("20240101_000000", JPEG_MIME_TYPE, b"data")
            .unwrap();
        assert!(reference.uri().starts_with("file://"));
        assert!(reference.uri().ends_with("20240101_000000.jpg"));
    }

    #[test]
    fn test_override_directory_wins() {
        let storage = PhotoStorage::from_config(Some(Path::new("/tmp/kamera-photos")));
        assert_eq!(storage.directory(), Path::new("/tmp/kamera-photos"));
    }
}
