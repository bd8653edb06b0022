//! Patient image uploads.
//!
//! Files arrive as the `image` part of a multipart form, must carry an
//! `image/*` content type and weigh at most [`MAX_IMAGE_BYTES`]. They are
//! written to the upload directory as `{unix_millis}-{original name}`; only
//! that filename is stored on the patient. A name already taken moves the
//! prefix forward a millisecond, so no upload overwrites another.

use std::{
    io::{self, ErrorKind},
    path::Path,
};

use axum::{body::Bytes, extract::multipart::Field};
use chrono::Utc;
use tokio::io::AsyncWriteExt;

use crate::ServerError;

pub(crate) const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub(crate) struct ImageUpload {
    original_name: String,
    bytes: Bytes,
}

/// Reads and checks the `image` file part.
pub(crate) async fn read_image(field: Field<'_>) -> Result<ImageUpload, ServerError> {
    let is_image = field
        .content_type()
        .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("image/"));
    if !is_image {
        return Err(ServerError::Upload("Only images are allowed".to_string()));
    }
    let original_name = field.file_name().unwrap_or("image").to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| ServerError::Upload(e.body_text()))?;
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(ServerError::Upload(
            "Image must be at most 5 MB".to_string(),
        ));
    }
    Ok(ImageUpload {
        original_name,
        bytes,
    })
}

/// Writes the upload to `dir` and returns the stored filename.
pub(crate) async fn store(dir: &Path, upload: ImageUpload) -> Result<String, ServerError> {
    let failed = |filename: &str, e: io::Error| {
        tracing::error!("failed to store upload {filename}: {e}");
        ServerError::Upload("failed to store image".to_string())
    };
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| failed(&dir.display().to_string(), e))?;

    let mut millis = Utc::now().timestamp_millis();
    loop {
        let filename = stored_name(millis, &upload.original_name);
        match write_new(&dir.join(&filename), &upload.bytes).await {
            Ok(()) => {
                tracing::debug!("stored upload {filename} ({} bytes)", upload.bytes.len());
                return Ok(filename);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => millis += 1,
            Err(e) => return Err(failed(&filename, e)),
        }
    }
}

async fn write_new(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(bytes).await?;
    file.flush().await
}

/// Best-effort removal of a file stored by [`store`].
pub(crate) async fn discard(dir: &Path, filename: &str) {
    if let Err(e) = tokio::fs::remove_file(dir.join(filename)).await {
        tracing::warn!("failed to remove upload {filename}: {e}");
    }
}

pub(crate) fn stored_name(millis: i64, original: &str) -> String {
    format!("{millis}-{}", sanitize_file_name(original))
}

/// Keeps the last path component and replaces anything outside
/// `[A-Za-z0-9._-]` with `_`.
pub(crate) fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
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
        "image".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_name_has_millis_prefix() {
        assert_eq!(stored_name(1_700_000_000_123, "smile.png"), "1700000000123-smile.png");
    }

    #[test]
    fn sanitize_strips_directories_and_odd_chars() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\photos\\my face.jpg"), "my_face.jpg");
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
        assert_eq!(sanitize_file_name(""), "image");
    }

    #[tokio::test]
    async fn same_name_uploads_never_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let upload = |bytes: &'static [u8]| ImageUpload {
            original_name: "smile.png".to_string(),
            bytes: Bytes::from_static(bytes),
        };

        let mut names = Vec::new();
        for bytes in [b"first".as_slice(), b"second", b"third"] {
            names.push(store(dir.path(), upload(bytes)).await.unwrap());
        }

        names.sort();
        names.dedup();
        assert_eq!(names.len(), 3);
        let mut contents: Vec<Vec<u8>> = names
            .iter()
            .map(|name| std::fs::read(dir.path().join(name)).unwrap())
            .collect();
        contents.sort();
        assert_eq!(contents, vec![b"first".to_vec(), b"second".to_vec(), b"third".to_vec()]);
    }
}
