//! Upload validation and transient staging.
//!
//! Accepted files are written under the upload directory with a time-based
//! unique name. `StagedFile` removes the file when dropped, so every exit
//! path out of the handler (success, error, panic unwind) leaves the
//! directory clean.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use crate::errors::AppError;

pub const MAX_FILE_SIZE_BYTES: usize = 10 * 1024 * 1024;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_DOC: &str = "application/msword";

const ALLOWED_MIME_TYPES: [&str; 3] = [MIME_PDF, MIME_DOCX, MIME_DOC];

/// Disambiguates uploads that land in the same millisecond.
static STAGING_SEQ: AtomicU64 = AtomicU64::new(0);

/// Rejects disallowed types and oversized files before anything touches disk.
pub fn validate_upload(content_type: &str, size_bytes: usize) -> Result<(), AppError> {
    if !ALLOWED_MIME_TYPES.contains(&content_type) {
        return Err(AppError::Validation(
            "Invalid file type. Only PDF and DOCX files are allowed.".to_string(),
        ));
    }
    if size_bytes > MAX_FILE_SIZE_BYTES {
        return Err(AppError::Validation(
            "File too large. Maximum size is 10MB.".to_string(),
        ));
    }
    Ok(())
}

/// A transient upload on disk, deleted on drop.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
}

impl StagedFile {
    /// Writes `bytes` to `{dir}/{millis}-{seq}-{sanitized original name}`.
    pub async fn stage(dir: &Path, original_name: &str, bytes: &[u8]) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to create upload directory: {e}"))
        })?;

        let file_name = format!(
            "{}-{}-{}",
            Utc::now().timestamp_millis(),
            STAGING_SEQ.fetch_add(1, Ordering::Relaxed),
            sanitize_file_name(original_name)
        );
        let path = dir.join(file_name);

        tokio::fs::write(&path, bytes).await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to write staged upload: {e}"))
        })?;

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove staged file {}: {e}", self.path.display());
            }
        }
    }
}

/// Keeps alphanumerics, '.', '-' and '_'; everything else becomes '_'.
/// Blocks path traversal through hostile original filenames.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_disallowed_type() {
        let err = validate_upload("image/png", 1024).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_oversized_file() {
        let err = validate_upload(MIME_PDF, MAX_FILE_SIZE_BYTES + 1).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_validate_accepts_pdf_at_the_limit() {
        assert!(validate_upload(MIME_PDF, MAX_FILE_SIZE_BYTES).is_ok());
        assert!(validate_upload(MIME_DOCX, 2048).is_ok());
        assert!(validate_upload(MIME_DOC, 2048).is_ok());
    }

    #[test]
    fn test_sanitize_blocks_path_traversal() {
        let name = sanitize_file_name("../../etc/passwd");
        assert!(!name.contains('/'));
        assert_eq!(sanitize_file_name(""), "upload");
        assert_eq!(sanitize_file_name("my resume.pdf"), "my_resume.pdf");
    }

    #[tokio::test]
    async fn test_staged_file_is_written_and_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();

        let staged = StagedFile::stage(dir.path(), "resume.pdf", b"%PDF-1.4 test")
            .await
            .unwrap();
        let path = staged.path().to_path_buf();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4 test");

        drop(staged);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_concurrent_stages_get_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();

        let a = StagedFile::stage(dir.path(), "resume.pdf", b"a").await.unwrap();
        let b = StagedFile::stage(dir.path(), "resume.pdf", b"b").await.unwrap();
        assert_ne!(a.path(), b.path());
    }
}
