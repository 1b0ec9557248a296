//! Upload service: stage incoming frame images and file them per account.
//!
//! DESIGN
//! ======
//! The file part of an upload is streamed into a uniquely named temp file
//! first. Only once the whole form is read does [`store_frame`] decide:
//! non-PNG content is deleted and rejected before anything is created under
//! the public root; otherwise the temp file is moved to
//! `{public}/{account}/f{index}.png` and the account is registered in the
//! index.
//!
//! ERROR HANDLING
//! ==============
//! Every rejection path removes the temp file. A failed removal is logged
//! and otherwise ignored; the original error is what the client sees.

use std::path::{Path, PathBuf};

use gaze::accounts::frame_image_path;
use gaze::consts::FRAME_COUNT;
use gaze::table::FrameIndex;
use tokio::io::AsyncWriteExt;
use tracing::warn;
use uuid::Uuid;

use super::accounts::{AccountIndex, AccountIndexError};

pub const PNG_CONTENT_TYPE: &str = "image/png";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("missing form field: {0}")]
    MissingField(&'static str),
    #[error("invalid account name: {0:?}")]
    InvalidAccount(String),
    #[error("invalid frame index: {0:?}")]
    InvalidIndex(String),
    #[error("only .png files are allowed (got {0})")]
    NotPng(String),
    #[error("malformed multipart body: {0}")]
    Multipart(String),
    #[error("upload too large: {0}")]
    TooLarge(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Index(#[from] AccountIndexError),
}

/// A file part written to the temp directory, not yet validated.
#[derive(Debug)]
pub struct StagedFile {
    pub path: PathBuf,
    pub content_type: Option<String>,
    pub size: u64,
}

impl StagedFile {
    /// Delete the staged file without storing it.
    pub async fn discard(self) {
        discard(&self.path).await;
    }
}

/// The three form fields of `POST /upload`, as received.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub account_name: Option<String>,
    pub index: Option<String>,
    pub file: Option<StagedFile>,
}

/// Where a frame ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFrame {
    pub account_name: String,
    pub index: FrameIndex,
    pub path: PathBuf,
    pub bytes: u64,
    pub new_account: bool,
}

// =============================================================================
// STAGING
// =============================================================================

/// Streaming writer for one incoming file part.
pub struct TempUpload {
    path: PathBuf,
    file: tokio::fs::File,
    size: u64,
}

impl TempUpload {
    /// Create a fresh temp file under `temp_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub async fn create(temp_dir: &Path) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(temp_dir).await?;
        let path = temp_dir.join(Uuid::new_v4().to_string());
        let file = tokio::fs::File::create(&path).await?;
        Ok(Self { path, file, size: 0 })
    }

    /// Append a chunk.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn write(&mut self, chunk: &[u8]) -> std::io::Result<()> {
        self.file.write_all(chunk).await?;
        self.size += chunk.len() as u64;
        Ok(())
    }

    /// Flush and close the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub async fn finish(mut self, content_type: Option<String>) -> std::io::Result<StagedFile> {
        self.file.flush().await?;
        Ok(StagedFile { path: self.path, content_type, size: self.size })
    }

    /// Close and delete a partially written file.
    pub async fn abandon(self) {
        let Self { path, file, .. } = self;
        drop(file);
        discard(&path).await;
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Accept an account name only if it is a single, ordinary path segment.
///
/// # Errors
///
/// Returns [`UploadError::InvalidAccount`] for empty names, `.`/`..`, or
/// names containing separators or NUL.
pub fn validate_account_name(raw: &str) -> Result<String, UploadError> {
    let bad = raw.is_empty()
        || raw == "."
        || raw == ".."
        || raw.contains(['/', '\\', '\0']);
    if bad {
        return Err(UploadError::InvalidAccount(raw.to_owned()));
    }
    Ok(raw.to_owned())
}

/// Parse a frame index in `0..FRAME_COUNT`.
///
/// # Errors
///
/// Returns [`UploadError::InvalidIndex`] for non-numeric or out-of-range input.
pub fn parse_index(raw: &str) -> Result<FrameIndex, UploadError> {
    match raw.trim().parse::<FrameIndex>() {
        Ok(index) if index < FRAME_COUNT => Ok(index),
        _ => Err(UploadError::InvalidIndex(raw.to_owned())),
    }
}

fn is_png(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| {
        ct.split(';')
            .next()
            .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(PNG_CONTENT_TYPE))
    })
}

// =============================================================================
// STORE
// =============================================================================

/// Validate a received form and move its file into place.
///
/// # Errors
///
/// - [`UploadError::MissingField`] when a field is absent
/// - [`UploadError::NotPng`] when the file part is not `image/png`
/// - [`UploadError::InvalidAccount`] / [`UploadError::InvalidIndex`] for bad fields
/// - [`UploadError::Io`] / [`UploadError::Index`] when the filesystem fails
pub async fn store_frame(
    public_dir: &Path,
    accounts: &AccountIndex,
    form: UploadForm,
) -> Result<StoredFrame, UploadError> {
    let UploadForm { account_name, index, file } = form;
    let file = file.ok_or(UploadError::MissingField("file"))?;

    if !is_png(file.content_type.as_deref()) {
        discard(&file.path).await;
        let got = file.content_type.unwrap_or_else(|| "no content type".into());
        return Err(UploadError::NotPng(got));
    }

    let checked = account_name
        .ok_or(UploadError::MissingField("accountName"))
        .and_then(|name| validate_account_name(&name))
        .and_then(|name| {
            let index = index.ok_or(UploadError::MissingField("index"))?;
            Ok((name, parse_index(&index)?))
        });
    let (account_name, index) = match checked {
        Ok(fields) => fields,
        Err(e) => {
            discard(&file.path).await;
            return Err(e);
        }
    };

    let target = public_dir.join(frame_image_path(&account_name, index));
    if let Err(e) = place(&file.path, &target).await {
        discard(&file.path).await;
        return Err(e.into());
    }

    let new_account = accounts.register(&account_name).await?;

    Ok(StoredFrame { account_name, index, path: target, bytes: file.size, new_account })
}

/// Move `from` to `to`, creating the parent directory. Falls back to copy
/// when a plain rename is not possible (temp dir on another filesystem).
async fn place(from: &Path, to: &Path) -> std::io::Result<()> {
    if let Some(parent) = to.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    if tokio::fs::rename(from, to).await.is_ok() {
        return Ok(());
    }
    tokio::fs::copy(from, to).await?;
    tokio::fs::remove_file(from).await
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %e, "failed to remove temp upload");
    }
}

#[cfg(test)]
#[path = "upload_test.rs"]
mod tests;
