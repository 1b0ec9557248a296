//! `POST /upload`: multipart frame upload.
//!
//! The form carries `accountName`, `index` and `file`. The file part is
//! streamed chunk by chunk into the temp directory; text parts are read
//! whole. Responses are plain text, matching what the capture client shows
//! to the user.

use axum::extract::{Multipart, State};
use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, info, warn};

use crate::services::upload::{StagedFile, TempUpload, UploadError, UploadForm, store_frame};
use crate::state::AppState;

pub const UPLOAD_OK: &str = "File uploaded!";
pub const UPLOAD_NOT_PNG: &str = "Only .png files are allowed!";
pub const UPLOAD_FAILED: &str = "Oops! Something went wrong!";

pub async fn handle_upload(State(state): State<AppState>, multipart: Multipart) -> Response {
    let result = match read_form(&state, multipart).await {
        Ok(form) => store_frame(&state.config.public_dir, &state.accounts, form).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(stored) => {
            info!(
                account = %stored.account_name,
                index = stored.index,
                bytes = stored.bytes,
                new_account = stored.new_account,
                path = %stored.path.display(),
                "frame stored"
            );
            (StatusCode::OK, UPLOAD_OK).into_response()
        }
        Err(e) => {
            let status = upload_error_to_status(&e);
            if status.is_server_error() {
                error!(error = %e, "upload failed");
            } else {
                warn!(error = %e, %status, "upload rejected");
            }
            (status, upload_error_body(&e)).into_response()
        }
    }
}

pub(crate) fn upload_error_to_status(err: &UploadError) -> StatusCode {
    match err {
        UploadError::NotPng(_) => StatusCode::FORBIDDEN,
        UploadError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        UploadError::MissingField(_)
        | UploadError::InvalidAccount(_)
        | UploadError::InvalidIndex(_)
        | UploadError::Multipart(_) => StatusCode::BAD_REQUEST,
        UploadError::Io(_) | UploadError::Index(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn upload_error_body(err: &UploadError) -> String {
    match err {
        UploadError::NotPng(_) => UPLOAD_NOT_PNG.to_owned(),
        UploadError::Io(_) | UploadError::Index(_) => UPLOAD_FAILED.to_owned(),
        other => other.to_string(),
    }
}

// =============================================================================
// MULTIPART
// =============================================================================

/// Drain the multipart body into an [`UploadForm`]. Unknown fields are skipped.
/// A staged file is removed again if the body turns out to be malformed.
async fn read_form(state: &AppState, multipart: Multipart) -> Result<UploadForm, UploadError> {
    let mut form = UploadForm::default();
    if let Err(e) = read_fields(state, multipart, &mut form).await {
        if let Some(staged) = form.file.take() {
            staged.discard().await;
        }
        return Err(e);
    }
    Ok(form)
}

async fn read_fields(
    state: &AppState,
    mut multipart: Multipart,
    form: &mut UploadForm,
) -> Result<(), UploadError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "accountName" => form.account_name = Some(field.text().await.map_err(multipart_error)?),
            "index" => form.index = Some(field.text().await.map_err(multipart_error)?),
            "file" => {
                let staged = stage_file(state, field).await?;
                if let Some(previous) = form.file.replace(staged) {
                    previous.discard().await;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Keep the body-limit rejection distinct; everything else is a malformed request.
fn multipart_error(e: MultipartError) -> UploadError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge(e.body_text())
    } else {
        UploadError::Multipart(e.body_text())
    }
}

async fn stage_file(state: &AppState, mut field: Field<'_>) -> Result<StagedFile, UploadError> {
    let content_type = field.content_type().map(str::to_owned);
    let mut upload = TempUpload::create(&state.config.upload_temp_dir).await?;

    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => {
                if let Err(e) = upload.write(&chunk).await {
                    upload.abandon().await;
                    return Err(e.into());
                }
            }
            Ok(None) => break,
            Err(e) => {
                upload.abandon().await;
                return Err(multipart_error(e));
            }
        }
    }

    Ok(upload.finish(content_type).await?)
}

#[cfg(test)]
#[path = "upload_test.rs"]
mod tests;
