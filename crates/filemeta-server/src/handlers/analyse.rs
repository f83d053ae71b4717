//! File analysis handler
//!
//! Receives one multipart file part named `upfile`, holds its bytes in
//! memory for the duration of the request, and answers with the file's
//! metadata. Every outcome, success or failure, is a well-formed
//! `FileMetadataResponse`.

use axum::{
    extract::multipart::{Multipart, MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use filemeta_types::{FileMetadata, FileMetadataResponse};
use thiserror::Error;
use tracing::{error, warn};

/// Maximum decoded size of the uploaded file
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Expected multipart field name for the file part
pub const FILE_FIELD: &str = "upfile";

/// Request body ceiling: the file limit plus an allowance for multipart
/// framing, so a file just under the limit is not rejected for its envelope
pub const BODY_LIMIT_BYTES: usize = MAX_UPLOAD_BYTES + 16 * 1024;

/// Failures the analysis endpoint can answer with
#[derive(Debug, Error)]
pub enum AnalyseError {
    #[error("No file uploaded. Please provide a file with the field name 'upfile'.")]
    NoFile,
    #[error("File size exceeds maximum limit of 50MB.")]
    TooLarge,
    #[error("Could not read the multipart request body.")]
    BadBody,
    #[error("Internal server error during file analysis.")]
    Internal,
}

impl AnalyseError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NoFile | Self::BadBody => StatusCode::BAD_REQUEST,
            Self::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AnalyseError {
    fn into_response(self) -> Response {
        let body = Json(FileMetadataResponse::failure(self.to_string()));
        (self.status(), body).into_response()
    }
}

/// POST /api/fileanalyse
pub async fn analyse(
    mut multipart: Multipart,
) -> Result<Json<FileMetadataResponse>, AnalyseError> {
    // Find the upfile part; other fields in the body are ignored
    let mut upload: Option<(String, String, u64)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(map_multipart_error)?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        // Only parts carrying a filename are file uploads; a plain text
        // field named upfile does not count
        let name = match field.file_name() {
            Some(name) => name.to_string(),
            None => continue,
        };
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        // The bytes are owned by this invocation and dropped with it
        let bytes = field.bytes().await.map_err(map_multipart_error)?;
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(AnalyseError::TooLarge);
        }

        upload = Some((name, mime_type, bytes.len() as u64));
        break;
    }

    let (name, mime_type, size) = upload.ok_or(AnalyseError::NoFile)?;

    let metadata = FileMetadata::from_upload(name, mime_type, size);
    let response = FileMetadataResponse::ok(metadata);

    // Shape check before anything goes on the wire
    response.validate().map_err(|e| {
        error!("Outbound response failed validation: {}", e);
        AnalyseError::Internal
    })?;

    Ok(Json(response))
}

fn map_multipart_error(err: MultipartError) -> AnalyseError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AnalyseError::TooLarge;
    }
    warn!("Malformed multipart body: {}", err);
    AnalyseError::BadBody
}
