//! Upload Routes
//!
//! Endpoints:
//! - POST /upload/ - Convert a PDF to markdown and store both

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::documents::DocumentId;
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::validate::ensure_pdf_filename;

/// Multipart field carrying the upload
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub document_id: String,
    pub pdf_url: String,
    pub markdown_url: String,
}

/// Create the upload router
pub fn router() -> Router<AppState> {
    Router::new().route("/upload/", post(upload_document))
}

/// POST /upload/
///
/// Rejects non-PDF file names before anything is converted or stored.
async fn upload_document(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        ensure_pdf_filename(&file_name)?;

        let data = field.bytes().await.map_err(multipart_error)?;

        let response = process_upload(&state, &file_name, data.to_vec()).await?;
        return Ok(Json(response));
    }

    Err(AppError::MissingFile)
}

/// Convert, then store the PDF and the markdown.
///
/// The two writes are not atomic: if the markdown write fails the PDF blob
/// stays behind and is hidden from listings.
async fn process_upload(state: &AppState, file_name: &str, data: Vec<u8>) -> Result<UploadResponse> {
    let document_id = DocumentId::generate();

    tracing::info!(
        document_id = %document_id,
        file_name = %file_name,
        size = data.len(),
        "Processing upload"
    );

    let markdown = state.converter().convert(&data).await?;

    let pdf = state.documents().put_pdf(&document_id, data).await?;
    let md = state.documents().put_markdown(&document_id, markdown).await?;

    tracing::info!(
        document_id = %document_id,
        pdf_key = %pdf.key,
        markdown_key = %md.key,
        size = pdf.size_bytes,
        "Document stored"
    );

    Ok(UploadResponse {
        message: "Document processed successfully".to_string(),
        document_id: document_id.to_string(),
        pdf_url: pdf.url,
        markdown_url: md.url,
    })
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(format!("Failed to read upload: {}", e.body_text()))
    }
}
