//! Upload validation

use crate::error::{AppError, Result};

pub const ONLY_PDF_MESSAGE: &str = "Only PDF files are allowed";

/// Accept only file names with a `.pdf` extension (any case).
pub fn ensure_pdf_filename(file_name: &str) -> Result<()> {
    if file_name.to_ascii_lowercase().ends_with(".pdf") {
        Ok(())
    } else {
        Err(AppError::Validation(ONLY_PDF_MESSAGE.to_string()))
    }
}
