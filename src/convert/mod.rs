//! PDF to Markdown Conversion
//!
//! The conversion engine (MuPDF) only accepts a filesystem path, so uploaded
//! bytes are first materialized into a [`TransientPdf`] that is removed on
//! every exit path. Text is pulled from MuPDF's structured text pages and
//! rendered to markdown by [`render_markdown`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_server::convert::{MarkdownConverter, MuPdfConverter};
//!
//! let converter = MuPdfConverter::new(None);
//! let markdown = converter.convert(&pdf_bytes).await?;
//! ```

mod markdown;
mod mupdf_engine;
mod transient;

use async_trait::async_trait;
use thiserror::Error;

pub use markdown::{render_markdown, PageText, TextBlock};
pub use mupdf_engine::MuPdfConverter;
pub use transient::TransientPdf;

/// Conversion failures
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Failed to write transient file: {0}")]
    TransientFile(#[from] std::io::Error),

    #[error("{0}")]
    Engine(String),

    #[error("Conversion task failed: {0}")]
    Join(String),
}

impl From<mupdf::Error> for ConvertError {
    fn from(e: mupdf::Error) -> Self {
        ConvertError::Engine(e.to_string())
    }
}

/// Bytes-in, markdown-out conversion engine
#[async_trait]
pub trait MarkdownConverter: Send + Sync {
    /// Convert a PDF document to markdown text
    async fn convert(&self, pdf: &[u8]) -> Result<String, ConvertError>;
}
