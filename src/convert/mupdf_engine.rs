//! MuPDF conversion engine
//!
//! MuPDF's `fz_context` is not thread-safe and its handles are not `Send`,
//! so each conversion opens its own document inside a blocking task and
//! only plain Rust values cross back to the async side.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mupdf::{Document, TextPageOptions};

use super::markdown::{render_markdown, PageText, TextBlock};
use super::transient::TransientPdf;
use super::{ConvertError, MarkdownConverter};

/// Converts PDFs to markdown via MuPDF structured text
#[derive(Debug, Clone, Default)]
pub struct MuPdfConverter {
    temp_dir: Option<PathBuf>,
}

impl MuPdfConverter {
    pub fn new(temp_dir: Option<PathBuf>) -> Self {
        Self { temp_dir }
    }
}

#[async_trait]
impl MarkdownConverter for MuPdfConverter {
    async fn convert(&self, pdf: &[u8]) -> Result<String, ConvertError> {
        let transient = TransientPdf::write(pdf, self.temp_dir.as_deref())?;

        tracing::debug!(
            path = %transient.path().display(),
            size = pdf.len(),
            "Wrote transient PDF"
        );

        // The guard moves into the task so the file outlives the engine call
        // and is removed when the task finishes, whatever the outcome.
        let pages = tokio::task::spawn_blocking(move || {
            let pages = extract_pages(transient.path());
            drop(transient);
            pages
        })
        .await
        .map_err(|e| ConvertError::Join(e.to_string()))??;

        let markdown = render_markdown(&pages);

        tracing::debug!(
            pages = pages.len(),
            chars = markdown.len(),
            "Converted PDF to markdown"
        );

        Ok(markdown)
    }
}

/// Walk every page's structured text into the rendering intermediate.
fn extract_pages(path: &Path) -> Result<Vec<PageText>, ConvertError> {
    let path_str = path.to_string_lossy();
    let doc = Document::open(&*path_str)?;
    let page_count = doc.page_count()?;

    let mut pages = Vec::with_capacity(page_count.max(0) as usize);

    for page_index in 0..page_count {
        let page = doc.load_page(page_index)?;
        let text_page = page.to_text_page(TextPageOptions::empty())?;

        let mut blocks = Vec::new();

        for block in text_page.blocks() {
            let mut lines = Vec::new();
            let mut size_weights: Vec<(f32, usize)> = Vec::new();

            for line in block.lines() {
                let mut line_text = String::new();

                for ch in line.chars() {
                    if let Some(c) = ch.char() {
                        line_text.push(c);
                        record_size(&mut size_weights, ch.size());
                    }
                }

                if !line_text.trim().is_empty() {
                    lines.push(line_text);
                }
            }

            if lines.is_empty() {
                // image blocks carry no lines
                continue;
            }

            blocks.push(TextBlock::new(lines, dominant_size(&size_weights)));
        }

        pages.push(PageText { blocks });
    }

    Ok(pages)
}

fn record_size(weights: &mut Vec<(f32, usize)>, size: f32) {
    match weights.iter_mut().find(|(s, _)| (*s - size).abs() < 0.25) {
        Some((_, count)) => *count += 1,
        None => weights.push((size, 1)),
    }
}

/// Size covering the most characters in a block
fn dominant_size(weights: &[(f32, usize)]) -> f32 {
    weights
        .iter()
        .max_by_key(|(_, count)| *count)
        .map(|(size, _)| *size)
        .unwrap_or(0.0)
}
