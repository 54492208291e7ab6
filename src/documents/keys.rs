//! Blob key layout
//!
//! ```text
//! pdfs/{id}.pdf       original upload
//! markdown/{id}.md    converted text
//! ```

use super::types::DocumentId;

pub const PDF_NAMESPACE: &str = "pdfs/";
pub const MARKDOWN_NAMESPACE: &str = "markdown/";

const PDF_SUFFIX: &str = ".pdf";
const MARKDOWN_SUFFIX: &str = ".md";

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown";

pub fn pdf_key(id: &DocumentId) -> String {
    format!("{PDF_NAMESPACE}{id}{PDF_SUFFIX}")
}

pub fn markdown_key(id: &DocumentId) -> String {
    format!("{MARKDOWN_NAMESPACE}{id}{MARKDOWN_SUFFIX}")
}

/// Listing prefix for documents whose identifier starts with `id_prefix`
pub fn pdf_listing_prefix(id_prefix: &str) -> String {
    format!("{PDF_NAMESPACE}{id_prefix}")
}

/// Inverse of [`pdf_key`].
///
/// Keys that [`pdf_key`] could not have produced yield `None`.
pub fn document_id_from_pdf_key(key: &str) -> Option<DocumentId> {
    let raw = key
        .strip_prefix(PDF_NAMESPACE)?
        .strip_suffix(PDF_SUFFIX)?;

    let id: DocumentId = raw.parse().ok()?;
    (id.to_string() == raw).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let id: DocumentId = "0b0e6a4c-5f54-4a8e-9a39-1d2f7c1e2a10".parse().unwrap();

        assert_eq!(pdf_key(&id), "pdfs/0b0e6a4c-5f54-4a8e-9a39-1d2f7c1e2a10.pdf");
        assert_eq!(markdown_key(&id), "markdown/0b0e6a4c-5f54-4a8e-9a39-1d2f7c1e2a10.md");
        assert_eq!(pdf_listing_prefix("0b0e"), "pdfs/0b0e");
        assert_eq!(pdf_listing_prefix(""), "pdfs/");
    }

    #[test]
    fn test_generated_ids_round_trip() {
        for _ in 0..1000 {
            let id = DocumentId::generate();
            assert_eq!(document_id_from_pdf_key(&pdf_key(&id)), Some(id));
        }
    }

    #[test]
    fn test_foreign_keys_do_not_decode() {
        let cases = [
            "pdfs/",
            "pdfs/report.pdf",
            "markdown/0b0e6a4c-5f54-4a8e-9a39-1d2f7c1e2a10.md",
            "pdfs/0b0e6a4c-5f54-4a8e-9a39-1d2f7c1e2a10.md",
            "pdfs/nested/0b0e6a4c-5f54-4a8e-9a39-1d2f7c1e2a10.pdf",
            // valid uuid, but not in the form pdf_key writes
            "pdfs/0b0e6a4c5f544a8e9a391d2f7c1e2a10.pdf",
            "pdfs/0B0E6A4C-5F54-4A8E-9A39-1D2F7C1E2A10.pdf",
        ];

        for key in cases {
            assert_eq!(document_id_from_pdf_key(key), None, "{key}");
        }
    }
}
