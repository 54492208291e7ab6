//! Transient on-disk copy of an upload

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// Uniquely named `.pdf` file that is deleted when dropped
#[derive(Debug)]
pub struct TransientPdf {
    file: NamedTempFile,
}

impl TransientPdf {
    /// Write `data` to a fresh file in `dir` (OS temp dir when `None`).
    pub fn write(data: &[u8], dir: Option<&Path>) -> std::io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("upload-").suffix(".pdf");

        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        file.write_all(data)?;
        file.flush()?;

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
