//! Format dispatch façade.
//!
//! One entry point for callers holding a filename and raw bytes: detect the
//! format from the extension, run the matching backend, and reject
//! documents whose extracted text is empty or whitespace-only.

use log::info;

use quizforge_core::error::{ExtractionError, Result};
use quizforge_core::format::InputFormat;
use quizforge_core::model::Extraction;

use crate::{docx, pdf, txt};

/// Extract text (and, for DOCX, images) from a document.
///
/// The format is decided by the filename extension alone; the bytes are
/// never sniffed. Unknown extensions fail with
/// [`ExtractionError::UnsupportedType`], successful extractions with no
/// usable text fail with [`ExtractionError::EmptyContent`].
pub fn extract_document(filename: &str, bytes: &[u8]) -> Result<Extraction> {
    let format = InputFormat::from_filename(filename).ok_or_else(|| {
        let ext = std::path::Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or(filename);
        ExtractionError::UnsupportedType(ext.to_string())
    })?;

    info!("extracting {filename} as {format}");

    let extraction = match format {
        InputFormat::Docx => docx::extract(bytes)?,
        InputFormat::Pdf => pdf::extract(bytes)?,
        InputFormat::Txt => txt::extract(bytes),
    };

    if extraction.text.trim().is_empty() {
        return Err(ExtractionError::EmptyContent);
    }
    Ok(extraction)
}
