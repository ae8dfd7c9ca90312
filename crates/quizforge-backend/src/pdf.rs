//! PDF text extraction.
//!
//! Delegates to the `pdf-extract` crate. PDFs are text-only here: embedded
//! raster images are out of reach of the text extractor, so no image
//! placeholders are produced for this format.

use log::debug;

use quizforge_core::error::{ExtractionError, Result};
use quizforge_core::model::Extraction;

/// Extract text from PDF bytes.
///
/// Any extractor failure (encrypted file, broken xref, unsupported
/// encoding) surfaces as [`ExtractionError::PdfExtractionFailed`] with the
/// underlying message passed through.
pub fn extract(bytes: &[u8]) -> Result<Extraction> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::PdfExtractionFailed(e.to_string()))?;
    debug!("pdf extraction: {} chars", text.chars().count());
    Ok(Extraction::text_only(text))
}
