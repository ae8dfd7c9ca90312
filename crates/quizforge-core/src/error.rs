//! Error types for document-to-question extraction.
//!
//! Extraction-layer failures (container, format dispatch, PDF collaborator)
//! are fatal for the whole document and surface as a typed [`ExtractionError`].
//! The parsing layers downstream are total functions and never produce errors;
//! their imperfections show up as lower answer/topic accuracy instead.

use thiserror::Error;

/// Error conditions that can abort extraction of a single document.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The filename extension is not one of the supported formats.
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    /// Extraction succeeded but yielded no usable text.
    #[error("document contained no extractable text")]
    EmptyContent,

    /// The DOCX bytes are not a valid ZIP archive, or the main document
    /// part is missing from the container.
    #[error("invalid DOCX container: {0}")]
    InvalidContainer(String),

    /// Unexpected XML or container structure inside an otherwise valid
    /// archive.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// The PDF text-extraction collaborator failed; its message is passed
    /// through unchanged.
    #[error("PDF extraction failed: {0}")]
    PdfExtractionFailed(String),

    /// File I/O error while reading input bytes.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Type alias for [`Result<T, ExtractionError>`].
pub type Result<T> = std::result::Result<T, ExtractionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_type_display() {
        let error = ExtractionError::UnsupportedType("xlsx".to_string());
        assert_eq!(format!("{error}"), "unsupported file type: xlsx");
    }

    #[test]
    fn test_invalid_container_display() {
        let error = ExtractionError::InvalidContainer("not a ZIP archive".to_string());
        let display = format!("{error}");
        assert!(display.contains("invalid DOCX container"));
        assert!(display.contains("not a ZIP"));
    }

    #[test]
    fn test_pdf_error_passes_message_through() {
        let error = ExtractionError::PdfExtractionFailed("encrypted document".to_string());
        assert_eq!(format!("{error}"), "PDF extraction failed: encrypted document");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ExtractionError = io_err.into();
        match err {
            ExtractionError::IoError(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            _ => panic!("expected IoError variant"),
        }
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn inner() -> Result<()> {
            Err(ExtractionError::EmptyContent)
        }
        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }
        assert!(matches!(outer(), Err(ExtractionError::EmptyContent)));
    }
}
