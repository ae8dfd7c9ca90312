//! Document-to-question extraction pipeline.
//!
//! [`parse_document`] is the end-to-end entry point: extract text and
//! images from raw bytes, parse question blocks, finalize them into
//! gradeable records, and drop duplicates. [`parse_text`] exposes the
//! text-only half for callers that already hold extracted text.
//!
//! One invocation owns all of its state; callers may run any number of
//! documents concurrently on independent threads.

pub mod dedupe;
pub mod finalize;
pub mod parser;

use quizforge_core::error::Result;
use quizforge_core::model::{ParseOutcome, Question};

pub use dedupe::dedupe;
pub use finalize::finalize;

/// Parse a document into questions and extracted images.
///
/// Extraction failures (unsupported type, invalid container, empty
/// content, PDF errors) are returned as typed errors; the parsing layers
/// past extraction are total and never fail.
pub fn parse_document(filename: &str, bytes: &[u8]) -> Result<ParseOutcome> {
    let extraction = quizforge_backend::extract_document(filename, bytes)?;
    Ok(ParseOutcome {
        questions: parse_text(&extraction.text),
        images: extraction.images,
    })
}

/// Parse already-extracted text into finalized, deduplicated questions.
#[must_use = "returns the parsed questions"]
pub fn parse_text(text: &str) -> Vec<Question> {
    dedupe(parser::parse(text).into_iter().map(finalize).collect())
}
