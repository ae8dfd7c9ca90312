//! Format-specific extraction backends for quizforge.
//!
//! Each backend turns raw document bytes into a flattened
//! [`Extraction`](quizforge_core::model::Extraction); the
//! [`extract_document`] façade dispatches on the filename extension.

pub mod docx;
pub mod extractor;
pub mod pdf;
pub mod txt;

pub use extractor::extract_document;
