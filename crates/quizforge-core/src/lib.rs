//! Core types for quizforge: question records, input formats, the topic
//! taxonomy, math markup conversion, and the extraction error taxonomy.
//!
//! This crate has no I/O and no knowledge of any container format. The
//! `quizforge-backend` crate builds [`Extraction`]s from real documents and
//! `quizforge-pipeline` turns them into [`Question`]s.

pub mod error;
pub mod format;
pub mod math;
pub mod model;
pub mod taxonomy;

pub use error::{ExtractionError, Result};
pub use format::InputFormat;
pub use math::{looks_like_prose, MathNode};
pub use model::{
    ExtractedImage, Extraction, Level, ParseOutcome, Question, QuestionKind, RawQuestion, Subject,
};
pub use taxonomy::{match_topic_prefix, normalize, TopicMatch};
