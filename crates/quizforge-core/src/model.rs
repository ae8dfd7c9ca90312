//! Question records and extraction outputs.
//!
//! [`RawQuestion`] is the mutable accumulator the line parser fills in while
//! it walks a document; [`Question`] is the immutable, gradeable record the
//! finalizer produces from it. Everything here is owned by a single parse
//! invocation; nothing is cached or shared across documents.

use serde::{Deserialize, Serialize};

/// Difficulty level of a question.
///
/// `Easy`/`Hard` come from a literal `[easy]`/`[hard]` token in the source
/// line; everything else defaults to `Medium`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Broad subject inferred from lexical cues in the question and explanation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    #[default]
    Math,
    Reading,
    Writing,
}

/// Structural form of a finalized question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Mcq,
    ShortAnswer,
}

/// An image recovered from a DOCX container.
///
/// Identity is the OOXML relationship id (the `r:embed` value); the same id
/// appears in the text as a `[IMAGE:<id>.<ext>]` placeholder. The downstream
/// storage collaborator uploads `bytes` and replaces each placeholder with a
/// real URL; that substitution never happens here.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedImage {
    /// OOXML relationship id, e.g. "rId7".
    pub id: String,
    /// File extension taken from the media path, e.g. "png".
    pub extension: String,
    /// Raw image bytes read out of the archive.
    #[serde(skip_serializing)]
    pub bytes: Vec<u8>,
    /// Filename suggestion for the uploader, e.g. "rId7.png".
    pub suggested_name: String,
}

/// Output of format-specific text extraction: the flattened document text
/// plus any images recovered along the way.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Extraction {
    pub text: String,
    pub images: Vec<ExtractedImage>,
}

impl Extraction {
    /// Text-only extraction (TXT and PDF backends never carry images).
    #[must_use]
    pub fn text_only(text: String) -> Self {
        Self {
            text,
            images: Vec::new(),
        }
    }
}

/// Mutable accumulator filled in line-by-line by the block parser.
///
/// Created when a question-start line is detected, mutated as subsequent
/// lines are classified, and handed to the finalizer when the next
/// question-start line (or end of input) is seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuestion {
    pub question_text: String,
    pub topic: Option<String>,
    pub options: Vec<String>,
    /// Raw answer token: a bare letter A-E or a literal value.
    pub correct_answer_raw: String,
    pub explanation: Option<String>,
    pub level_hint: Option<Level>,
}

impl RawQuestion {
    /// Append a fragment to the question text, space-separated.
    pub fn push_question_text(&mut self, fragment: &str) {
        if !self.question_text.is_empty() {
            self.question_text.push(' ');
        }
        self.question_text.push_str(fragment);
    }

    /// Append a fragment to the explanation, space-separated.
    pub fn push_explanation(&mut self, fragment: &str) {
        match &mut self.explanation {
            Some(existing) => {
                existing.push(' ');
                existing.push_str(fragment);
            }
            None => self.explanation = Some(fragment.to_string()),
        }
    }
}

/// Immutable, gradeable question record.
///
/// Invariants: `Mcq` questions have at least two options and an answer that
/// is either a letter A-E or resolved option text; `ShortAnswer` questions
/// carry no options at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub kind: QuestionKind,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
    pub level: Level,
    pub subject: Subject,
}

/// End-to-end pipeline output for one document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseOutcome {
    pub questions: Vec<Question>,
    pub images: Vec<ExtractedImage>,
}
