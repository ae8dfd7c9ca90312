//! First-occurrence deduplication of finalized questions.
//!
//! Numbering artifacts in the source (a question restated under two
//! numbers, a table row echoing a paragraph) produce duplicate blocks; the
//! key collapses whitespace and case so those collide while genuinely
//! different questions never do.

use std::collections::HashSet;

use log::debug;

use quizforge_core::model::Question;

/// Keep the first occurrence per normalization key, preserving order.
#[must_use = "returns the deduplicated questions"]
pub fn dedupe(questions: Vec<Question>) -> Vec<Question> {
    let mut seen = HashSet::new();
    let before = questions.len();
    let kept: Vec<Question> = questions
        .into_iter()
        .filter(|q| seen.insert(dedupe_key(q)))
        .collect();
    if kept.len() < before {
        debug!("dedupe dropped {} duplicate questions", before - kept.len());
    }
    kept
}

fn dedupe_key(question: &Question) -> String {
    let normalized_options: Vec<String> = question
        .options
        .iter()
        .map(|o| collapse_whitespace(&o.to_lowercase()))
        .collect();
    format!(
        "{}|{}|{}",
        collapse_whitespace(&question.question.to_lowercase()),
        normalized_options.join(";"),
        question.correct_answer.trim().to_lowercase()
    )
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizforge_core::model::{Level, QuestionKind, Subject};

    fn question(text: &str, options: &[&str], answer: &str) -> Question {
        Question {
            question: text.to_string(),
            topic: None,
            kind: if options.len() >= 2 {
                QuestionKind::Mcq
            } else {
                QuestionKind::ShortAnswer
            },
            options: options.iter().map(ToString::to_string).collect(),
            correct_answer: answer.to_string(),
            explanation: String::new(),
            level: Level::Medium,
            subject: Subject::Math,
        }
    }

    #[test]
    fn test_whitespace_and_case_variants_collapse() {
        let kept = dedupe(vec![
            question("What  is 2+2?", &["3", "4"], "B"),
            question("what is 2+2?", &["3", "4"], "b"),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].question, "What  is 2+2?");
    }

    #[test]
    fn test_different_answers_are_distinct() {
        let kept = dedupe(vec![
            question("What is x?", &[], "2"),
            question("What is x?", &[], "3"),
        ]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_order_preserved() {
        let kept = dedupe(vec![
            question("first", &[], "1"),
            question("second", &[], "2"),
            question("first", &[], "1"),
            question("third", &[], "3"),
        ]);
        let texts: Vec<&str> = kept.iter().map(|q| q.question.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let once = dedupe(vec![
            question("a", &["1", "2"], "A"),
            question("a", &["1", "2"], "A"),
            question("b", &[], "5"),
        ]);
        let twice = dedupe(once.clone());
        assert_eq!(once, twice);
    }
}
