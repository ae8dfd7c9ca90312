//! Conversion of raw question accumulators into gradeable records.
//!
//! Total function: every accumulator the parser emits becomes a valid
//! [`Question`]. The guarantees enforced here are structural: a multiple
//! choice question always carries at least two options, a short answer
//! question carries none.

use once_cell::sync::Lazy;
use regex::Regex;

use quizforge_core::model::{Question, QuestionKind, RawQuestion, Subject};

/// Option entries that are really misattributed explanation text.
static MISATTRIBUTED_OPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(?:is|was)\s+(?:correct|incorrect|the\s+answer|right|wrong)|choice\s+[a-e]\s+is)\b")
        .expect("misattributed option regex")
});

const WRITING_CUES: &[&str] = &["standard english", "grammar", "punctuation"];
const READING_CUES: &[&str] = &["main purpose", "summarizes", "completes the text"];

/// "Therefore ... is 12" style consequence clauses.
static CONSEQUENCE_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:therefore|thus|hence|so|consequently)[^.]*?(?:is|=)\s*(-?\d+(?:\.\d+)?)")
        .expect("consequence number regex")
});

/// "The value ... is 12" style named results.
static NAMED_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:answer|value|result|length|radius|coordinate)[^.]*?(?:is|=)\s*(-?\d+(?:\.\d+)?)")
        .expect("named number regex")
});

/// A bare number closing the explanation.
static TRAILING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(-?\d+(?:\.\d+)?)\s*\.?\s*$").expect("trailing number regex"));

/// Finalize one raw accumulator into an immutable question record.
#[must_use = "returns the finalized question"]
pub fn finalize(raw: RawQuestion) -> Question {
    let RawQuestion {
        question_text,
        topic,
        mut options,
        correct_answer_raw,
        explanation,
        level_hint,
    } = raw;

    // More than four options means the run extractor swallowed explanation
    // fragments; prune the entries that read like verdict text.
    if options.len() > 4 {
        options.retain(|o| o.len() <= 300 && !MISATTRIBUTED_OPTION.is_match(o));
    }

    let question = question_text.trim().to_string();
    let explanation = explanation.unwrap_or_default();
    let lowered = format!("{} {}", question.to_lowercase(), explanation.to_lowercase());

    // "Which choice ..." stems whose options never made it into the text
    // cannot be graded as multiple choice; they degrade to short answer.
    let kind = if options.len() >= 2 {
        QuestionKind::Mcq
    } else {
        QuestionKind::ShortAnswer
    };

    let correct_answer = match kind {
        QuestionKind::Mcq => match bare_letter(&correct_answer_raw) {
            Some(letter) => letter.to_string(),
            None => correct_answer_raw.trim().to_string(),
        },
        QuestionKind::ShortAnswer => {
            resolve_short_answer(&correct_answer_raw, &options, &explanation)
        }
    };

    if kind == QuestionKind::ShortAnswer {
        options.clear();
    }

    let subject = infer_subject(&lowered);

    Question {
        question,
        topic,
        kind,
        options,
        correct_answer,
        explanation,
        level: level_hint.unwrap_or_default(),
        subject,
    }
}

/// A single letter A-E, normalized to uppercase.
fn bare_letter(raw: &str) -> Option<char> {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    let first = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let upper = first.to_ascii_uppercase();
    ('A'..='E').contains(&upper).then_some(upper)
}

/// Resolve a short-answer value from the raw token, the recovered options,
/// and the explanation, in that order of preference.
fn resolve_short_answer(raw: &str, options: &[String], explanation: &str) -> String {
    if let Some(letter) = bare_letter(raw) {
        let index = (letter as u8 - b'A') as usize;
        if let Some(option) = options.get(index) {
            return option.clone();
        }
        if !explanation.is_empty() {
            if let Some(number) = number_from_explanation(explanation) {
                return number;
            }
        }
        return letter.to_string();
    }
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        if options.len() == 1 {
            return options[0].clone();
        }
        return String::new();
    }
    trimmed.to_string()
}

fn number_from_explanation(explanation: &str) -> Option<String> {
    for pattern in [&*CONSEQUENCE_NUMBER, &*NAMED_NUMBER, &*TRAILING_NUMBER] {
        if let Some(caps) = pattern.captures(explanation) {
            return Some(caps[1].to_string());
        }
    }
    None
}

fn infer_subject(lowered: &str) -> Subject {
    if WRITING_CUES.iter().any(|cue| lowered.contains(cue)) {
        Subject::Writing
    } else if READING_CUES.iter().any(|cue| lowered.contains(cue)) {
        Subject::Reading
    } else {
        Subject::Math
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizforge_core::model::Level;

    fn raw(question: &str, options: &[&str], answer: &str) -> RawQuestion {
        RawQuestion {
            question_text: question.to_string(),
            options: options.iter().map(ToString::to_string).collect(),
            correct_answer_raw: answer.to_string(),
            ..RawQuestion::default()
        }
    }

    #[test]
    fn test_mcq_keeps_options_and_letter() {
        let q = finalize(raw("Solve for x: 2x=4.", &["1", "2", "3", "4"], "b"));
        assert_eq!(q.kind, QuestionKind::Mcq);
        assert_eq!(q.options, vec!["1", "2", "3", "4"]);
        assert_eq!(q.correct_answer, "B");
    }

    #[test]
    fn test_short_answer_letter_resolves_to_option_text() {
        let q = finalize(raw("What is the smaller value?", &["5"], "A"));
        assert_eq!(q.kind, QuestionKind::ShortAnswer);
        assert_eq!(q.correct_answer, "5");
        assert!(q.options.is_empty());
    }

    #[test]
    fn test_short_answer_clears_options() {
        let q = finalize(raw("Name one prime number", &["7"], ""));
        assert_eq!(q.kind, QuestionKind::ShortAnswer);
        assert_eq!(q.correct_answer, "7");
        assert!(q.options.is_empty());
    }

    #[test]
    fn test_cue_phrase_without_options_degrades_to_short_answer() {
        let q = finalize(raw(
            "Which choice completes the text with the most logical transition?",
            &[],
            "",
        ));
        assert_eq!(q.kind, QuestionKind::ShortAnswer);
        assert!(q.options.is_empty());
    }

    #[test]
    fn test_prunes_misattributed_options() {
        let q = finalize(raw(
            "Pick one",
            &[
                "2",
                "4",
                "6",
                "8",
                "is correct because both sides double",
                "Choice C is wrong here",
            ],
            "A",
        ));
        assert_eq!(q.options, vec!["2", "4", "6", "8"]);
        assert_eq!(q.kind, QuestionKind::Mcq);
    }

    #[test]
    fn test_number_recovered_from_consequence_clause() {
        let mut r = raw("Find x", &[], "B");
        r.explanation = Some("Substituting gives 2x = 24, therefore x is 12.".to_string());
        let q = finalize(r);
        assert_eq!(q.correct_answer, "12");
    }

    #[test]
    fn test_trailing_number_fallback() {
        let mut r = raw("Find the radius", &[], "C");
        r.explanation = Some("Halving the diameter leaves 7.".to_string());
        let q = finalize(r);
        assert_eq!(q.correct_answer, "7");
    }

    #[test]
    fn test_unresolvable_letter_stays_letter() {
        let q = finalize(raw("Find y", &[], "D"));
        assert_eq!(q.correct_answer, "D");
    }

    #[test]
    fn test_subject_inference() {
        let writing = finalize(raw(
            "Which choice conforms to Standard English conventions?",
            &["a", "b"],
            "A",
        ));
        assert_eq!(writing.subject, Subject::Writing);

        let reading = finalize(raw(
            "Which choice best states the main purpose of the text?",
            &["a", "b"],
            "A",
        ));
        assert_eq!(reading.subject, Subject::Reading);

        let math = finalize(raw("Solve 2x = 4", &["1", "2"], "B"));
        assert_eq!(math.subject, Subject::Math);
    }

    #[test]
    fn test_level_hint_carries_through() {
        let mut r = raw("Prove it", &[], "42");
        r.level_hint = Some(Level::Hard);
        let q = finalize(r);
        assert_eq!(q.level, Level::Hard);
        assert_eq!(finalize(raw("Easy one", &[], "1")).level, Level::Medium);
    }
}
