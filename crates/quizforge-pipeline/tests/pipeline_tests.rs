//! End-to-end pipeline tests over extracted text and DOCX-free inputs.

use proptest::prelude::*;

use quizforge_core::model::{Level, QuestionKind, Subject};
use quizforge_pipeline::{dedupe, parse_document, parse_text};

#[test]
fn inline_mcq_with_topic_and_answer_key() {
    let questions = parse_text(
        "Q.1) Algebra Linear functions, Solve for x: 2x=4. A) 1 B) 2 C) 3 D) 4\nAnswer: B",
    );
    assert_eq!(questions.len(), 1);
    let q = &questions[0];
    assert_eq!(q.topic.as_deref(), Some("Algebra - Linear functions"));
    assert_eq!(q.question, "Solve for x: 2x=4.");
    assert_eq!(q.kind, QuestionKind::Mcq);
    assert_eq!(q.options, vec!["1", "2", "3", "4"]);
    assert_eq!(q.correct_answer, "B");
}

#[test]
fn option_gap_breaks_the_run() {
    let questions = parse_text("1. Pick one  A) foo C) bar\nAnswer: A");
    assert_eq!(questions.len(), 1);
    // A single surviving option cannot form a multiple choice question.
    assert_eq!(questions[0].kind, QuestionKind::ShortAnswer);
    assert!(questions[0].options.is_empty());
    assert_eq!(questions[0].correct_answer, "foo C) bar");
}

#[test]
fn short_answer_letter_resolves_against_options() {
    let questions = parse_text("1. Which is smaller?\nA) 5\nAnswer: A");
    assert_eq!(questions[0].kind, QuestionKind::ShortAnswer);
    assert_eq!(questions[0].correct_answer, "5");
    assert!(questions[0].options.is_empty());
}

#[test]
fn multi_question_document_parses_in_order() {
    let text = "Unit 3 quiz\n\
                1. What is 2+2?\nA) 3\nB) 4\nAnswer: B\n\
                2. What is the capital of France? [easy]\nAnswer: Paris\n\
                Question 3: Which choice best states the main purpose of the text?\nAnswer: B";
    let questions = parse_text(text);
    assert_eq!(questions.len(), 3);

    assert_eq!(questions[0].kind, QuestionKind::Mcq);
    assert_eq!(questions[0].correct_answer, "B");

    assert_eq!(questions[1].correct_answer, "Paris");
    assert_eq!(questions[1].level, Level::Easy);

    assert_eq!(questions[2].subject, Subject::Reading);
    assert_eq!(questions[2].kind, QuestionKind::ShortAnswer);
}

#[test]
fn duplicate_blocks_collapse() {
    let text = "1. What is 2+2?\nA) 3\nB) 4\nAnswer: B\n\
                2. What is  2+2?\nA) 3\nB) 4\nAnswer: b";
    let questions = parse_text(text);
    assert_eq!(questions.len(), 1);
}

#[test]
fn explanation_flows_into_record() {
    let text = "1. Solve 2x=4\nAnswer: B\nExplanation: Divide both sides by 2.\nSo x = 2.";
    let questions = parse_text(text);
    assert_eq!(
        questions[0].explanation,
        "Divide both sides by 2. So x = 2."
    );
}

#[test]
fn parse_document_dispatches_txt() {
    let outcome = parse_document("quiz.txt", b"1. What is 2+2?\nAnswer: 4").unwrap();
    assert_eq!(outcome.questions.len(), 1);
    assert_eq!(outcome.questions[0].correct_answer, "4");
    assert!(outcome.images.is_empty());
}

#[test]
fn parse_document_rejects_unknown_extension() {
    assert!(parse_document("quiz.xlsx", b"1. q\nAnswer: A").is_err());
}

#[test]
fn questions_serialize_to_json() {
    let questions = parse_text("1. Solve 2x=4\nA) 1\nB) 2\nAnswer: B");
    let json = serde_json::to_string(&questions).unwrap();
    assert!(json.contains(r#""kind":"mcq""#));
    assert!(json.contains(r#""correct_answer":"B""#));
}

proptest! {
    /// Structural invariants hold for arbitrary input text: parsing never
    /// panics, multiple choice questions carry at least two options, short
    /// answer questions carry none.
    #[test]
    fn parse_text_invariants(text in "[ -~\n]{0,400}") {
        let questions = parse_text(&text);
        for q in &questions {
            match q.kind {
                QuestionKind::Mcq => prop_assert!(q.options.len() >= 2),
                QuestionKind::ShortAnswer => prop_assert!(q.options.is_empty()),
            }
        }
    }

    /// Deduplication is idempotent: a second pass changes nothing.
    #[test]
    fn dedupe_idempotent(text in "[ -~\n]{0,400}") {
        let once = parse_text(&text);
        let twice = dedupe(once.clone());
        prop_assert_eq!(once, twice);
    }
}
