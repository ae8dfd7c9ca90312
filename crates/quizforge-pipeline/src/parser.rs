//! Line-oriented question block parser.
//!
//! A single pass over the extracted text, split on newlines with blank
//! lines dropped. Each line is classified in priority order: question
//! start, answer key, explanation, option run, continuation. Classification
//! is total; a line that matches nothing is folded into whichever field the
//! current phase leaves open, so parsing never fails, it only degrades.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use quizforge_core::model::{Level, RawQuestion};
use quizforge_core::taxonomy;

/// Numbering tokens that open a question: `1.`, `1)`, `Q.1)`, `Q3`,
/// `Question 4:`.
static QUESTION_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:q(?:uestion)?\s*\.?\s*\d+\s*[.):\-]*|\d+\s*[.)])\s*")
        .expect("question start regex")
});

static TOPIC_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^topic\s*[:\-]\s*(.*)$").expect("topic line regex"));

/// Answer-key prefixes, longest alternatives first so `Correct Answer`
/// never half-matches as `Correct`.
static ANSWER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:correct\s+answer|correct\s+option|answer|ans|correct)\b\s*[:\-.]?\s*(.*)$")
        .expect("answer line regex")
});

/// A bare answer letter A-E followed by a separator or end of text.
static ANSWER_LETTER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Ea-e])(?:\s*[).:,\-]\s*|\s+|$)(.*)$").expect("answer letter regex")
});

static EXPLANATION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:explanation|solution|sol|reason|note|hint)\b\s*[:\-.]?\s*(.*)$")
        .expect("explanation line regex")
});

/// Standalone "Choice X is correct/incorrect ..." sentences double as
/// explanation lines.
static CHOICE_SENTENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^choice\s+[a-e]\s+is\s+(?:correct|incorrect)\b").expect("choice regex")
});

/// The bare verdict with no causal clause carries no information; it is
/// dropped when it would be the sole explanation.
static CHOICE_BOILERPLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^choice\s+[a-e]\s+is\s+(?:correct|incorrect)[.!]?$")
        .expect("choice boilerplate regex")
});

static LEVEL_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[(easy|hard)\]").expect("level hint regex"));

/// Parse extracted document text into raw question accumulators.
///
/// Lines before the first question start are dropped. The output order
/// follows the source order.
#[must_use = "returns the parsed question accumulators"]
pub fn parse(text: &str) -> Vec<RawQuestion> {
    let mut parser = BlockParser::default();
    for raw_line in text.lines() {
        let line = raw_line.trim();
        if !line.is_empty() {
            parser.feed(line);
        }
    }
    parser.finish()
}

/// Which field of the current question an unclassified line lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    AwaitingBody,
    CollectingOptions,
    AwaitingAnswer,
    CollectingExplanation,
}

#[derive(Default)]
struct BlockParser {
    current: Option<RawQuestion>,
    phase: Phase,
    questions: Vec<RawQuestion>,
}

impl BlockParser {
    fn feed(&mut self, line: &str) {
        if self.try_question_start(line) {
            return;
        }
        if self.current.is_none() {
            debug!("dropping preamble line: {line}");
            return;
        }
        if self.try_answer(line) {
            return;
        }
        if self.try_explanation(line) {
            return;
        }
        if self.try_options(line) {
            return;
        }
        self.continuation(line);
    }

    fn finish(mut self) -> Vec<RawQuestion> {
        self.emit_current();
        self.questions
    }

    fn emit_current(&mut self) {
        if let Some(question) = self.current.take() {
            self.questions.push(question);
        }
        self.phase = Phase::AwaitingBody;
    }

    /// Rule 1: numbering token, explicit `Topic:` prefix, or a taxonomy
    /// label leading the line.
    fn try_question_start(&mut self, line: &str) -> bool {
        if let Some(marker) = QUESTION_START.find(line) {
            let remainder = &line[marker.end()..];
            self.begin_question(line, |q| {
                let (topic, body) = extract_topic(remainder);
                q.topic = topic;
                body
            });
            return true;
        }
        if let Some(caps) = TOPIC_LINE.captures(line) {
            let label = caps[1].trim().to_string();
            self.begin_question(line, |q| {
                match taxonomy::match_topic_prefix(&label) {
                    Some(m) => {
                        q.topic = Some(m.topic);
                        m.remainder
                    }
                    None if label.is_empty() => String::new(),
                    None => {
                        q.topic = Some(label);
                        String::new()
                    }
                }
            });
            return true;
        }
        if let Some(m) = taxonomy::match_topic_prefix(line) {
            self.begin_question(line, |q| {
                q.topic = Some(m.topic);
                m.remainder
            });
            return true;
        }
        false
    }

    /// Open a new accumulator from a start line. `build_body` receives the
    /// fresh question and returns the body text still carrying any inline
    /// option run.
    fn begin_question<F>(&mut self, line: &str, build_body: F)
    where
        F: FnOnce(&mut RawQuestion) -> String,
    {
        self.emit_current();
        let mut question = RawQuestion::default();
        if let Some(caps) = LEVEL_HINT.captures(line) {
            question.level_hint = Some(match caps[1].to_lowercase().as_str() {
                "easy" => Level::Easy,
                _ => Level::Hard,
            });
        }
        let body = build_body(&mut question);
        let body = LEVEL_HINT.replace_all(&body, "").trim().to_string();

        let (residual, options) = extract_option_run(&body, 0);
        if !residual.is_empty() {
            question.push_question_text(&residual);
        }
        let has_options = !options.is_empty();
        question.options = options;

        self.current = Some(question);
        self.phase = if has_options {
            Phase::CollectingOptions
        } else {
            Phase::AwaitingBody
        };
    }

    /// Rule 2: answer-key line.
    fn try_answer(&mut self, line: &str) -> bool {
        let Some(caps) = ANSWER_LINE.captures(line) else {
            return false;
        };
        let Some(question) = self.current.as_mut() else {
            return false;
        };
        let rest = caps[1].trim();
        if let Some(letter_caps) = ANSWER_LETTER.captures(rest) {
            question.correct_answer_raw = letter_caps[1].to_uppercase();
            let trailing = letter_caps[2].trim();
            if !trailing.is_empty() && question.explanation.is_none() {
                question.explanation = Some(trailing.to_string());
            }
        } else {
            question.correct_answer_raw = rest.to_string();
        }
        self.phase = if question.explanation.is_some() {
            Phase::CollectingExplanation
        } else {
            Phase::AwaitingAnswer
        };
        true
    }

    /// Rule 3: explanation line.
    fn try_explanation(&mut self, line: &str) -> bool {
        let Some(question) = self.current.as_mut() else {
            return false;
        };
        if let Some(caps) = EXPLANATION_LINE.captures(line) {
            let text = caps[1].trim();
            if !text.is_empty() {
                question.push_explanation(text);
            }
            self.phase = Phase::CollectingExplanation;
            return true;
        }
        if CHOICE_SENTENCE.is_match(line) {
            if question.explanation.is_none() && CHOICE_BOILERPLATE.is_match(line) {
                debug!("dropping boilerplate verdict: {line}");
                return true;
            }
            question.push_explanation(line);
            self.phase = Phase::CollectingExplanation;
            return true;
        }
        false
    }

    /// Rule 4: option run.
    fn try_options(&mut self, line: &str) -> bool {
        let Some(question) = self.current.as_mut() else {
            return false;
        };
        let already = question.options.len();
        let (residual, options) = extract_option_run(line, already);
        if options.is_empty() {
            return false;
        }
        if !residual.is_empty() {
            if already == 0 {
                // Prose preceding inline choices on the same line.
                question.push_question_text(&residual);
            } else if let Some(last) = question.options.last_mut() {
                last.push(' ');
                last.push_str(&residual);
            }
        }
        question.options.extend(options);
        self.phase = Phase::CollectingOptions;
        true
    }

    /// Rule 5: fold the line into whichever field the phase leaves open.
    fn continuation(&mut self, line: &str) {
        let Some(question) = self.current.as_mut() else {
            return;
        };
        match self.phase {
            Phase::AwaitingBody => question.push_question_text(line),
            Phase::CollectingOptions | Phase::AwaitingAnswer => {
                if let Some(last) = question.options.last_mut() {
                    last.push(' ');
                    last.push_str(line);
                } else {
                    question.push_question_text(line);
                }
            }
            Phase::CollectingExplanation => question.push_explanation(line),
        }
    }
}

/// Topic extraction for a question-start remainder.
///
/// A colon splits the line into a topic candidate and the question body;
/// the candidate is itself scanned against the taxonomy so that a tail
/// like "Solve for x" is restored to the question instead of being
/// swallowed by the topic. Without a colon, a taxonomy prefix match is the
/// only topic source.
fn extract_topic(remainder: &str) -> (Option<String>, String) {
    let remainder = remainder.trim();
    if let Some(colon_idx) = remainder.find(':') {
        let candidate = remainder[..colon_idx].trim();
        let after = remainder[colon_idx + 1..].trim_start();
        if candidate.is_empty() {
            return (None, after.to_string());
        }
        return match taxonomy::match_topic_prefix(candidate) {
            Some(m) if m.remainder.is_empty() => (Some(m.topic), after.to_string()),
            Some(m) => (Some(m.topic), format!("{}: {after}", m.remainder)),
            None => (Some(candidate.to_string()), after.to_string()),
        };
    }
    match taxonomy::match_topic_prefix(remainder) {
        Some(m) => (Some(m.topic), m.remainder),
        None => (None, remainder.to_string()),
    }
}

static OPTION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-E][).]").expect("option marker regex"));

/// Extract a strictly increasing option-letter run from one line.
///
/// `already` is the count of options the current question holds, so a run
/// on a later line must continue from the next expected letter. Markers
/// before the run starts are skipped; the first marker breaking an open
/// run ends the scan, rejecting sequences with gaps. Returns the text
/// preceding the first accepted marker and the option values.
pub(crate) fn extract_option_run(line: &str, already: usize) -> (String, Vec<String>) {
    if already >= 5 {
        return (line.to_string(), Vec::new());
    }
    let mut accepted: Vec<(usize, usize)> = Vec::new();
    for m in OPTION_MARKER.find_iter(line) {
        if !marker_context_ok(line, m.start()) {
            continue;
        }
        let letter = line.as_bytes()[m.start()];
        let expected = b'A' + (already + accepted.len()) as u8;
        if letter == expected {
            accepted.push((m.start(), m.end()));
        } else if !accepted.is_empty() {
            break;
        }
    }
    if accepted.is_empty() {
        return (line.to_string(), Vec::new());
    }

    let residual = line[..accepted[0].0].trim().to_string();
    let mut options = Vec::with_capacity(accepted.len());
    for (i, &(_, end)) in accepted.iter().enumerate() {
        let value_end = accepted.get(i + 1).map_or(line.len(), |next| next.0);
        options.push(line[end..value_end].trim().to_string());
    }
    (residual, options)
}

/// A `X)` marker needs line start or one preceding whitespace; a `X.`
/// marker needs line start or two, since a mid-sentence capital followed
/// by a period is a common false positive.
fn marker_context_ok(line: &str, start: usize) -> bool {
    if start == 0 {
        return true;
    }
    let leading_ws = line[..start]
        .chars()
        .rev()
        .take_while(|c| c.is_whitespace())
        .count();
    let delim = line.as_bytes()[start + 1];
    if delim == b')' {
        leading_ws >= 1
    } else {
        leading_ws >= 2
    }
}
