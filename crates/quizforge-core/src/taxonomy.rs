//! Curriculum topic taxonomy and prefix-based topic matching.
//!
//! Topic labels are matched against the start of a question's text with a
//! longest-label-first scan, so "Linear equations in two variables" always
//! wins over "Linear equations". Matching is tolerant of punctuation and
//! case: both the label and the candidate text are normalized to lowercase
//! alphanumeric words before comparison.

use once_cell::sync::Lazy;

/// Top-level subject areas.
static MAIN_TOPICS: &[&str] = &[
    "Algebra",
    "Advanced Math",
    "Problem-Solving and Data Analysis",
    "Geometry and Trigonometry",
    "Information and Ideas",
    "Craft and Structure",
    "Expression of Ideas",
    "Standard English Conventions",
];

/// Subtopics under the main areas. Flat on purpose: a subtopic label is
/// unambiguous without its parent.
static SUB_TOPICS: &[&str] = &[
    "Linear equations in one variable",
    "Linear equations in two variables",
    "Linear functions",
    "Systems of two linear equations in two variables",
    "Linear inequalities in one or two variables",
    "Nonlinear functions",
    "Nonlinear equations in one variable",
    "Equivalent expressions",
    "Ratios, rates, proportional relationships, and units",
    "Percentages",
    "One-variable data",
    "Two-variable data",
    "Probability and conditional probability",
    "Inference from sample statistics",
    "Evaluating statistical claims",
    "Area and volume",
    "Lines, angles, and triangles",
    "Right triangles and trigonometry",
    "Circles",
    "Central Ideas and Details",
    "Command of Evidence",
    "Inferences",
    "Words in Context",
    "Text Structure and Purpose",
    "Cross-Text Connections",
    "Rhetorical Synthesis",
    "Transitions",
    "Boundaries",
    "Form, Structure, and Sense",
];

/// Main topics sorted by descending character length, computed once.
static MAIN_BY_LENGTH: Lazy<Vec<&'static str>> = Lazy::new(|| sorted_by_length(MAIN_TOPICS));

/// Subtopics sorted by descending character length, computed once.
static SUB_BY_LENGTH: Lazy<Vec<&'static str>> = Lazy::new(|| sorted_by_length(SUB_TOPICS));

fn sorted_by_length(labels: &[&'static str]) -> Vec<&'static str> {
    let mut sorted = labels.to_vec();
    sorted.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    sorted
}

/// Lowercase, replace every non-alphanumeric character with a space, and
/// collapse runs of whitespace into single spaces.
#[must_use = "returns the normalized form of the text"]
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = true;
    for c in text.chars() {
        if c.is_alphanumeric() {
            for lower in c.to_lowercase() {
                out.push(lower);
            }
            last_was_space = false;
        } else if !last_was_space {
            out.push(' ');
            last_was_space = true;
        }
    }
    if out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Result of matching taxonomy labels against the front of a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMatch {
    /// "Main" or "Main - Sub" in canonical label casing.
    pub topic: String,
    /// The input text with the matched label prefix (and any separator
    /// punctuation) removed.
    pub remainder: String,
}

/// Match the longest main-topic label (optionally followed by the longest
/// subtopic label) at the start of `text`.
///
/// Returns `None` when no main topic matches. A subtopic alone never
/// produces a match; the taxonomy requires the main area first.
#[must_use = "returns the matched topic and remaining text, if any"]
pub fn match_topic_prefix(text: &str) -> Option<TopicMatch> {
    let (main, after_main) = strip_longest_label(text, &MAIN_BY_LENGTH)?;
    match strip_longest_label(&after_main, &SUB_BY_LENGTH) {
        Some((sub, after_sub)) => Some(TopicMatch {
            topic: format!("{main} - {sub}"),
            remainder: after_sub,
        }),
        None => Some(TopicMatch {
            topic: main.to_string(),
            remainder: after_main,
        }),
    }
}

fn strip_longest_label(
    text: &str,
    labels: &[&'static str],
) -> Option<(&'static str, String)> {
    for label in labels {
        if let Some(rest) = strip_prefix_label(text, label) {
            return Some((label, rest));
        }
    }
    None
}

/// If `text` begins with `label` (under normalization), return the
/// remainder with leading separators trimmed.
///
/// Consumes whitespace-delimited tokens from `text` one at a time,
/// normalizing the consumed portion after each token, until it equals the
/// normalized label. Overshooting means no match: the label must end on a
/// token boundary.
fn strip_prefix_label(text: &str, label: &str) -> Option<String> {
    let want = normalize(label);
    if want.is_empty() {
        return None;
    }
    let mut consumed_end = None;
    for (idx, c) in text.char_indices() {
        if !c.is_alphanumeric() {
            continue;
        }
        let token_end = idx + c.len_utf8();
        let have = normalize(&text[..token_end]);
        if have == want {
            consumed_end = Some(token_end);
            break;
        }
        if !want.starts_with(have.as_str()) {
            return None;
        }
    }
    let end = consumed_end?;
    // The label must end on a word boundary in the source text, so that
    // "Algebraic" never matches "Algebra".
    if text[end..]
        .chars()
        .next()
        .is_some_and(char::is_alphanumeric)
    {
        return None;
    }
    let rest = text[end..]
        .trim_start_matches(|c: char| {
            c.is_whitespace() || matches!(c, ':' | '-' | ',' | '.' | ';')
        })
        .to_string();
    Some(rest)
}
