//! Plain-text extraction.

use quizforge_core::model::Extraction;

/// Decode bytes as UTF-8, replacing invalid sequences rather than failing.
/// Plain text never carries images.
#[must_use = "returns the decoded extraction"]
pub fn extract(bytes: &[u8]) -> Extraction {
    Extraction::text_only(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_passthrough() {
        let out = extract("Q.1) What is 2 + 2?\nAnswer: 4\n".as_bytes());
        assert_eq!(out.text, "Q.1) What is 2 + 2?\nAnswer: 4\n");
        assert!(out.images.is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_replaced_not_rejected() {
        let out = extract(&[0x51, 0x2e, 0xff, 0x31]);
        assert!(out.text.starts_with("Q."));
        assert!(out.text.contains('\u{FFFD}'));
    }
}
