//! Input format types for the extraction façade.

use serde::{Deserialize, Serialize};

/// Input document format, detected from the filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InputFormat {
    /// Microsoft Word document (.docx)
    Docx,
    /// PDF document
    Pdf,
    /// Plain text file
    Txt,
}

impl InputFormat {
    /// Detect format from a file extension (case-insensitive).
    #[inline]
    #[must_use = "detects format from file extension"]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "docx" => Some(Self::Docx),
            "pdf" => Some(Self::Pdf),
            "txt" | "text" => Some(Self::Txt),
            _ => None,
        }
    }

    /// Detect format from a full filename.
    #[must_use = "detects format from a filename"]
    pub fn from_filename(name: &str) -> Option<Self> {
        let ext = std::path::Path::new(name).extension()?.to_str()?;
        Self::from_extension(ext)
    }

    /// File extensions associated with this format.
    #[inline]
    #[must_use = "returns file extensions for this format"]
    pub const fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Docx => &["docx"],
            Self::Pdf => &["pdf"],
            Self::Txt => &["txt", "text"],
        }
    }
}

impl std::fmt::Display for InputFormat {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Docx => "DOCX",
            Self::Pdf => "PDF",
            Self::Txt => "TXT",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DOCX" => Ok(Self::Docx),
            "PDF" => Ok(Self::Pdf),
            "TXT" | "TEXT" => Ok(Self::Txt),
            _ => Err(format!("unknown input format: '{s}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(InputFormat::from_extension("docx"), Some(InputFormat::Docx));
        assert_eq!(InputFormat::from_extension("DOCX"), Some(InputFormat::Docx));
        assert_eq!(InputFormat::from_extension("pdf"), Some(InputFormat::Pdf));
        assert_eq!(InputFormat::from_extension("txt"), Some(InputFormat::Txt));
        assert_eq!(InputFormat::from_extension("xlsx"), None);
    }

    #[test]
    fn test_from_filename() {
        assert_eq!(
            InputFormat::from_filename("unit-3-quiz.docx"),
            Some(InputFormat::Docx)
        );
        assert_eq!(
            InputFormat::from_filename("notes.v2.TXT"),
            Some(InputFormat::Txt)
        );
        assert_eq!(InputFormat::from_filename("no_extension"), None);
    }

    #[test]
    fn test_extensions_roundtrip() {
        for format in [InputFormat::Docx, InputFormat::Pdf, InputFormat::Txt] {
            for ext in format.extensions() {
                assert_eq!(InputFormat::from_extension(ext), Some(format));
            }
        }
    }

    #[test]
    fn test_display_and_from_str() {
        use std::str::FromStr;
        for format in [InputFormat::Docx, InputFormat::Pdf, InputFormat::Txt] {
            let s = format.to_string();
            assert_eq!(InputFormat::from_str(&s).unwrap(), format);
        }
        assert!(InputFormat::from_str("html").is_err());
    }
}
