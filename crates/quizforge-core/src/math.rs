//! Office Math (OMML) expression model and linear math-markup conversion.
//!
//! The DOCX backend converts each `m:oMath` subtree into an explicit
//! [`MathNode`] tree once, then this module renders it to a LaTeX-like
//! linear notation. Conversion is purely structural, order-preserving and
//! total: unrecognized constructs degrade to a concatenation of their
//! children, so no document parse ever aborts inside an equation.

/// A node in an OOXML math expression tree.
///
/// Every variant except [`MathNode::Text`] recurses into children.
#[derive(Debug, Clone, PartialEq)]
pub enum MathNode {
    /// Inline or block math wrapper (`m:oMath` / `m:oMathPara`).
    Container(Vec<MathNode>),
    /// Fraction (`m:f`).
    Fraction {
        num: Box<MathNode>,
        den: Box<MathNode>,
    },
    /// Radical (`m:rad`), with optional degree.
    Radical {
        base: Box<MathNode>,
        degree: Option<Box<MathNode>>,
    },
    /// Superscript (`m:sSup`).
    Superscript {
        base: Box<MathNode>,
        exp: Box<MathNode>,
    },
    /// Subscript (`m:sSub`).
    Subscript {
        base: Box<MathNode>,
        sub: Box<MathNode>,
    },
    /// Combined subscript and superscript (`m:sSubSup`).
    SubSup {
        base: Box<MathNode>,
        sub: Box<MathNode>,
        exp: Box<MathNode>,
    },
    /// Delimited group (`m:d`). Always rendered with parentheses regardless
    /// of the original delimiter glyph; known limitation.
    Delimiter(Vec<MathNode>),
    /// N-ary operator (`m:nary`): sum, product, integral.
    NAry {
        /// Operator character from `m:naryPr/m:chr`; defaults to `∑`.
        op: char,
        base: Box<MathNode>,
        sub: Option<Box<MathNode>>,
        sup: Option<Box<MathNode>>,
    },
    /// Math run (`m:r`): delegates to a single text child, or concatenates.
    Run(Vec<MathNode>),
    /// Literal text leaf (`m:t`).
    Text(String),
    /// Any construct this model does not represent; children still render.
    Unknown(Vec<MathNode>),
}

impl MathNode {
    /// Render this tree as linear math markup.
    ///
    /// A top-level [`MathNode::Container`] is wrapped in `$...$` inline-math
    /// delimiters; all other variants render bare so they compose when
    /// nested. Total function: never fails.
    #[must_use = "returns the rendered math markup"]
    pub fn to_latex(&self) -> String {
        match self {
            Self::Container(children) => format!("${}$", render_all(children)),
            other => other.render(),
        }
    }

    fn render(&self) -> String {
        match self {
            Self::Container(children) | Self::Unknown(children) => render_all(children),
            Self::Fraction { num, den } => {
                format!("\\frac{{{}}}{{{}}}", num.render(), den.render())
            }
            Self::Radical { base, degree } => match degree {
                Some(deg) => format!("\\sqrt[{}]{{{}}}", deg.render(), base.render()),
                None => format!("\\sqrt{{{}}}", base.render()),
            },
            Self::Superscript { base, exp } => {
                format!("{}^{{{}}}", base.render(), exp.render())
            }
            Self::Subscript { base, sub } => {
                format!("{}_{{{}}}", base.render(), sub.render())
            }
            // Subscript group attaches before the superscript group.
            Self::SubSup { base, sub, exp } => {
                format!("{}_{{{}}}^{{{}}}", base.render(), sub.render(), exp.render())
            }
            Self::Delimiter(inner) => format!("\\left({}\\right)", render_all(inner)),
            // OOXML semantic order: limits before the operand, not visual
            // reading order.
            Self::NAry { op, base, sub, sup } => {
                let mut out = String::from(nary_operator(*op));
                if let Some(s) = sub {
                    out.push_str(&format!("_{{{}}}", s.render()));
                }
                if let Some(s) = sup {
                    out.push_str(&format!("^{{{}}}", s.render()));
                }
                out.push_str(&base.render());
                out
            }
            Self::Run(children) => {
                let texts: Vec<&Self> = children
                    .iter()
                    .filter(|c| matches!(c, Self::Text(_)))
                    .collect();
                if texts.len() == 1 && children.len() == 1 {
                    texts[0].render()
                } else {
                    render_all(children)
                }
            }
            Self::Text(value) => render_text_leaf(value),
        }
    }

    /// Flatten every text leaf in document order, without markup.
    #[must_use = "returns the concatenated literal text"]
    pub fn flatten_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(value) => out.push_str(value),
            Self::Container(children)
            | Self::Delimiter(children)
            | Self::Run(children)
            | Self::Unknown(children) => {
                for child in children {
                    child.collect_text(out);
                }
            }
            Self::Fraction { num, den } => {
                num.collect_text(out);
                den.collect_text(out);
            }
            Self::Radical { base, degree } => {
                base.collect_text(out);
                if let Some(deg) = degree {
                    deg.collect_text(out);
                }
            }
            Self::Superscript { base, exp } => {
                base.collect_text(out);
                exp.collect_text(out);
            }
            Self::Subscript { base, sub } => {
                base.collect_text(out);
                sub.collect_text(out);
            }
            Self::SubSup { base, sub, exp } => {
                base.collect_text(out);
                sub.collect_text(out);
                exp.collect_text(out);
            }
            Self::NAry { base, sub, sup, .. } => {
                if let Some(s) = sub {
                    s.collect_text(out);
                }
                if let Some(s) = sup {
                    s.collect_text(out);
                }
                base.collect_text(out);
            }
        }
    }
}

fn render_all(children: &[MathNode]) -> String {
    children.iter().map(MathNode::render).collect()
}

/// Map an n-ary operator character to its markup command.
fn nary_operator(op: char) -> &'static str {
    match op {
        '∏' => "\\prod",
        '∫' => "\\int",
        // ∑ and anything unrecognized
        _ => "\\sum",
    }
}

const ARITHMETIC_OPERATORS: &[char] = &['+', '-', '*', '/', '=', '<', '>', '^'];

/// Render a literal text leaf, deciding between a bare math token and a
/// `\text{...}` escape.
///
/// Prose typed inside an equation editor (anything with whitespace, or a
/// multi-letter word with no digit or operator anywhere after it) gets the
/// text escape so it survives as readable words; genuine math symbols are
/// emitted untouched.
fn render_text_leaf(value: &str) -> String {
    if value.contains(char::is_whitespace) || is_wordlike(value) {
        format!("\\text{{{}}}", escape_braces(value))
    } else {
        value.to_string()
    }
}

fn is_wordlike(value: &str) -> bool {
    let letters = value.chars().filter(|c| c.is_alphabetic()).count();
    letters > 1
        && !value
            .chars()
            .any(|c| c.is_ascii_digit() || ARITHMETIC_OPERATORS.contains(&c))
}

fn escape_braces(value: &str) -> String {
    value.replace('{', "\\{").replace('}', "\\}")
}

/// Safety valve for the DOCX extractor: treat a math subtree as plain prose
/// when its flattened text contains whitespace, or has more than ten letters
/// and no arithmetic operator. Sentences mistakenly typed into an equation
/// editor would otherwise be mangled into unreadable markup.
#[must_use = "returns whether the flattened equation text reads as prose"]
pub fn looks_like_prose(flattened: &str) -> bool {
    if flattened.chars().any(char::is_whitespace) {
        return true;
    }
    let letters = flattened.chars().filter(|c| c.is_alphabetic()).count();
    letters > 10 && !flattened.chars().any(|c| ARITHMETIC_OPERATORS.contains(&c))
}
