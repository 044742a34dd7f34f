//! Marker lines and substitution
//!
//! A marker is a quoted string literal followed by `; ` and a tag comment:
//!
//! ```text
//! const wasmb64 = 'AGFzbQEAAAAB...'; // XXX
//! ```
//!
//! The quoted span is greedy within its line and never crosses a line
//! break. Everything outside the matched fragment is left untouched.

use crate::error::EmbedError;
use crate::payload::Payload;
use regex::{Captures, Regex};

/// Compiled marker pattern for one tag
#[derive(Debug, Clone)]
pub struct Marker {
    tag: String,
    pattern: Regex,
}

impl Marker {
    /// Build a marker for `tag` (matched literally)
    ///
    /// # Errors
    /// Returns [`EmbedError::InvalidTag`] if the tag is blank or spans lines
    pub fn new(tag: impl Into<String>) -> Result<Self, EmbedError> {
        let tag = tag.into();
        if tag.trim().is_empty() {
            return Err(EmbedError::InvalidTag("tag must not be empty".to_string()));
        }
        if tag.contains(['\n', '\r']) {
            return Err(EmbedError::InvalidTag(format!(
                "tag must fit on one line: {tag:?}"
            )));
        }
        let pattern = Regex::new(&format!("'(.*)'; {}", regex::escape(&tag)))
            .map_err(|e| EmbedError::InvalidTag(e.to_string()))?;
        Ok(Self { tag, pattern })
    }

    #[inline]
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Replacement text for a payload: `'<payload>'; <tag>`
    #[must_use]
    pub fn render(&self, payload: &Payload) -> String {
        format!("'{payload}'; {}", self.tag)
    }

    /// Number of marker occurrences in `document`
    #[must_use]
    pub fn count(&self, document: &str) -> usize {
        self.pattern.find_iter(document).count()
    }

    /// Replace every marker occurrence with `payload`
    #[must_use]
    pub fn substitute(&self, document: &str, payload: &Payload) -> Substitution {
        let replacement = self.render(payload);
        let mut replacements = 0;
        let text = self
            .pattern
            .replace_all(document, |_: &Captures<'_>| {
                replacements += 1;
                replacement.as_str()
            })
            .into_owned();
        let changed = text != document;
        Substitution {
            text,
            replacements,
            changed,
        }
    }

    /// Quoted spans of every marker occurrence, in document order
    #[must_use]
    pub fn extract<'d>(&self, document: &'d str) -> Vec<ExtractedPayload<'d>> {
        self.pattern
            .captures_iter(document)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let span = caps.get(1)?;
                Some(ExtractedPayload {
                    line: line_number(document, whole.start()),
                    text: span.as_str(),
                })
            })
            .collect()
    }
}

/// Result of substituting a payload into a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Full rewritten document
    pub text: String,
    /// Number of marker lines replaced
    pub replacements: usize,
    /// Whether `text` differs from the input
    pub changed: bool,
}

/// The quoted span of one marker line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedPayload<'d> {
    /// 1-based line number
    pub line: usize,
    /// Text between the quotes
    pub text: &'d str,
}

fn line_number(document: &str, offset: usize) -> usize {
    document.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}
