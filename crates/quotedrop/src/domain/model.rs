//! Domain models for selections and rendered output.

use crate::domain::errors::SelectionError;

/// A captured text selection together with its provenance.
///
/// Selections are immutable once constructed and validated exactly once, at
/// the edge. The deliverer that captures a selection owns it exclusively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    text: String,
    source_label: Option<String>,
}

impl Selection {
    /// Capture a selection without provenance.
    pub fn new(text: impl Into<String>) -> Result<Self, SelectionError> {
        Self::build(text.into(), None)
    }

    /// Capture a selection attributed to a source, e.g. the application or
    /// document the text came from.
    pub fn with_source(
        text: impl Into<String>,
        source_label: impl Into<String>,
    ) -> Result<Self, SelectionError> {
        Self::build(text.into(), Some(source_label.into()))
    }

    fn build(text: String, source_label: Option<String>) -> Result<Self, SelectionError> {
        if text.contains('\0') {
            return Err(SelectionError::EmbeddedNul);
        }

        let source_label = match source_label {
            Some(label) if label.contains('\0') => return Err(SelectionError::InvalidSourceLabel),
            Some(label) => clean_label(label),
            None => None,
        };

        Ok(Self { text, source_label })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source_label(&self) -> Option<&str> {
        self.source_label.as_deref()
    }

    /// Number of lines in the captured text. Empty text has zero lines; a
    /// trailing newline does not count as an extra line.
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

fn clean_label(label: String) -> Option<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// The output of a deliverer's transformation step, ready for handoff to a
/// delivery target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedText(String);

impl RenderedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Character count of the rendered payload.
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl AsRef<str> for RenderedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RenderedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_text_and_label() {
        let selection = Selection::with_source("hello", "Safari").unwrap();
        assert_eq!(selection.text(), "hello");
        assert_eq!(selection.source_label(), Some("Safari"));
    }

    #[test]
    fn empty_text_is_valid() {
        let selection = Selection::new("").unwrap();
        assert_eq!(selection.text(), "");
        assert_eq!(selection.line_count(), 0);
    }

    #[test]
    fn embedded_nul_is_rejected() {
        let err = Selection::new("bad\0text").unwrap_err();
        assert_eq!(err, SelectionError::EmbeddedNul);
    }

    #[test]
    fn nul_in_label_is_rejected() {
        let err = Selection::with_source("ok", "bad\0label").unwrap_err();
        assert_eq!(err, SelectionError::InvalidSourceLabel);
    }

    #[test]
    fn whitespace_label_normalizes_to_none() {
        let selection = Selection::with_source("ok", "   ").unwrap();
        assert_eq!(selection.source_label(), None);
    }

    #[test]
    fn line_count_ignores_trailing_newline() {
        assert_eq!(Selection::new("a\nb").unwrap().line_count(), 2);
        assert_eq!(Selection::new("a\nb\n").unwrap().line_count(), 2);
    }
}
