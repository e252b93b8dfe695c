//! Diagnostic reporting for resultgen
//!
//! Diagnostics carry a stable code, a severity, a primary span and optional
//! fix suggestions. They are produced by the parser, the return-type checker
//! and the generator, and rendered either human-readably or as JSON.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod error_codes;
pub use error_codes::*;

/// A source location span
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Source file path
    pub file: PathBuf,

    /// Start byte offset (0-indexed)
    pub start: usize,

    /// End byte offset (0-indexed, exclusive)
    pub end: usize,

    /// Start line (1-indexed)
    pub start_line: usize,

    /// Start column (1-indexed)
    pub start_col: usize,

    /// End line (1-indexed)
    pub end_line: usize,

    /// End column (1-indexed)
    pub end_col: usize,
}

impl Span {
    pub fn new(
        file: PathBuf,
        start: usize,
        end: usize,
        start_line: usize,
        start_col: usize,
        end_line: usize,
        end_col: usize,
    ) -> Self {
        Self {
            file,
            start,
            end,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// A zero-width span at the start of a file
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(path.into(), 0, 0, 1, 1, 1, 1)
    }

    /// Smallest span covering both `self` and `other`
    pub fn merge(&self, other: &Span) -> Span {
        let first = if self.start <= other.start { self } else { other };
        let tail = if self.end >= other.end { self } else { other };
        Span {
            file: self.file.clone(),
            start: first.start,
            end: tail.end,
            start_line: first.start_line,
            start_col: first.start_col,
            end_line: tail.end_line,
            end_col: tail.end_col,
        }
    }

    /// Whether a byte offset falls inside this span (end inclusive, so a
    /// cursor placed right after an identifier still hits it)
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// A suggested code fix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// Title shown to the developer (e.g. "Fix return type")
    pub title: String,

    /// Edits to apply, all within the diagnostic's file
    pub edits: Vec<Edit>,
}

impl Suggestion {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            edits: Vec::new(),
        }
    }

    pub fn with_edit(mut self, edit: Edit) -> Self {
        self.edits.push(edit);
        self
    }
}

/// A text replacement over a byte range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    pub span: Span,
    pub replacement: String,
}

impl Edit {
    pub fn new(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }

    /// Apply a set of edits to `source`.
    ///
    /// Edits are applied back to front so earlier offsets stay valid. Two
    /// edits over the same range collapse into the first one seen; edits
    /// reaching past the end of `source` are ignored.
    pub fn apply_all(source: &str, edits: &[Edit]) -> String {
        let mut ordered: Vec<&Edit> = edits.iter().collect();
        ordered.sort_by(|a, b| b.span.start.cmp(&a.span.start));
        ordered.dedup_by(|a, b| a.span.start == b.span.start && a.span.end == b.span.end);

        let mut out = source.to_string();
        for edit in ordered {
            if edit.span.start <= edit.span.end && edit.span.end <= out.len() {
                out.replace_range(edit.span.start..edit.span.end, &edit.replacement);
            }
        }
        out
    }
}

/// A diagnostic reported against source code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable code (e.g., "E1001")
    pub code: String,

    pub severity: Severity,

    pub message: String,

    pub span: Span,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
}

impl Diagnostic {
    pub fn error(code: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code.into(), Severity::Error)
    }

    pub fn warning(code: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code.into(), Severity::Warning)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Render as `severity[code]: message` followed by the offending source
    /// line with the span underlined.
    pub fn to_human_readable(&self, source: &str) -> String {
        let mut output = format!(
            "{}[{}]: {}\n  --> {}:{}:{}\n",
            self.severity.label(),
            self.code,
            self.message,
            self.span.file.display(),
            self.span.start_line,
            self.span.start_col
        );

        if let Some(line) = source.lines().nth(self.span.start_line.saturating_sub(1)) {
            let gutter = self.span.start_line.to_string();
            let pad = " ".repeat(gutter.len());
            let underline_start = self.span.start_col.saturating_sub(1);
            let underline_len = if self.span.end_line == self.span.start_line {
                self.span.end_col.saturating_sub(self.span.start_col).max(1)
            } else {
                line.len().saturating_sub(underline_start).max(1)
            };
            output.push_str(&format!(
                "{pad} |\n{gutter} | {line}\n{pad} | {}{}\n",
                " ".repeat(underline_start),
                "^".repeat(underline_len)
            ));
        }

        for suggestion in &self.suggestions {
            let replacement = suggestion
                .edits
                .first()
                .map(|e| format!(": `{}`", e.replacement))
                .unwrap_or_default();
            output.push_str(&format!("   = help: {}{}\n", suggestion.title, replacement));
        }

        output
    }
}

/// Builder for constructing diagnostics
pub struct DiagnosticBuilder {
    code: String,
    severity: Severity,
    message: String,
    span: Option<Span>,
    suggestions: Vec<Suggestion>,
}

impl DiagnosticBuilder {
    fn new(code: String, severity: Severity) -> Self {
        Self {
            code,
            severity,
            message: String::new(),
            span: None,
            suggestions: Vec::new(),
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    pub fn build(self) -> Diagnostic {
        Diagnostic {
            code: self.code,
            severity: self.severity,
            message: self.message,
            span: self.span.unwrap_or_else(|| Span::file("")),
            suggestions: self.suggestions,
        }
    }
}

/// A collection of diagnostics
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn merge(&mut self, other: DiagnosticBag) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Order by file, then position, so output does not depend on the
    /// order parallel checks finished in
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            (&a.span.file, a.span.start, &a.code).cmp(&(&b.span.file, b.span.start, &b.code))
        });
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.diagnostics).unwrap_or_else(|_| "[]".to_string())
    }
}

impl From<Diagnostic> for DiagnosticBag {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl FromIterator<Diagnostic> for DiagnosticBag {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self {
            diagnostics: iter.into_iter().collect(),
        }
    }
}
