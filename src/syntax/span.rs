//! Source text with line tables for span construction

use crate::diagnostics::Span;
use std::path::{Path, PathBuf};

/// A source file with its content and line start offsets
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    content: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(path: PathBuf, content: String) -> Self {
        let line_starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(i, _)| i + 1))
            .collect();

        Self {
            path,
            content,
            line_starts,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Create a span for a byte range
    pub fn span(&self, start: usize, end: usize) -> Span {
        let (start_line, start_col) = self.line_col(start);
        let (end_line, end_col) = self.line_col(end);
        Span::new(
            self.path.clone(),
            start,
            end,
            start_line,
            start_col,
            end_line,
            end_col,
        )
    }

    /// Text covered by a span, if the span lies within this file
    pub fn slice(&self, span: &Span) -> Option<&str> {
        self.content.get(span.start..span.end)
    }

    /// Convert a byte offset to line and column (1-indexed)
    fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        (line + 1, offset - line_start + 1)
    }
}

#[cfg(test)]
#[path = "span_tests.rs"]
mod tests;
