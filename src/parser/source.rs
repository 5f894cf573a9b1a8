//! Line-buffered character source
//!
//! The scanner reads one character at a time from a [`Source`] and may undo
//! exactly one read. The unit is kept as pre-split lines (each retaining its
//! newline) so that a lexeme ending exactly at the end of a line can be
//! pushed back across the line boundary, and so that diagnostics can quote
//! the source text by line number.

use std::fmt::Write as _;
use std::io;
use std::path::Path;

/// Number of lines shown above and below the offending line in diagnostics.
pub const DEFAULT_CONTEXT_RADIUS: usize = 1;

/// A translation unit split into lines, with a read cursor.
#[derive(Debug, Clone)]
pub struct Source {
    lines: Vec<Vec<char>>,
    line: usize,
    column: usize,
}

impl Source {
    /// Build a source from in-memory text.
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .split_inclusive('\n')
            .map(|line| line.chars().collect())
            .collect();

        Self {
            lines,
            line: 0,
            column: 0,
        }
    }

    /// Read a whole file into a source.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_text(&text))
    }

    /// Whether any character remains to be read.
    pub fn has_more(&self) -> bool {
        match self.lines.get(self.line) {
            Some(line) => self.column < line.len(),
            None => false,
        }
    }

    /// Consume and return the next character.
    pub fn next_char(&mut self) -> Option<char> {
        let line = self.lines.get(self.line)?;
        let ch = *line.get(self.column)?;
        self.column += 1;

        // Move onto the next line eagerly; the last line keeps its cursor
        // past the end so that `has_more` reports exhaustion.
        if self.column == line.len() && self.line + 1 < self.lines.len() {
            self.line += 1;
            self.column = 0;
        }

        Some(ch)
    }

    /// Undo the last `next_char`.
    pub fn back(&mut self) {
        if self.column > 0 {
            self.column -= 1;
        } else if self.line > 0 {
            self.line -= 1;
            self.column = self.lines[self.line].len().saturating_sub(1);
        }
    }

    /// 1-based line number of the next character to be read.
    pub fn line_number(&self) -> usize {
        self.line + 1
    }

    /// Total number of lines in the unit.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Text of a 1-based line without its line terminator.
    pub fn line_text(&self, number: usize) -> Option<String> {
        let line = self.lines.get(number.checked_sub(1)?)?;
        let text: String = line.iter().collect();
        Some(text.trim_end_matches(['\n', '\r']).to_string())
    }

    /// Render line `number` with `radius` lines of context on either side.
    ///
    /// The requested line is marked with `>`:
    ///
    /// ```text
    ///   1 | int x;
    /// > 2 | int main(void) { return z }
    ///   3 |
    /// ```
    pub fn render_line(&self, number: usize, radius: usize) -> String {
        if self.lines.is_empty() || number == 0 {
            return String::new();
        }

        let number = number.min(self.lines.len());
        let first = number.saturating_sub(radius).max(1);
        let last = (number + radius).min(self.lines.len());
        let width = last.to_string().len();

        let mut out = String::new();
        for n in first..=last {
            let marker = if n == number { '>' } else { ' ' };
            let text = self.line_text(n).unwrap_or_default();
            let _ = writeln!(out, "{} {:>width$} | {}", marker, n, text);
        }

        out.truncate(out.trim_end_matches('\n').len());
        out
    }
}
