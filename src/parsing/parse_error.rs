//! Parse failure reporting with line context and troubleshooting hints.

use std::fmt;

use regex::Regex;

use crate::parsing::format_detector::TripleFormat;

/// How many lines to show on each side of a detected error line.
const CONTEXT_RADIUS: usize = 2;

/// A parser rejection, enriched where possible with the offending line,
/// a surrounding context window and a plain-language suggestion.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub format: TripleFormat,
    pub message: String,
    /// 1-based line number, when derivable from the underlying error.
    pub line: Option<usize>,
    /// Rendered context window around `line`.
    pub context: Option<String>,
    pub hint: Option<String>,
}

impl ParseError {
    pub fn new(format: TripleFormat, message: impl Into<String>) -> Self {
        Self { format, message: message.into(), line: None, context: None, hint: None }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Attaches a context window from the original content. If no line number
    /// was set explicitly, tries to recover one from "line N" patterns in the
    /// underlying error message first.
    pub fn enrich(mut self, content: &str) -> Self {
        if self.line.is_none() {
            self.line = extract_line_number(&self.message);
        }
        if let Some(line) = self.line {
            self.context = context_window(content, line);
        }
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} parse error: {}", self.format, self.message)?;
        if let Some(context) = &self.context {
            write!(f, "\nProblem area:\n{}", context)?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "\nSuggestion: {}", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Pulls a 1-based line number out of error text such as "syntax error at line 4".
pub fn extract_line_number(message: &str) -> Option<usize> {
    let re = Regex::new(r"[Ll]ine[:\s]+(\d+)").ok()?;
    let captures = re.captures(message)?;
    captures.get(1)?.as_str().parse().ok()
}

/// Renders up to two lines on each side of the error line, marking the line
/// itself with a `>` gutter. Returns None when the line is out of range.
fn context_window(content: &str, line: usize) -> Option<String> {
    let lines: Vec<&str> = content.lines().collect();
    if line == 0 || line > lines.len() {
        return None;
    }
    let start = line.saturating_sub(CONTEXT_RADIUS + 1);
    let end = (line + CONTEXT_RADIUS).min(lines.len());

    let mut window = String::new();
    for (offset, text) in lines[start..end].iter().enumerate() {
        let number = start + offset + 1;
        let marker = if number == line { ">" } else { " " };
        window.push_str(&format!("{} {:>4} | {}\n", marker, number, text));
    }
    Some(window.trim_end_matches('\n').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_line_number_variants() {
        assert_eq!(extract_line_number("syntax error at line 4"), Some(4));
        assert_eq!(extract_line_number("Line 12: unexpected token"), Some(12));
        assert_eq!(extract_line_number("Line: 7"), Some(7));
        assert_eq!(extract_line_number("no position here"), None);
    }

    #[test]
    fn test_context_window_marks_error_line() {
        let content = "one\ntwo\nthree\nfour\nfive\nsix";
        let err = ParseError::new(TripleFormat::Turtle, "bad token at line 3").enrich(content);

        assert_eq!(err.line, Some(3));
        let context = err.context.unwrap();
        assert!(context.contains(">    3 | three"), "line 3 should carry the marker: {}", context);
        assert!(context.contains("     1 | one"), "window should start two lines up: {}", context);
        assert!(context.contains("     5 | five"), "window should end two lines down: {}", context);
        assert!(!context.contains("six"), "line 6 is outside the window: {}", context);
    }

    #[test]
    fn test_display_sections() {
        let content = "a\nb\nc";
        let err = ParseError::new(TripleFormat::Csv, "Invalid triple format on line 2")
            .with_hint("Each line needs subject,predicate,object")
            .enrich(content);

        let rendered = err.to_string();
        assert!(rendered.starts_with("CSV parse error: Invalid triple format on line 2"));
        assert!(rendered.contains("Problem area:"));
        assert!(rendered.contains("Suggestion: Each line needs"));
    }

    #[test]
    fn test_out_of_range_line_has_no_context() {
        let err = ParseError::new(TripleFormat::NTriples, "error at line 99").enrich("only\nfour\nshort\nlines");
        assert_eq!(err.line, Some(99));
        assert!(err.context.is_none());
    }
}
