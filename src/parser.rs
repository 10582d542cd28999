//! Streaming JSON5 parsing for style records
//!
//! Supports both single-line JSONL and multi-line JSON5 formats.
//! JSON5 adds support for comments, trailing commas, and unquoted keys.

use serde::{Deserialize, Serialize};
use std::io::Read;
use thiserror::Error;

use crate::style::Style;

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
}

/// A warning message from parsing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Warning {
    pub message: String,
    pub line: usize,
}

/// A parsed style and the line it started on.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStyle {
    pub style: Style,
    pub line: usize,
}

/// Result of parsing a style stream.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub styles: Vec<ParsedStyle>,
    pub warnings: Vec<Warning>,
}

/// Parse a single JSON5 string into a Style.
///
/// Returns `Err(ParseError)` if the text is not a JSON5 object.
pub fn parse_line(line: &str, line_number: usize) -> Result<Style, ParseError> {
    json5::from_str(line).map_err(|e| ParseError { message: e.to_string(), line: line_number })
}

/// Tracks nesting depth across lines so multi-line records can be split.
///
/// Strings may be double- or single-quoted. `//` line comments and
/// `/* */` block comments are skipped outside strings.
#[derive(Debug, Default)]
struct DepthTracker {
    brace_depth: i32,
    bracket_depth: i32,
    quote: Option<char>,
    escape_next: bool,
    in_block_comment: bool,
}

impl DepthTracker {
    fn feed(&mut self, line: &str) {
        let mut chars = line.chars().peekable();
        while let Some(ch) = chars.next() {
            if self.in_block_comment {
                if ch == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    self.in_block_comment = false;
                }
                continue;
            }
            if self.escape_next {
                self.escape_next = false;
                continue;
            }
            if let Some(quote) = self.quote {
                match ch {
                    '\\' => self.escape_next = true,
                    c if c == quote => self.quote = None,
                    _ => {}
                }
                continue;
            }

            match ch {
                '"' | '\'' => self.quote = Some(ch),
                '/' if chars.peek() == Some(&'/') => break,
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    self.in_block_comment = true;
                }
                '{' => self.brace_depth += 1,
                '}' => self.brace_depth -= 1,
                '[' => self.bracket_depth += 1,
                ']' => self.bracket_depth -= 1,
                _ => {}
            }
        }
    }

    fn is_balanced(&self) -> bool {
        self.brace_depth == 0 && self.bracket_depth == 0 && !self.in_block_comment
    }
}

/// Parse a stream of JSON5 style objects.
///
/// Supports both formats:
/// - Single-line JSONL (one JSON5 object per line)
/// - Multi-line JSON5 (objects can span multiple lines, separated by whitespace)
///
/// Parsing stops at the first malformed object or unreadable line, which is
/// reported as a warning; everything before it is kept.
pub fn parse_stream<R: Read>(reader: R) -> ParseResult {
    use std::io::BufRead;

    let mut result = ParseResult::default();
    let buf_reader = std::io::BufReader::new(reader);

    let mut accumulator = String::new();
    let mut start_line = 1;
    let mut current_line = 1;
    let mut tracker = DepthTracker::default();

    for line in buf_reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                let message = format!("cannot read input: {}", e);
                log::warn!("line {}: {}", current_line, message);
                result.warnings.push(Warning { message, line: current_line });
                return result;
            }
        };

        if accumulator.is_empty() && line.trim().is_empty() {
            current_line += 1;
            start_line = current_line;
            continue;
        }

        if !accumulator.is_empty() {
            accumulator.push('\n');
        }
        accumulator.push_str(&line);
        tracker.feed(&line);

        // Try to parse when braces are balanced
        if tracker.is_balanced() && !accumulator.trim().is_empty() {
            match parse_line(&accumulator, start_line) {
                Ok(style) => result.styles.push(ParsedStyle { style, line: start_line }),
                Err(e) => {
                    log::warn!("{}", e);
                    result.warnings.push(Warning { message: e.message, line: e.line });
                    // Can't reliably find the next object boundary
                    return result;
                }
            }

            accumulator.clear();
            start_line = current_line + 1;
            tracker = DepthTracker::default();
        }

        current_line += 1;
    }

    if !accumulator.trim().is_empty() {
        match parse_line(&accumulator, start_line) {
            Ok(style) => result.styles.push(ParsedStyle { style, line: start_line }),
            Err(e) => result.warnings.push(Warning { message: e.message, line: e.line }),
        }
    }

    result
}
