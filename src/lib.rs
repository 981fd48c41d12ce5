#![allow(clippy::module_inception)]

use serde::{Deserialize, Serialize};

use crate::errors::errors::Diagnostic;

pub mod ast;
pub mod config;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;

extern crate regex;

pub use crate::config::ParseOptions;
pub use crate::parser::analyzer::resolve_across_imports;
pub use crate::parser::parser::{parse, parse_with, ParseResult};

/// A zero-based line/character location in a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Position { line, character }
    }
}

/// A half-open source range, `start` inclusive and `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    /// An empty span sitting at `position`.
    pub fn at(position: Position) -> Self {
        Span { start: position, end: position }
    }
}

/// Returns the text of line `position.line` (without its terminator) and
/// the character offset of `position` inside it. Out-of-range lines yield
/// an empty string.
pub fn get_line_at_position(source: &str, position: Position) -> (usize, String, usize) {
    let line_text = source
        .split('\n')
        .nth(position.line as usize)
        .unwrap_or("")
        .trim_end_matches('\r');

    (position.line as usize + 1, line_text.to_string(), position.character as usize)
}

/// Renders a diagnostic the way `floyd-check` prints it:
///
/// ```text
/// Warning: Already defined
/// -> room.fl
///   |
/// 1 | int x, x, y;
///   | ----^
/// ```
pub fn format_diagnostic(diagnostic: &Diagnostic, source: &str, file: &str) -> String {
    let (line, line_text, line_pos) = get_line_at_position(source, diagnostic.range.start);

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    let mut out = String::new();
    out.push_str(&format!("{}: {}\n", diagnostic.severity, diagnostic.message));
    out.push_str(&format!("-> {}\n", file));
    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));

    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (string.chars().skip(start).collect(), start)
}
