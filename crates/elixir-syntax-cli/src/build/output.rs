//! Parsing of `elixirc` and `mix` console output into per-file messages.
//!
//! Recognized shapes:
//!
//! ```text
//! ** (CompileError) lib/a.ex:3: undefined function foo/0
//! warning: variable "x" is unused
//!   lib/a.ex:3: A.run/0
//! warning: variable "x" is unused
//!   │
//!   └─ lib/a.ex:3:5: A.run/0
//! lib/a.ex:3: warning: redefining module A
//! Compiling 2 files (.ex)
//! ```

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use super::command::{SCRIPT_EXTENSION, SOURCE_EXTENSION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Error,
    Warning,
    Info,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MessageKind::Error => "error",
            MessageKind::Warning => "warning",
            MessageKind::Info => "info",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildMessage {
    pub kind: MessageKind,
    pub file: Option<PathBuf>,
    pub line: Option<u32>,
    pub text: String,
}

impl BuildMessage {
    fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            file: None,
            line: None,
            text: text.into(),
        }
    }

    fn at(mut self, location: &Location<'_>) -> Self {
        self.file = Some(PathBuf::from(location.file));
        self.line = location.line;
        self
    }
}

impl fmt::Display for BuildMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.kind)?;
        if let Some(file) = &self.file {
            write!(f, "{}", file.display())?;
            if let Some(line) = self.line {
                write!(f, ":{line}")?;
            }
            write!(f, ": ")?;
        }
        f.write_str(&self.text)
    }
}

/// Splits compiler output into messages, in output order. Unrecognized lines are skipped.
pub fn parse_output(output: &str) -> Vec<BuildMessage> {
    let mut messages = Vec::new();
    // A `warning:`/`error:` header waiting for its location line.
    let mut pending: Option<BuildMessage> = None;

    for line in output.lines() {
        let trimmed = line.trim();

        if let Some(message) = pending.take() {
            if let Some(location) = location_line(trimmed) {
                messages.push(message.at(&location));
                continue;
            }
            if is_continuation(line) {
                pending = Some(message);
                continue;
            }
            messages.push(message);
        }

        if let Some(rest) = trimmed.strip_prefix("** (") {
            let text = rest.split_once(") ").map_or(rest, |(_, text)| text);
            let message = match split_location(text) {
                Some(location) => BuildMessage::new(MessageKind::Error, location.rest).at(&location),
                None => BuildMessage::new(MessageKind::Error, text),
            };
            messages.push(message);
        } else if let Some(text) = trimmed.strip_prefix("warning: ") {
            pending = Some(BuildMessage::new(MessageKind::Warning, text));
        } else if let Some(text) = trimmed.strip_prefix("error: ") {
            pending = Some(BuildMessage::new(MessageKind::Error, text));
        } else if trimmed.starts_with("Compiling ") || trimmed.starts_with("Generated ") {
            messages.push(BuildMessage::new(MessageKind::Info, trimmed));
        } else if let Some(location) = split_location(trimmed)
            && let Some(text) = location.rest.strip_prefix("warning: ")
        {
            messages.push(BuildMessage::new(MessageKind::Warning, text).at(&location));
        }
    }

    messages.extend(pending);
    messages
}

fn is_continuation(line: &str) -> bool {
    line.starts_with(char::is_whitespace) && !line.trim().is_empty()
}

/// `lib/a.ex:3: A.run/0` or the boxed `└─ lib/a.ex:3:5: A.run/0`.
fn location_line(trimmed: &str) -> Option<Location<'_>> {
    split_location(trimmed.strip_prefix("└─ ").unwrap_or(trimmed))
}

struct Location<'a> {
    file: &'a str,
    line: Option<u32>,
    /// Text after the location, without the separating colon.
    rest: &'a str,
}

/// Splits `path.ex[:line[:column]][: rest]` at the start of `text`.
fn split_location(text: &str) -> Option<Location<'_>> {
    let end = [SCRIPT_EXTENSION, SOURCE_EXTENSION]
        .iter()
        .filter_map(|ext| {
            text.match_indices(&format!(".{ext}"))
                .map(|(start, matched)| start + matched.len())
                .find(|&end| text[end..].is_empty() || text[end..].starts_with(':'))
        })
        .min()?;

    let file = &text[..end];
    if file.contains(char::is_whitespace) {
        return None;
    }

    let mut rest = &text[end..];
    let mut line = None;
    if let Some(after) = rest.strip_prefix(':')
        && let (Some(number), after) = leading_number(after)
    {
        line = Some(number);
        rest = after;
        if let Some(after) = rest.strip_prefix(':')
            && let (Some(_column), after) = leading_number(after)
        {
            rest = after;
        }
    }

    Some(Location {
        file,
        line,
        rest: rest.trim_start_matches(':').trim(),
    })
}

fn leading_number(text: &str) -> (Option<u32>, &str) {
    let digits = text.len() - text.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    (text[..digits].parse().ok(), &text[digits..])
}
