//! Scanners for the non-code lexical states.
//!
//! Each scanner looks at the remaining input and returns the next token's kind and
//! byte length, or `None` when the state has nothing to offer and should be popped.

use logos::Logos;

use super::state::{Group, GroupKind, Terminator};
use crate::parser::cst::SyntaxKind;

/// Rule table for the state following a sigil's closing delimiter.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum ModifierToken {
    #[regex(r"[a-z]")]
    Modifier,
}

pub(super) struct Scanned {
    pub kind: SyntaxKind,
    pub len: usize,
}

impl Scanned {
    fn new(kind: SyntaxKind, len: usize) -> Self {
        Self { kind, len }
    }
}

/// Sigil name: one lowercase letter (interpolating) or uppercase letters and digits (raw).
pub(super) fn sigil_name(rest: &str) -> Option<(usize, bool)> {
    let bytes = rest.as_bytes();
    match bytes.first()? {
        b'a'..=b'z' => Some((1, true)),
        b'A'..=b'Z' => {
            let len = bytes
                .iter()
                .take_while(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
                .count();
            Some((len, false))
        }
        _ => None,
    }
}

/// Sigil opening delimiter, heredoc openers included.
pub(super) fn sigil_open(rest: &str) -> Option<(SyntaxKind, usize, Terminator)> {
    if let Some(len) = heredoc_opener(rest, "\"\"\"") {
        return Some((SyntaxKind::HeredocOpen, len, Terminator::HeredocDouble));
    }
    if let Some(len) = heredoc_opener(rest, "'''") {
        return Some((SyntaxKind::HeredocOpen, len, Terminator::HeredocSingle));
    }
    let opener = rest.chars().next()?;
    let terminator = Terminator::for_opener(opener)?;
    Some((SyntaxKind::SigilOpen, 1, terminator))
}

/// `"""` followed by optional blanks and a line break.
fn heredoc_opener(rest: &str, quotes: &str) -> Option<usize> {
    let after = rest.strip_prefix(quotes)?;
    let blanks = after.bytes().take_while(|b| matches!(b, b' ' | b'\t')).count();
    let tail = &after[blanks..];
    let newline = if tail.starts_with("\r\n") {
        2
    } else if tail.starts_with('\n') {
        1
    } else {
        return None;
    };
    Some(quotes.len() + blanks + newline)
}

pub(super) fn sigil_modifier(rest: &str) -> Option<usize> {
    let mut lexer = ModifierToken::lexer(rest);
    match lexer.next() {
        Some(Ok(ModifierToken::Modifier)) => Some(lexer.span().len()),
        _ => None,
    }
}

/// Next token of a group body. `at_line_start` is true when the previous byte is `\n`.
pub(super) fn group_body(rest: &str, group: Group, at_line_start: bool) -> Scanned {
    let closer = group.terminator.closer();

    if group.terminator.is_heredoc() {
        if at_line_start {
            let indent = rest
                .bytes()
                .take_while(|b| matches!(b, b' ' | b'\t'))
                .count();
            if rest[indent..].starts_with(closer) {
                return Scanned::new(SyntaxKind::HeredocClose, indent + closer.len());
            }
        }
    } else if rest.starts_with(closer) {
        if closes_keyword_key(&rest[closer.len()..], group) {
            return Scanned::new(SyntaxKind::QuotedKeyClose, closer.len() + 1);
        }
        return Scanned::new(closing_kind(group), closer.len());
    }

    if group.interpolating {
        if rest.starts_with("#{") {
            return Scanned::new(SyntaxKind::InterpolationStart, 2);
        }
        if rest.starts_with('\\') {
            return match escape_len(rest) {
                Some(len) => Scanned::new(SyntaxKind::EscapeSequence, len),
                None => Scanned::new(SyntaxKind::Unterminated, rest.len()),
            };
        }
    }

    fragment(rest, group)
}

/// `"name": value` makes a string or charlist a keyword key, under the same
/// whitespace rule as bare `name:` keys.
fn closes_keyword_key(after: &str, group: Group) -> bool {
    matches!(group.kind, GroupKind::String | GroupKind::CharList)
        && after.starts_with(':')
        && matches!(after[1..].chars().next(), None | Some(' ' | '\t' | '\n' | '\r'))
}

fn closing_kind(group: Group) -> SyntaxKind {
    match (group.kind, group.terminator) {
        (GroupKind::Sigil, _) => SyntaxKind::SigilClose,
        (_, Terminator::SingleQuote) => SyntaxKind::SingleQuote,
        _ => SyntaxKind::DoubleQuote,
    }
}

/// Literal text up to the next marker. Reaching end of input makes it `Unterminated`.
fn fragment(rest: &str, group: Group) -> Scanned {
    let closer = group.terminator.closer();
    let heredoc = group.terminator.is_heredoc();
    let mut chars = rest.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if i > 0 {
            let tail = &rest[i..];
            if !heredoc && tail.starts_with(closer) {
                return Scanned::new(SyntaxKind::Fragment, i);
            }
            if group.interpolating && (tail.starts_with("#{") || c == '\\') {
                return Scanned::new(SyntaxKind::Fragment, i);
            }
        }
        match c {
            '\n' if heredoc => return Scanned::new(SyntaxKind::Fragment, i + 1),
            // Raw bodies keep the backslash, but an escaped delimiter still does not close.
            '\\' if !group.interpolating => {
                if let Some(&(_, next)) = chars.peek() {
                    if next == '\n' && heredoc {
                        let (j, _) = chars.next().unwrap_or((i, next));
                        return Scanned::new(SyntaxKind::Fragment, j + 1);
                    }
                    chars.next();
                }
            }
            _ => {}
        }
    }

    Scanned::new(SyntaxKind::Unterminated, rest.len())
}

/// Length of the escape sequence at the start of `rest`, `None` if input ends after `\`.
fn escape_len(rest: &str) -> Option<usize> {
    let mut chars = rest[1..].chars();
    let c = chars.next()?;
    let len = match c {
        'x' => 2 + hex_escape_len(&rest[2..], 2),
        'u' => 2 + hex_escape_len(&rest[2..], 4),
        '\r' if rest[2..].starts_with('\n') => 3,
        _ => 1 + c.len_utf8(),
    };
    Some(len)
}

/// Either `{H+}` or up to `max` hex digits.
fn hex_escape_len(rest: &str, max: usize) -> usize {
    if let Some(inner) = rest.strip_prefix('{') {
        let digits = inner.bytes().take_while(u8::is_ascii_hexdigit).count();
        if inner[digits..].starts_with('}') {
            return digits + 2;
        }
        return 0;
    }
    rest.bytes()
        .take(max)
        .take_while(u8::is_ascii_hexdigit)
        .count()
}
