//! Lexer for Elixir source.
//!
//! Produces span-based tokens without storing text - text is sliced from source only when needed.
//!
//! The lexer is a state machine over an explicit [`StateStack`]. Every token is recognized
//! by the rules of the state on top of the stack:
//!
//! - code states (`Initial`, `Interpolation`, `Braces`) use the Logos table on [`SyntaxKind`]
//! - sigil names, delimiters and modifiers use small dedicated scanners
//! - string, charlist, quoted atom and sigil bodies are scanned up to their terminator
//!
//! Because a token depends only on the remaining input and the stack, lexing can be
//! suspended at any token boundary and resumed from a [`LexerCheckpoint`].
//!
//! ## Error handling
//!
//! Consecutive unrecognized characters coalesce into a single `Garbage` token, and a body
//! running into end of input becomes one `Unterminated` token. Lexing never fails.

mod groups;
mod state;

use logos::Logos;
use rowan::TextRange;
use serde::{Deserialize, Serialize};

pub use state::{Group, GroupKind, LexicalState, StateStack, Terminator};

use super::cst::SyntaxKind;

/// Zero-copy token: kind + span, text retrieved via [`token_text`] when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: TextRange,
}

impl Token {
    #[inline]
    pub fn new(kind: SyntaxKind, span: TextRange) -> Self {
        Self { kind, span }
    }

    #[inline]
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        token_text(source, self)
    }
}

/// Position plus lexical state: everything needed to resume lexing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexerCheckpoint {
    pub offset: usize,
    pub stack: StateStack,
}

pub struct Lexer<'src> {
    source: &'src str,
    offset: usize,
    stack: StateStack,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            offset: 0,
            stack: StateStack::new(),
        }
    }

    pub fn resume(source: &'src str, checkpoint: LexerCheckpoint) -> Self {
        Self::restart(source, checkpoint.offset, checkpoint.stack)
    }

    /// Re-enters `source` at `offset` with an explicitly supplied stack.
    ///
    /// # Panics
    ///
    /// If `offset` is not a char boundary of `source`.
    pub fn restart(source: &'src str, offset: usize, stack: StateStack) -> Self {
        assert!(
            source.is_char_boundary(offset),
            "restart offset {offset} is not a char boundary"
        );
        tracing::trace!(offset, depth = stack.depth(), "lexer restart");
        Self {
            source,
            offset,
            stack,
        }
    }

    pub fn checkpoint(&self) -> LexerCheckpoint {
        LexerCheckpoint {
            offset: self.offset,
            stack: self.stack.clone(),
        }
    }

    pub fn state(&self) -> &StateStack {
        &self.stack
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    fn emit(&mut self, kind: SyntaxKind, len: usize) -> Token {
        debug_assert!(len > 0, "lexer produced an empty token");
        let start = self.offset;
        self.offset += len;
        Token::new(kind, range_to_text_range(start, self.offset))
    }

    fn lex_code(&mut self, rest: &str) -> Token {
        let Some((kind, len)) = first_code_token(rest) else {
            let mut len = 0;
            while len < rest.len() && first_code_token(&rest[len..]).is_none() {
                len += rest[len..].chars().next().map_or(1, char::len_utf8);
            }
            return self.emit(SyntaxKind::Garbage, len);
        };

        let (kind, len) = match kind {
            SyntaxKind::KeywordKey => self.keyword_key(rest, len),
            _ => (kind, len),
        };

        let kind = match kind {
            SyntaxKind::BraceOpen => {
                self.stack.push(LexicalState::Braces);
                kind
            }
            SyntaxKind::BraceClose => match self.stack.top() {
                LexicalState::Braces => {
                    self.stack.pop();
                    kind
                }
                LexicalState::Interpolation => {
                    self.stack.pop();
                    SyntaxKind::InterpolationEnd
                }
                _ => kind,
            },
            SyntaxKind::Tilde => {
                self.stack.push(LexicalState::SigilName);
                kind
            }
            SyntaxKind::DoubleQuote => {
                self.push_group(GroupKind::String, Terminator::DoubleQuote);
                kind
            }
            SyntaxKind::SingleQuote => {
                self.push_group(GroupKind::CharList, Terminator::SingleQuote);
                kind
            }
            SyntaxKind::HeredocOpen => {
                if rest.starts_with('\'') {
                    self.push_group(GroupKind::CharList, Terminator::HeredocSingle);
                } else {
                    self.push_group(GroupKind::String, Terminator::HeredocDouble);
                }
                kind
            }
            SyntaxKind::AtomQuote => {
                let terminator = if rest.starts_with(":'") {
                    Terminator::SingleQuote
                } else {
                    Terminator::DoubleQuote
                };
                self.push_group(GroupKind::QuotedAtom, terminator);
                kind
            }
            _ => kind,
        };

        self.emit(kind, len)
    }

    /// `name:` is a keyword key only when followed by whitespace or end of input.
    /// Otherwise the name is re-lexed on its own and the colon left for the next token.
    fn keyword_key(&self, rest: &str, len: usize) -> (SyntaxKind, usize) {
        match rest[len..].chars().next() {
            None | Some(' ' | '\t' | '\n' | '\r') => (SyntaxKind::KeywordKey, len),
            Some(_) => first_code_token(&rest[..len - 1])
                .unwrap_or((SyntaxKind::Identifier, len - 1)),
        }
    }

    fn push_group(&mut self, kind: GroupKind, terminator: Terminator) {
        self.stack
            .push(LexicalState::Group(Group::new(kind, terminator, true)));
    }

    fn lex_group(&mut self, rest: &str, group: Group) -> Token {
        let at_line_start = self.offset > 0 && self.source.as_bytes()[self.offset - 1] == b'\n';
        let scanned = groups::group_body(rest, group, at_line_start);
        match scanned.kind {
            SyntaxKind::InterpolationStart => self.stack.push(LexicalState::Interpolation),
            SyntaxKind::DoubleQuote
            | SyntaxKind::SingleQuote
            | SyntaxKind::QuotedKeyClose
            | SyntaxKind::SigilClose
            | SyntaxKind::HeredocClose => {
                if group.kind == GroupKind::Sigil {
                    self.stack.replace_top(LexicalState::SigilModifiers);
                } else {
                    self.stack.pop();
                }
            }
            _ => {}
        }
        self.emit(scanned.kind, scanned.len)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            let source = self.source;
            let rest = &source[self.offset..];
            if rest.is_empty() {
                // Modifiers end with the input; nothing else can follow them.
                if self.stack.top() == LexicalState::SigilModifiers {
                    self.stack.pop();
                }
                return None;
            }

            match self.stack.top() {
                LexicalState::Initial | LexicalState::Interpolation | LexicalState::Braces => {
                    return Some(self.lex_code(rest));
                }
                LexicalState::SigilName => match groups::sigil_name(rest) {
                    Some((len, interpolating)) => {
                        self.stack
                            .replace_top(LexicalState::SigilOpen { interpolating });
                        return Some(self.emit(SyntaxKind::SigilName, len));
                    }
                    None => {
                        self.stack.pop();
                    }
                },
                LexicalState::SigilOpen { interpolating } => match groups::sigil_open(rest) {
                    Some((kind, len, terminator)) => {
                        let group = Group::new(GroupKind::Sigil, terminator, interpolating);
                        self.stack.replace_top(LexicalState::Group(group));
                        return Some(self.emit(kind, len));
                    }
                    None => {
                        self.stack.pop();
                    }
                },
                LexicalState::Group(group) => return Some(self.lex_group(rest, group)),
                LexicalState::SigilModifiers => match groups::sigil_modifier(rest) {
                    Some(len) => return Some(self.emit(SyntaxKind::SigilModifier, len)),
                    None => {
                        self.stack.pop();
                    }
                },
            }
        }
    }
}

/// First token of `text` under the code rules, with its byte length.
fn first_code_token(text: &str) -> Option<(SyntaxKind, usize)> {
    let mut lexer = SyntaxKind::lexer(text);
    match lexer.next() {
        Some(Ok(kind)) => Some((kind, lexer.span().end)),
        _ => None,
    }
}

fn range_to_text_range(start: usize, end: usize) -> TextRange {
    TextRange::new((start as u32).into(), (end as u32).into())
}

/// Tokenizes source into a vector of span-based tokens.
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Retrieves the text slice for a token. O(1) slice into source.
#[inline]
pub fn token_text<'src>(source: &'src str, token: &Token) -> &'src str {
    &source[std::ops::Range::<usize>::from(token.span)]
}
