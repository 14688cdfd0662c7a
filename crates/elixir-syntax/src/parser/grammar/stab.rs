//! Anonymous functions and stab clauses (`params when guard -> body`).

use super::expressions::{GUARD_BP, STAB_PARAMETER_BP};
use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::token_sets::{BLOCK_ITEM_KEYWORDS, STATEMENT_RECOVERY};
use crate::parser::cst::{SyntaxKind, TokenSet};

const NESTING_OPENERS: TokenSet = TokenSet::new(&[
    SyntaxKind::ParenOpen,
    SyntaxKind::BracketOpen,
    SyntaxKind::BraceOpen,
    SyntaxKind::BinaryOpen,
    SyntaxKind::KwFn,
    SyntaxKind::KwDo,
    SyntaxKind::InterpolationStart,
]);

const NESTING_CLOSERS: TokenSet = TokenSet::new(&[
    SyntaxKind::ParenClose,
    SyntaxKind::BracketClose,
    SyntaxKind::BraceClose,
    SyntaxKind::BinaryClose,
    SyntaxKind::KwEnd,
    SyntaxKind::InterpolationEnd,
]);

impl Parser<'_> {
    /// `fn params -> body; params -> body end`
    pub(super) fn parse_anonymous_function(&mut self) {
        self.start_node(SyntaxKind::AnonymousFunction);
        self.open_construct(); // 'fn'
        let saved = self.set_do_block_allowed(true);

        self.parse_end_of_expression();
        self.parse_stab(STATEMENT_RECOVERY);

        self.set_do_block_allowed(saved);
        self.close_construct(SyntaxKind::KwEnd, DiagnosticKind::UnclosedBlock);
        self.finish_node();
    }

    /// One or more stab clauses up to a token in `stop`.
    pub(super) fn parse_stab(&mut self, stop: TokenSet) {
        self.start_node(SyntaxKind::Stab);
        let mut clauses = 0usize;
        loop {
            self.parse_end_of_expression();
            if self.should_stop() || self.currently_is_one_of(stop) {
                break;
            }
            let before = self.pos;
            self.parse_stab_clause(stop);
            clauses += 1;
            if self.pos == before {
                self.reject_with(DiagnosticKind::UnexpectedToken, "expected a stab clause");
            }
        }
        if clauses == 0 {
            self.error(DiagnosticKind::ExpectedArrow);
        }
        self.finish_node();
    }

    fn parse_stab_clause(&mut self, stop: TokenSet) {
        self.start_node(SyntaxKind::StabClause);

        self.start_node(SyntaxKind::StabParameters);
        if self.currently_is(SyntaxKind::ParenOpen) && self.paren_params_ahead() {
            self.parse_parenthesized_parameters();
        } else if !self.currently_is(SyntaxKind::Arrow) && !self.currently_is(SyntaxKind::KwWhen)
        {
            self.parse_bare_parameters();
        }
        self.finish_node();

        if self.currently_is(SyntaxKind::KwWhen) {
            self.start_node(SyntaxKind::StabGuard);
            self.bump(); // 'when'
            self.skip_eols();
            self.parse_expr_or_error_bp(GUARD_BP);
            self.finish_node();
        }

        if !self.eat_token(SyntaxKind::Arrow) {
            self.error(DiagnosticKind::ExpectedArrow);
        }

        self.start_node(SyntaxKind::StabBody);
        self.parse_statements(stop, true);
        self.finish_node();

        self.finish_node();
    }

    /// `(a, b)` before `->` or `when`.
    fn parse_parenthesized_parameters(&mut self) {
        self.open_construct(); // '('
        self.parse_delimited_elements();
        self.close_construct(SyntaxKind::ParenClose, DiagnosticKind::UnclosedParen);
    }

    /// `a, b, key: c`. Parameters stop before `when`.
    fn parse_bare_parameters(&mut self) {
        loop {
            if self.at_keyword_key() {
                self.parse_keywords(false);
                break;
            }
            if !self.parse_expr_or_error_bp(STAB_PARAMETER_BP) {
                break;
            }
            if !self.eat_token(SyntaxKind::Comma) {
                break;
            }
            self.skip_eols();
        }
    }

    /// Whether a `->` occurs at nesting depth zero before the current line ends.
    /// A line ending in `,` continues onto the next one.
    pub(super) fn at_stab_clause_start(&mut self) -> bool {
        self.skip_trivia_to_buffer();
        let mut depth = 0usize;
        let mut previous = SyntaxKind::Error;

        for token in &self.tokens[self.pos..] {
            let kind = token.kind;
            if kind.is_trivia() {
                continue;
            }
            if NESTING_OPENERS.contains(kind) {
                depth += 1;
            } else if NESTING_CLOSERS.contains(kind) {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            } else if depth == 0 {
                match kind {
                    SyntaxKind::Arrow => return true,
                    SyntaxKind::Eol if previous != SyntaxKind::Comma => return false,
                    kind if BLOCK_ITEM_KEYWORDS.contains(kind) => return false,
                    _ => {}
                }
            }
            if kind != SyntaxKind::Eol {
                previous = kind;
            }
        }
        false
    }

    /// Whether the parenthesized group at the current token is followed by `->` or `when`.
    fn paren_params_ahead(&mut self) -> bool {
        self.skip_trivia_to_buffer();
        let mut depth = 0usize;
        let mut tokens = self.tokens[self.pos..]
            .iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia());

        for kind in tokens.by_ref() {
            if NESTING_OPENERS.contains(kind) {
                depth += 1;
            } else if NESTING_CLOSERS.contains(kind) {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            }
        }
        matches!(tokens.next(), Some(SyntaxKind::Arrow | SyntaxKind::KwWhen))
    }
}
