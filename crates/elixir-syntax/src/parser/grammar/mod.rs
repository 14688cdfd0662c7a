//! Grammar productions for Elixir.
//!
//! This module implements all `parse_*` methods as an extension of `Parser`.
//! Expressions use Pratt parsing over Elixir's operator table; everything else is
//! plain recursive descent.

mod calls;
mod collections;
mod expressions;
mod literals;
mod stab;

use super::core::Parser;
use super::cst::SyntaxKind;
use super::cst::TokenSet;
use super::cst::token_sets::{BLOCK_ITEM_KEYWORDS, EXPR_FIRST};
use crate::diagnostics::DiagnosticKind;

impl Parser<'_> {
    pub fn parse_root(&mut self) {
        self.start_node(SyntaxKind::File);
        self.parse_statements(TokenSet::EMPTY, false);
        self.skip_trivia_to_buffer();
        self.drain_trivia();
        self.finish_node();

        if !self.has_fatal_error() {
            self.assert_constructs_balanced();
        }
    }

    /// Statements separated by `EndOfExpression` nodes, up to a token in `stop`.
    /// Inside stab bodies, also stops where the next clause begins.
    pub(super) fn parse_statements(&mut self, stop: TokenSet, in_stab: bool) {
        loop {
            self.parse_end_of_expression();
            if self.should_stop() || self.currently_is_one_of(stop) {
                break;
            }
            if in_stab && self.at_stab_clause_start() {
                break;
            }
            self.parse_statement(stop);
        }
    }

    fn parse_statement(&mut self, stop: TokenSet) {
        if !self.parse_expr_or_error() {
            return;
        }
        if self.should_stop()
            || self.currently_is(SyntaxKind::Eol)
            || self.currently_is_one_of(stop)
        {
            return;
        }
        self.recover_until(
            DiagnosticKind::UnexpectedToken,
            "expected a line break or `;` before the next expression",
            stop.union(TokenSet::single(SyntaxKind::Eol)),
        );
    }

    /// A run of line breaks and `;` separating expressions.
    pub(super) fn parse_end_of_expression(&mut self) -> bool {
        if !self.currently_is(SyntaxKind::Eol) {
            return false;
        }
        self.start_node(SyntaxKind::EndOfExpression);
        while self.currently_is(SyntaxKind::Eol) {
            self.bump();
        }
        self.finish_node();
        true
    }

    /// Parse an expression, or emit an error if current token can't start one.
    /// Returns `true` if a valid expression was parsed, `false` on error.
    pub(super) fn parse_expr_or_error(&mut self) -> bool {
        self.parse_expr_or_error_bp(0)
    }

    pub(super) fn parse_expr_or_error_bp(&mut self, min_bp: u8) -> bool {
        if self.currently_is_one_of(EXPR_FIRST) {
            return self.parse_expr_bp(min_bp);
        }
        if self.should_stop() {
            self.error(DiagnosticKind::ExpectedExpression);
            return false;
        }

        match self.current() {
            SyntaxKind::Garbage => {
                let text = self.current_text().to_string();
                self.reject_with(DiagnosticKind::InvalidCharacter, text);
            }
            SyntaxKind::KwEnd => {
                self.reject_with(DiagnosticKind::BlockKeywordOutsideBlock, "end");
            }
            kind if BLOCK_ITEM_KEYWORDS.contains(kind) => {
                let text = self.current_text().to_string();
                self.reject_with(DiagnosticKind::BlockKeywordOutsideBlock, text);
            }
            SyntaxKind::FatArrow => self.reject(DiagnosticKind::AssociationOutsideMap),
            SyntaxKind::KeywordKey => {
                self.reject(DiagnosticKind::KeywordsNotLast);
            }
            SyntaxKind::Eol
            | SyntaxKind::ParenClose
            | SyntaxKind::BracketClose
            | SyntaxKind::BraceClose
            | SyntaxKind::BinaryClose
            | SyntaxKind::InterpolationEnd => {
                // Leave closers for the enclosing construct to report.
                self.error(DiagnosticKind::ExpectedExpression);
                if !self.inside_construct() {
                    self.skip_as_error();
                }
            }
            _ => {
                let text = self.current_text().to_string();
                self.reject_with(
                    DiagnosticKind::UnexpectedToken,
                    format!("`{text}` cannot start an expression"),
                );
            }
        }
        false
    }
}
