//! Identifiers, aliases, calls and `do` blocks.

use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::SyntaxKind;
use crate::parser::cst::token_sets::{BLOCK_ITEM_KEYWORDS, NO_PARENS_ARG_FIRST, STATEMENT_RECOVERY};

impl Parser<'_> {
    /// Bare identifier: a `Variable`, or a `Call` when arguments or a `do` block follow.
    pub(super) fn parse_identifier(&mut self) {
        let checkpoint = self.checkpoint();
        self.bump();
        if self.at_call_suffix() {
            self.start_node_at(checkpoint, SyntaxKind::Call);
            self.parse_call_suffix();
        } else {
            self.start_node_at(checkpoint, SyntaxKind::Variable);
        }
        self.finish_node();
    }

    /// `Foo` or `Foo.Bar.Baz`
    pub(super) fn parse_aliases(&mut self) {
        self.start_node(SyntaxKind::Aliases);
        self.bump();
        while self.currently_is(SyntaxKind::Dot) && self.next_is(SyntaxKind::Alias) {
            self.bump();
            self.bump();
        }
        self.finish_node();
    }

    fn at_call_suffix(&mut self) -> bool {
        if self.currently_is(SyntaxKind::ParenOpen) && !self.preceded_by_trivia() {
            return true;
        }
        if self.do_block_allowed && self.currently_is(SyntaxKind::KwDo) {
            return true;
        }
        self.at_no_parens_arguments()
    }

    /// Whitespace followed by something that starts an argument.
    /// `foo -1` is a call, `foo - 1` and `foo-1` are subtractions.
    fn at_no_parens_arguments(&mut self) -> bool {
        let kind = self.current();
        if !self.preceded_by_trivia() {
            return false;
        }
        match kind {
            SyntaxKind::Plus | SyntaxKind::Minus => !self.followed_by_space(),
            SyntaxKind::ParenOpen => true,
            SyntaxKind::KwNot => !self.next_is(SyntaxKind::KwIn),
            _ => NO_PARENS_ARG_FIRST.contains(kind),
        }
    }

    /// Arguments and `do` block after a call name.
    pub(super) fn parse_call_suffix(&mut self) {
        if self.currently_is(SyntaxKind::ParenOpen) && !self.preceded_by_trivia() {
            self.parse_call_arguments();
        } else if self.at_no_parens_arguments() {
            self.parse_no_parens_arguments();
        }

        if self.do_block_allowed && self.currently_is(SyntaxKind::KwDo) {
            self.parse_do_block();
        }
    }

    /// `(a, b, key: value)`
    pub(super) fn parse_call_arguments(&mut self) {
        self.start_node(SyntaxKind::CallArguments);
        self.open_construct(); // '('
        let saved = self.set_do_block_allowed(true);
        self.parse_delimited_elements();
        self.set_do_block_allowed(saved);
        self.close_construct(SyntaxKind::ParenClose, DiagnosticKind::UnclosedParen);
        self.finish_node();
    }

    /// `foo a, b, key: value`. A `do` after the arguments belongs to the outer call.
    fn parse_no_parens_arguments(&mut self) {
        self.start_node(SyntaxKind::NoParensArguments);
        let saved = self.set_do_block_allowed(false);
        loop {
            if self.at_keyword_key() {
                self.parse_keywords(false);
                break;
            }
            if !self.parse_expr_or_error() {
                break;
            }
            if !self.eat_token(SyntaxKind::Comma) {
                break;
            }
            self.skip_eols();
        }
        self.set_do_block_allowed(saved);
        self.finish_node();
    }

    /// `do ... else ... end`
    pub(super) fn parse_do_block(&mut self) {
        self.start_node(SyntaxKind::DoBlock);
        self.open_construct(); // 'do'
        let saved = self.set_do_block_allowed(true);

        self.parse_block_body();
        while self.currently_is_one_of(BLOCK_ITEM_KEYWORDS) {
            self.start_node(SyntaxKind::BlockItem);
            self.bump();
            self.parse_block_body();
            self.finish_node();
        }

        self.set_do_block_allowed(saved);
        self.close_construct(SyntaxKind::KwEnd, DiagnosticKind::UnclosedBlock);
        self.finish_node();
    }

    /// Either stab clauses (`pattern -> body`) or plain statements.
    fn parse_block_body(&mut self) {
        self.parse_end_of_expression();
        if self.at_stab_clause_start() {
            self.parse_stab(STATEMENT_RECOVERY);
        } else {
            self.parse_statements(STATEMENT_RECOVERY, false);
        }
    }
}
