//! Lists, tuples, binaries, maps, structs, keyword lists and parenthesized blocks.

use rowan::Checkpoint;

use super::expressions::MAP_ELEMENT_BP;
use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::token_sets::{EXPR_FIRST, STATEMENT_RECOVERY};
use crate::parser::cst::{SyntaxKind, TokenSet};

impl Parser<'_> {
    /// Comma-separated elements up to `close`; trailing `key: value` pairs become `Keywords`.
    /// Line breaks anywhere between elements are absorbed.
    pub(super) fn parse_delimited_elements(&mut self) {
        let mut after_keywords = false;
        loop {
            self.skip_eols();
            if self.should_stop() || self.currently_is_one_of(STATEMENT_RECOVERY) {
                break;
            }

            if self.at_keyword_key() {
                self.parse_keywords(true);
                after_keywords = true;
            } else {
                if after_keywords {
                    self.error(DiagnosticKind::KeywordsNotLast);
                }
                self.parse_expr_or_error();
            }

            self.skip_eols();
            if self.eat_token(SyntaxKind::Comma) {
                continue;
            }
            if self.should_stop() || self.currently_is_one_of(STATEMENT_RECOVERY) {
                break;
            }
            self.recover_until(
                DiagnosticKind::UnexpectedToken,
                "expected `,`",
                STATEMENT_RECOVERY.union(TokenSet::new(&[SyntaxKind::Comma, SyntaxKind::Eol])),
            );
            if !self.eat_token(SyntaxKind::Comma) && !self.currently_is(SyntaxKind::Eol) {
                break;
            }
        }
    }

    /// `key: value, key: value`. Stops before a comma that is not followed by another key.
    pub(super) fn parse_keywords(&mut self, bracketed: bool) {
        self.start_node(SyntaxKind::Keywords);
        loop {
            self.parse_keyword_pair();
            if bracketed {
                self.skip_eols();
            }
            if !self.currently_is(SyntaxKind::Comma) || !self.keyword_key_after_comma() {
                break;
            }
            self.bump(); // ','
            self.skip_eols();
        }
        self.finish_node();
    }

    fn parse_keyword_pair(&mut self) {
        self.start_node(SyntaxKind::KeywordPair);
        if self.currently_is(SyntaxKind::KeywordKey) {
            self.bump();
        } else {
            self.parse_quoted_key();
        }
        self.skip_eols();
        if self.currently_is_one_of(EXPR_FIRST) {
            self.parse_expr_bp(0);
        } else {
            self.error(DiagnosticKind::ExpectedKeywordValue);
        }
        self.finish_node();
    }

    /// `key:` or `"quoted key":` at the current token.
    pub(super) fn at_keyword_key(&mut self) -> bool {
        self.currently_is(SyntaxKind::KeywordKey) || self.quoted_key_at(self.pos)
    }

    /// Next significant token after the current comma, skipping line breaks.
    fn peek_after_comma(&mut self) -> SyntaxKind {
        self.after_comma()
            .map_or(SyntaxKind::Error, |index| self.tokens[index].kind)
    }

    fn keyword_key_after_comma(&mut self) -> bool {
        self.after_comma().is_some_and(|index| {
            self.tokens[index].kind == SyntaxKind::KeywordKey || self.quoted_key_at(index)
        })
    }

    fn after_comma(&mut self) -> Option<usize> {
        self.skip_trivia_to_buffer();
        (self.pos + 1..self.tokens.len()).find(|&index| {
            let kind = self.tokens[index].kind;
            !kind.is_trivia() && kind != SyntaxKind::Eol
        })
    }

    /// `[a, b, key: value]`
    pub(super) fn parse_list(&mut self) {
        self.parse_bracketed(
            SyntaxKind::List,
            SyntaxKind::BracketClose,
            DiagnosticKind::UnclosedBracket,
        );
    }

    /// `{a, b}`
    pub(super) fn parse_tuple(&mut self) {
        self.parse_bracketed(
            SyntaxKind::Tuple,
            SyntaxKind::BraceClose,
            DiagnosticKind::UnclosedBrace,
        );
    }

    /// `<<a, b::binary>>`
    pub(super) fn parse_binary(&mut self) {
        self.parse_bracketed(
            SyntaxKind::Binary,
            SyntaxKind::BinaryClose,
            DiagnosticKind::UnclosedBinary,
        );
    }

    fn parse_bracketed(
        &mut self,
        node: SyntaxKind,
        close: SyntaxKind,
        unclosed: DiagnosticKind,
    ) {
        self.start_node(node);
        self.open_construct();
        let saved = self.set_do_block_allowed(true);
        self.parse_delimited_elements();
        self.set_do_block_allowed(saved);
        self.close_construct(close, unclosed);
        self.finish_node();
    }

    /// `(expr)` or `(a; b)`. Empty parentheses are an empty block.
    pub(super) fn parse_parenthesized(&mut self) {
        self.start_node(SyntaxKind::Parenthesized);
        self.open_construct(); // '('
        let saved = self.set_do_block_allowed(true);
        self.parse_statements(STATEMENT_RECOVERY, false);
        self.set_do_block_allowed(saved);
        self.close_construct(SyntaxKind::ParenClose, DiagnosticKind::UnclosedParen);
        self.finish_node();
    }

    /// `%{...}` or `%Name{...}`
    pub(super) fn parse_map_or_struct(&mut self) {
        if self.next_is(SyntaxKind::BraceOpen) {
            self.start_node(SyntaxKind::MapOperation);
            self.bump(); // '%'
            self.parse_map_arguments();
            self.finish_node();
            return;
        }

        self.start_node(SyntaxKind::StructOperation);
        self.bump(); // '%'
        self.parse_struct_name();
        if self.currently_is(SyntaxKind::BraceOpen) {
            self.parse_map_arguments();
        } else {
            self.error_with(DiagnosticKind::UnexpectedToken, "expected `{` after struct name");
        }
        self.finish_node();
    }

    fn parse_struct_name(&mut self) {
        match self.current() {
            SyntaxKind::Alias => self.parse_aliases(),
            SyntaxKind::Identifier => {
                self.start_node(SyntaxKind::Variable);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::Atom => {
                self.start_node(SyntaxKind::AtomLiteral);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::At => {
                self.start_node(SyntaxKind::UnaryOperation);
                self.bump();
                if self.currently_is(SyntaxKind::Identifier) {
                    self.start_node(SyntaxKind::Variable);
                    self.bump();
                    self.finish_node();
                } else {
                    self.error(DiagnosticKind::ExpectedExpression);
                }
                self.finish_node();
            }
            _ => self.error_with(DiagnosticKind::ExpectedExpression, "a struct name"),
        }
    }

    /// `{...}` body of a map or struct.
    fn parse_map_arguments(&mut self) {
        self.start_node(SyntaxKind::MapArguments);
        self.open_construct(); // '{'
        let saved = self.set_do_block_allowed(true);

        self.skip_eols();
        if !self.currently_is(SyntaxKind::BraceClose) && !self.should_stop() {
            self.parse_map_body();
        }
        self.skip_eols();
        if self.eat_token(SyntaxKind::Comma) {
            self.skip_eols();
        }
        if !self.currently_is(SyntaxKind::BraceClose) && !self.should_stop() {
            self.recover_until(
                DiagnosticKind::UnexpectedToken,
                "expected `}`",
                STATEMENT_RECOVERY,
            );
        }

        self.set_do_block_allowed(saved);
        self.close_construct(SyntaxKind::BraceClose, DiagnosticKind::UnclosedBrace);
        self.finish_node();
    }

    fn parse_map_body(&mut self) {
        if self.at_keyword_key() {
            self.parse_keywords(true);
            return;
        }

        let checkpoint = self.checkpoint();
        if !self.parse_map_element() {
            return;
        }
        self.skip_eols();

        if self.currently_is(SyntaxKind::Bar) {
            self.start_node_at(checkpoint, SyntaxKind::MapUpdateArguments);
            self.bump(); // '|'
            self.skip_eols();
            if !self.currently_is(SyntaxKind::BraceClose) {
                self.parse_map_pairs(None);
            }
            self.finish_node();
        } else {
            self.parse_map_pairs(Some(checkpoint));
        }
    }

    /// `Associations` optionally followed by `Keywords`.
    /// `first_key` marks an already-parsed key of the first association.
    fn parse_map_pairs(&mut self, first_key: Option<Checkpoint>) {
        if first_key.is_some() || !self.at_keyword_key() {
            self.parse_associations(first_key);
            self.skip_eols();
            if !self.currently_is(SyntaxKind::Comma) || !self.keyword_key_after_comma() {
                return;
            }
            self.bump(); // ','
            self.skip_eols();
        }
        self.parse_keywords(true);
    }

    fn parse_associations(&mut self, first_key: Option<Checkpoint>) {
        match first_key {
            Some(checkpoint) => {
                self.start_node_at(checkpoint, SyntaxKind::Associations);
                self.finish_association(checkpoint);
            }
            None => {
                self.start_node(SyntaxKind::Associations);
                self.parse_association();
            }
        }

        loop {
            self.skip_eols();
            if !self.currently_is(SyntaxKind::Comma) {
                break;
            }
            if self.keyword_key_after_comma() || self.peek_after_comma() == SyntaxKind::BraceClose {
                break;
            }
            self.bump(); // ','
            self.skip_eols();
            self.parse_association();
        }
        self.finish_node();
    }

    fn parse_association(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_map_element();
        self.skip_eols();
        self.finish_association(checkpoint);
    }

    /// Wraps the key parsed since `checkpoint` together with `=> value`.
    fn finish_association(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::Association);
        if self.eat_token(SyntaxKind::FatArrow) {
            self.skip_eols();
            if self.currently_is_one_of(EXPR_FIRST) {
                self.parse_expr_bp(MAP_ELEMENT_BP);
            } else {
                self.error(DiagnosticKind::ExpectedAssociationValue);
            }
        } else {
            self.error_with(DiagnosticKind::UnexpectedToken, "expected `=>`");
        }
        self.finish_node();
    }

    fn parse_map_element(&mut self) -> bool {
        self.parse_expr_or_error_bp(MAP_ELEMENT_BP)
    }
}
