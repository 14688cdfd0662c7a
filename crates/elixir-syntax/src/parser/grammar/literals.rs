//! Strings, charlists, quoted atoms and sigils.
//!
//! The lexer already split every body into fragments, escapes and interpolations,
//! so these rules only group the parts and check the closing token.

use crate::diagnostics::DiagnosticKind;
use crate::parser::Parser;
use crate::parser::cst::token_sets::STATEMENT_RECOVERY;
use crate::parser::cst::{SyntaxKind, TokenSet};

const INTERPOLATION_END: TokenSet = TokenSet::single(SyntaxKind::InterpolationEnd);

impl Parser<'_> {
    /// `"..."`, `'...'`, `"""..."""` or `'''...'''`
    pub(super) fn parse_string(&mut self) {
        let open = self.current();
        let charlist = match open {
            SyntaxKind::SingleQuote => true,
            SyntaxKind::HeredocOpen => self.current_text().starts_with('\''),
            _ => false,
        };
        let close = match open {
            SyntaxKind::HeredocOpen => SyntaxKind::HeredocClose,
            kind => kind,
        };

        let node = if charlist {
            SyntaxKind::CharListLiteral
        } else {
            SyntaxKind::StringLiteral
        };
        self.start_node(node);
        if charlist {
            self.warn_single_quoted();
        }
        self.parse_group(close);
        self.finish_node();
    }

    /// `:"..."` or `:'...'`
    pub(super) fn parse_quoted_atom(&mut self) {
        self.start_node(SyntaxKind::QuotedAtom);
        let close = if self.current_text().starts_with(":'") {
            SyntaxKind::SingleQuote
        } else {
            SyntaxKind::DoubleQuote
        };
        self.parse_group(close);
        self.finish_node();
    }

    /// `"a b": ` in keyword position. The closing token carries the colon.
    pub(super) fn parse_quoted_key(&mut self) {
        self.start_node(SyntaxKind::QuotedKey);
        self.parse_group(SyntaxKind::QuotedKeyClose);
        self.finish_node();
    }

    /// Whether the string or charlist starting at token `index` closes as a keyword key.
    pub(super) fn quoted_key_at(&self, index: usize) -> bool {
        let Some(open) = self.tokens.get(index) else {
            return false;
        };
        if !matches!(open.kind, SyntaxKind::DoubleQuote | SyntaxKind::SingleQuote) {
            return false;
        }
        let mut depth = 0u32;
        for token in &self.tokens[index + 1..] {
            match token.kind {
                SyntaxKind::InterpolationStart => depth += 1,
                SyntaxKind::InterpolationEnd => depth = depth.saturating_sub(1),
                _ if depth > 0 => {}
                SyntaxKind::Fragment | SyntaxKind::EscapeSequence => {}
                kind => return kind == SyntaxKind::QuotedKeyClose,
            }
        }
        false
    }

    /// `~r/body/mods`, `~S"""..."""`
    pub(super) fn parse_sigil(&mut self) {
        self.start_node(SyntaxKind::Sigil);
        self.bump(); // '~'

        if !self.currently_is(SyntaxKind::SigilName) {
            self.error_with(DiagnosticKind::UnexpectedToken, "expected a sigil name");
            self.finish_node();
            return;
        }
        self.bump();

        let close = match self.current() {
            SyntaxKind::SigilOpen => SyntaxKind::SigilClose,
            SyntaxKind::HeredocOpen => SyntaxKind::HeredocClose,
            _ => {
                self.error(DiagnosticKind::ExpectedSigilDelimiter);
                self.finish_node();
                return;
            }
        };
        if self.parse_group(close) {
            while self.currently_is(SyntaxKind::SigilModifier) {
                self.bump();
            }
        }
        self.finish_node();
    }

    /// Opening token, body parts and `close`. Returns `false` if the body runs into
    /// end of input.
    fn parse_group(&mut self, close: SyntaxKind) -> bool {
        self.open_construct();

        if !self.parse_body_parts() {
            self.abandon_construct();
            return false;
        }
        if close != SyntaxKind::QuotedKeyClose && self.currently_is(SyntaxKind::QuotedKeyClose) {
            self.abandon_construct();
            self.reject(DiagnosticKind::KeywordsNotLast);
            return true;
        }
        self.close_construct(close, DiagnosticKind::UnterminatedLiteral);
        true
    }

    /// Fragments, escapes and interpolations. Returns `false` after an
    /// `Unterminated` token, which is reported here.
    fn parse_body_parts(&mut self) -> bool {
        loop {
            match self.current() {
                SyntaxKind::Fragment | SyntaxKind::EscapeSequence => self.bump(),
                SyntaxKind::InterpolationStart => self.parse_interpolation(),
                SyntaxKind::Unterminated => {
                    self.report_unterminated(DiagnosticKind::UnterminatedLiteral);
                    self.skip_as_error();
                    return false;
                }
                _ => return true,
            }
        }
    }

    /// `#{...}` inside an interpolating body.
    fn parse_interpolation(&mut self) {
        self.start_node(SyntaxKind::Interpolation);
        self.open_construct(); // '#{'
        let saved = self.set_do_block_allowed(true);
        self.parse_statements(STATEMENT_RECOVERY, false);

        if !self.currently_is(SyntaxKind::InterpolationEnd) && !self.should_stop() {
            self.recover_until(
                DiagnosticKind::UnexpectedToken,
                "expected `}` to close the interpolation",
                INTERPOLATION_END,
            );
        }
        self.set_do_block_allowed(saved);
        self.close_construct(SyntaxKind::InterpolationEnd, DiagnosticKind::UnclosedBrace);
        self.finish_node();
    }

    /// Points at the opening quote. Warnings bypass the one-per-position dedup.
    fn warn_single_quoted(&mut self) {
        let opener = self.current_span();
        self.warn(DiagnosticKind::SingleQuotedCharList, opener);
    }
}
