//! Token cursor, tree building and error reporting shared by every grammar rule.

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

use super::ParseOptions;
use super::cst::{SyntaxKind, TokenSet};
use super::fuel::Fuel;
use super::lexer::{Terminator, Token, token_text};
use crate::Error;
use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// The opening token of a construct that must be closed: a bracket, a `do` or `fn`
/// block, a literal body or an interpolation.
#[derive(Debug, Clone, Copy)]
pub(super) struct Opener {
    token: SyntaxKind,
    span: TextRange,
}

impl Opener {
    fn text<'s>(&self, source: &'s str) -> &'s str {
        source[std::ops::Range::<usize>::from(self.span)].trim_end()
    }

    /// What the compiler would ask for, as in `missing terminator: end`.
    fn terminator(&self, source: &str) -> &'static str {
        let text = self.text(source);
        match self.token {
            SyntaxKind::ParenOpen => ")",
            SyntaxKind::BracketOpen => "]",
            SyntaxKind::BraceOpen | SyntaxKind::InterpolationStart => "}",
            SyntaxKind::BinaryOpen => ">>",
            SyntaxKind::KwDo | SyntaxKind::KwFn => "end",
            _ if text.ends_with("\"\"\"") => "\"\"\"",
            _ if text.ends_with("'''") => "'''",
            SyntaxKind::SigilOpen => text
                .chars()
                .next()
                .and_then(Terminator::for_opener)
                .map_or("", Terminator::closer),
            _ if text.ends_with('\'') => "'",
            _ => "\"",
        }
    }

    fn description(&self, source: &str) -> String {
        match self.token {
            SyntaxKind::DoubleQuote => "string".to_string(),
            SyntaxKind::SingleQuote => "charlist".to_string(),
            SyntaxKind::HeredocOpen => "heredoc".to_string(),
            SyntaxKind::AtomQuote => "quoted atom".to_string(),
            SyntaxKind::SigilOpen => "sigil".to_string(),
            _ => format!("\"{}\"", self.text(source)),
        }
    }
}

/// Recursive-descent parser over a token vector.
///
/// Trivia is buffered and flushed into whichever node starts or grows next.
/// `Eol` is not trivia: grammar rules decide whether a line break separates
/// expressions or is absorbed inside one.
pub struct Parser<'src> {
    pub(super) source: &'src str,
    pub(super) tokens: Vec<Token>,
    pub(super) pos: usize,
    trivia: Vec<Token>,
    builder: GreenNodeBuilder<'static>,
    pub(super) diagnostics: Diagnostics,
    /// Errors are reported once per position.
    last_report: Option<TextSize>,
    /// Constructs opened and not yet closed, innermost last.
    pub(super) openers: Vec<Opener>,
    pub(super) fuel: Fuel,
    fatal: Option<Error>,
    /// Cleared while parsing no-parens call arguments, so a trailing `do`
    /// binds to the outermost call.
    pub(super) do_block_allowed: bool,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>, options: ParseOptions) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            trivia: Vec::with_capacity(4),
            builder: GreenNodeBuilder::new(),
            diagnostics: Diagnostics::new(),
            last_report: None,
            openers: Vec::with_capacity(8),
            fuel: Fuel::new(options),
            fatal: None,
            do_block_allowed: true,
        }
    }

    /// Green tree, diagnostics and consumed token fuel.
    pub(super) fn finish(mut self) -> Result<(GreenNode, Diagnostics, u32), Error> {
        self.drain_trivia();
        if let Some(err) = self.fatal {
            return Err(err);
        }
        let consumed = self.fuel.consumed();
        Ok((self.builder.finish(), self.diagnostics, consumed))
    }

    fn fail(&mut self, err: Error) {
        self.fatal.get_or_insert(err);
    }

    pub(super) fn has_fatal_error(&self) -> bool {
        self.fatal.is_some()
    }

    pub(super) fn enter_recursion(&mut self) -> bool {
        match self.fuel.descend() {
            Ok(()) => true,
            Err(err) => {
                self.fail(err);
                false
            }
        }
    }

    pub(super) fn exit_recursion(&mut self) {
        self.fuel.ascend();
    }

    // Lookahead

    pub(super) fn current(&mut self) -> SyntaxKind {
        self.skip_trivia_to_buffer();
        self.nth_raw(0)
    }

    pub(super) fn nth_raw(&self, lookahead: usize) -> SyntaxKind {
        self.ensure_progress();
        self.tokens
            .get(self.pos + lookahead)
            .map_or(SyntaxKind::Error, |t| t.kind)
    }

    pub(super) fn current_span(&mut self) -> TextRange {
        self.skip_trivia_to_buffer();
        match self.tokens.get(self.pos) {
            Some(token) => token.span,
            None => TextRange::empty(self.eof_offset()),
        }
    }

    pub(super) fn current_text(&mut self) -> &'src str {
        self.skip_trivia_to_buffer();
        let source = self.source;
        self.tokens
            .get(self.pos)
            .map_or("", |t| token_text(source, t))
    }

    fn eof_offset(&self) -> TextSize {
        TextSize::of(self.source)
    }

    pub(super) fn eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(super) fn should_stop(&self) -> bool {
        self.eof() || self.has_fatal_error()
    }

    pub(super) fn currently_is(&mut self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(super) fn currently_is_one_of(&mut self, set: TokenSet) -> bool {
        set.contains(self.current())
    }

    /// Kind of the `n`th significant token from here; `Eol` counts.
    pub(super) fn peek_nth(&mut self, n: usize) -> SyntaxKind {
        self.skip_trivia_to_buffer();
        self.tokens[self.pos..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
            .map_or(SyntaxKind::Error, |t| t.kind)
    }

    pub(super) fn next_is(&mut self, kind: SyntaxKind) -> bool {
        self.peek_nth(1) == kind
    }

    /// First significant token after any run of `Eol`s.
    pub(super) fn peek_past_eols(&mut self) -> SyntaxKind {
        self.skip_trivia_to_buffer();
        self.tokens[self.pos..]
            .iter()
            .map(|t| t.kind)
            .find(|k| !k.is_trivia() && *k != SyntaxKind::Eol)
            .unwrap_or(SyntaxKind::Error)
    }

    /// Whether whitespace or a comment separates the current token from the previous one.
    pub(super) fn preceded_by_trivia(&mut self) -> bool {
        self.skip_trivia_to_buffer();
        self.pos > 0 && self.tokens[self.pos - 1].kind.is_trivia()
    }

    /// Whether trivia, a line break or end of input follows the current token.
    pub(super) fn followed_by_space(&mut self) -> bool {
        self.skip_trivia_to_buffer();
        self.tokens
            .get(self.pos + 1)
            .is_none_or(|t| t.kind.is_trivia() || t.kind == SyntaxKind::Eol)
    }

    /// 1-based line of `offset`.
    fn line_at(&self, offset: TextSize) -> usize {
        let end = usize::from(offset).min(self.source.len());
        self.source.as_bytes()[..end]
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
            + 1
    }

    // Tree building

    pub(super) fn skip_trivia_to_buffer(&mut self) {
        while let Some(token) = self.tokens.get(self.pos)
            && token.kind.is_trivia()
        {
            self.trivia.push(*token);
            self.pos += 1;
        }
    }

    pub(super) fn drain_trivia(&mut self) {
        for token in self.trivia.drain(..) {
            self.builder
                .token(token.kind.into(), token_text(self.source, &token));
        }
    }

    pub(super) fn start_node(&mut self, kind: SyntaxKind) {
        self.drain_trivia();
        self.builder.start_node(kind.into());
    }

    pub(super) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    pub(super) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub(super) fn checkpoint(&mut self) -> Checkpoint {
        self.drain_trivia();
        self.builder.checkpoint()
    }

    /// Consumes the token at the cursor, flushing buffered trivia before it.
    /// Callers peek with [`Self::current`] first, which moves the cursor past trivia.
    pub(super) fn bump(&mut self) {
        assert!(!self.eof(), "bump called at end of input");
        if let Err(err) = self.fuel.spend_token() {
            self.fail(err);
        }
        self.drain_trivia();
        let token = self.tokens[self.pos];
        self.builder
            .token(token.kind.into(), token_text(self.source, &token));
        self.pos += 1;
    }

    pub(super) fn eat_token(&mut self, kind: SyntaxKind) -> bool {
        let matched = self.currently_is(kind);
        if matched {
            self.bump();
        }
        matched
    }

    /// Absorbs line breaks into the current node.
    pub(super) fn skip_eols(&mut self) {
        while self.eat_token(SyntaxKind::Eol) {}
    }

    /// Swaps the `do_block_allowed` flag, returning the previous value for restoring.
    pub(super) fn set_do_block_allowed(&mut self, allowed: bool) -> bool {
        std::mem::replace(&mut self.do_block_allowed, allowed)
    }

    // Constructs with terminators

    /// Consumes the current token as the opener of a construct that
    /// [`Self::close_construct`] must later close.
    pub(super) fn open_construct(&mut self) {
        let opener = Opener {
            token: self.current(),
            span: self.current_span(),
        };
        self.openers.push(opener);
        self.bump();
    }

    /// Expects `close`, reporting `unclosed` against the opener otherwise.
    pub(super) fn close_construct(&mut self, close: SyntaxKind, unclosed: DiagnosticKind) {
        let opener = self.openers.pop();
        if self.eat_token(close) {
            return;
        }
        if let Some(opener) = opener {
            self.report_unclosed(unclosed, opener);
        }
    }

    /// Forgets the innermost opener after its unclosed body was already reported.
    pub(super) fn abandon_construct(&mut self) {
        self.openers.pop();
    }

    pub(super) fn inside_construct(&self) -> bool {
        !self.openers.is_empty()
    }

    /// Reports the innermost construct as running off the end of input.
    pub(super) fn report_unterminated(&mut self, kind: DiagnosticKind) {
        match self.openers.last().copied() {
            Some(opener) => self.report_unclosed(kind, opener),
            None => self.error(kind),
        }
    }

    fn report_unclosed(&mut self, kind: DiagnosticKind, opener: Opener) {
        let here = self.current_span();
        if !self.first_report_at(here.start()) {
            return;
        }
        let detail = format!(
            "{} (for {} starting at line {})",
            opener.terminator(self.source),
            opener.description(self.source),
            self.line_at(opener.span.start()),
        );
        self.diagnostics
            .report(kind, TextRange::new(opener.span.start(), here.end()))
            .detail(detail)
            .related_to("unclosed here", opener.span)
            .emit();
    }

    // Errors

    fn first_report_at(&mut self, pos: TextSize) -> bool {
        if self.last_report == Some(pos) {
            return false;
        }
        self.last_report = Some(pos);
        true
    }

    /// Everything from the innermost opener to end of input; errors there are
    /// likely fallout of the same mistake.
    fn error_scope(&self, range: TextRange) -> TextRange {
        match self.openers.last() {
            Some(opener) => TextRange::new(opener.span.start(), self.eof_offset()),
            None => range,
        }
    }

    fn report_here(&mut self, kind: DiagnosticKind, detail: Option<&str>) {
        let range = self.current_span();
        if !self.first_report_at(range.start()) {
            return;
        }
        let scope = self.error_scope(range);
        let builder = self.diagnostics.report(kind, range).scope(scope);
        match detail {
            Some(detail) => builder.detail(detail).emit(),
            None => builder.emit(),
        }
    }

    pub(super) fn error(&mut self, kind: DiagnosticKind) {
        self.report_here(kind, None);
    }

    pub(super) fn error_with(&mut self, kind: DiagnosticKind, detail: impl AsRef<str>) {
        self.report_here(kind, Some(detail.as_ref()));
    }

    /// Warnings never hide errors, so they skip the per-position dedup.
    pub(super) fn warn(&mut self, kind: DiagnosticKind, range: TextRange) {
        self.diagnostics.report(kind, range).emit();
    }

    /// Wraps the current token in an `Error` node.
    pub(super) fn skip_as_error(&mut self) {
        if !self.eof() {
            self.start_node(SyntaxKind::Error);
            self.bump();
            self.finish_node();
        }
    }

    pub(super) fn reject(&mut self, kind: DiagnosticKind) {
        self.error(kind);
        self.skip_as_error();
    }

    pub(super) fn reject_with(&mut self, kind: DiagnosticKind, detail: impl AsRef<str>) {
        self.error_with(kind, detail);
        self.skip_as_error();
    }

    /// Reports, then wraps everything up to a token in `recovery` in one `Error` node.
    pub(super) fn recover_until(&mut self, kind: DiagnosticKind, detail: &str, recovery: TokenSet) {
        if self.currently_is_one_of(recovery) || self.should_stop() {
            self.error_with(kind, detail);
            return;
        }
        self.start_node(SyntaxKind::Error);
        self.error_with(kind, detail);
        while !self.currently_is_one_of(recovery) && !self.should_stop() {
            self.bump();
        }
        self.finish_node();
    }
}
