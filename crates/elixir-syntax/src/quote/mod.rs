//! Lowering of syntax trees to Elixir's quoted-expression form.
//!
//! The output matches what `Code.string_to_quoted!/1` produces for the same
//! source: `{name, meta, args}` triples, two-element tuples, lists and literals.
//! Quoting is a pure function of the subtree; nothing is cached.

mod line_index;
mod literals;
mod term;


use rowan::{TextRange, TextSize};

use crate::parser::ast::{
    AccessExpression, Aliases, AnonymousCall, AnonymousFunction, AstNode, AtomLiteral,
    BinaryOperation, BlockItem, Call, CallArguments, CharListLiteral, DoBlock, Expr, File,
    Interpolation, KeywordPair, Keywords, MapArguments, MapOperation, MissingChild, MultiAlias,
    NoParensArguments, Number, QualifiedAlias, QuotedAtom, RemoteCall, Sigil, Stab, StabClause,
    StringLiteral, StringPart, StructOperation, UnaryOperation, Variable,
};
use crate::parser::cst::{SyntaxKind, SyntaxNode, SyntaxToken};
use crate::parser::Parse;

use line_index::LineIndex;
use literals::{char_value, float_value, integer_value, unescape};

pub use term::{Atom, Call as CallTerm, Meta, Term};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuoteError {
    #[error(transparent)]
    MissingChild(#[from] MissingChild),

    /// The subtree cannot be quoted: an `Error` node or a token with no quoted form.
    #[error("cannot quote {kind:?} at {range:?}: {reason}")]
    Malformed {
        kind: SyntaxKind,
        range: TextRange,
        reason: &'static str,
    },
}

impl QuoteError {
    fn malformed(node: &SyntaxNode, reason: &'static str) -> Self {
        QuoteError::Malformed {
            kind: node.kind(),
            range: node.text_range(),
            reason,
        }
    }
}

type Result<T> = std::result::Result<T, QuoteError>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuoteOptions {
    /// Adds `column:` next to `line:` in every meta.
    pub columns: bool,
}

impl QuoteOptions {
    pub fn columns(mut self, value: bool) -> Self {
        self.columns = value;
        self
    }
}

/// Quotes a whole parse with default options.
pub fn quote(parse: &Parse, source: &str) -> Result<Term> {
    tracing::debug!(bytes = source.len(), "quoting file");
    Quoter::new(source, QuoteOptions::default()).quote_file(&parse.file())
}

pub struct Quoter<'src> {
    lines: LineIndex<'src>,
    options: QuoteOptions,
}

/// Literal text or an interpolated expression inside a string-like body.
enum Segment {
    Text(String),
    Interpolated { expr: Term, meta: Meta },
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Escapes {
    Decode,
    Keep,
}

impl<'src> Quoter<'src> {
    pub fn new(source: &'src str, options: QuoteOptions) -> Self {
        Self {
            lines: LineIndex::new(source),
            options,
        }
    }

    pub fn quote_file(&self, file: &File) -> Result<Term> {
        let statements = self.statements(file.syntax())?;
        tracing::trace!(statements = statements.len(), "quoted file");
        Ok(block(statements))
    }

    /// Any node with a quoted form: expressions, keyword lists and pairs, stab clauses,
    /// `do` blocks and interpolations.
    pub fn quote_node(&self, node: &SyntaxNode) -> Result<Term> {
        if let Some(expr) = Expr::cast(node.clone()) {
            return self.quote_expr(&expr);
        }
        match node.kind() {
            SyntaxKind::File => self.quote_file(&cast(node)?),
            SyntaxKind::Keywords => Ok(Term::List(self.keyword_pairs(&cast(node)?)?)),
            SyntaxKind::KeywordPair => self.keyword_pair(&cast(node)?),
            SyntaxKind::Association => {
                let association: crate::parser::ast::Association = cast(node)?;
                Ok(Term::pair(
                    self.quote_expr(&association.key()?)?,
                    self.quote_expr(&association.value()?)?,
                ))
            }
            SyntaxKind::Stab => Ok(Term::List(self.stab(&cast(node)?)?)),
            SyntaxKind::StabClause => self.stab_clause(&cast(node)?),
            SyntaxKind::DoBlock => self.do_block(&cast(node)?),
            SyntaxKind::Interpolation => self.interpolation(&cast(node)?),
            SyntaxKind::MapArguments => {
                let args: MapArguments = cast(node)?;
                Ok(Term::call(
                    Term::atom("%{}"),
                    self.meta(node.text_range().start()),
                    self.map_entries(&args)?,
                ))
            }
            SyntaxKind::Error => Err(QuoteError::malformed(node, "syntax error")),
            _ => Err(QuoteError::malformed(node, "node has no quoted form")),
        }
    }

    /// Identifiers, aliases, atoms, keyword keys and numbers.
    pub fn quote_token(&self, token: &SyntaxToken) -> Result<Term> {
        let text = token.text();
        let term = match token.kind() {
            SyntaxKind::Alias => Term::atom(text),
            SyntaxKind::Identifier => Term::variable(text, self.meta(token.text_range().start())),
            SyntaxKind::Atom => Term::atom(&text[1..]),
            SyntaxKind::KeywordKey => Term::atom(text.trim_end_matches(':')),
            SyntaxKind::KwTrue | SyntaxKind::KwFalse | SyntaxKind::KwNil => Term::atom(text),
            SyntaxKind::Float => Term::Float(float_value(text)),
            SyntaxKind::Char => Term::Integer(char_value(text).into()),
            kind @ (SyntaxKind::Integer
            | SyntaxKind::HexInteger
            | SyntaxKind::OctalInteger
            | SyntaxKind::BinaryInteger) => Term::Integer(integer_value(kind, text)),
            SyntaxKind::Fragment => Term::Binary(text.to_string()),
            kind => {
                return Err(QuoteError::Malformed {
                    kind,
                    range: token.text_range(),
                    reason: "token has no quoted form",
                });
            }
        };
        Ok(term)
    }

    pub fn quote_expr(&self, expr: &Expr) -> Result<Term> {
        match expr {
            Expr::Number(n) => self.number(n),
            Expr::AtomLiteral(a) => self.atom_literal(a),
            Expr::QuotedAtom(a) => self.quoted_atom(a),
            Expr::StringLiteral(s) => self.string(s),
            Expr::CharListLiteral(c) => self.charlist(c),
            Expr::Sigil(s) => self.sigil(s),
            Expr::Variable(v) => self.variable(v),
            Expr::Aliases(a) => self.aliases(a),
            Expr::QualifiedAlias(a) => self.qualified_alias(a),
            Expr::MultiAlias(a) => self.multi_alias(a),
            Expr::Call(c) => self.call(c),
            Expr::RemoteCall(c) => self.remote_call(c),
            Expr::AnonymousCall(c) => self.anonymous_call(c),
            Expr::AccessExpression(a) => self.access(a),
            Expr::AnonymousFunction(f) => self.anonymous_function(f),
            Expr::List(l) => Ok(Term::List(self.list_elements(l.syntax())?)),
            Expr::Tuple(t) => {
                let mut elements = self.arguments(t.syntax())?;
                if elements.len() == 2 {
                    let right = elements.pop().unwrap_or_else(Term::nil);
                    let left = elements.pop().unwrap_or_else(Term::nil);
                    return Ok(Term::pair(left, right));
                }
                Ok(Term::call(Term::atom("{}"), self.node_meta(t.syntax()), elements))
            }
            Expr::Binary(b) => Ok(Term::call(
                Term::atom("<<>>"),
                self.node_meta(b.syntax()),
                self.arguments(b.syntax())?,
            )),
            Expr::MapOperation(m) => self.map(m),
            Expr::StructOperation(s) => self.structure(s),
            Expr::Parenthesized(p) => Ok(block(self.statements(p.syntax())?)),
            Expr::UnaryOperation(u) => self.unary(u),
            Expr::BinaryOperation(b) => self.binary(b),
        }
    }

    fn meta(&self, offset: TextSize) -> Meta {
        if self.options.columns {
            let (line, column) = self.lines.line_col(offset);
            Meta::line(line).with("column", Term::Integer(column.into()))
        } else {
            Meta::line(self.lines.line(offset))
        }
    }

    /// Meta at the first significant token of `node`.
    fn node_meta(&self, node: &SyntaxNode) -> Meta {
        let start = node
            .descendants_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| !t.kind().is_trivia() && t.kind() != SyntaxKind::Eol)
            .map_or(node.text_range().start(), |t| t.text_range().start());
        self.meta(start)
    }

    fn token_meta(&self, token: &SyntaxToken) -> Meta {
        self.meta(token.text_range().start())
    }

    /// Expressions directly under `parent`, separated by line breaks.
    fn statements(&self, parent: &SyntaxNode) -> Result<Vec<Term>> {
        let mut terms = Vec::new();
        for child in parent.children() {
            reject_error(&child)?;
            if let Some(expr) = Expr::cast(child) {
                terms.push(self.quote_expr(&expr)?);
            }
        }
        Ok(terms)
    }

    /// Argument-style elements: trailing keywords become one keyword-list element.
    fn arguments(&self, parent: &SyntaxNode) -> Result<Vec<Term>> {
        let mut terms = Vec::new();
        for child in parent.children() {
            reject_error(&child)?;
            if let Some(keywords) = Keywords::cast(child.clone()) {
                terms.push(Term::List(self.keyword_pairs(&keywords)?));
            } else if let Some(expr) = Expr::cast(child) {
                terms.push(self.quote_expr(&expr)?);
            }
        }
        Ok(terms)
    }

    /// List elements: keyword pairs are spliced in as tuples.
    fn list_elements(&self, parent: &SyntaxNode) -> Result<Vec<Term>> {
        let mut terms = Vec::new();
        for child in parent.children() {
            reject_error(&child)?;
            if let Some(keywords) = Keywords::cast(child.clone()) {
                terms.extend(self.keyword_pairs(&keywords)?);
            } else if let Some(expr) = Expr::cast(child) {
                terms.push(self.quote_expr(&expr)?);
            }
        }
        Ok(terms)
    }

    fn keyword_pairs(&self, keywords: &Keywords) -> Result<Vec<Term>> {
        reject_error_children(keywords.syntax())?;
        keywords
            .pairs()
            .map(|pair| self.keyword_pair(&pair))
            .collect()
    }

    fn keyword_pair(&self, pair: &KeywordPair) -> Result<Term> {
        let key = match (pair.key_name(), pair.quoted_key()) {
            (Some(name), _) => Term::atom(&name),
            (None, Some(quoted)) => {
                reject_error_children(quoted.syntax())?;
                self.atom_from_parts(quoted.parts(), quoted.syntax())?
            }
            (None, None) => return Err(MissingChild::new(pair.syntax(), "keyword key").into()),
        };
        Ok(Term::pair(key, self.quote_expr(&pair.value()?)?))
    }

    fn number(&self, number: &Number) -> Result<Term> {
        let token = number
            .token()
            .ok_or_else(|| MissingChild::new(number.syntax(), "number token"))?;
        self.quote_token(&token)
    }

    fn atom_literal(&self, atom: &AtomLiteral) -> Result<Term> {
        let token = atom
            .token()
            .ok_or_else(|| MissingChild::new(atom.syntax(), "atom token"))?;
        self.quote_token(&token)
    }

    fn variable(&self, variable: &Variable) -> Result<Term> {
        let name = variable
            .name()
            .ok_or_else(|| MissingChild::new(variable.syntax(), "identifier"))?;
        Ok(Term::variable(name.text(), self.token_meta(&name)))
    }

    /// `Foo.Bar` → `{:__aliases__, meta, [:Foo, :Bar]}`
    fn aliases(&self, aliases: &Aliases) -> Result<Term> {
        let segments: Vec<Term> = aliases.segments().map(|t| Term::atom(t.text())).collect();
        if segments.is_empty() {
            return Err(MissingChild::new(aliases.syntax(), "alias").into());
        }
        Ok(Term::call(
            Term::atom("__aliases__"),
            self.node_meta(aliases.syntax()),
            segments,
        ))
    }

    /// `expr.Alias` → `{:__aliases__, meta, [expr, :Alias]}`
    fn qualified_alias(&self, alias: &QualifiedAlias) -> Result<Term> {
        let receiver = self.quote_expr(&alias.receiver()?)?;
        let name = alias
            .alias()
            .ok_or_else(|| MissingChild::new(alias.syntax(), "alias"))?;
        Ok(Term::call(
            Term::atom("__aliases__"),
            self.token_meta(&name),
            vec![receiver, Term::atom(name.text())],
        ))
    }

    /// `Foo.{Bar, Baz}` → `{{:., meta, [Foo, :{}]}, meta, [Bar, Baz]}`
    fn multi_alias(&self, alias: &MultiAlias) -> Result<Term> {
        let receiver = self.quote_expr(&alias.receiver()?)?;
        let tuple = alias.aliases()?;
        let meta = match alias.dot() {
            Some(dot) => self.token_meta(&dot),
            None => self.node_meta(tuple.syntax()),
        };
        let dot = Term::call(
            Term::atom("."),
            meta.clone(),
            vec![receiver, Term::atom("{}")],
        );
        Ok(Term::call(dot, meta, self.arguments(tuple.syntax())?))
    }

    fn call(&self, call: &Call) -> Result<Term> {
        let name = call
            .name()
            .ok_or_else(|| MissingChild::new(call.syntax(), "function name"))?;
        let args = self.call_arguments(
            call.arguments().as_ref(),
            call.no_parens_arguments().as_ref(),
            call.do_block().as_ref(),
        )?;
        Ok(Term::call(Term::atom(name.text()), self.token_meta(&name), args))
    }

    fn call_arguments(
        &self,
        parens: Option<&CallArguments>,
        no_parens: Option<&NoParensArguments>,
        do_block: Option<&DoBlock>,
    ) -> Result<Vec<Term>> {
        let mut args = match (parens, no_parens) {
            (Some(args), _) => self.arguments(args.syntax())?,
            (None, Some(args)) => self.arguments(args.syntax())?,
            (None, None) => Vec::new(),
        };
        if let Some(block) = do_block {
            args.push(self.do_block(block)?);
        }
        Ok(args)
    }

    /// `recv.name(args)` → `{{:., meta, [recv, :name]}, meta, args}`
    fn remote_call(&self, call: &RemoteCall) -> Result<Term> {
        let receiver = self.quote_expr(&call.receiver()?)?;
        let name = call
            .name()
            .ok_or_else(|| MissingChild::new(call.syntax(), "function name"))?;
        let meta = self.token_meta(&name);
        let parens = call.arguments();
        let args = self.call_arguments(
            parens.as_ref(),
            call.no_parens_arguments().as_ref(),
            call.do_block().as_ref(),
        )?;

        let dot = Term::call(
            Term::atom("."),
            meta.clone(),
            vec![receiver, Term::atom(name.text())],
        );
        let call_meta = if parens.is_none() && args.is_empty() {
            meta.prepend("no_parens", Term::boolean(true))
        } else {
            meta
        };
        Ok(Term::call(dot, call_meta, args))
    }

    /// `fun.(args)` → `{{:., meta, [fun]}, meta, args}`
    fn anonymous_call(&self, call: &AnonymousCall) -> Result<Term> {
        let receiver = self.quote_expr(&call.receiver()?)?;
        let arguments = call.arguments()?;
        let meta = self.node_meta(arguments.syntax());
        let dot = Term::call(Term::atom("."), meta.clone(), vec![receiver]);
        Ok(Term::call(dot, meta, self.arguments(arguments.syntax())?))
    }

    /// `recv[key]` → `Access.get(recv, key)`
    fn access(&self, access: &AccessExpression) -> Result<Term> {
        let receiver = self.quote_expr(&access.receiver()?)?;
        let key = self.quote_expr(&access.key()?)?;
        let bracket = access
            .syntax()
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| t.kind() == SyntaxKind::BracketOpen);
        let meta = match bracket {
            Some(token) => self.token_meta(&token),
            None => self.node_meta(access.syntax()),
        };
        let meta = meta.prepend("from_brackets", Term::boolean(true));
        let dot = Term::call(
            Term::atom("."),
            meta.clone(),
            vec![Term::module("Access"), Term::atom("get")],
        );
        Ok(Term::call(dot, meta, vec![receiver, key]))
    }

    /// `[do: body, else: body, ...]`
    fn do_block(&self, block: &DoBlock) -> Result<Term> {
        reject_error_children(block.syntax())?;
        let mut sections = vec![(Atom::new("do"), self.block_body(block.syntax(), block.stab())?)];
        for item in block.items() {
            sections.push(self.block_item(&item)?);
        }
        Ok(Term::keywords(sections))
    }

    fn block_item(&self, item: &BlockItem) -> Result<(Atom, Term)> {
        let keyword = item
            .keyword()
            .ok_or_else(|| MissingChild::new(item.syntax(), "block keyword"))?;
        let body = self.block_body(item.syntax(), item.stab())?;
        Ok((Atom::new(keyword.text()), body))
    }

    /// Stab clauses as a list, or the statements as a block.
    fn block_body(&self, parent: &SyntaxNode, stab: Option<Stab>) -> Result<Term> {
        match stab {
            Some(stab) => Ok(Term::List(self.stab(&stab)?)),
            None => Ok(block(self.statements(parent)?)),
        }
    }

    /// `fn ... end` → `{:fn, meta, clauses}`
    fn anonymous_function(&self, function: &AnonymousFunction) -> Result<Term> {
        let clauses = self.stab(&function.stab()?)?;
        Ok(Term::call(
            Term::atom("fn"),
            self.node_meta(function.syntax()),
            clauses,
        ))
    }

    fn stab(&self, stab: &Stab) -> Result<Vec<Term>> {
        reject_error_children(stab.syntax())?;
        stab.clauses().map(|c| self.stab_clause(&c)).collect()
    }

    /// `params when guard -> body` → `{:->, meta, [[{:when, meta, params ++ [guard]}], body]}`
    fn stab_clause(&self, clause: &StabClause) -> Result<Term> {
        reject_error_children(clause.syntax())?;
        let mut params = self.arguments(clause.parameters()?.syntax())?;

        if let Some(guard) = clause.guard() {
            let condition = self.quote_expr(&guard.condition()?)?;
            params.push(condition);
            params = vec![Term::call(
                Term::atom("when"),
                self.node_meta(guard.syntax()),
                params,
            )];
        }

        let body = block(self.statements(clause.body()?.syntax())?);
        let arrow = clause
            .syntax()
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| t.kind() == SyntaxKind::Arrow)
            .ok_or_else(|| MissingChild::new(clause.syntax(), "`->`"))?;
        Ok(Term::call(
            Term::atom("->"),
            self.token_meta(&arrow),
            vec![Term::List(params), body],
        ))
    }

    /// `%{...}` → `{:%{}, meta, entries}`
    fn map(&self, map: &MapOperation) -> Result<Term> {
        let entries = self.map_entries(&map.arguments()?)?;
        Ok(Term::call(
            Term::atom("%{}"),
            self.node_meta(map.syntax()),
            entries,
        ))
    }

    /// `%Name{...}` → `{:%, meta, [name, {:%{}, meta, entries}]}`
    fn structure(&self, structure: &StructOperation) -> Result<Term> {
        let meta = self.node_meta(structure.syntax());
        let name = self.quote_expr(&structure.name()?)?;
        let arguments = structure.arguments()?;
        let map = Term::call(
            Term::atom("%{}"),
            self.node_meta(arguments.syntax()),
            self.map_entries(&arguments)?,
        );
        Ok(Term::call(Term::atom("%"), meta, vec![name, map]))
    }

    /// Map entries as pairs. An update becomes a single `{:|, meta, [base, pairs]}` entry.
    fn map_entries(&self, arguments: &MapArguments) -> Result<Vec<Term>> {
        reject_error_children(arguments.syntax())?;
        if let Some(update) = arguments.update() {
            reject_error_children(update.syntax())?;
            let base = self.quote_expr(&update.base()?)?;
            let mut pairs = Vec::new();
            if let Some(associations) = update.associations() {
                pairs.extend(self.association_pairs(&associations)?);
            }
            if let Some(keywords) = update.keywords() {
                pairs.extend(self.keyword_pairs(&keywords)?);
            }
            let bar = update
                .syntax()
                .children_with_tokens()
                .filter_map(|it| it.into_token())
                .find(|t| t.kind() == SyntaxKind::Bar);
            let meta = match bar {
                Some(token) => self.token_meta(&token),
                None => self.node_meta(update.syntax()),
            };
            return Ok(vec![Term::call(
                Term::atom("|"),
                meta,
                vec![base, Term::List(pairs)],
            )]);
        }

        let mut entries = Vec::new();
        if let Some(associations) = arguments.associations() {
            entries.extend(self.association_pairs(&associations)?);
        }
        if let Some(keywords) = arguments.keywords() {
            entries.extend(self.keyword_pairs(&keywords)?);
        }
        Ok(entries)
    }

    fn association_pairs(
        &self,
        associations: &crate::parser::ast::Associations,
    ) -> Result<Vec<Term>> {
        reject_error_children(associations.syntax())?;
        associations
            .associations()
            .map(|a| {
                reject_error_children(a.syntax())?;
                Ok(Term::pair(
                    self.quote_expr(&a.key()?)?,
                    self.quote_expr(&a.value()?)?,
                ))
            })
            .collect()
    }

    fn unary(&self, unary: &UnaryOperation) -> Result<Term> {
        let operator = unary
            .operator()
            .ok_or_else(|| MissingChild::new(unary.syntax(), "operator"))?;
        let operand = unary.operand()?;

        if operator.kind() == SyntaxKind::Minus
            && let Expr::Number(number) = &operand
        {
            match self.number(number)? {
                Term::Integer(n) => return Ok(Term::Integer(-n)),
                Term::Float(x) => return Ok(Term::Float(-x)),
                _ => {}
            }
        }

        Ok(Term::call(
            Term::atom(operator.text()),
            self.token_meta(&operator),
            vec![self.quote_expr(&operand)?],
        ))
    }

    /// `a op b` → `{:op, meta, [a, b]}`; `a not in b` → `{:not, meta, [{:in, meta, [a, b]}]}`
    fn binary(&self, binary: &BinaryOperation) -> Result<Term> {
        reject_error_children(binary.syntax())?;
        let operator = binary
            .operator()
            .ok_or_else(|| MissingChild::new(binary.syntax(), "operator"))?;
        if operator.kind() == SyntaxKind::SlashSlash {
            return self.stepped_range(binary);
        }
        let meta = self.token_meta(&operator);
        let lhs = self.quote_expr(&binary.lhs()?)?;
        let rhs = self.quote_expr(&binary.rhs()?)?;

        if binary.is_not_in() {
            let inner = Term::call(Term::atom("in"), meta.clone(), vec![lhs, rhs]);
            return Ok(Term::call(Term::atom("not"), meta, vec![inner]));
        }
        Ok(Term::call(Term::atom(operator.text()), meta, vec![lhs, rhs]))
    }

    /// `first..last//step` → `{:"..//", meta, [first, last, step]}` with the meta of `..`
    fn stepped_range(&self, binary: &BinaryOperation) -> Result<Term> {
        let Expr::BinaryOperation(range) = binary.lhs()? else {
            return Err(QuoteError::malformed(binary.syntax(), "range step without range"));
        };
        let Some(dots) = range.operator().filter(|t| t.kind() == SyntaxKind::DotDot) else {
            return Err(QuoteError::malformed(binary.syntax(), "range step without range"));
        };
        reject_error_children(range.syntax())?;
        let args = vec![
            self.quote_expr(&range.lhs()?)?,
            self.quote_expr(&range.rhs()?)?,
            self.quote_expr(&binary.rhs()?)?,
        ];
        Ok(Term::call(Term::atom("..//"), self.token_meta(&dots), args))
    }

    fn interpolation(&self, interpolation: &Interpolation) -> Result<Term> {
        Ok(block(self.statements(interpolation.syntax())?))
    }

    /// Groups body parts into literal text and interpolated expressions.
    /// Heredoc lines lose up to `indent` leading blanks.
    fn segments(
        &self,
        parts: impl Iterator<Item = StringPart>,
        escapes: Escapes,
        indent: Option<usize>,
    ) -> Result<Vec<Segment>> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut at_line_start = true;

        for part in parts {
            match part {
                StringPart::Fragment(token) => {
                    let fragment = token.text();
                    let fragment = match indent {
                        Some(indent) if at_line_start => dedent(fragment, indent),
                        _ => fragment,
                    };
                    text.push_str(fragment);
                    at_line_start = fragment.ends_with('\n');
                }
                StringPart::Escape(token) => {
                    match escapes {
                        Escapes::Decode => text.push_str(&unescape(token.text())),
                        Escapes::Keep => text.push_str(token.text()),
                    }
                    at_line_start = token.text().ends_with('\n');
                }
                StringPart::Interpolation(interpolation) => {
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Interpolated {
                        expr: self.interpolation(&interpolation)?,
                        meta: self.node_meta(interpolation.syntax()),
                    });
                    at_line_start = false;
                }
            }
        }
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }
        Ok(segments)
    }

    /// `Kernel.to_string(expr)` as produced for `#{expr}`.
    fn to_string_call(expr: Term, meta: Meta) -> Term {
        let dot = Term::call(
            Term::atom("."),
            meta.clone(),
            vec![Term::module("Kernel"), Term::atom("to_string")],
        );
        Term::call(
            dot,
            meta.prepend("from_interpolation", Term::boolean(true)),
            vec![expr],
        )
    }

    /// Parts of a `<<>>` binary: text, or `to_string(expr) :: binary`.
    fn binary_parts(segments: Vec<Segment>) -> Vec<Term> {
        segments
            .into_iter()
            .map(|segment| match segment {
                Segment::Text(text) => Term::Binary(text),
                Segment::Interpolated { expr, meta } => {
                    let binary = Term::variable("binary", meta.clone());
                    Term::call(
                        Term::atom("::"),
                        meta.clone(),
                        vec![Self::to_string_call(expr, meta), binary],
                    )
                }
            })
            .collect()
    }

    fn string(&self, string: &StringLiteral) -> Result<Term> {
        reject_error_children(string.syntax())?;
        let indent = string
            .is_heredoc()
            .then(|| heredoc_indent(string.closing_token().as_ref()));
        let segments = self.segments(string.parts(), Escapes::Decode, indent)?;
        Ok(match interpolated(&segments) {
            false => Term::Binary(plain_text(segments)),
            true => Term::call(
                Term::atom("<<>>"),
                self.node_meta(string.syntax()),
                Self::binary_parts(segments),
            ),
        })
    }

    /// `'abc'` → `[97, 98, 99]`; with interpolation → `List.to_charlist([...])`
    fn charlist(&self, charlist: &CharListLiteral) -> Result<Term> {
        reject_error_children(charlist.syntax())?;
        let indent = charlist
            .is_heredoc()
            .then(|| heredoc_indent(charlist.closing_token().as_ref()));
        let segments = self.segments(charlist.parts(), Escapes::Decode, indent)?;
        if !interpolated(&segments) {
            return Ok(Term::charlist(&plain_text(segments)));
        }

        let meta = self.node_meta(charlist.syntax());
        let parts = segments
            .into_iter()
            .map(|segment| match segment {
                Segment::Text(text) => Term::Binary(text),
                Segment::Interpolated { expr, meta } => Self::to_string_call(expr, meta),
            })
            .collect();
        let dot = Term::call(
            Term::atom("."),
            meta.clone(),
            vec![Term::module("List"), Term::atom("to_charlist")],
        );
        Ok(Term::call(dot, meta, vec![Term::List(parts)]))
    }

    /// `:"name"` → `:name`; with interpolation → `:erlang.binary_to_atom(<<...>>, :utf8)`
    fn quoted_atom(&self, atom: &QuotedAtom) -> Result<Term> {
        reject_error_children(atom.syntax())?;
        self.atom_from_parts(atom.parts(), atom.syntax())
    }

    /// Body of a quoted atom or quoted keyword key.
    fn atom_from_parts(
        &self,
        parts: impl Iterator<Item = StringPart>,
        node: &SyntaxNode,
    ) -> Result<Term> {
        let segments = self.segments(parts, Escapes::Decode, None)?;
        if !interpolated(&segments) {
            return Ok(Term::atom(&plain_text(segments)));
        }

        let meta = self.node_meta(node);
        let binary = Term::call(Term::atom("<<>>"), meta.clone(), Self::binary_parts(segments));
        let dot = Term::call(
            Term::atom("."),
            meta.clone(),
            vec![Term::atom("erlang"), Term::atom("binary_to_atom")],
        );
        Ok(Term::call(dot, meta, vec![binary, Term::atom("utf8")]))
    }

    /// `~r/body/mods` → `{:sigil_r, meta, [{:<<>>, meta, parts}, ~c"mods"]}`
    fn sigil(&self, sigil: &Sigil) -> Result<Term> {
        reject_error_children(sigil.syntax())?;
        let name = sigil
            .name()
            .ok_or_else(|| MissingChild::new(sigil.syntax(), "sigil name"))?;
        let opener = sigil
            .syntax()
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| matches!(t.kind(), SyntaxKind::SigilOpen | SyntaxKind::HeredocOpen))
            .ok_or_else(|| MissingChild::new(sigil.syntax(), "sigil delimiter"))?;
        let delimiter = opener.text().trim_end();

        let indent = sigil
            .is_heredoc()
            .then(|| heredoc_indent(sigil.closing_token().as_ref()));
        let segments = self.segments(sigil.parts(), Escapes::Keep, indent)?;
        let meta = self.node_meta(sigil.syntax());
        let body = Term::call(
            Term::atom("<<>>"),
            meta.clone(),
            Self::binary_parts(segments),
        );
        let modifiers: String = sigil.modifiers().map(|t| t.text().to_string()).collect();

        Ok(Term::call(
            Term::atom(&format!("sigil_{}", name.text())),
            meta.prepend("delimiter", Term::Binary(delimiter.to_string())),
            vec![body, Term::charlist(&modifiers)],
        ))
    }
}

/// Zero expressions → empty `__block__`, one → itself, more → `__block__`.
fn block(mut terms: Vec<Term>) -> Term {
    if terms.len() == 1 {
        return terms.remove(0);
    }
    Term::call(Term::atom("__block__"), Meta::empty(), terms)
}

fn cast<T: AstNode>(node: &SyntaxNode) -> Result<T> {
    T::cast(node.clone()).ok_or_else(|| QuoteError::malformed(node, "unexpected node kind"))
}

fn reject_error(node: &SyntaxNode) -> Result<()> {
    if node.kind() == SyntaxKind::Error {
        return Err(QuoteError::malformed(node, "syntax error"));
    }
    Ok(())
}

fn reject_error_children(node: &SyntaxNode) -> Result<()> {
    node.children().try_for_each(|child| reject_error(&child))
}

fn interpolated(segments: &[Segment]) -> bool {
    segments
        .iter()
        .any(|s| matches!(s, Segment::Interpolated { .. }))
}

fn plain_text(segments: Vec<Segment>) -> String {
    segments
        .into_iter()
        .filter_map(|s| match s {
            Segment::Text(text) => Some(text),
            Segment::Interpolated { .. } => None,
        })
        .collect()
}

/// Blanks in front of the closing `"""`.
fn heredoc_indent(closing: Option<&SyntaxToken>) -> usize {
    closing.map_or(0, |token| {
        token
            .text()
            .chars()
            .take_while(|c| matches!(c, ' ' | '\t'))
            .count()
    })
}

fn dedent(line: &str, indent: usize) -> &str {
    let blanks = line
        .bytes()
        .take(indent)
        .take_while(|b| matches!(b, b' ' | b'\t'))
        .count();
    &line[blanks..]
}
