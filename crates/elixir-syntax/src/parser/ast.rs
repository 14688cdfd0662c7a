//! Typed AST wrappers over CST nodes.
//!
//! Each struct wraps a `SyntaxNode` of one kind and provides typed accessors.
//! Children the grammar always builds come back as `Result<_, MissingChild>`;
//! genuinely optional ones as `Option`. The generic queries live on [`AstNode`].

use rowan::TextRange;

use super::cst::{SyntaxKind, SyntaxNode, SyntaxToken};

/// A grammar-guaranteed child was absent, which only happens in recovered trees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{parent:?} at {range:?} has no {child} child")]
pub struct MissingChild {
    pub parent: SyntaxKind,
    pub child: &'static str,
    pub range: TextRange,
}

impl MissingChild {
    pub fn new(parent: &SyntaxNode, child: &'static str) -> Self {
        Self {
            parent: parent.kind(),
            child,
            range: parent.text_range(),
        }
    }
}

pub trait AstNode: Sized {
    /// Name used in [`MissingChild`] reports.
    const NAME: &'static str;

    fn can_cast(kind: SyntaxKind) -> bool;

    fn cast(node: SyntaxNode) -> Option<Self>;

    fn syntax(&self) -> &SyntaxNode;

    fn text_range(&self) -> TextRange {
        self.syntax().text_range()
    }

    /// First direct child of type `T`.
    fn child<T: AstNode>(&self) -> Option<T> {
        self.syntax().children().find_map(T::cast)
    }

    /// Direct children of type `T`, in source order.
    fn children<T: AstNode>(&self) -> impl Iterator<Item = T> {
        self.syntax().children().filter_map(T::cast)
    }

    /// Nodes of type `T` below this one, depth-first in source order. Excludes `self`.
    fn descendants<T: AstNode>(&self) -> impl Iterator<Item = T> {
        self.syntax().descendants().skip(1).filter_map(T::cast)
    }

    fn required_child<T: AstNode>(&self) -> Result<T, MissingChild> {
        self.child::<T>()
            .ok_or_else(|| MissingChild::new(self.syntax(), T::NAME))
    }
}

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            const NAME: &'static str = stringify!($name);

            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                Self::can_cast(node.kind()).then(|| Self(node))
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(File, File);
ast_node!(EndOfExpression, EndOfExpression);
ast_node!(ErrorNode, Error);
ast_node!(Number, Number);
ast_node!(AtomLiteral, AtomLiteral);
ast_node!(QuotedAtom, QuotedAtom);
ast_node!(StringLiteral, StringLiteral);
ast_node!(CharListLiteral, CharListLiteral);
ast_node!(Sigil, Sigil);
ast_node!(Interpolation, Interpolation);
ast_node!(Variable, Variable);
ast_node!(Aliases, Aliases);
ast_node!(QualifiedAlias, QualifiedAlias);
ast_node!(Call, Call);
ast_node!(RemoteCall, RemoteCall);
ast_node!(AnonymousCall, AnonymousCall);
ast_node!(AccessExpression, AccessExpression);
ast_node!(CallArguments, CallArguments);
ast_node!(NoParensArguments, NoParensArguments);
ast_node!(DoBlock, DoBlock);
ast_node!(BlockItem, BlockItem);
ast_node!(AnonymousFunction, AnonymousFunction);
ast_node!(Stab, Stab);
ast_node!(StabClause, StabClause);
ast_node!(StabParameters, StabParameters);
ast_node!(StabGuard, StabGuard);
ast_node!(StabBody, StabBody);
ast_node!(List, List);
ast_node!(Tuple, Tuple);
ast_node!(Binary, Binary);
ast_node!(MapOperation, MapOperation);
ast_node!(StructOperation, StructOperation);
ast_node!(MapArguments, MapArguments);
ast_node!(MapUpdateArguments, MapUpdateArguments);
ast_node!(Associations, Associations);
ast_node!(Association, Association);
ast_node!(Keywords, Keywords);
ast_node!(KeywordPair, KeywordPair);
ast_node!(QuotedKey, QuotedKey);
ast_node!(MultiAlias, MultiAlias);
ast_node!(Parenthesized, Parenthesized);
ast_node!(UnaryOperation, UnaryOperation);
ast_node!(BinaryOperation, BinaryOperation);

/// Expression: any node that can stand where a value is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Number(Number),
    AtomLiteral(AtomLiteral),
    QuotedAtom(QuotedAtom),
    StringLiteral(StringLiteral),
    CharListLiteral(CharListLiteral),
    Sigil(Sigil),
    Variable(Variable),
    Aliases(Aliases),
    QualifiedAlias(QualifiedAlias),
    MultiAlias(MultiAlias),
    Call(Call),
    RemoteCall(RemoteCall),
    AnonymousCall(AnonymousCall),
    AccessExpression(AccessExpression),
    AnonymousFunction(AnonymousFunction),
    List(List),
    Tuple(Tuple),
    Binary(Binary),
    MapOperation(MapOperation),
    StructOperation(StructOperation),
    Parenthesized(Parenthesized),
    UnaryOperation(UnaryOperation),
    BinaryOperation(BinaryOperation),
}

impl AstNode for Expr {
    const NAME: &'static str = "expression";

    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::Number
                | SyntaxKind::AtomLiteral
                | SyntaxKind::QuotedAtom
                | SyntaxKind::StringLiteral
                | SyntaxKind::CharListLiteral
                | SyntaxKind::Sigil
                | SyntaxKind::Variable
                | SyntaxKind::Aliases
                | SyntaxKind::QualifiedAlias
                | SyntaxKind::MultiAlias
                | SyntaxKind::Call
                | SyntaxKind::RemoteCall
                | SyntaxKind::AnonymousCall
                | SyntaxKind::AccessExpression
                | SyntaxKind::AnonymousFunction
                | SyntaxKind::List
                | SyntaxKind::Tuple
                | SyntaxKind::Binary
                | SyntaxKind::MapOperation
                | SyntaxKind::StructOperation
                | SyntaxKind::Parenthesized
                | SyntaxKind::UnaryOperation
                | SyntaxKind::BinaryOperation
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        let expr = match node.kind() {
            SyntaxKind::Number => Expr::Number(Number(node)),
            SyntaxKind::AtomLiteral => Expr::AtomLiteral(AtomLiteral(node)),
            SyntaxKind::QuotedAtom => Expr::QuotedAtom(QuotedAtom(node)),
            SyntaxKind::StringLiteral => Expr::StringLiteral(StringLiteral(node)),
            SyntaxKind::CharListLiteral => Expr::CharListLiteral(CharListLiteral(node)),
            SyntaxKind::Sigil => Expr::Sigil(Sigil(node)),
            SyntaxKind::Variable => Expr::Variable(Variable(node)),
            SyntaxKind::Aliases => Expr::Aliases(Aliases(node)),
            SyntaxKind::QualifiedAlias => Expr::QualifiedAlias(QualifiedAlias(node)),
            SyntaxKind::MultiAlias => Expr::MultiAlias(MultiAlias(node)),
            SyntaxKind::Call => Expr::Call(Call(node)),
            SyntaxKind::RemoteCall => Expr::RemoteCall(RemoteCall(node)),
            SyntaxKind::AnonymousCall => Expr::AnonymousCall(AnonymousCall(node)),
            SyntaxKind::AccessExpression => Expr::AccessExpression(AccessExpression(node)),
            SyntaxKind::AnonymousFunction => Expr::AnonymousFunction(AnonymousFunction(node)),
            SyntaxKind::List => Expr::List(List(node)),
            SyntaxKind::Tuple => Expr::Tuple(Tuple(node)),
            SyntaxKind::Binary => Expr::Binary(Binary(node)),
            SyntaxKind::MapOperation => Expr::MapOperation(MapOperation(node)),
            SyntaxKind::StructOperation => Expr::StructOperation(StructOperation(node)),
            SyntaxKind::Parenthesized => Expr::Parenthesized(Parenthesized(node)),
            SyntaxKind::UnaryOperation => Expr::UnaryOperation(UnaryOperation(node)),
            SyntaxKind::BinaryOperation => Expr::BinaryOperation(BinaryOperation(node)),
            _ => return None,
        };
        Some(expr)
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Expr::Number(n) => n.syntax(),
            Expr::AtomLiteral(n) => n.syntax(),
            Expr::QuotedAtom(n) => n.syntax(),
            Expr::StringLiteral(n) => n.syntax(),
            Expr::CharListLiteral(n) => n.syntax(),
            Expr::Sigil(n) => n.syntax(),
            Expr::Variable(n) => n.syntax(),
            Expr::Aliases(n) => n.syntax(),
            Expr::QualifiedAlias(n) => n.syntax(),
            Expr::MultiAlias(n) => n.syntax(),
            Expr::Call(n) => n.syntax(),
            Expr::RemoteCall(n) => n.syntax(),
            Expr::AnonymousCall(n) => n.syntax(),
            Expr::AccessExpression(n) => n.syntax(),
            Expr::AnonymousFunction(n) => n.syntax(),
            Expr::List(n) => n.syntax(),
            Expr::Tuple(n) => n.syntax(),
            Expr::Binary(n) => n.syntax(),
            Expr::MapOperation(n) => n.syntax(),
            Expr::StructOperation(n) => n.syntax(),
            Expr::Parenthesized(n) => n.syntax(),
            Expr::UnaryOperation(n) => n.syntax(),
            Expr::BinaryOperation(n) => n.syntax(),
        }
    }
}

/// Element of a list, tuple, binary or argument list: a value or trailing keywords.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Element {
    Expr(Expr),
    Keywords(Keywords),
}

impl AstNode for Element {
    const NAME: &'static str = "element";

    fn can_cast(kind: SyntaxKind) -> bool {
        kind == SyntaxKind::Keywords || Expr::can_cast(kind)
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::Keywords => Some(Element::Keywords(Keywords(node))),
            _ => Expr::cast(node).map(Element::Expr),
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Element::Expr(e) => e.syntax(),
            Element::Keywords(k) => k.syntax(),
        }
    }
}

/// Piece of a string, charlist, quoted atom or sigil body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StringPart {
    Fragment(SyntaxToken),
    Escape(SyntaxToken),
    Interpolation(Interpolation),
}

fn token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| t.kind() == kind)
}

/// First token that is neither trivia nor a line break.
fn significant_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| !t.kind().is_trivia() && t.kind() != SyntaxKind::Eol)
}

fn string_parts(node: &SyntaxNode) -> impl Iterator<Item = StringPart> {
    node.children_with_tokens().filter_map(|it| match it {
        rowan::NodeOrToken::Token(t) => match t.kind() {
            SyntaxKind::Fragment => Some(StringPart::Fragment(t)),
            SyntaxKind::EscapeSequence => Some(StringPart::Escape(t)),
            _ => None,
        },
        rowan::NodeOrToken::Node(n) => Interpolation::cast(n).map(StringPart::Interpolation),
    })
}

fn opens_heredoc(node: &SyntaxNode) -> bool {
    token(node, SyntaxKind::HeredocOpen).is_some()
}

impl File {
    pub fn statements(&self) -> impl Iterator<Item = Expr> {
        self.children::<Expr>()
    }

    pub fn end_of_expressions(&self) -> impl Iterator<Item = EndOfExpression> {
        self.children::<EndOfExpression>()
    }
}

impl Number {
    pub fn token(&self) -> Option<SyntaxToken> {
        significant_token(&self.0)
    }
}

impl AtomLiteral {
    /// `:name`, `true`, `false` or `nil`.
    pub fn token(&self) -> Option<SyntaxToken> {
        significant_token(&self.0)
    }
}

impl QuotedAtom {
    pub fn parts(&self) -> impl Iterator<Item = StringPart> {
        string_parts(&self.0)
    }
}

impl StringLiteral {
    pub fn parts(&self) -> impl Iterator<Item = StringPart> {
        string_parts(&self.0)
    }

    pub fn is_heredoc(&self) -> bool {
        opens_heredoc(&self.0)
    }

    pub fn closing_token(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::HeredocClose).or_else(|| {
            self.0
                .children_with_tokens()
                .filter_map(|it| it.into_token())
                .filter(|t| t.kind() == SyntaxKind::DoubleQuote)
                .nth(1)
        })
    }
}

impl CharListLiteral {
    pub fn parts(&self) -> impl Iterator<Item = StringPart> {
        string_parts(&self.0)
    }

    pub fn is_heredoc(&self) -> bool {
        opens_heredoc(&self.0)
    }

    pub fn closing_token(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::HeredocClose).or_else(|| {
            self.0
                .children_with_tokens()
                .filter_map(|it| it.into_token())
                .filter(|t| t.kind() == SyntaxKind::SingleQuote)
                .nth(1)
        })
    }
}

impl Sigil {
    /// The promoter: `r` in `~r/.../`.
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::SigilName)
    }

    pub fn parts(&self) -> impl Iterator<Item = StringPart> {
        string_parts(&self.0)
    }

    pub fn modifiers(&self) -> impl Iterator<Item = SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| t.kind() == SyntaxKind::SigilModifier)
    }

    pub fn is_heredoc(&self) -> bool {
        opens_heredoc(&self.0)
    }

    pub fn closing_token(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::SigilClose).or_else(|| token(&self.0, SyntaxKind::HeredocClose))
    }
}

impl Interpolation {
    pub fn statements(&self) -> impl Iterator<Item = Expr> {
        self.children::<Expr>()
    }
}

impl Variable {
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Identifier)
    }
}

impl Aliases {
    /// `Foo`, `Bar` in `Foo.Bar`.
    pub fn segments(&self) -> impl Iterator<Item = SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| t.kind() == SyntaxKind::Alias)
    }
}

impl QualifiedAlias {
    pub fn receiver(&self) -> Result<Expr, MissingChild> {
        self.required_child()
    }

    pub fn alias(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Alias)
    }
}

impl Call {
    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Identifier)
    }

    pub fn arguments(&self) -> Option<CallArguments> {
        self.child()
    }

    pub fn no_parens_arguments(&self) -> Option<NoParensArguments> {
        self.child()
    }

    pub fn do_block(&self) -> Option<DoBlock> {
        self.child()
    }
}

impl MultiAlias {
    /// `Foo` in `Foo.{Bar, Baz}`.
    pub fn receiver(&self) -> Result<Expr, MissingChild> {
        self.required_child()
    }

    pub fn dot(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Dot)
    }

    pub fn aliases(&self) -> Result<Tuple, MissingChild> {
        match self.children::<Expr>().nth(1) {
            Some(Expr::Tuple(tuple)) => Ok(tuple),
            _ => Err(MissingChild::new(&self.0, "alias tuple")),
        }
    }
}

impl RemoteCall {
    pub fn receiver(&self) -> Result<Expr, MissingChild> {
        self.required_child()
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::Identifier)
    }

    pub fn arguments(&self) -> Option<CallArguments> {
        self.child()
    }

    pub fn no_parens_arguments(&self) -> Option<NoParensArguments> {
        self.child()
    }

    pub fn do_block(&self) -> Option<DoBlock> {
        self.child()
    }
}

impl AnonymousCall {
    pub fn receiver(&self) -> Result<Expr, MissingChild> {
        self.required_child()
    }

    pub fn arguments(&self) -> Result<CallArguments, MissingChild> {
        self.required_child()
    }
}

impl AccessExpression {
    pub fn receiver(&self) -> Result<Expr, MissingChild> {
        self.required_child()
    }

    pub fn key(&self) -> Result<Expr, MissingChild> {
        self.children::<Expr>()
            .nth(1)
            .ok_or_else(|| MissingChild::new(&self.0, "access key"))
    }
}

impl CallArguments {
    pub fn elements(&self) -> impl Iterator<Item = Element> {
        self.children::<Element>()
    }
}

impl NoParensArguments {
    pub fn elements(&self) -> impl Iterator<Item = Element> {
        self.children::<Element>()
    }
}

impl DoBlock {
    pub fn statements(&self) -> impl Iterator<Item = Expr> {
        self.children::<Expr>()
    }

    /// Present when the `do` body is a list of `->` clauses.
    pub fn stab(&self) -> Option<Stab> {
        self.child()
    }

    /// `else`, `after`, `catch` and `rescue` sections.
    pub fn items(&self) -> impl Iterator<Item = BlockItem> {
        self.children::<BlockItem>()
    }
}

impl BlockItem {
    pub fn keyword(&self) -> Option<SyntaxToken> {
        significant_token(&self.0)
    }

    pub fn statements(&self) -> impl Iterator<Item = Expr> {
        self.children::<Expr>()
    }

    pub fn stab(&self) -> Option<Stab> {
        self.child()
    }
}

impl AnonymousFunction {
    pub fn stab(&self) -> Result<Stab, MissingChild> {
        self.required_child()
    }

    /// Line breaks between `fn` and the first clause.
    pub fn end_of_expressions(&self) -> impl Iterator<Item = EndOfExpression> {
        self.children::<EndOfExpression>()
    }
}

impl Stab {
    pub fn clauses(&self) -> impl Iterator<Item = StabClause> {
        self.children::<StabClause>()
    }
}

impl StabClause {
    pub fn parameters(&self) -> Result<StabParameters, MissingChild> {
        self.required_child()
    }

    pub fn guard(&self) -> Option<StabGuard> {
        self.child()
    }

    pub fn body(&self) -> Result<StabBody, MissingChild> {
        self.required_child()
    }
}

impl StabParameters {
    pub fn elements(&self) -> impl Iterator<Item = Element> {
        self.children::<Element>()
    }
}

impl StabGuard {
    pub fn condition(&self) -> Result<Expr, MissingChild> {
        self.required_child()
    }
}

impl StabBody {
    pub fn statements(&self) -> impl Iterator<Item = Expr> {
        self.children::<Expr>()
    }
}

impl List {
    pub fn elements(&self) -> impl Iterator<Item = Element> {
        self.children::<Element>()
    }
}

impl Tuple {
    pub fn elements(&self) -> impl Iterator<Item = Element> {
        self.children::<Element>()
    }
}

impl Binary {
    pub fn elements(&self) -> impl Iterator<Item = Element> {
        self.children::<Element>()
    }
}

impl MapOperation {
    pub fn arguments(&self) -> Result<MapArguments, MissingChild> {
        self.required_child()
    }
}

impl StructOperation {
    /// `Foo` in `%Foo{}`, or a variable, atom or attribute.
    pub fn name(&self) -> Result<Expr, MissingChild> {
        self.required_child()
    }

    pub fn arguments(&self) -> Result<MapArguments, MissingChild> {
        self.required_child()
    }
}

impl MapArguments {
    pub fn update(&self) -> Option<MapUpdateArguments> {
        self.child()
    }

    pub fn associations(&self) -> Option<Associations> {
        self.child()
    }

    pub fn keywords(&self) -> Option<Keywords> {
        self.child()
    }
}

impl MapUpdateArguments {
    /// The map being updated, left of `|`.
    pub fn base(&self) -> Result<Expr, MissingChild> {
        self.required_child()
    }

    pub fn associations(&self) -> Option<Associations> {
        self.child()
    }

    pub fn keywords(&self) -> Option<Keywords> {
        self.child()
    }
}

impl Associations {
    pub fn associations(&self) -> impl Iterator<Item = Association> {
        self.children::<Association>()
    }
}

impl Association {
    pub fn key(&self) -> Result<Expr, MissingChild> {
        self.required_child()
    }

    pub fn value(&self) -> Result<Expr, MissingChild> {
        self.children::<Expr>()
            .nth(1)
            .ok_or_else(|| MissingChild::new(&self.0, "association value"))
    }
}

impl Keywords {
    pub fn pairs(&self) -> impl Iterator<Item = KeywordPair> {
        self.children::<KeywordPair>()
    }
}

impl KeywordPair {
    pub fn key(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::KeywordKey)
    }

    /// `"a b"` in `"a b": value`.
    pub fn quoted_key(&self) -> Option<QuotedKey> {
        self.child()
    }

    /// Key without the trailing `:`. `None` for quoted keys.
    pub fn key_name(&self) -> Option<String> {
        self.key()
            .map(|t| t.text().trim_end_matches(':').to_string())
    }

    pub fn value(&self) -> Result<Expr, MissingChild> {
        self.required_child()
    }
}

impl QuotedKey {
    pub fn parts(&self) -> impl Iterator<Item = StringPart> {
        string_parts(&self.0)
    }
}

impl Parenthesized {
    pub fn statements(&self) -> impl Iterator<Item = Expr> {
        self.children::<Expr>()
    }
}

impl UnaryOperation {
    pub fn operator(&self) -> Option<SyntaxToken> {
        significant_token(&self.0)
    }

    pub fn operand(&self) -> Result<Expr, MissingChild> {
        self.required_child()
    }
}

impl BinaryOperation {
    pub fn lhs(&self) -> Result<Expr, MissingChild> {
        self.required_child()
    }

    pub fn rhs(&self) -> Result<Expr, MissingChild> {
        self.children::<Expr>()
            .nth(1)
            .ok_or_else(|| MissingChild::new(&self.0, "right operand"))
    }

    /// Operator tokens between the operands: one, or two for `not in`.
    pub fn operators(&self) -> impl Iterator<Item = SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| !t.kind().is_trivia() && t.kind() != SyntaxKind::Eol)
    }

    pub fn operator(&self) -> Option<SyntaxToken> {
        self.operators().next()
    }

    pub fn is_not_in(&self) -> bool {
        let mut ops = self.operators().map(|t| t.kind());
        ops.next() == Some(SyntaxKind::KwNot) && ops.next() == Some(SyntaxKind::KwIn)
    }
}
