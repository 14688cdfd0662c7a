//! Syntax kinds for Elixir.
//!
//! `SyntaxKind` serves dual roles: token kinds (from the lexer) and node kinds (from the parser).
//! Logos derives the code-state recognition rules; body tokens (fragments, escapes, sigil parts)
//! and node kinds carry no token/regex attributes because other lexical states produce them.
//! `ElixirLanguage` implements Rowan's `Language` trait for tree construction.

use logos::Logos;
use rowan::Language;

/// All token and node kinds. Tokens first, then nodes, then `__LAST` sentinel.
/// `#[repr(u16)]` enables safe transmute in `kind_from_raw`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("(")]
    ParenOpen = 0,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token("<<")]
    BinaryOpen,

    #[token(">>")]
    BinaryClose,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    /// Struct/map introducer: `%{}` and `%Name{}`
    #[token("%")]
    Percent,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("**")]
    StarStar,

    /// Range step in `first..last//step`
    #[token("//")]
    SlashSlash,

    #[token("++")]
    PlusPlus,

    #[token("--")]
    MinusMinus,

    #[token("+++")]
    PlusPlusPlus,

    #[token("---")]
    MinusMinusMinus,

    #[token("..")]
    DotDot,

    #[token("<>")]
    Concat,

    #[token("|>")]
    PipeRight,

    #[token("|")]
    Bar,

    #[token("||")]
    BarBar,

    #[token("|||")]
    BarBarBar,

    #[token("&")]
    Ampersand,

    #[token("&&")]
    AmpAmp,

    #[token("&&&")]
    AmpAmpAmp,

    #[token("==")]
    EqEq,

    #[token("!=")]
    NotEq,

    #[token("===")]
    EqEqEq,

    #[token("!==")]
    NotEqEq,

    #[token("=~")]
    EqTilde,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    #[token("=")]
    Eq,

    #[token("!")]
    Bang,

    #[token("^")]
    Caret,

    #[token("~~~")]
    TildeTildeTilde,

    #[token("<<<")]
    LtLtLt,

    #[token(">>>")]
    GtGtGt,

    #[token("<<~")]
    LtLtTilde,

    #[token("~>>")]
    TildeGtGt,

    #[token("<~")]
    LtTilde,

    #[token("~>")]
    TildeGt,

    #[token("<~>")]
    LtTildeGt,

    #[token("<|>")]
    LtBarGt,

    /// Stab arrow separating clause parameters from the clause body
    #[token("->")]
    Arrow,

    /// Association arrow, valid only inside map arguments
    #[token("=>")]
    FatArrow,

    #[token("<-")]
    LeftArrow,

    /// Default argument operator `\\`
    #[token(r"\\")]
    DefaultArg,

    #[token("::")]
    DoubleColon,

    #[token("@")]
    At,

    /// Sigil start. Pushes the `SigilName` state.
    #[token("~")]
    Tilde,

    #[token("fn")]
    KwFn,

    #[token("do")]
    KwDo,

    #[token("end")]
    KwEnd,

    #[token("else")]
    KwElse,

    #[token("after")]
    KwAfter,

    #[token("catch")]
    KwCatch,

    #[token("rescue")]
    KwRescue,

    #[token("when")]
    KwWhen,

    #[token("and")]
    KwAnd,

    #[token("or")]
    KwOr,

    #[token("not")]
    KwNot,

    #[token("in")]
    KwIn,

    #[token("true")]
    KwTrue,

    #[token("false")]
    KwFalse,

    #[token("nil")]
    KwNil,

    /// Defined after keywords so they take precedence. Starts with a lowercase
    /// or caseless letter, or `_`.
    #[regex(r"[\p{Ll}\p{Lm}\p{Lo}\p{Nl}_]\p{XID_Continue}*[?!]?")]
    Identifier,

    /// Module-name-like identifier, ASCII only. A single uppercase letter is an alias too.
    #[regex(r"[A-Z][a-zA-Z0-9_]*")]
    Alias,

    /// `name:` in keyword lists. The lexer re-splits it when no whitespace follows.
    #[regex(r"[\p{L}\p{Nl}_]\p{XID_Continue}*[?!]?:")]
    KeywordKey,

    #[regex(r":[\p{L}\p{Nl}_][\p{XID_Continue}@]*[?!]?")]
    #[regex(r":(\+|-|\*|/|\*\*|==|===|!=|!==|<|>|<=|>=|&&|\|\||!|\+\+|--|<>|\.\.|\|>|=~|->|&|\^|@|\.|%|%\{\}|\{\}|<<>>|\|)")]
    Atom,

    /// `:"` or `:'` opening a quoted atom body
    #[token(":\"")]
    #[token(":'")]
    AtomQuote,

    #[regex(r"[0-9][0-9_]*")]
    Integer,

    #[regex(r"0x[0-9a-fA-F][0-9a-fA-F_]*")]
    HexInteger,

    #[regex(r"0o[0-7][0-7_]*")]
    OctalInteger,

    #[regex(r"0b[01][01_]*")]
    BinaryInteger,

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    Float,

    /// Character literal: `?a`, `?\n`
    #[regex(r"\?(\\[^\r\n]|[^\\\r\n])")]
    Char,

    /// Opens or closes a string body
    #[token("\"")]
    DoubleQuote,

    /// Opens or closes a charlist body
    #[token("'")]
    SingleQuote,

    /// Closing quote of a string used as a keyword key, with its `:`, as in `"a b": 1`
    QuotedKeyClose,

    /// `"""` or `'''` plus the rest of the opening line
    #[regex(r#""""[ \t]*\r?\n"#)]
    #[regex(r"'''[ \t]*\r?\n")]
    HeredocOpen,

    /// Closing line indentation plus `"""` or `'''`
    HeredocClose,

    /// Letter(s) following `~`
    SigilName,
    /// Opening sigil delimiter
    SigilOpen,
    /// Closing sigil delimiter
    SigilClose,
    /// One lowercase letter after a sigil's closing delimiter
    SigilModifier,

    /// Literal text inside a string, charlist, quoted atom or sigil
    Fragment,
    EscapeSequence,
    /// `#{` inside an interpolating body
    InterpolationStart,
    /// `}` closing an interpolation
    InterpolationEnd,

    #[regex(r"[ \t]+")]
    #[regex(r"\\\r?\n")]
    Whitespace,

    #[regex(r"#[^\r\n]*", allow_greedy = true)]
    Comment,

    /// Statement separator. Significant to the parser, never trivia.
    #[token(";")]
    #[token("\n")]
    #[token("\r\n")]
    Eol,

    /// Coalesced unrecognized characters
    Garbage,
    /// String, charlist, sigil or heredoc body running into end of input
    Unterminated,

    // --- Node kinds (non-terminals) ---
    File,
    EndOfExpression,
    Error,
    Number,
    AtomLiteral,
    QuotedAtom,
    StringLiteral,
    CharListLiteral,
    Sigil,
    Interpolation,
    Variable,
    Aliases,
    QualifiedAlias,
    Call,
    RemoteCall,
    AnonymousCall,
    AccessExpression,
    CallArguments,
    NoParensArguments,
    DoBlock,
    BlockItem,
    AnonymousFunction,
    Stab,
    StabClause,
    StabParameters,
    StabGuard,
    StabBody,
    List,
    Tuple,
    Binary,
    MapOperation,
    StructOperation,
    MapArguments,
    MapUpdateArguments,
    Associations,
    Association,
    Keywords,
    KeywordPair,
    /// `"a b":` key of a keyword pair
    QuotedKey,
    /// `Foo.{Bar, Baz}`
    MultiAlias,
    Parenthesized,
    UnaryOperation,
    BinaryOperation,

    // Must be last - used for bounds checking in `kind_from_raw`
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    /// Whitespace and comments. `Eol` is deliberately absent.
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | Comment)
    }

    #[inline]
    pub fn is_error(self) -> bool {
        matches!(self, Error | Garbage | Unterminated)
    }

    #[inline]
    pub fn is_token(self) -> bool {
        (self as u16) < (File as u16)
    }

    #[inline]
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            KwFn | KwDo
                | KwEnd
                | KwElse
                | KwAfter
                | KwCatch
                | KwRescue
                | KwWhen
                | KwAnd
                | KwOr
                | KwNot
                | KwIn
                | KwTrue
                | KwFalse
                | KwNil
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language tag for Rowan's tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElixirLanguage {}

impl Language for ElixirLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < __LAST as u16);
        // SAFETY: We've verified the value is in bounds, and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for Rowan types parameterized by our language.
pub type SyntaxNode = rowan::SyntaxNode<ElixirLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<ElixirLanguage>;
pub type SyntaxElement = rowan::NodeOrToken<SyntaxNode, SyntaxToken>;

/// 128-bit bitset of token `SyntaxKind`s for O(1) membership testing.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u128);

impl TokenSet {
    /// Creates an empty token set.
    pub const EMPTY: TokenSet = TokenSet(0);

    /// Panics at compile time if any kind's discriminant >= 128.
    #[inline]
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u128;
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as u16;
            assert!(kind < 128, "SyntaxKind value exceeds TokenSet capacity");
            bits |= 1 << kind;
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn single(kind: SyntaxKind) -> Self {
        let kind = kind as u16;
        assert!(kind < 128, "SyntaxKind value exceeds TokenSet capacity");
        TokenSet(1 << kind)
    }

    #[inline]
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        if kind >= 128 {
            return false;
        }
        self.0 & (1 << kind) != 0
    }

    #[inline]
    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_set();
        for i in 0..128u16 {
            if self.0 & (1 << i) != 0 && i < __LAST as u16 {
                // SAFETY: bounds checked against __LAST above
                let kind: SyntaxKind = unsafe { std::mem::transmute(i) };
                list.entry(&kind);
            }
        }
        list.finish()
    }
}

/// Pre-defined token sets for the parser.
pub mod token_sets {
    use super::*;

    pub const NUMBERS: TokenSet = TokenSet::new(&[
        Integer,
        HexInteger,
        OctalInteger,
        BinaryInteger,
        Float,
        Char,
    ]);

    /// Tokens that can begin an expression.
    pub const EXPR_FIRST: TokenSet = NUMBERS.union(TokenSet::new(&[
        ParenOpen,
        BracketOpen,
        BraceOpen,
        BinaryOpen,
        Percent,
        Plus,
        Minus,
        Bang,
        Caret,
        TildeTildeTilde,
        Ampersand,
        At,
        Tilde,
        KwFn,
        KwNot,
        KwTrue,
        KwFalse,
        KwNil,
        Identifier,
        Alias,
        Atom,
        AtomQuote,
        DoubleQuote,
        SingleQuote,
        HeredocOpen,
    ]));

    /// Arguments of a no-parens call. Unary `+`/`-` and `(` need a whitespace check on top.
    pub const NO_PARENS_ARG_FIRST: TokenSet = NUMBERS.union(TokenSet::new(&[
        BracketOpen,
        BraceOpen,
        BinaryOpen,
        Percent,
        Bang,
        Caret,
        TildeTildeTilde,
        Ampersand,
        At,
        Tilde,
        KwFn,
        KwNot,
        KwTrue,
        KwFalse,
        KwNil,
        Identifier,
        Alias,
        KeywordKey,
        Atom,
        AtomQuote,
        DoubleQuote,
        SingleQuote,
        HeredocOpen,
    ]));

    pub const PREFIX_OPERATORS: TokenSet = TokenSet::new(&[
        Plus,
        Minus,
        Bang,
        Caret,
        KwNot,
        TildeTildeTilde,
        Ampersand,
        At,
    ]);

    /// Keywords that close or continue a do-block.
    pub const BLOCK_KEYWORDS: TokenSet =
        TokenSet::new(&[KwEnd, KwElse, KwAfter, KwCatch, KwRescue]);

    pub const BLOCK_ITEM_KEYWORDS: TokenSet = TokenSet::new(&[KwElse, KwAfter, KwCatch, KwRescue]);

    pub const CLOSERS: TokenSet = TokenSet::new(&[
        ParenClose,
        BracketClose,
        BraceClose,
        BinaryClose,
        InterpolationEnd,
    ]);

    /// Statement-list terminators: closers plus block keywords.
    pub const STATEMENT_RECOVERY: TokenSet = CLOSERS.union(BLOCK_KEYWORDS);

    /// Stops element recovery inside delimited collections.
    pub const ELEMENT_RECOVERY: TokenSet = CLOSERS.union(TokenSet::new(&[Comma, Eol]));

    pub const TRIVIA: TokenSet = TokenSet::new(&[Whitespace, Comment]);

    pub const STRING_PARTS: TokenSet =
        TokenSet::new(&[Fragment, EscapeSequence, InterpolationStart, Unterminated]);
}
