use rowan::TextRange;

/// Broad problem classes, ordered so that an earlier class explains a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Class {
    /// A delimiter, block or literal runs off the end. Elixir raises `TokenMissingError`.
    Unclosed,
    /// Something required is absent.
    Missing,
    /// A token sits where the grammar has no place for it. Elixir raises `SyntaxError`.
    Misplaced,
    /// Valid code in a form the compiler warns about.
    Discouraged,
}

/// What went wrong. Variants are listed by priority: when two diagnostics
/// overlap, the one declared first explains the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    UnclosedParen,
    UnclosedBracket,
    UnclosedBrace,
    UnclosedBinary,
    UnclosedBlock,
    UnterminatedLiteral,

    ExpectedExpression,
    ExpectedArrow,
    ExpectedCallName,
    ExpectedSigilDelimiter,
    ExpectedKeywordValue,
    ExpectedAssociationValue,

    InvalidCharacter,
    KeywordsNotLast,
    AssociationOutsideMap,
    RangeStepWithoutRange,
    BlockKeywordOutsideBlock,
    UnexpectedToken,

    SingleQuotedCharList,
}

impl DiagnosticKind {
    pub fn class(&self) -> Class {
        use DiagnosticKind::*;
        match self {
            UnclosedParen | UnclosedBracket | UnclosedBrace | UnclosedBinary | UnclosedBlock
            | UnterminatedLiteral => Class::Unclosed,
            ExpectedExpression
            | ExpectedArrow
            | ExpectedCallName
            | ExpectedSigilDelimiter
            | ExpectedKeywordValue
            | ExpectedAssociationValue => Class::Missing,
            InvalidCharacter
            | KeywordsNotLast
            | AssociationOutsideMap
            | RangeStepWithoutRange
            | BlockKeywordOutsideBlock
            | UnexpectedToken => Class::Misplaced,
            SingleQuotedCharList => Class::Discouraged,
        }
    }

    pub fn severity(&self) -> Severity {
        match self.class() {
            Class::Discouraged => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Message used when the reporter supplies no detail.
    pub fn summary(&self) -> &'static str {
        use DiagnosticKind::*;
        match self {
            UnclosedParen => "missing terminator: )",
            UnclosedBracket => "missing terminator: ]",
            UnclosedBrace => "missing terminator: }",
            UnclosedBinary => "missing terminator: >>",
            UnclosedBlock => "missing terminator: end",
            UnterminatedLiteral => "missing terminator",

            ExpectedExpression => "syntax error: expression is incomplete",
            ExpectedArrow => "syntax error: expected -> in fn clause",
            ExpectedCallName => "syntax error: expected a function name after .",
            ExpectedSigilDelimiter => "invalid sigil delimiter",
            ExpectedKeywordValue => "syntax error: expected a value after keyword key",
            ExpectedAssociationValue => "syntax error: expected a value after =>",

            InvalidCharacter => "unexpected token",
            KeywordsNotLast => {
                "unexpected expression after keyword list. Keyword lists must always come last in lists and maps"
            }
            AssociationOutsideMap => "syntax error before: =>",
            RangeStepWithoutRange => {
                "the range step operator (//) must immediately follow the range definition operator (..)"
            }
            BlockKeywordOutsideBlock => "unexpected reserved word",
            UnexpectedToken => "syntax error",

            SingleQuotedCharList => {
                "single-quoted strings represent charlists. Use ~c\"\" if you indeed want a charlist or use \"\" instead"
            }
        }
    }

    /// Message with caller-provided detail folded in.
    ///
    /// Unclosed kinds expect the terminator and its origin, as in
    /// `) (for "(" starting at line 1)`.
    pub fn describe(&self, detail: Option<&str>) -> String {
        let Some(detail) = detail else {
            return self.summary().to_string();
        };
        if self.class() == Class::Unclosed {
            return format!("missing terminator: {detail}");
        }
        match self {
            Self::ExpectedExpression => format!("syntax error: expected {detail}"),
            Self::InvalidCharacter => match detail.chars().next() {
                Some(c) => format!("unexpected token: \"{c}\" (code point U+{:04X})", c as u32),
                None => self.summary().to_string(),
            },
            Self::BlockKeywordOutsideBlock => format!("unexpected reserved word: {detail}"),
            _ => format!("{}: {detail}", self.summary()),
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::KeywordsNotLast => Some("move the keyword pairs to the end, as in `foo(1, key: value)`"),
            Self::AssociationOutsideMap => Some("`=>` only separates keys from values inside `%{...}`"),
            Self::RangeStepWithoutRange => Some("write the step as `first..last//step`"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

/// Secondary location, such as the opener of an unclosed construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Related {
    pub(crate) range: TextRange,
    pub(crate) label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub(crate) kind: DiagnosticKind,
    /// Underlined in rendered output.
    pub(crate) range: TextRange,
    /// Region whose lower-priority diagnostics this one explains. The parser
    /// widens it from `range` to the innermost open delimiter.
    pub(crate) scope: TextRange,
    pub(crate) message: String,
    pub(crate) related: Vec<Related>,
    pub(crate) hints: Vec<String>,
}

impl Diagnostic {
    pub(crate) fn new(kind: DiagnosticKind, range: TextRange) -> Self {
        Self {
            kind,
            range,
            scope: range,
            message: kind.summary().to_string(),
            related: Vec::new(),
            hints: kind.hint().map(String::from).into_iter().collect(),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    /// Whether this diagnostic makes `other` redundant.
    ///
    /// At the same position a missing piece explains an unclosed construct, and
    /// otherwise the higher-priority kind wins. Elsewhere only a higher-priority
    /// diagnostic whose scope strictly encloses `other` explains it.
    pub(crate) fn explains(&self, other: &Diagnostic) -> bool {
        if self.range.start() == other.range.start() {
            return match (self.kind.class(), other.kind.class()) {
                (Class::Missing, Class::Unclosed) => true,
                (Class::Unclosed, Class::Missing) => false,
                _ => self.kind < other.kind,
            };
        }
        self.kind < other.kind
            && self.scope.start() < other.range.start()
            && other.range.end() <= self.scope.end()
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let start = u32::from(self.range.start());
        let end = u32::from(self.range.end());
        write!(f, "{}: {} [{start}..{end}]", self.severity(), self.message)?;
        for hint in &self.hints {
            write!(f, "\n  hint: {hint}")?;
        }
        Ok(())
    }
}
