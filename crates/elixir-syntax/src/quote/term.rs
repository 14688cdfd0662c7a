//! Quoted expressions as plain data.
//!
//! `Display` renders a term the way `IO.inspect/1` prints the result of
//! `Code.string_to_quoted!/1`, so outputs can be compared against a real Elixir.

use std::fmt;

use serde::{Serialize, Serializer};

/// Atom name. Module atoms keep their `Elixir.` prefix and print without it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(String);

impl Atom {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// `Kernel` → `:"Elixir.Kernel"`
    pub fn module(name: &str) -> Self {
        Self(format!("Elixir.{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Atom {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl Serialize for Atom {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Node metadata: a keyword list such as `[line: 1, column: 3]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Meta(Vec<(Atom, Term)>);

impl Meta {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn line(line: u32) -> Self {
        Self(vec![(Atom::new("line"), Term::Integer(line.into()))])
    }

    pub fn with(mut self, key: &str, value: Term) -> Self {
        self.0.push((Atom::new(key), value));
        self
    }

    /// Inserts `key: value` in front, the position Elixir uses for flags like `no_parens`.
    pub fn prepend(mut self, key: &str, value: Term) -> Self {
        self.0.insert(0, (Atom::new(key), value));
        self
    }
}

/// `{head, meta, args}`. `args: None` is the variable form `{name, meta, nil}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Call {
    pub head: Term,
    pub meta: Meta,
    pub args: Option<Vec<Term>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Term {
    Atom(Atom),
    Integer(i128),
    Float(f64),
    Binary(String),
    List(Vec<Term>),
    /// Two-element tuple. Other arities are `{:{}, meta, elements}` calls.
    Pair(Box<Term>, Box<Term>),
    Call(Box<Call>),
}

impl Term {
    pub fn atom(name: &str) -> Self {
        Term::Atom(Atom::new(name))
    }

    pub fn module(name: &str) -> Self {
        Term::Atom(Atom::module(name))
    }

    pub fn nil() -> Self {
        Term::atom("nil")
    }

    pub fn boolean(value: bool) -> Self {
        Term::atom(if value { "true" } else { "false" })
    }

    pub fn pair(left: Term, right: Term) -> Self {
        Term::Pair(Box::new(left), Box::new(right))
    }

    pub fn call(head: Term, meta: Meta, args: Vec<Term>) -> Self {
        Term::Call(Box::new(Call {
            head,
            meta,
            args: Some(args),
        }))
    }

    /// `{name, meta, nil}`
    pub fn variable(name: &str, meta: Meta) -> Self {
        Term::Call(Box::new(Call {
            head: Term::atom(name),
            meta,
            args: None,
        }))
    }

    /// Keyword list `[key: value, ...]`.
    pub fn keywords(pairs: impl IntoIterator<Item = (Atom, Term)>) -> Self {
        Term::List(
            pairs
                .into_iter()
                .map(|(k, v)| Term::pair(Term::Atom(k), v))
                .collect(),
        )
    }

    /// Codepoints of `text` as an Erlang charlist.
    pub fn charlist(text: &str) -> Self {
        Term::List(text.chars().map(|c| Term::Integer(u32::from(c).into())).collect())
    }

    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Term::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    fn as_keyword_pair(&self) -> Option<(&Atom, &Term)> {
        match self {
            Term::Pair(key, value) => key.as_atom().map(|k| (k, value.as_ref())),
            _ => None,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.0.as_str();
        if let Some(module) = name.strip_prefix("Elixir.")
            && is_alias(module)
        {
            return f.write_str(module);
        }
        if matches!(name, "true" | "false" | "nil") {
            return f.write_str(name);
        }
        if is_identifier(name) || is_alias(name) || is_operator(name) {
            return write!(f, ":{name}");
        }
        write!(f, ":\"{}\"", escape(name))
    }
}

impl fmt::Display for Meta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write_key(f, key)?;
            write!(f, " {value}")?;
        }
        f.write_str("]")
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(atom) => atom.fmt(f),
            Term::Integer(n) => write!(f, "{n}"),
            Term::Float(x) => write_float(f, *x),
            Term::Binary(s) => write!(f, "\"{}\"", escape(s)),
            Term::List(items) => write_list(f, items),
            Term::Pair(left, right) => write!(f, "{{{left}, {right}}}"),
            Term::Call(call) => {
                write!(f, "{{{}, {}, ", call.head, call.meta)?;
                match &call.args {
                    Some(args) => write_list(f, args)?,
                    None => f.write_str("nil")?,
                }
                f.write_str("}")
            }
        }
    }
}

/// Non-empty lists of atom-keyed pairs print in keyword syntax.
fn write_list(f: &mut fmt::Formatter<'_>, items: &[Term]) -> fmt::Result {
    let keyword = !items.is_empty() && items.iter().all(|t| t.as_keyword_pair().is_some());
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        match item.as_keyword_pair() {
            Some((key, value)) if keyword => {
                write_key(f, key)?;
                write!(f, " {value}")?;
            }
            _ => write!(f, "{item}")?,
        }
    }
    f.write_str("]")
}

fn write_key(f: &mut fmt::Formatter<'_>, key: &Atom) -> fmt::Result {
    let name = key.as_str();
    if is_identifier(name) || is_alias(name) {
        write!(f, "{name}:")
    } else {
        write!(f, "\"{}\":", escape(name))
    }
}

/// Shortest round-trip digits, always with a fractional part: `1.0`, `1.0e20`.
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    let repr = format!("{x:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => {
            write!(f, "{mantissa}.0e{exponent}")
        }
        _ => f.write_str(&repr),
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_lowercase() || first == '_') {
        return false;
    }
    let body = name.trim_end_matches(['?', '!']);
    // At most one trailing `?` or `!`.
    if name.len() - body.len() > 1 {
        return false;
    }
    body.chars()
        .skip(1)
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '@')
}

fn is_alias(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            chars.next().is_some_and(|c| c.is_ascii_uppercase())
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

fn is_operator(name: &str) -> bool {
    matches!(
        name,
        "+" | "-"
            | "*"
            | "/"
            | "**"
            | "++"
            | "--"
            | "+++"
            | "---"
            | ".."
            | "<>"
            | "|>"
            | "=="
            | "!="
            | "==="
            | "!=="
            | "=~"
            | "<"
            | ">"
            | "<="
            | ">="
            | "&&"
            | "||"
            | "&&&"
            | "|||"
            | "!"
            | "^"
            | "&"
            | "@"
            | "."
            | "="
            | "|"
            | "<-"
            | "\\\\"
            | "->"
            | "=>"
            | "~~~"
            | "<<<"
            | ">>>"
            | "<<~"
            | "~>>"
            | "<~"
            | "~>"
            | "<~>"
            | "<|>"
            | "{}"
            | "%{}"
            | "%"
            | "<<>>"
    )
}

/// Escapes for a double-quoted literal: `"`, `\`, `#{` and control characters.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{1b}' => out.push_str("\\e"),
            '\0' => out.push_str("\\0"),
            '#' if chars.peek() == Some(&'{') => out.push_str("\\#"),
            c if c.is_control() => out.push_str(&format!("\\x{{{:X}}}", u32::from(c))),
            c => out.push(c),
        }
    }
    out
}
