//! Lexical states and the explicit state stack.
//!
//! The stack is plain data so a lexer can be suspended at any token boundary and
//! resumed later from a `LexerCheckpoint`, e.g. to re-lex an edited region.

use serde::{Deserialize, Serialize};

use crate::Error;

/// What kind of literal a group body belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKind {
    String,
    CharList,
    QuotedAtom,
    Sigil,
}

/// Closing delimiter of a group body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terminator {
    Paren,
    Bracket,
    Brace,
    Angle,
    Slash,
    Bar,
    DoubleQuote,
    SingleQuote,
    /// `"""`
    HeredocDouble,
    /// `'''`
    HeredocSingle,
}

impl Terminator {
    /// Maps a sigil's opening delimiter to the terminator that closes it.
    pub fn for_opener(opener: char) -> Option<Self> {
        let terminator = match opener {
            '(' => Self::Paren,
            '[' => Self::Bracket,
            '{' => Self::Brace,
            '<' => Self::Angle,
            '/' => Self::Slash,
            '|' => Self::Bar,
            '"' => Self::DoubleQuote,
            '\'' => Self::SingleQuote,
            _ => return None,
        };
        Some(terminator)
    }

    pub fn closer(self) -> &'static str {
        match self {
            Self::Paren => ")",
            Self::Bracket => "]",
            Self::Brace => "}",
            Self::Angle => ">",
            Self::Slash => "/",
            Self::Bar => "|",
            Self::DoubleQuote => "\"",
            Self::SingleQuote => "'",
            Self::HeredocDouble => "\"\"\"",
            Self::HeredocSingle => "'''",
        }
    }

    pub fn is_heredoc(self) -> bool {
        matches!(self, Self::HeredocDouble | Self::HeredocSingle)
    }
}

/// Body of a string, charlist, quoted atom or sigil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
    pub kind: GroupKind,
    pub terminator: Terminator,
    /// `#{...}` and backslash escapes are recognized. False for uppercase sigils.
    pub interpolating: bool,
}

impl Group {
    pub fn new(kind: GroupKind, terminator: Terminator, interpolating: bool) -> Self {
        Self {
            kind,
            terminator,
            interpolating,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LexicalState {
    /// Top-level code.
    Initial,
    /// Code inside `#{...}`. A `}` at this level closes the interpolation.
    Interpolation,
    /// Code inside a `{` opened in code.
    Braces,
    /// After `~`, expecting the sigil name.
    SigilName,
    /// After the sigil name, expecting the opening delimiter.
    SigilOpen { interpolating: bool },
    Group(Group),
    /// After a sigil's closing delimiter.
    SigilModifiers,
}

impl LexicalState {
    /// States whose tokens come from the code rule table.
    pub fn is_code(self) -> bool {
        matches!(self, Self::Initial | Self::Interpolation | Self::Braces)
    }
}

/// Never-empty stack of lexical states with `Initial` at the bottom.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<LexicalState>", into = "Vec<LexicalState>")]
pub struct StateStack {
    states: Vec<LexicalState>,
}

impl StateStack {
    pub fn new() -> Self {
        Self {
            states: vec![LexicalState::Initial],
        }
    }

    pub fn top(&self) -> LexicalState {
        // Non-empty by construction.
        self.states[self.states.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.states.len()
    }

    pub fn as_slice(&self) -> &[LexicalState] {
        &self.states
    }

    pub fn push(&mut self, state: LexicalState) {
        self.states.push(state);
    }

    /// # Panics
    ///
    /// Popping the bottom `Initial` state is a lexer bug.
    pub fn pop(&mut self) -> LexicalState {
        assert!(
            self.states.len() > 1,
            "broken lexer invariant: attempted to pop the bottom lexical state"
        );
        self.states.pop().unwrap_or(LexicalState::Initial)
    }

    /// Swaps the top state in place.
    pub fn replace_top(&mut self, state: LexicalState) {
        let last = self.states.len() - 1;
        assert!(
            last > 0,
            "broken lexer invariant: attempted to replace the bottom lexical state"
        );
        self.states[last] = state;
    }
}

impl Default for StateStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<LexicalState>> for StateStack {
    type Error = Error;

    fn try_from(states: Vec<LexicalState>) -> Result<Self, Self::Error> {
        match states.first() {
            Some(LexicalState::Initial) => {}
            Some(_) => {
                return Err(Error::InvalidStateStack(
                    "bottom state must be `Initial`".into(),
                ));
            }
            None => return Err(Error::InvalidStateStack("stack is empty".into())),
        }
        if states[1..].contains(&LexicalState::Initial) {
            return Err(Error::InvalidStateStack(
                "`Initial` may only appear at the bottom".into(),
            ));
        }
        Ok(Self { states })
    }
}

impl From<StateStack> for Vec<LexicalState> {
    fn from(stack: StateStack) -> Self {
        stack.states
    }
}
