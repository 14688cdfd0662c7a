//! Elixir syntax front end: a restartable lexer, a lossless syntax tree and a quoter
//! that lowers the tree to Elixir's quoted-expression form.
//!
//! # Example
//!
//! ```
//! use elixir_syntax::parser::parse;
//! use elixir_syntax::quote::quote;
//!
//! let source = "fn x -> x + 1 end";
//! let parse = parse(source).expect("out of fuel");
//! assert!(parse.diagnostics().is_empty());
//!
//! let term = quote(&parse, source).expect("well-formed tree");
//! assert_eq!(
//!     term.to_string(),
//!     "{:fn, [line: 1], [{:->, [line: 1], [[{:x, [line: 1], nil}], {:+, [line: 1], [{:x, [line: 1], nil}, 1]}]}]}"
//! );
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod diagnostics;
pub mod parser;
pub mod quote;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use parser::{Parse, ParseOptions, parse, parse_with};
pub use quote::{QuoteError, QuoteOptions, Quoter, Term};

/// Errors that abort lexing or parsing instead of being reported as diagnostics.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Execution fuel exhausted (too many parser operations).
    #[error("execution limit exceeded")]
    ExecFuelExhausted,

    /// Recursion fuel exhausted (input nested too deeply).
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    /// A lexical state stack supplied for restarting is malformed.
    #[error("invalid lexical state stack: {0}")]
    InvalidStateStack(String),
}

pub type Result<T> = std::result::Result<T, Error>;
