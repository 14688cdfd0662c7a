//! Parser infrastructure for Elixir source.
//!
//! # Architecture
//!
//! The parser produces a lossless concrete syntax tree (CST) via Rowan's green tree builder:
//!
//! - Zero-copy lexing: tokens carry spans, text is sliced only when building tree nodes
//! - Trivia buffering: whitespace and comments are collected, then attached as leading trivia
//! - Checkpoint-based wrapping: binary operators, calls and access wrap what was already parsed
//! - Explicit recovery sets: per-production sets determine when to bail vs consume
//!
//! Line breaks are `Eol` tokens, not trivia. They end statements at the top level and in
//! block bodies, and are absorbed inside brackets, after operators and before a leading `|>`.
//!
//! # Recovery Strategy
//!
//! The parser is resilient: it always produces a tree.
//!
//! 1. Tokens that cannot start anything get wrapped in `SyntaxKind::Error` nodes and consumed
//! 2. Missing expected tokens emit a diagnostic but don't consume (parent may handle)
//! 3. Closers and block keywords are synchronization points for statement lists
//!
//! Fuel exhaustion (exec_fuel, recursion_fuel) returns an actual error immediately.

pub mod ast;
pub mod cst;
pub mod lexer;

mod core;
mod dump;
mod fuel;
mod grammar;
mod invariants;
mod printer;

#[cfg(test)]
mod ast_tests;
#[cfg(test)]
mod lexer_tests;
#[cfg(test)]
mod tests;

pub use cst::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

pub use ast::{AstNode, Expr, File, MissingChild};

pub use core::Parser;
pub use printer::{TreePrinter, token_kinds};

use crate::Result;
use crate::diagnostics::Diagnostics;
use lexer::lex;

/// Nesting deeper than this is rejected unless overridden.
pub const DEFAULT_RECURSION_FUEL: u32 = 512;

/// Limits applied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub exec_fuel: Option<u32>,
    pub recursion_fuel: Option<u32>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            exec_fuel: None,
            recursion_fuel: Some(DEFAULT_RECURSION_FUEL),
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of tokens the parser may consume.
    pub fn exec_fuel(mut self, limit: Option<u32>) -> Self {
        self.exec_fuel = limit;
        self
    }

    pub fn recursion_fuel(mut self, limit: Option<u32>) -> Self {
        self.recursion_fuel = limit;
        self
    }
}

/// Parse result: the green tree plus everything reported while building it.
///
/// The tree is always complete. Error nodes in the tree represent recovery points.
#[derive(Debug, Clone)]
pub struct Parse {
    cst: rowan::GreenNode,
    diagnostics: Diagnostics,
    exec_fuel_consumed: u32,
}

impl Parse {
    pub fn as_cst(&self) -> &rowan::GreenNode {
        &self.cst
    }

    /// Creates a red tree over the immutable green tree.
    /// This is cheap: SyntaxNode is a thin wrapper with parent pointers.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.cst.clone())
    }

    /// Typed view of the root.
    pub fn file(&self) -> File {
        File::cast(self.syntax()).expect("parser always produces a File root")
    }

    pub fn printer(&self) -> TreePrinter {
        TreePrinter::new(self.syntax())
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn exec_fuel_consumed(&self) -> u32 {
        self.exec_fuel_consumed
    }
}

/// Main entry point with default limits. Returns Err on fuel exhaustion.
pub fn parse(source: &str) -> Result<Parse> {
    parse_with(source, ParseOptions::default())
}

pub fn parse_with(source: &str, options: ParseOptions) -> Result<Parse> {
    let tokens = lex(source);
    tracing::debug!(bytes = source.len(), tokens = tokens.len(), "parsing");

    let mut parser = Parser::new(source, tokens, options);
    parser.parse_root();
    let (cst, diagnostics, exec_fuel_consumed) = parser.finish().inspect_err(|err| {
        tracing::debug!(%err, "parse aborted");
    })?;
    tracing::debug!(
        diagnostics = diagnostics.len(),
        exec_fuel_consumed,
        "parse finished"
    );
    Ok(Parse {
        cst,
        diagnostics,
        exec_fuel_consumed,
    })
}
