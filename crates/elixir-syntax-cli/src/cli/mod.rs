//! Command line surface of `exsyntax`: clap builders plus the params that
//! carry parsed flags over to the command handlers.

mod args;
mod commands;
mod dispatch;

#[cfg(test)]
mod dispatch_tests;

use std::io::IsTerminal;

pub use commands::build_cli;
pub use dispatch::{BuildParams, CheckParams, LexParams, QuoteParams, TreeParams};

/// `--color` for diagnostics. Only diagnostics are colored, and they go to stderr.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Unknown or missing values fall back to `auto`; clap already restricts the flag.
    pub fn from_flag(value: Option<&str>) -> Self {
        match value {
            Some("always") => ColorChoice::Always,
            Some("never") => ColorChoice::Never,
            _ => ColorChoice::Auto,
        }
    }

    pub fn colors_diagnostics(self) -> bool {
        self.resolve(std::io::stderr().is_terminal())
    }

    fn resolve(self, stderr_is_terminal: bool) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => stderr_is_terminal,
        }
    }
}
