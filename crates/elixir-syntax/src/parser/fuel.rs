//! Budgets that turn pathological input into an [`Error`] instead of a hang or
//! a stack overflow.

use std::cell::Cell;

use super::ParseOptions;
use crate::Error;

/// Lookaheads allowed without consuming a token before the parser is declared stuck.
const LOOKAHEAD_LIMIT: u32 = 256;

#[derive(Debug)]
pub(super) struct Fuel {
    /// Tokens the parser may still consume, with the starting amount.
    tokens: Option<(u32, u32)>,
    depth: u32,
    max_depth: Option<u32>,
    pub(super) lookahead: Cell<u32>,
}

impl Fuel {
    pub(super) fn new(options: ParseOptions) -> Self {
        Self {
            tokens: options.exec_fuel.map(|limit| (limit, limit)),
            depth: 0,
            max_depth: options.recursion_fuel,
            lookahead: Cell::new(LOOKAHEAD_LIMIT),
        }
    }

    /// Pays for one consumed token.
    pub(super) fn spend_token(&mut self) -> Result<(), Error> {
        self.refill_lookahead();
        match &mut self.tokens {
            Some((_, 0)) => Err(Error::ExecFuelExhausted),
            Some((_, remaining)) => {
                *remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Enters one level of expression nesting.
    pub(super) fn descend(&mut self) -> Result<(), Error> {
        if self.max_depth.is_some_and(|max| self.depth >= max) {
            return Err(Error::RecursionLimitExceeded);
        }
        self.depth += 1;
        self.refill_lookahead();
        Ok(())
    }

    pub(super) fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.refill_lookahead();
    }

    pub(super) fn consumed(&self) -> u32 {
        self.tokens
            .map_or(0, |(initial, remaining)| initial.saturating_sub(remaining))
    }

    fn refill_lookahead(&self) {
        self.lookahead.set(LOOKAHEAD_LIMIT);
    }
}
