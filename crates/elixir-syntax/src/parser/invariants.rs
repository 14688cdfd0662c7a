//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use super::core::Parser;

impl Parser<'_> {
    /// Every lookahead draws from a small budget that consuming a token refills.
    #[inline]
    pub(super) fn ensure_progress(&self) {
        let left = self.fuel.lookahead.get();
        assert!(left != 0, "parser is stuck: too many lookaheads without progress");
        self.fuel.lookahead.set(left - 1);
    }

    /// A grammar rule that opens a construct must close or abandon it.
    pub(super) fn assert_constructs_balanced(&self) {
        assert!(
            self.openers.is_empty(),
            "broken parser invariant: {} construct(s) still open at end of input",
            self.openers.len()
        );
    }
}
