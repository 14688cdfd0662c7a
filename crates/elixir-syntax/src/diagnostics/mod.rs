//! Diagnostics collected while lexing and parsing.
//!
//! Problems in the source never abort parsing. Each one is recorded with a
//! [`DiagnosticKind`] whose messages follow the wording of the Elixir compiler,
//! and a scope used to hide the cascade an unclosed construct leaves behind.

mod message;
mod printer;


use rowan::TextRange;

pub use message::{Class, Diagnostic, DiagnosticKind, Related, Severity};
pub use printer::DiagnosticsPrinter;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

#[must_use = "diagnostic not recorded, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    sink: &'a mut Vec<Diagnostic>,
    diagnostic: Diagnostic,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a diagnostic carrying the kind's summary message.
    pub fn report(&mut self, kind: DiagnosticKind, range: TextRange) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            sink: &mut self.items,
            diagnostic: Diagnostic::new(kind, range),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Everything reported, in report order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn has_warnings(&self) -> bool {
        self.items.iter().any(|d| !d.is_error())
    }

    /// Diagnostics that no other diagnostic explains.
    pub fn filtered(&self) -> Vec<&Diagnostic> {
        self.items
            .iter()
            .enumerate()
            .filter(|&(i, diagnostic)| {
                !self
                    .items
                    .iter()
                    .enumerate()
                    .any(|(j, other)| i != j && other.explains(diagnostic))
            })
            .map(|(_, diagnostic)| diagnostic)
            .collect()
    }

    /// Renders the filtered diagnostics; see [`DiagnosticsPrinter::cascades`].
    pub fn printer<'d>(&'d self, source: &'d str) -> DiagnosticsPrinter<'d> {
        DiagnosticsPrinter::new(self, source)
    }
}

impl DiagnosticBuilder<'_> {
    /// Folds `detail` into the kind's message, see [`DiagnosticKind::describe`].
    pub fn detail(mut self, detail: impl AsRef<str>) -> Self {
        self.diagnostic.message = self.diagnostic.kind.describe(Some(detail.as_ref()));
        self
    }

    pub fn related_to(mut self, label: impl Into<String>, range: TextRange) -> Self {
        self.diagnostic.related.push(Related {
            range,
            label: label.into(),
        });
        self
    }

    /// Widens the region this diagnostic explains.
    pub fn scope(mut self, scope: TextRange) -> Self {
        self.diagnostic.scope = scope;
        self
    }

    pub fn emit(self) {
        self.sink.push(self.diagnostic);
    }
}
