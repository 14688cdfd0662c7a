//! Source-annotated rendering.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use rowan::TextRange;

use super::Diagnostics;
use super::message::{Diagnostic, Severity};

pub struct DiagnosticsPrinter<'d> {
    diagnostics: &'d Diagnostics,
    source: &'d str,
    path: Option<&'d str>,
    colored: bool,
    cascades: bool,
}

impl<'d> DiagnosticsPrinter<'d> {
    pub(crate) fn new(diagnostics: &'d Diagnostics, source: &'d str) -> Self {
        Self {
            diagnostics,
            source,
            path: None,
            colored: false,
            cascades: false,
        }
    }

    pub fn path(mut self, path: &'d str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    /// Also render diagnostics that another one already explains.
    pub fn cascades(mut self, value: bool) -> Self {
        self.cascades = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.format(&mut out);
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };
        let shown = if self.cascades {
            self.diagnostics.iter().collect()
        } else {
            self.diagnostics.filtered()
        };

        for (i, diagnostic) in shown.into_iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            let report = [self.group(diagnostic)];
            write!(w, "{}", renderer.render(&report))?;
        }
        Ok(())
    }

    fn group<'a>(&'a self, diagnostic: &'a Diagnostic) -> Group<'a> {
        let limit = self.source.len();
        let mut snippet = Snippet::source(self.source).line_start(1).annotation(
            AnnotationKind::Primary
                .span(visible(diagnostic.range, limit))
                .label(diagnostic.message.as_str()),
        );
        if let Some(path) = self.path {
            snippet = snippet.path(path);
        }
        for related in &diagnostic.related {
            snippet = snippet.annotation(
                AnnotationKind::Context
                    .span(visible(related.range, limit))
                    .label(related.label.as_str()),
            );
        }

        let mut group = level(diagnostic.severity())
            .primary_title(diagnostic.message.as_str())
            .element(snippet);
        for hint in &diagnostic.hints {
            group = group.element(Level::HELP.message(hint.as_str()));
        }
        group
    }
}

fn level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

/// Empty ranges (end of input, a missing token) get one column so the caret shows.
fn visible(range: TextRange, limit: usize) -> std::ops::Range<usize> {
    let start = usize::from(range.start());
    let end = usize::from(range.end());
    if start == end {
        start..(start + 1).min(limit)
    } else {
        start..end
    }
}
