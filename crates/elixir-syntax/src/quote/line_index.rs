use rowan::TextSize;

/// Byte offset → 1-based line and column.
#[derive(Debug, Clone)]
pub(crate) struct LineIndex<'src> {
    source: &'src str,
    line_starts: Vec<u32>,
}

impl<'src> LineIndex<'src> {
    pub fn new(source: &'src str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(
                source
                    .match_indices('\n')
                    .map(|(i, _)| (i + 1) as u32),
            )
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    pub fn line(&self, offset: TextSize) -> u32 {
        let offset = u32::from(offset);
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line as u32 + 1,
            Err(next) => next as u32,
        }
    }

    /// Columns count characters, not bytes.
    pub fn line_col(&self, offset: TextSize) -> (u32, u32) {
        let line = self.line(offset);
        let start = self.line_starts[line as usize - 1] as usize;
        let end = (u32::from(offset) as usize).min(self.source.len());
        let column = self.source.get(start..end).map_or(0, |s| s.chars().count());
        (line, column as u32 + 1)
    }
}
