// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Source location tracking.

/// A byte range in the source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A zero-width span at a single offset, used for insertion edits.
    pub fn point(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Precomputed line-start offsets for byte-offset → line:col lookup.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Byte offset of the start of each line. The first entry is always 0.
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build a line map by scanning source for newlines. O(n).
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        LineMap { line_starts }
    }

    /// Convert a byte offset to (line, col), both 1-based. O(log n).
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset as u32;
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let col = (offset - self.line_starts[line_idx]) as usize + 1;
        (line_idx + 1, col)
    }

    /// The source text of a 1-based line number, without its newline.
    pub fn line_text<'a>(&self, source: &'a str, line: usize) -> Option<&'a str> {
        let idx = line.checked_sub(1)?;
        let start = *self.line_starts.get(idx)? as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&s| (s as usize).saturating_sub(1))
            .unwrap_or(source.len());
        source.get(start..end)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source() {
        let lm = LineMap::new("");
        assert_eq!(lm.line_col(0), (1, 1));
        assert_eq!(lm.line_count(), 1);
    }

    #[test]
    fn single_line() {
        let lm = LineMap::new("const x = 1;");
        assert_eq!(lm.line_col(0), (1, 1));
        assert_eq!(lm.line_col(6), (1, 7));
        assert_eq!(lm.line_text("const x = 1;", 1), Some("const x = 1;"));
        assert_eq!(lm.line_text("const x = 1;", 2), None);
    }

    #[test]
    fn multi_line() {
        let src = "ab\ncdef\ng";
        let lm = LineMap::new(src);
        assert_eq!(lm.line_count(), 3);
        assert_eq!(lm.line_col(0), (1, 1));
        assert_eq!(lm.line_col(3), (2, 1));
        assert_eq!(lm.line_col(6), (2, 4));
        assert_eq!(lm.line_col(8), (3, 1));
        assert_eq!(lm.line_text(src, 2), Some("cdef"));
        assert_eq!(lm.line_text(src, 3), Some("g"));
    }

    #[test]
    fn offset_on_newline_belongs_to_its_line() {
        let src = "ab\ncd\n";
        let lm = LineMap::new(src);
        assert_eq!(lm.line_col(2), (1, 3));
        assert_eq!(lm.line_col(5), (2, 3));
        // Trailing newline produces an empty final line
        assert_eq!(lm.line_count(), 3);
        assert_eq!(lm.line_text(src, 3), Some(""));
    }

    #[test]
    fn point_span_is_empty() {
        let s = Span::point(7);
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
    }
}
