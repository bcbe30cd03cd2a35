/// A 1-based line/column position in the comment text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourcePos {
    pub line: usize,
    pub column: usize,
}

/// Maps byte offsets to line/column positions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset where each line starts; always begins with 0.
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_starts }
    }

    /// Byte offsets where the lines start, in order.
    pub fn line_starts(&self) -> impl Iterator<Item = usize> + '_ {
        self.line_starts.iter().copied()
    }

    /// Position of `offset` in `text`, which must be the text the index was built from.
    ///
    /// Offsets past the end clamp to the end of the text.
    pub fn position(&self, text: &str, offset: usize) -> SourcePos {
        let offset = floor_char_boundary(text, offset.min(text.len()));
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.line_starts[line];
        SourcePos {
            line: line + 1,
            column: text[line_start..offset].chars().count() + 1,
        }
    }

    /// Byte offset of the end of the line containing `offset`, excluding the newline.
    pub fn line_end(&self, text: &str, offset: usize) -> usize {
        let end = text[offset..]
            .find('\n')
            .map_or(text.len(), |i| offset + i);
        if end > offset && text.as_bytes()[end - 1] == b'\r' {
            end - 1
        } else {
            end
        }
    }
}

fn floor_char_boundary(text: &str, mut offset: usize) -> usize {
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
