/// A byte range `[start, end)` into the comment text.
///
/// Every tree node stores the span of the source it was built from, so
/// errors can point back at the comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both.
    #[must_use]
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    #[must_use]
    pub fn contains(self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(r: std::ops::Range<usize>) -> Self {
        Span {
            start: r.start,
            end: r.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_takes_outer_bounds() {
        let a = Span::new(3, 5);
        let b = Span::new(1, 4);
        assert_eq!(a.cover(b), Span::new(1, 5));
    }

    #[test]
    fn contains_is_inclusive_at_both_ends() {
        let outer = Span::new(2, 8);
        assert!(outer.contains(Span::new(2, 8)));
        assert!(outer.contains(Span::new(3, 3)));
        assert!(!outer.contains(Span::new(1, 4)));
        assert!(!outer.contains(Span::new(7, 9)));
    }
}
