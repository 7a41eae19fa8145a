//! Source location spans for mapping declarations and IR nodes to source code

/// A span of source code
///
/// A span is a pair of source locations, representing the start and end of the
/// span. Declarations, scopes and IR nodes carry spans so that diagnostics can
/// point back at the text that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    start: SourceLocation,
    end: SourceLocation,
}

impl Span {
    /// Creates a new span from a start and end source location
    ///
    /// # Panics
    ///
    /// Panics if `start` comes after `end`.
    #[must_use]
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        assert!(
            start.offset <= end.offset,
            "start offset must be before end offset"
        );

        assert!(
            start.line < end.line || (start.line == end.line && start.column <= end.column),
            "start line and column must be before end line and column"
        );

        Self { start, end }
    }

    /// Creates a span that covers a single source location
    #[must_use]
    pub const fn point(location: SourceLocation) -> Self {
        Self {
            start: location,
            end: location,
        }
    }

    /// Returns the start source location
    #[must_use]
    pub const fn start(&self) -> &SourceLocation {
        &self.start
    }

    /// Returns the end source location
    #[must_use]
    pub const fn end(&self) -> &SourceLocation {
        &self.end
    }

    /// Returns the length of the span in bytes
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    /// Returns true if the span covers no source text
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the smallest span that covers both `self` and `other`
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        let start = if self.start.offset <= other.start.offset {
            self.start
        } else {
            other.start
        };

        let end = if self.end.offset >= other.end.offset {
            self.end
        } else {
            other.end
        };

        Self { start, end }
    }

    /// Creates a random single-line span
    ///
    /// This is only meant for tests, where the exact location of a node
    /// does not matter but a span is still required.
    #[cfg(feature = "random_span")]
    #[must_use]
    pub fn random_span() -> Self {
        use rand::Rng;

        let mut rng = rand::rng();
        let offset = rng.random_range(0..10_000);
        let line = rng.random_range(1..500);
        let column = rng.random_range(1..120);
        let length = rng.random_range(0..40);

        Self {
            start: SourceLocation {
                offset,
                line,
                column,
            },
            end: SourceLocation {
                offset: offset + length,
                line,
                column: column + length,
            },
        }
    }
}

/// A source location
///
/// A source location is a position in the source code, represented by an
/// offset, line, and column.
///
/// Note that it is assumed that the offset corresponds to the line and column.
/// If this assumption is not correct, any code that relies on the line and
/// column for display purposes will be incorrect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceLocation {
    /// The offset from the beginning of the source code (0-indexed)
    pub offset: usize,
    /// The line number (1-indexed)
    pub line: usize,
    /// The column number (1-indexed)
    pub column: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn location(offset: usize, line: usize, column: usize) -> SourceLocation {
        SourceLocation {
            offset,
            line,
            column,
        }
    }

    #[test]
    fn merge_covers_both_spans() {
        let first = Span::new(location(4, 1, 5), location(9, 1, 10));
        let second = Span::new(location(12, 2, 1), location(20, 2, 9));

        let merged = first.merge(second);

        assert_eq!(merged.start(), &location(4, 1, 5));
        assert_eq!(merged.end(), &location(20, 2, 9));
        assert_eq!(merged.len(), 16);
    }

    #[test]
    fn point_span_is_empty() {
        let span = Span::point(location(3, 1, 4));
        assert!(span.is_empty());
    }

    #[test]
    #[should_panic(expected = "start offset must be before end offset")]
    fn new_rejects_reversed_offsets() {
        let _ = Span::new(location(10, 1, 11), location(2, 1, 3));
    }
}
