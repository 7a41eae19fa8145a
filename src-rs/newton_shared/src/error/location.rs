use crate::span::Span;

/// Source location information for error reporting
///
/// Line and column numbers are 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLocation {
    /// Byte offset from the beginning of the source
    offset: usize,
    /// Line number where the error occurred (1-indexed)
    line: usize,
    /// Column number where the error occurred (1-indexed)
    column: usize,
    /// Optional length of the highlighted range
    length: Option<usize>,
    /// The source line containing the error
    line_source: String,
}

impl ErrorLocation {
    fn new(source: &str, offset: usize, length: Option<usize>) -> Self {
        // an offset one past the last byte is allowed so that errors at the
        // end of the input can still be reported
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let length = length.map(|length| length.min(source.len() - offset).max(1));

        let line_start = source[..offset]
            .rfind('\n')
            .map_or(0, |newline_idx| newline_idx + 1);

        // tabs are displayed as 4 columns
        let num_tabs = source[line_start..offset]
            .chars()
            .filter(|c| *c == '\t')
            .count();
        let column = source[line_start..offset].chars().count() + 1 + num_tabs * 3;

        let line = source[..offset].chars().filter(|c| *c == '\n').count() + 1;

        let line_source = source[line_start..]
            .lines()
            .next()
            .unwrap_or_default()
            .replace('\t', "    ");

        Self {
            offset,
            line,
            column,
            length,
            line_source,
        }
    }

    /// Creates a new error location from source content and offset
    #[must_use]
    pub fn from_source_and_offset(source: &str, offset: usize) -> Self {
        Self::new(source, offset, None)
    }

    /// Creates a new error location from source content and a span
    #[must_use]
    pub fn from_source_and_span(source: &str, span: Span) -> Self {
        let length = (!span.is_empty()).then_some(span.len());
        Self::new(source, span.start().offset, length)
    }

    /// Returns the byte offset from the beginning of the source
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the line number where the error occurred (1-indexed)
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Returns the column number where the error occurred (1-indexed)
    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Returns the length of the highlighted range
    #[must_use]
    pub fn length(&self) -> usize {
        // if no length is provided, assume a single character
        self.length.unwrap_or(1)
    }

    /// Returns the source line where the error occurred
    #[must_use]
    pub fn line_source(&self) -> &str {
        &self.line_source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::SourceLocation;

    #[test]
    fn location_on_second_line() {
        let source = "a : signal\n\tb : signal\n";

        let location = ErrorLocation::from_source_and_offset(source, 12);

        assert_eq!(location.line(), 2);
        // one tab before the offset counts as four columns
        assert_eq!(location.column(), 5);
        assert_eq!(location.line_source(), "    b : signal");
        assert_eq!(location.length(), 1);
    }

    #[test]
    fn offset_inside_a_character_moves_to_its_start() {
        let source = "µ : signal";

        let location = ErrorLocation::from_source_and_offset(source, 1);

        assert_eq!(location.offset(), 0);
        assert_eq!(location.column(), 1);
        assert_eq!(location.line_source(), "µ : signal");
    }

    #[test]
    fn column_counts_characters() {
        // `µ` is two bytes long
        let source = "aµb";

        let location = ErrorLocation::from_source_and_offset(source, 3);

        assert_eq!(location.offset(), 3);
        assert_eq!(location.column(), 3);
    }

    #[test]
    fn span_length_is_clamped_to_source() {
        let source = "delta";
        let span = Span::new(
            SourceLocation {
                offset: 2,
                line: 1,
                column: 3,
            },
            SourceLocation {
                offset: 40,
                line: 1,
                column: 41,
            },
        );

        let location = ErrorLocation::from_source_and_span(source, span);

        assert_eq!(location.offset(), 2);
        assert_eq!(location.length(), 3);
    }
}
