use core::fmt;

// -----------------------------------------------------------------------------
// Position

/// A line and column within the source document, both one based.
///
/// Positions are attached to every [`InputNode`](crate::InputNode) so that
/// binding errors can point at the offending markup.
///
/// # Examples
///
/// ```
/// use vc_node::Position;
///
/// let pos = Position::locate("<a>\n  <b/>\n</a>", 6);
/// assert_eq!(pos.line(), 2);
/// assert_eq!(pos.column(), 3);
/// assert_eq!(pos.to_string(), "line 2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    line: usize,
    column: usize,
}

impl Position {
    /// Creates a position from explicit coordinates.
    #[inline]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Finds the position of a byte offset within `source`.
    ///
    /// Offsets past the end of the source are clamped to the end.
    pub fn locate(source: &str, offset: usize) -> Self {
        let end = offset.min(source.len());
        let before = &source.as_bytes()[..end];
        let line = before.iter().filter(|b| **b == b'\n').count() + 1;
        let column = match before.iter().rposition(|b| *b == b'\n') {
            Some(newline) => end - newline,
            None => end + 1,
        };
        Self { line, column }
    }

    #[inline]
    pub const fn line(&self) -> usize {
        self.line
    }

    #[inline]
    pub const fn column(&self) -> usize {
        self.column
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}", self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::Position;

    #[test]
    fn locate_first_line() {
        let pos = Position::locate("<root/>", 0);
        assert_eq!(pos, Position::new(1, 1));
    }

    #[test]
    fn locate_clamps_offset() {
        let pos = Position::locate("a\nb", 100);
        assert_eq!(pos, Position::new(2, 2));
    }
}
