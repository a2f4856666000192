//! Resumption cursor for multi-chunk delivery

/// Position in the logical document across chunked exchanges
///
/// The transport layer threads this through an in-flight exchange; it is the
/// only state the encoder needs between calls. A fresh change notification
/// invalidates any offset and restarts the document from zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
    /// Absolute byte offset already delivered
    Offset(usize),
    /// The document has been fully delivered
    Done,
}

impl Cursor {
    /// Start of a new logical document
    pub const START: Cursor = Cursor::Offset(0);

    #[inline]
    pub fn offset(self) -> Option<usize> {
        match self {
            Cursor::Offset(offset) => Some(offset),
            Cursor::Done => None,
        }
    }

    #[inline]
    pub fn is_done(self) -> bool {
        matches!(self, Cursor::Done)
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor::START
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_is_offset_zero() {
        assert_eq!(Cursor::START.offset(), Some(0));
        assert!(!Cursor::START.is_done());
    }

    #[test]
    fn test_done_has_no_offset() {
        assert_eq!(Cursor::Done.offset(), None);
        assert!(Cursor::Done.is_done());
    }
}
