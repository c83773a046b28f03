//! Byte ranges within a loaded source text.

use crate::file_id::FileId;
use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` in one source text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Span {
    /// The text this range belongs to.
    pub file: FileId,
    /// Offset of the first byte.
    pub start: u32,
    /// Offset one past the last byte.
    pub end: u32,
}

impl Span {
    /// A span that points nowhere.
    pub const DUMMY: Span = Span {
        file: FileId::DUMMY,
        start: 0,
        end: 0,
    };

    /// Creates a new span.
    pub fn new(file: FileId, start: u32, end: u32) -> Self {
        Self { file, start, end }
    }

    /// Returns the smallest span covering both `self` and `other`.
    ///
    /// Spans from different texts cannot be merged; `self` is returned
    /// unchanged in that case.
    pub fn merge(self, other: Span) -> Span {
        if self.file != other.file {
            return self;
        }
        Span {
            file: self.file,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if this is [`Span::DUMMY`].
    pub fn is_dummy(&self) -> bool {
        self.file.is_dummy()
    }

    /// Slices `text` by this span.
    ///
    /// Returns an empty string if the span lies outside `text` or does not
    /// fall on character boundaries.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        text.get(self.start as usize..self.end as usize)
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_covers_both() {
        let f = FileId::from_raw(0);
        let m = Span::new(f, 5, 15).merge(Span::new(f, 10, 25));
        assert_eq!((m.start, m.end), (5, 25));
        assert_eq!(
            Span::new(f, 10, 25).merge(Span::new(f, 5, 15)),
            m,
            "merge is order independent"
        );
    }

    #[test]
    fn merge_across_files_keeps_self() {
        let a = Span::new(FileId::from_raw(0), 1, 2);
        let b = Span::new(FileId::from_raw(1), 0, 9);
        assert_eq!(a.merge(b), a);
    }

    #[test]
    fn len_and_empty() {
        let f = FileId::from_raw(0);
        assert_eq!(Span::new(f, 10, 20).len(), 10);
        assert!(Span::new(f, 5, 5).is_empty());
        assert!(Span::DUMMY.is_dummy());
    }

    #[test]
    fn slice_text() {
        let f = FileId::from_raw(0);
        assert_eq!(Span::new(f, 0, 6).slice("entity foo"), "entity");
        assert_eq!(Span::new(f, 8, 40).slice("entity foo"), "");
    }

    #[test]
    fn serde_roundtrip() {
        let s = Span::new(FileId::from_raw(1), 10, 20);
        let json = serde_json::to_string(&s).unwrap();
        let back: Span = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
