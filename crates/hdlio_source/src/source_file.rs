//! One loaded source text with its line index and fingerprint.

use crate::file_id::FileId;
use crate::location::{LineIndex, Location};
use crate::span::Span;
use hdlio_common::SourceFingerprint;
use std::path::PathBuf;

/// A source text owned by the [`SourceDb`](crate::SourceDb).
pub struct SourceFile {
    /// Identifier within the owning database.
    pub id: FileId,
    /// Path on disk, or the caller-supplied name of an in-memory text.
    pub path: PathBuf,
    /// The full text.
    pub content: String,
    /// Fingerprint of `content`.
    pub fingerprint: SourceFingerprint,
    line_index: LineIndex,
}

impl SourceFile {
    /// Creates a source file and indexes its lines.
    pub fn new(id: FileId, path: PathBuf, content: String) -> Self {
        let line_index = LineIndex::new(&content);
        let fingerprint = SourceFingerprint::from_bytes(content.as_bytes());
        Self {
            id,
            path,
            content,
            fingerprint,
            line_index,
        }
    }

    /// The line index of this text.
    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Location of a byte offset.
    pub fn location(&self, offset: u32) -> Location {
        self.line_index.location(offset)
    }

    /// Text covered by `span`.
    pub fn snippet(&self, span: Span) -> &str {
        span.slice(&self.content)
    }

    /// The full line containing `offset`, without its line terminator.
    pub fn line_text(&self, offset: u32) -> &str {
        let bytes = self.content.as_bytes();
        let offset = (offset as usize).min(bytes.len());
        let start = bytes[..offset]
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |p| p + 1);
        let end = bytes[offset..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(bytes.len(), |p| offset + p);
        self.content
            .get(start..end)
            .unwrap_or("")
            .trim_end_matches('\r')
    }
}
