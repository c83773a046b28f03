//! Owner of every source text loaded during a session.

use crate::file_id::FileId;
use crate::location::Location;
use crate::source_file::SourceFile;
use crate::span::Span;
use std::io;
use std::path::{Path, PathBuf};

/// Stores loaded texts and resolves [`Span`]s against them.
///
/// Ids are never reused; a removed text leaves its id unresolvable.
#[derive(Default)]
pub struct SourceDb {
    files: Vec<Option<SourceFile>>,
}

impl SourceDb {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Reads a file from disk and returns its id.
    pub fn load_file(&mut self, path: &Path) -> Result<FileId, io::Error> {
        let content = std::fs::read_to_string(path)?;
        Ok(self.add_source(path, content))
    }

    /// Adds an in-memory text; `name` is reported as its path.
    pub fn add_source(&mut self, name: impl Into<PathBuf>, content: String) -> FileId {
        let id = FileId::from_raw(self.files.len() as u32);
        self.files.push(Some(SourceFile::new(id, name.into(), content)));
        id
    }

    /// Takes the text for `id` out of the database.
    pub fn remove(&mut self, id: FileId) -> Option<SourceFile> {
        self.files.get_mut(id.as_raw() as usize)?.take()
    }

    /// Returns the file for `id`, or `None` for an id this database never
    /// issued or has removed.
    pub fn get_file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.as_raw() as usize)?.as_ref()
    }

    /// Number of texts held.
    pub fn len(&self) -> usize {
        self.files.iter().flatten().count()
    }

    /// Returns `true` if no text is held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start location of `span`.
    pub fn location(&self, span: Span) -> Option<Location> {
        self.get_file(span.file).map(|f| f.location(span.start))
    }

    /// Text covered by `span`, or `""` if the span is unknown.
    pub fn snippet(&self, span: Span) -> &str {
        self.get_file(span.file).map_or("", |f| f.snippet(span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn add_and_get() {
        let mut db = SourceDb::new();
        let id = db.add_source("test.vhd", "hello world".to_string());
        assert_eq!(db.get_file(id).unwrap().content, "hello world");
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn unknown_id() {
        let db = SourceDb::new();
        assert!(db.get_file(FileId::from_raw(3)).is_none());
        assert!(db.location(Span::DUMMY).is_none());
        assert_eq!(db.snippet(Span::DUMMY), "");
    }

    #[test]
    fn location_of_span() {
        let mut db = SourceDb::new();
        let id = db.add_source("test.vhd", "abc\ndef\nghi".to_string());
        assert_eq!(db.location(Span::new(id, 4, 7)), Some(Location::new(2, 1)));
        assert_eq!(db.snippet(Span::new(id, 4, 7)), "def");
    }

    #[test]
    fn same_path_twice_gets_two_ids() {
        let mut db = SourceDb::new();
        let a = db.add_source("a.vhd", "one".to_string());
        let b = db.add_source("a.vhd", "one".to_string());
        assert_ne!(a, b);
    }

    #[test]
    fn removed_id_is_not_reused() {
        let mut db = SourceDb::new();
        let a = db.add_source("a.vhd", "one".to_string());
        assert_eq!(db.remove(a).unwrap().content, "one");
        assert!(db.remove(a).is_none());
        assert!(db.get_file(a).is_none());
        assert!(db.is_empty());

        let b = db.add_source("b.vhd", "two".to_string());
        assert_ne!(a, b);
        assert_eq!(db.len(), 1);
        assert_eq!(db.get_file(b).unwrap().content, "two");
    }

    #[test]
    fn load_file_from_disk() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "entity top is end;").unwrap();
        let mut db = SourceDb::new();
        let id = db.load_file(tmp.path()).unwrap();
        assert_eq!(db.get_file(id).unwrap().content, "entity top is end;");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let mut db = SourceDb::new();
        let err = db.load_file(Path::new("definitely/not/here.vhd")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(db.is_empty());
    }
}
