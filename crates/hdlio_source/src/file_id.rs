//! Opaque identifier for texts held by a [`SourceDb`](crate::SourceDb).

use serde::{Deserialize, Serialize};

/// Identifies one loaded source text.
///
/// Ids are dense indices assigned in load order, so a workspace that loads
/// the same path twice gets two distinct ids.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct FileId(u32);

impl FileId {
    /// Placeholder for spans that do not point into any loaded text.
    pub const DUMMY: FileId = FileId(u32::MAX);

    /// Creates a `FileId` from a raw index.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }

    /// Returns `true` for [`FileId::DUMMY`].
    pub fn is_dummy(self) -> bool {
        self == Self::DUMMY
    }
}
