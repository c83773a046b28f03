//! Content fingerprints for loaded source text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 64-bit XXH3 fingerprint of a source text.
///
/// Libraries record the fingerprint of every file they load so callers can
/// tell whether the same content was loaded twice.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceFingerprint(u64);

impl SourceFingerprint {
    /// Computes the fingerprint of a byte slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(xxhash_rust::xxh3::xxh3_64(data))
    }

    /// Returns the raw hash value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SourceFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl fmt::Debug for SourceFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceFingerprint({:08x}..)", self.0 >> 32)
    }
}
