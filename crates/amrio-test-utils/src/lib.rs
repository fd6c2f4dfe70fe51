//! Test utilities for amrio development.
//!
//! Provides synthetic snapshot builders in [`fixtures`] and an in-memory
//! [`MockDecoder`] that serves prepared snapshots by path.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use amrio_sim::{DecodeError, DecodedSnapshot, SnapshotDecoder};

/// In-memory [`SnapshotDecoder`].
///
/// Register snapshots with [`insert`](MockDecoder::insert); decoding an
/// unregistered path fails with [`DecodeError::NotFound`]. Every call is
/// counted, successful or not.
#[derive(Default)]
pub struct MockDecoder {
    snapshots: HashMap<PathBuf, DecodedSnapshot>,
    calls: AtomicUsize,
}

impl MockDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `snapshot` for `path`.
    pub fn insert(&mut self, path: impl Into<PathBuf>, snapshot: DecodedSnapshot) {
        self.snapshots.insert(path.into(), snapshot);
    }

    /// Builder form of [`insert`](MockDecoder::insert).
    pub fn with(mut self, path: impl Into<PathBuf>, snapshot: DecodedSnapshot) -> Self {
        self.insert(path, snapshot);
        self
    }

    /// Number of `decode` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl SnapshotDecoder for MockDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedSnapshot, DecodeError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.snapshots
            .get(path)
            .cloned()
            .ok_or_else(|| DecodeError::NotFound {
                path: path.to_path_buf(),
            })
    }
}
