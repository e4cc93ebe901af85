use std::path::{Path, PathBuf};

use dfs::FileMeta;

/// A source entry together with its root-of-transfer directory.
///
/// When a source root glob matches an entry, the directory that contained the
/// match becomes the entry's base path; every descendant discovered during
/// recursion inherits it unchanged. The base path exists solely so anchored
/// filter rules have a stable prefix to strip.
#[derive(Clone, Debug)]
pub(crate) struct SourceEntry {
    pub(crate) meta: FileMeta,
    pub(crate) base: PathBuf,
}

impl SourceEntry {
    pub(crate) fn new(meta: FileMeta, base: impl Into<PathBuf>) -> Self {
        Self {
            meta,
            base: base.into(),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        self.meta.path()
    }

    pub(crate) fn base(&self) -> &Path {
        &self.base
    }
}
