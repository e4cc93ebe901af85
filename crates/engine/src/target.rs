use std::path::{Path, PathBuf};

use dfs::FileMeta;

/// State of an in-progress destination entry.
///
/// Dry-run processing never writes, so there is no handle to stat, only the
/// path the entry would occupy. Realized targets carry the post-write
/// snapshot the metadata planner compares against.
#[derive(Clone, Debug)]
pub(crate) enum Target {
    /// The path the entry would occupy; nothing has been written.
    Intended(PathBuf),
    /// A snapshot taken after the destination entry was written or found.
    Realized(FileMeta),
}

impl Target {
    /// Returns the destination path regardless of branch.
    pub(crate) fn path(&self) -> &Path {
        match self {
            Self::Intended(path) => path,
            Self::Realized(meta) => meta.path(),
        }
    }

    /// Returns the snapshot when one exists.
    pub(crate) fn realized(&self) -> Option<&FileMeta> {
        match self {
            Self::Intended(_) => None,
            Self::Realized(meta) => Some(meta),
        }
    }
}
