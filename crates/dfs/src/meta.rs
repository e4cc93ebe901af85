use std::path::{Path, PathBuf};

/// Kind of a filesystem entry. Links, devices, and other special files are
/// outside the transfer model and never appear here.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
}

/// Stat snapshot of a filesystem entry.
///
/// A `FileMeta` is read-only and describes the entry at the time of the stat
/// call; the engine treats it as immutable for the span of one processing
/// step.
#[derive(Clone, Debug)]
pub struct FileMeta {
    path: PathBuf,
    kind: EntryKind,
    len: u64,
    mtime_ms: i64,
    perms: u32,
    owner: String,
    group: String,
}

impl FileMeta {
    /// Builds a snapshot from its parts.
    #[must_use]
    pub fn new(
        path: impl Into<PathBuf>,
        kind: EntryKind,
        len: u64,
        mtime_ms: i64,
        perms: u32,
        owner: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            kind,
            len,
            mtime_ms,
            perms,
            owner: owner.into(),
            group: group.into(),
        }
    }

    /// Returns the absolute path of the entry.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the final path component, or an empty string for the root.
    #[must_use]
    pub fn name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("")
    }

    /// Returns the entry kind.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Reports whether the entry is a directory.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }

    /// Returns the length in bytes (zero for directories on some backends).
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.len
    }

    /// Reports whether the entry has zero length.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the modification time in milliseconds since the Unix epoch.
    #[must_use]
    pub const fn mtime_ms(&self) -> i64 {
        self.mtime_ms
    }

    /// Returns the permission bits.
    #[must_use]
    pub const fn perms(&self) -> u32 {
        self.perms
    }

    /// Returns the owner name.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the group name.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FileMeta {
        FileMeta::new(
            "/data/report.csv",
            EntryKind::File,
            42,
            1_700_000_000_000,
            0o644,
            "alice",
            "analytics",
        )
    }

    #[test]
    fn accessors_reflect_construction() {
        let meta = sample();
        assert_eq!(meta.path(), Path::new("/data/report.csv"));
        assert_eq!(meta.name(), "report.csv");
        assert!(!meta.is_dir());
        assert_eq!(meta.len(), 42);
        assert_eq!(meta.mtime_ms(), 1_700_000_000_000);
        assert_eq!(meta.perms(), 0o644);
        assert_eq!(meta.owner(), "alice");
        assert_eq!(meta.group(), "analytics");
    }

    #[test]
    fn root_has_empty_name() {
        let meta = FileMeta::new("/", EntryKind::Directory, 0, 0, 0o755, "hdfs", "hdfs");
        assert_eq!(meta.name(), "");
        assert!(meta.is_dir());
    }
}
