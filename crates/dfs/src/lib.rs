//! # Overview
//!
//! `dfs` provides the filesystem surface the dsync engine runs against. Either
//! side of a transfer may live on the local filesystem (`file:`) or on HDFS
//! (`hdfs://authority/...`); the engine only ever sees the [`FileSystem`]
//! trait and [`FileMeta`] stat snapshots, so copy, deletion, and metadata
//! logic stay scheme-agnostic.
//!
//! # Design
//!
//! - [`Uri`] parses and validates the two accepted scheme forms; everything
//!   else is rejected before a client is constructed.
//! - [`LocalFs`] wraps `std::fs`, translating uid/gid to names so ownership is
//!   expressed the same way HDFS expresses it.
//! - [`HdfsFs`] wraps the `hdfs-native` client behind a blocking façade that
//!   owns a private tokio runtime; callers never see async.
//! - [`FileSystem::glob`] is a provided method: literal path components are
//!   joined, wildcard components are expanded by listing, so both backends get
//!   identical glob behaviour for free.
//!
//! # Errors
//!
//! Every operation reports [`FsError`] carrying the failing path. The engine
//! decides which side of the transfer an error came from and whether it is
//! fatal; this crate never swallows failures.
//!
//! Unix-only: permission bits and ownership use the Unix model on the local
//! side, matching what HDFS exposes remotely.

mod error;
mod glob;
mod hdfs;
mod id_lookup;
mod local;
mod meta;
mod uri;

use std::io::{self, Read, Write};
use std::path::Path;

pub use error::FsError;
pub use hdfs::HdfsFs;
pub use local::LocalFs;
pub use meta::{EntryKind, FileMeta};
pub use uri::{Scheme, Uri, UriError};

/// Writer handle returned by [`FileSystem::create`].
///
/// `commit` must be called after the payload is written; for HDFS it completes
/// the block write and surfaces close-time errors that a plain `flush` cannot.
pub trait FileWrite: Write {
    /// Finalizes the file, consuming the writer.
    fn commit(self: Box<Self>) -> io::Result<()>;
}

/// Minimal capability set the synchronization engine consumes.
///
/// All paths are absolute. Implementations are synchronous; the engine is
/// single-threaded and calls block until the filesystem answers.
pub trait FileSystem {
    /// Returns the scheme this filesystem serves.
    fn scheme(&self) -> Scheme;

    /// Takes a stat snapshot of `path`.
    fn stat(&self, path: &Path) -> Result<FileMeta, FsError>;

    /// Reports whether `path` names an existing entry.
    fn exists(&self, path: &Path) -> Result<bool, FsError>;

    /// Lists the direct children of `dir`. Order is not guaranteed; callers
    /// sort.
    fn list(&self, dir: &Path) -> Result<Vec<FileMeta>, FsError>;

    /// Creates `path` as a directory, including missing parents.
    fn mkdir(&self, path: &Path) -> Result<(), FsError>;

    /// Removes `path`. Non-empty directories require `recursive`.
    fn delete(&self, path: &Path, recursive: bool) -> Result<(), FsError>;

    /// Opens `path` for sequential reading.
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>, FsError>;

    /// Creates `path` for writing. With `overwrite` an existing file is
    /// truncated; without it, an existing file is an error.
    fn create(&self, path: &Path, overwrite: bool) -> Result<Box<dyn FileWrite + Send>, FsError>;

    /// Sets the modification time of `path`, in milliseconds since the epoch.
    fn set_times(&self, path: &Path, mtime_ms: i64) -> Result<(), FsError>;

    /// Sets the permission bits of `path`.
    fn set_permission(&self, path: &Path, mode: u32) -> Result<(), FsError>;

    /// Changes owner and/or group of `path` by name. `None` leaves the
    /// respective side untouched.
    fn set_owner(
        &self,
        path: &Path,
        owner: Option<&str>,
        group: Option<&str>,
    ) -> Result<(), FsError>;

    /// Expands a glob pattern into stat snapshots.
    ///
    /// Returns `Ok(None)` when the pattern contains no wildcards and the path
    /// it names does not exist; a wildcard pattern that matches nothing yields
    /// `Ok(Some(vec![]))`.
    fn glob(&self, pattern: &Path) -> Result<Option<Vec<FileMeta>>, FsError> {
        glob::expand(self, pattern)
    }
}

/// Connects to the filesystem a URI names.
pub fn connect(uri: &Uri) -> Result<Box<dyn FileSystem>, FsError> {
    match uri.scheme() {
        Scheme::File => Ok(Box::new(LocalFs::new())),
        Scheme::Hdfs => Ok(Box::new(HdfsFs::connect(uri)?)),
    }
}

/// Copies file contents from one filesystem to another.
///
/// Transfers bytes and nothing else; timestamps, permissions, and ownership
/// are applied by the caller afterwards.
pub fn copy_contents(
    src_fs: &dyn FileSystem,
    src_path: &Path,
    dst_fs: &dyn FileSystem,
    dst_path: &Path,
    overwrite: bool,
) -> Result<u64, FsError> {
    let mut reader = src_fs.open_read(src_path)?;
    let mut writer = dst_fs.create(dst_path, overwrite)?;
    let copied = io::copy(&mut reader, &mut writer)
        .map_err(|source| FsError::copy(src_path, dst_path, source))?;
    writer
        .commit()
        .map_err(|source| FsError::copy(src_path, dst_path, source))?;
    Ok(copied)
}

/// Copies a directory tree as an opaque unit.
///
/// Creates `dst_path` and mirrors everything below `src_path` into it,
/// overwriting files that already exist. Like [`copy_contents`], only bytes
/// move; metadata is the caller's responsibility.
pub fn copy_tree(
    src_fs: &dyn FileSystem,
    src_path: &Path,
    dst_fs: &dyn FileSystem,
    dst_path: &Path,
) -> Result<(), FsError> {
    dst_fs.mkdir(dst_path)?;
    for child in src_fs.list(src_path)? {
        let target = dst_path.join(child.name());
        if child.is_dir() {
            copy_tree(src_fs, child.path(), dst_fs, &target)?;
        } else {
            copy_contents(src_fs, child.path(), dst_fs, &target, true)?;
        }
    }
    Ok(())
}
