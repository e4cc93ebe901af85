use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::uri::UriError;

/// Errors surfaced by filesystem operations.
///
/// Every variant names the path (or path pair) involved so callers can render
/// diagnostics without re-deriving context.
#[derive(Debug, Error)]
pub enum FsError {
    /// Stat of a path failed.
    #[error("failed to stat '{path}': {source}")]
    Stat {
        /// Path that could not be inspected.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Listing a directory failed.
    #[error("failed to list '{path}': {source}")]
    List {
        /// Directory whose children could not be read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Directory creation failed.
    #[error("failed to create directory '{path}': {source}")]
    Mkdir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Deleting an entry failed.
    #[error("failed to delete '{path}': {source}")]
    Delete {
        /// Entry that could not be removed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Opening a file for reading failed.
    #[error("failed to open '{path}': {source}")]
    Open {
        /// File that could not be opened.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Creating a file for writing failed.
    #[error("failed to create '{path}': {source}")]
    Create {
        /// File that could not be created.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// A byte transfer between two filesystems failed.
    #[error("failed to copy '{src}' to '{dst}': {source}")]
    Copy {
        /// Source path of the transfer.
        src: PathBuf,
        /// Destination path of the transfer.
        dst: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Updating a modification time failed.
    #[error("failed to set times on '{path}': {source}")]
    SetTimes {
        /// Path whose mtime could not be written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Updating permission bits failed.
    #[error("failed to set permissions on '{path}': {source}")]
    SetPermission {
        /// Path whose mode could not be written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// Updating owner or group failed.
    #[error("failed to set owner on '{path}': {source}")]
    SetOwner {
        /// Path whose ownership could not be written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// A name could not be resolved to a local user.
    #[error("unknown user '{name}'")]
    UnknownUser {
        /// The unresolvable user name.
        name: String,
    },
    /// A name could not be resolved to a local group.
    #[error("unknown group '{name}'")]
    UnknownGroup {
        /// The unresolvable group name.
        name: String,
    },
    /// A glob component failed to compile.
    #[error("invalid glob component '{pattern}': {source}")]
    Pattern {
        /// Offending pattern text.
        pattern: String,
        /// Compile error from the glob engine.
        #[source]
        source: globset::Error,
    },
    /// A path was not valid UTF-8 where the backend requires it.
    #[error("path '{path}' is not valid UTF-8")]
    NonUtf8Path {
        /// Offending path.
        path: PathBuf,
    },
    /// Connecting to a remote filesystem failed.
    #[error("failed to connect to '{endpoint}': {source}")]
    Connect {
        /// Endpoint that refused the connection.
        endpoint: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// URI parsing failed.
    #[error(transparent)]
    Uri(#[from] UriError),
}

impl FsError {
    pub(crate) fn stat(path: &Path, source: io::Error) -> Self {
        Self::Stat {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn list(path: &Path, source: io::Error) -> Self {
        Self::List {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn mkdir(path: &Path, source: io::Error) -> Self {
        Self::Mkdir {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn delete(path: &Path, source: io::Error) -> Self {
        Self::Delete {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn open(path: &Path, source: io::Error) -> Self {
        Self::Open {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn create(path: &Path, source: io::Error) -> Self {
        Self::Create {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn copy(src: &Path, dst: &Path, source: io::Error) -> Self {
        Self::Copy {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
            source,
        }
    }

    pub(crate) fn set_times(path: &Path, source: io::Error) -> Self {
        Self::SetTimes {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn set_permission(path: &Path, source: io::Error) -> Self {
        Self::SetPermission {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn set_owner(path: &Path, source: io::Error) -> Self {
        Self::SetOwner {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn non_utf8(path: &Path) -> Self {
        Self::NonUtf8Path {
            path: path.to_path_buf(),
        }
    }
}
