//! Error taxonomy for a synchronization run.

use std::path::PathBuf;

use thiserror::Error;

use crate::options::ConfigError;

/// Result type for engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that abort a synchronization run.
///
/// Mid-run this is either an unresolvable source conflict or a filesystem
/// failure. Only one filesystem problem is recoverable: a source root whose
/// glob cannot be expanded is logged and treated as empty. Listing failures
/// below a root and every destination-side failure are fatal.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The option set failed validation before the run started.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Multiple non-directory sources share a name and conflict resolution
    /// is disabled.
    #[error(
        "SRC_CONFLICT - Trying to copy multiple objects with the same filename \
         at the same destination: '{name}' ('{first}' vs '{second}')"
    )]
    SourceConflict {
        /// The colliding entry name.
        name: String,
        /// The first colliding source path.
        first: PathBuf,
        /// The second colliding source path.
        second: PathBuf,
    },
    /// A filesystem operation failed on a path the run cannot proceed
    /// without.
    #[error(transparent)]
    Filesystem(#[from] dfs::FsError),
}
