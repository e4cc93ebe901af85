//! # Overview
//!
//! `engine` is the synchronization core of dsync. Given one or more source
//! path patterns and an optional destination, it walks sources and
//! destination in lockstep, decides per entry whether to copy, update, skip,
//! or delete, merges multiple sources into one destination tree, and applies
//! metadata mutations in an order that keeps preserved directory times
//! intact. Either side may be local or HDFS; the engine only speaks the
//! [`dfs::FileSystem`] trait.
//!
//! # Design
//!
//! - [`SyncOptions`] collects the full option surface and validates it once;
//!   the engine runs against the frozen result.
//! - The level walker processes exactly one directory depth per invocation
//!   and recurses explicitly, depth-first, on the first matching directory of
//!   each name. Within a level, entries follow source-parameter order after
//!   name-insertion order.
//! - The entry processor owns the copy/update/skip decision table; the
//!   metadata planner (from the `meta` crate) runs afterwards, and for
//!   directories only after the whole subtree has been processed.
//! - Everything observable lands in a [`SyncSummary`]: one record per
//!   action, in emission order, with per-tag counters.
//!
//! # Concurrency
//!
//! None. The run is single-threaded and deterministic; every filesystem call
//! blocks. Shared state is limited to immutable config and the two
//! filesystem handles.
//!
//! # Errors
//!
//! A source root whose glob cannot be expanded is logged and treated as
//! empty; the run continues. Everything else mid-run is fatal: listing
//! failures below a root, destination-side filesystem failures, and
//! [`SyncError::SourceConflict`] (same-name non-directory sources without
//! conflict resolution).
//!
//! # Examples
//!
//! ```no_run
//! use engine::{sync, SyncOptions};
//!
//! let options = SyncOptions::new(["file:/data/in"])
//!     .destination("hdfs://namenode:8020/data/out")
//!     .recurse(true)
//!     .preserve_times(true);
//! let summary = sync(options)?;
//! println!("{} files copied", summary.files_copied());
//! # Ok::<(), engine::SyncError>(())
//! ```

mod entry;
mod error;
mod options;
mod processor;
mod summary;
mod target;
mod walker;

use dfs::FileSystem;

pub use error::{SyncError, SyncResult};
pub use options::{ConfigError, SyncOptions, DEFAULT_TIMES_TOLERANCE_MS};
pub use summary::SyncSummary;

use options::Config;
use walker::Walker;

/// A configured synchronization engine.
///
/// Owns the validated config and the filesystem handles for the run's
/// lifetime; [`Engine::run`] may be called repeatedly (each call is an
/// independent walk).
pub struct Engine {
    config: Config,
    src_fs: Box<dyn FileSystem>,
    dst_fs: Option<Box<dyn FileSystem>>,
}

impl Engine {
    /// Validates the options and connects to the filesystems involved.
    pub fn new(options: SyncOptions) -> SyncResult<Self> {
        let config = options.into_config()?;
        let src_fs = dfs::connect(&config.sources[0])?;
        let dst_fs = match &config.dst {
            Some(uri) => Some(dfs::connect(uri)?),
            None => None,
        };
        Ok(Self {
            config,
            src_fs,
            dst_fs,
        })
    }

    /// Runs the synchronization and returns the ordered action summary.
    pub fn run(&self) -> SyncResult<SyncSummary> {
        Walker::new(&self.config, self.src_fs.as_ref(), self.dst_fs.as_deref()).run()
    }
}

/// Validates options, runs once, and returns the summary.
pub fn sync(options: SyncOptions) -> SyncResult<SyncSummary> {
    Engine::new(options)?.run()
}
