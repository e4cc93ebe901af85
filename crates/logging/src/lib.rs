#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` carries the action vocabulary of a dsync run. Every observable
//! decision the engine takes (copying a file, creating a directory, skipping
//! an unchanged entry, deleting an extraneous one) is described by exactly
//! one [`ActionRecord`] and emitted as exactly one `tracing` event.
//!
//! # Levels
//!
//! Realized actions log at DEBUG: a normal run is silent unless verbose
//! output was requested. Records that describe intent rather than effect,
//! which covers dry-run and log-only (no destination) actions, log at INFO,
//! since the log line is the whole point of those modes.
//!
//! # Rendering
//!
//! Records render as `TAG [qualifier] - <path>[ --> <target>]`, for example:
//!
//! ```text
//! COPY_FILE [dryrun] - /src/a --> /dst/a
//! SKIP_FILE [ignore-existing] - /src/b
//! ```

mod subscriber;

use std::fmt;
use std::path::{Path, PathBuf};

pub use subscriber::init;

/// Event target used for all action records.
pub const ACTION_TARGET: &str = "dsync::action";

/// The action vocabulary. Each processed entry produces at most one record
/// per category (transfer, metadata, deletion).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActionTag {
    /// A destination directory was created.
    CreateDir,
    /// A destination file was replaced by a directory.
    OverwriteDir,
    /// A file was copied to a previously missing destination.
    CopyFile,
    /// An existing destination file was overwritten with new content.
    UpdateFile,
    /// Source and destination already matched.
    SameFile,
    /// A file was skipped; the qualifier names the reason.
    SkipFile,
    /// A directory was skipped; the qualifier names the reason.
    SkipDir,
    /// The destination's modification time was set.
    UpdateTimes,
    /// The destination's permission bits were set.
    UpdatePerms,
    /// The destination's owner and/or group was set.
    UpdateOwnerGroup,
    /// An extraneous destination entry was deleted.
    DeleteDst,
    /// A source entry was dropped by the filter rules.
    ExcludeSrc,
    /// An extraneous destination entry was protected from deletion.
    ExcludeDst,
    /// An empty destination directory was pruned.
    PruneDir,
}

impl ActionTag {
    /// Returns the canonical tag text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateDir => "CREATE_DIR",
            Self::OverwriteDir => "OVERWRITE_DIR",
            Self::CopyFile => "COPY_FILE",
            Self::UpdateFile => "UPDATE_FILE",
            Self::SameFile => "SAME_FILE",
            Self::SkipFile => "SKIP_FILE",
            Self::SkipDir => "SKIP_DIR",
            Self::UpdateTimes => "UPDATE_TIMES",
            Self::UpdatePerms => "UPDATE_PERMS",
            Self::UpdateOwnerGroup => "UPDATE_OWNER_GROUP",
            Self::DeleteDst => "DELETE_DST",
            Self::ExcludeSrc => "EXCLUDE_SRC",
            Self::ExcludeDst => "EXCLUDE_DST",
            Self::PruneDir => "PRUNE_DIR",
        }
    }
}

impl fmt::Display for ActionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the recorded action relates to the filesystem.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ActionMode {
    /// The action was performed.
    #[default]
    Applied,
    /// Dry-run: the action was intended but not performed.
    DryRun,
    /// No destination is configured; the record is the entire output.
    LogOnly,
}

/// One observable engine decision.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActionRecord {
    tag: ActionTag,
    mode: ActionMode,
    qualifier: Option<&'static str>,
    path: PathBuf,
    target: Option<PathBuf>,
}

impl ActionRecord {
    /// Creates a record for `tag` concerning `path`.
    #[must_use]
    pub fn new(tag: ActionTag, path: impl Into<PathBuf>) -> Self {
        Self {
            tag,
            mode: ActionMode::Applied,
            qualifier: None,
            path: path.into(),
            target: None,
        }
    }

    /// Attaches the destination side of a transfer.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Attaches a reason qualifier such as `existing` or `no-recurse`.
    #[must_use]
    pub const fn with_qualifier(mut self, qualifier: &'static str) -> Self {
        self.qualifier = Some(qualifier);
        self
    }

    /// Sets the record mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: ActionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the tag.
    #[must_use]
    pub const fn tag(&self) -> ActionTag {
        self.tag
    }

    /// Returns the mode.
    #[must_use]
    pub const fn mode(&self) -> ActionMode {
        self.mode
    }

    /// Returns the qualifier, if any.
    #[must_use]
    pub const fn qualifier(&self) -> Option<&'static str> {
        self.qualifier
    }

    /// Returns the primary (source-side) path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the destination-side path, if the action has one.
    #[must_use]
    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    /// Emits the record as a single tracing event at its canonical level.
    pub fn emit(&self) {
        match self.mode {
            ActionMode::Applied => {
                tracing::debug!(target: ACTION_TARGET, "{self}");
            }
            ActionMode::DryRun | ActionMode::LogOnly => {
                tracing::info!(target: ACTION_TARGET, "{self}");
            }
        }
    }
}

impl fmt::Display for ActionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag.as_str())?;
        if let Some(qualifier) = self.qualifier {
            write!(f, " [{qualifier}]")?;
        }
        match self.mode {
            ActionMode::Applied => {}
            ActionMode::DryRun => f.write_str(" [dryrun]")?,
            ActionMode::LogOnly => f.write_str(" [no-dst]")?,
        }
        write!(f, " - {}", self.path.display())?;
        if let Some(target) = &self.target {
            write!(f, " --> {}", target.display())?;
        }
        Ok(())
    }
}
