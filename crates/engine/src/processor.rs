//! Per-entry decisions: copy, update, skip, create, or overwrite.

use std::path::Path;

use dfs::{FileMeta, FileSystem, FsError};
use logging::{ActionMode, ActionRecord, ActionTag};

use crate::entry::SourceEntry;
use crate::error::SyncResult;
use crate::target::Target;
use crate::walker::Walker;

/// What processing one entry produced.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// Log-only mode: there is no destination to act on.
    NoDestination,
    /// The entry was skipped; no metadata follows.
    Skipped,
    /// The destination slot is filled (or would be, in dry-run).
    Placed {
        /// State of the destination entry.
        target: Target,
        /// Whether this run created (or would create) the destination.
        is_new: bool,
    },
}

impl Walker<'_> {
    /// Routes one representative source entry through the decision table.
    pub(crate) fn process_entry(
        &mut self,
        entry: &SourceEntry,
        target: Option<&Path>,
        existing: Option<&FileMeta>,
    ) -> SyncResult<Outcome> {
        if entry.meta.is_dir() {
            if self.config.recurse {
                self.process_dir(entry, target, existing)
            } else if self.config.copy_dirs {
                // Opaque directory copies go through the file table.
                self.process_file(entry, target, existing)
            } else {
                self.summary.push(
                    ActionRecord::new(ActionTag::SkipDir, entry.path())
                        .with_qualifier("no-recurse"),
                );
                Ok(Outcome::Skipped)
            }
        } else {
            self.process_file(entry, target, existing)
        }
    }

    fn process_file(
        &mut self,
        entry: &SourceEntry,
        target: Option<&Path>,
        existing: Option<&FileMeta>,
    ) -> SyncResult<Outcome> {
        let src = &entry.meta;
        let Some(target) = target else {
            self.summary.push(
                ActionRecord::new(ActionTag::CopyFile, src.path())
                    .with_mode(ActionMode::LogOnly),
            );
            return Ok(Outcome::NoDestination);
        };

        let Some(existing) = existing else {
            if self.config.existing {
                self.summary.push(
                    ActionRecord::new(ActionTag::SkipFile, src.path())
                        .with_qualifier("existing"),
                );
                return Ok(Outcome::Skipped);
            }
            return self.transfer(src, target, None, ActionTag::CopyFile);
        };

        if !self.is_different(src, existing) {
            self.summary.push(
                ActionRecord::new(ActionTag::SameFile, src.path()).with_target(target),
            );
            return Ok(Outcome::Placed {
                target: Target::Realized(existing.clone()),
                is_new: false,
            });
        }
        if self.config.ignore_existing {
            self.summary.push(
                ActionRecord::new(ActionTag::SkipFile, src.path())
                    .with_qualifier("ignore-existing"),
            );
            return Ok(Outcome::Skipped);
        }
        if self.config.update && src.mtime_ms() <= existing.mtime_ms() {
            self.summary.push(
                ActionRecord::new(ActionTag::SkipFile, src.path()).with_qualifier("update"),
            );
            return Ok(Outcome::Skipped);
        }
        self.transfer(src, target, Some(existing), ActionTag::UpdateFile)
    }

    fn process_dir(
        &mut self,
        entry: &SourceEntry,
        target: Option<&Path>,
        existing: Option<&FileMeta>,
    ) -> SyncResult<Outcome> {
        // Log-only mode has nothing to create; recursion still descends.
        let Some(target) = target else {
            return Ok(Outcome::NoDestination);
        };

        match existing {
            Some(existing) if existing.is_dir() => Ok(Outcome::Placed {
                target: Target::Realized(existing.clone()),
                is_new: false,
            }),
            Some(_) => {
                // A file occupies the directory's slot; replace it.
                let record = self.action(ActionTag::OverwriteDir, target);
                let target_state = if self.config.dry_run {
                    Target::Intended(target.to_path_buf())
                } else {
                    let Some(dst_fs) = self.dst_fs else {
                        return Ok(Outcome::NoDestination);
                    };
                    dst_fs.delete(target, false)?;
                    dst_fs.mkdir(target)?;
                    Target::Realized(dst_fs.stat(target)?)
                };
                self.summary.push(record);
                Ok(Outcome::Placed {
                    target: target_state,
                    is_new: true,
                })
            }
            None => {
                let record = self.action(ActionTag::CreateDir, target);
                let target_state = if self.config.dry_run {
                    Target::Intended(target.to_path_buf())
                } else {
                    let Some(dst_fs) = self.dst_fs else {
                        return Ok(Outcome::NoDestination);
                    };
                    dst_fs.mkdir(target)?;
                    Target::Realized(dst_fs.stat(target)?)
                };
                self.summary.push(record);
                Ok(Outcome::Placed {
                    target: target_state,
                    is_new: true,
                })
            }
        }
    }

    fn transfer(
        &mut self,
        src: &FileMeta,
        target: &Path,
        existing: Option<&FileMeta>,
        tag: ActionTag,
    ) -> SyncResult<Outcome> {
        let record = self.action(tag, src.path()).with_target(target);
        let is_new = existing.is_none();

        if self.config.dry_run {
            self.summary.push(record);
            return Ok(Outcome::Placed {
                target: Target::Intended(target.to_path_buf()),
                is_new,
            });
        }

        let Some(dst_fs) = self.dst_fs else {
            return Ok(Outcome::NoDestination);
        };
        if src.is_dir() {
            // copy-dirs mode: the whole subtree is the unit of transfer.
            if existing.is_some() {
                dst_fs.delete(target, true)?;
            }
            dfs::copy_tree(self.src_fs, src.path(), dst_fs, target)?;
        } else {
            if existing.map_or(false, FileMeta::is_dir) {
                dst_fs.delete(target, true)?;
            }
            ensure_parent(dst_fs, target)?;
            dfs::copy_contents(self.src_fs, src.path(), dst_fs, target, true)?;
        }
        let placed = dst_fs.stat(target)?;
        self.summary.push(record);
        Ok(Outcome::Placed {
            target: Target::Realized(placed),
            is_new,
        })
    }

    /// The difference predicate: sizes differ ⇒ different; `ignoreTimes`
    /// forces different; `sizeOnly` stops at the length check; otherwise
    /// modification times within the tolerance window count as equal.
    pub(crate) fn is_different(&self, src: &FileMeta, dst: &FileMeta) -> bool {
        if src.is_dir() != dst.is_dir() {
            return true;
        }
        if self.config.ignore_times {
            return true;
        }
        if src.len() != dst.len() {
            return true;
        }
        if self.config.size_only {
            return false;
        }
        (src.mtime_ms() - dst.mtime_ms()).abs() > self.config.times_tolerance_ms
    }

    fn action(&self, tag: ActionTag, path: &Path) -> ActionRecord {
        let mode = if self.config.dry_run {
            ActionMode::DryRun
        } else {
            ActionMode::Applied
        };
        ActionRecord::new(tag, path).with_mode(mode)
    }
}

fn ensure_parent(fs: &dyn FileSystem, target: &Path) -> Result<(), FsError> {
    if let Some(parent) = target.parent() {
        if !fs.exists(parent)? {
            fs.mkdir(parent)?;
        }
    }
    Ok(())
}
