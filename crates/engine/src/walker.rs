//! The level walker: one invocation processes one directory depth.
//!
//! All recursion is explicit; the walker owns nothing beyond its stack frame
//! and the run summary it accumulates.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use dfs::{FileMeta, FileSystem};
use filters::DeleteVerdict;
use logging::{ActionMode, ActionRecord, ActionTag};
use tracing::warn;

use crate::entry::SourceEntry;
use crate::error::{SyncError, SyncResult};
use crate::options::Config;
use crate::processor::Outcome;
use crate::summary::SyncSummary;

/// One walk over the configured roots.
pub(crate) struct Walker<'a> {
    pub(crate) config: &'a Config,
    pub(crate) src_fs: &'a dyn FileSystem,
    pub(crate) dst_fs: Option<&'a dyn FileSystem>,
    pub(crate) dst_root: Option<PathBuf>,
    pub(crate) summary: SyncSummary,
}

/// A source listing request: the path to expand and, for non-roots, the base
/// path its entries inherit. Roots (`None`) are glob-expanded and assign
/// their matches' parent directory as the base.
type SourcePair = (PathBuf, Option<PathBuf>);

impl<'a> Walker<'a> {
    pub(crate) fn new(
        config: &'a Config,
        src_fs: &'a dyn FileSystem,
        dst_fs: Option<&'a dyn FileSystem>,
    ) -> Self {
        let dst_root = config.dst.as_ref().map(|uri| uri.path().to_path_buf());
        Self {
            config,
            src_fs,
            dst_fs,
            dst_root,
            summary: SyncSummary::default(),
        }
    }

    /// Seeds the walk with the configured roots and drives it to completion.
    pub(crate) fn run(mut self) -> SyncResult<SyncSummary> {
        let roots: Vec<SourcePair> = self
            .config
            .sources
            .iter()
            .map(|uri| (uri.path().to_path_buf(), None))
            .collect();
        let parent_dst = self.dst_root.clone();
        self.sync_level(roots, parent_dst)?;
        Ok(self.summary)
    }

    /// Processes one directory level: list, group, resolve, delete, copy,
    /// recurse, prune, and finally apply metadata.
    fn sync_level(
        &mut self,
        parent_sources: Vec<SourcePair>,
        parent_dst: Option<PathBuf>,
    ) -> SyncResult<()> {
        let entries = self.expand_sources(parent_sources)?;
        let (order, mut groups) = group_by_name(entries);

        if self.config.use_most_recent {
            for group in groups.values_mut() {
                group.sort_by_key(|entry| Reverse(entry.meta.mtime_ms()));
            }
        }

        let dst_children = self.list_destination(parent_dst.as_deref())?;

        if self.config.delete_extraneous {
            self.delete_extraneous(&groups, &dst_children)?;
        }

        for name in order {
            let Some(group) = groups.remove(&name) else {
                continue;
            };
            let kept = self.apply_filter(group);
            if kept.is_empty() {
                continue;
            }

            let target = parent_dst.as_ref().map(|dst| dst.join(&name));
            let all_dirs = kept.iter().all(|entry| entry.meta.is_dir());
            if kept.len() > 1 && !all_dirs && !self.config.resolve_conflicts {
                return Err(SyncError::SourceConflict {
                    name,
                    first: kept[0].path().to_path_buf(),
                    second: kept[1].path().to_path_buf(),
                });
            }

            let representative = &kept[0];
            let existing = dst_children.get(&name);
            let outcome =
                self.process_entry(representative, target.as_deref(), existing)?;

            let mut pruned = false;
            if representative.meta.is_dir() && self.config.recurse {
                if !matches!(outcome, Outcome::Skipped) {
                    let child_sources: Vec<SourcePair> = if all_dirs {
                        kept.iter()
                            .map(|entry| {
                                (entry.path().to_path_buf(), Some(entry.base().to_path_buf()))
                            })
                            .collect()
                    } else {
                        vec![(
                            representative.path().to_path_buf(),
                            Some(representative.base().to_path_buf()),
                        )]
                    };
                    self.sync_level(child_sources, target.clone())?;
                }
                if self.config.prune_empty_dirs {
                    pruned = self.prune_if_empty(target.as_deref())?;
                }
            }

            if !pruned {
                if let Outcome::Placed { target, is_new } = outcome {
                    if let Some(dst_fs) = self.dst_fs {
                        let records = self.config.planner.apply(
                            dst_fs,
                            &representative.meta,
                            target.path(),
                            target.realized(),
                            is_new,
                            self.config.dry_run,
                        )?;
                        self.summary.extend(records);
                    }
                }
            }
        }

        Ok(())
    }

    /// Step 1: turns listing requests into concrete entries.
    ///
    /// A root whose glob cannot be expanded is logged and treated as empty;
    /// listing a directory below a root propagates its error. Silently
    /// treating a mid-walk listing failure as an empty directory would let a
    /// deletion sweep remove the matching destination subtree.
    fn expand_sources(
        &mut self,
        parent_sources: Vec<SourcePair>,
    ) -> SyncResult<Vec<SourceEntry>> {
        let mut entries = Vec::new();
        for (path, base) in parent_sources {
            match base {
                None => match self.src_fs.glob(&path) {
                    Ok(Some(mut matches)) => {
                        matches.sort_by(|a, b| a.path().cmp(b.path()));
                        for meta in matches {
                            let parent = meta
                                .path()
                                .parent()
                                .unwrap_or_else(|| Path::new("/"))
                                .to_path_buf();
                            entries.push(SourceEntry::new(meta, parent));
                        }
                    }
                    Ok(None) => {
                        warn!("source '{}' does not exist; skipping", path.display());
                    }
                    Err(error) => {
                        warn!(
                            "failed to expand source '{}': {error}; treating as empty",
                            path.display()
                        );
                    }
                },
                Some(base) => {
                    let mut children = self.src_fs.list(&path)?;
                    children.sort_by(|a, b| a.path().cmp(b.path()));
                    for meta in children {
                        entries.push(SourceEntry::new(meta, base.clone()));
                    }
                }
            }
        }
        Ok(entries)
    }

    /// Step 4: snapshots the destination's direct children.
    fn list_destination(
        &mut self,
        parent_dst: Option<&Path>,
    ) -> SyncResult<HashMap<String, FileMeta>> {
        let mut children = HashMap::new();
        let (Some(dst_fs), Some(dir)) = (self.dst_fs, parent_dst) else {
            return Ok(children);
        };
        if !dst_fs.exists(dir)? {
            return Ok(children);
        }
        if !dst_fs.stat(dir)?.is_dir() {
            return Ok(children);
        }
        for child in dst_fs.list(dir)? {
            children.insert(child.name().to_string(), child);
        }
        Ok(children)
    }

    /// Step 5: deletes destination entries with no source counterpart,
    /// honoring filter protection.
    fn delete_extraneous(
        &mut self,
        groups: &HashMap<String, Vec<SourceEntry>>,
        dst_children: &HashMap<String, FileMeta>,
    ) -> SyncResult<()> {
        let Some(dst_fs) = self.dst_fs else {
            return Ok(());
        };
        let mut extraneous: Vec<&FileMeta> = dst_children
            .iter()
            .filter(|(name, _)| !groups.contains_key(*name))
            .map(|(_, meta)| meta)
            .collect();
        extraneous.sort_by(|a, b| a.path().cmp(b.path()));

        for meta in extraneous {
            let verdict = self.config.filter.delete_verdict(
                meta.path(),
                meta.is_dir(),
                self.dst_root.as_deref(),
                self.config.delete_excluded,
            );
            match verdict {
                DeleteVerdict::Protected => {
                    self.summary
                        .push(ActionRecord::new(ActionTag::ExcludeDst, meta.path()));
                }
                DeleteVerdict::Delete => {
                    let mode = if self.config.dry_run {
                        ActionMode::DryRun
                    } else {
                        ActionMode::Applied
                    };
                    if !self.config.dry_run {
                        dst_fs.delete(meta.path(), true)?;
                    }
                    self.summary.push(
                        ActionRecord::new(ActionTag::DeleteDst, meta.path()).with_mode(mode),
                    );
                }
            }
        }
        Ok(())
    }

    /// Step 6a: drops filtered-out entries from a group, logging each.
    fn apply_filter(&mut self, group: Vec<SourceEntry>) -> Vec<SourceEntry> {
        if self.config.filter.is_empty() {
            return group;
        }
        let mut kept = Vec::with_capacity(group.len());
        for entry in group {
            if self
                .config
                .filter
                .allows(entry.path(), entry.meta.is_dir(), Some(entry.base()))
            {
                kept.push(entry);
            } else {
                self.summary
                    .push(ActionRecord::new(ActionTag::ExcludeSrc, entry.path()));
            }
        }
        kept
    }

    /// Step 6g: removes a target directory that ended up empty.
    fn prune_if_empty(&mut self, target: Option<&Path>) -> SyncResult<bool> {
        let (Some(dst_fs), Some(target)) = (self.dst_fs, target) else {
            return Ok(false);
        };
        if !dst_fs.exists(target)? {
            return Ok(false);
        }
        if !dst_fs.stat(target)?.is_dir() {
            return Ok(false);
        }
        if !dst_fs.list(target)?.is_empty() {
            return Ok(false);
        }
        let mode = if self.config.dry_run {
            ActionMode::DryRun
        } else {
            ActionMode::Applied
        };
        if !self.config.dry_run {
            dst_fs.delete(target, false)?;
        }
        self.summary
            .push(ActionRecord::new(ActionTag::PruneDir, target).with_mode(mode));
        Ok(true)
    }
}

/// Step 2: groups entries by name, preserving first-seen name order and
/// source-parameter order within each group.
fn group_by_name(
    entries: Vec<SourceEntry>,
) -> (Vec<String>, HashMap<String, Vec<SourceEntry>>) {
    let mut order = Vec::new();
    let mut groups: HashMap<String, Vec<SourceEntry>> = HashMap::new();
    for entry in entries {
        let name = entry.meta.name().to_string();
        let group = groups.entry(name.clone()).or_default();
        if group.is_empty() {
            order.push(name);
        }
        group.push(entry);
    }
    (order, groups)
}
