use std::path::Path;

use dfs::{FileMeta, FileSystem, FsError};
use logging::{ActionMode, ActionRecord, ActionTag};

use crate::chmod::ChmodSet;
use crate::mapping::NameMapping;

/// Preservation switches the planner honors.
#[derive(Clone, Copy, Debug)]
pub struct MetadataOptions {
    /// Replicate the source modification time.
    pub preserve_times: bool,
    /// Replicate the source permission bits (before chmod rules).
    pub preserve_perms: bool,
    /// Replicate the source owner through the user mapping.
    pub preserve_owner: bool,
    /// Replicate the source group through the group mapping.
    pub preserve_group: bool,
    /// Modification times within this many milliseconds count as equal.
    pub times_tolerance_ms: i64,
}

impl Default for MetadataOptions {
    fn default() -> Self {
        Self {
            preserve_times: false,
            preserve_perms: false,
            preserve_owner: false,
            preserve_group: false,
            times_tolerance_ms: 1000,
        }
    }
}

/// Applies metadata to a destination entry in the canonical order: times,
/// permissions, owner/group.
///
/// The planner runs after any recursive descent into a directory has
/// completed; running earlier would let child mutations clobber a preserved
/// directory mtime.
#[derive(Debug, Default)]
pub struct MetadataPlanner {
    options: MetadataOptions,
    chmod: ChmodSet,
    usermap: NameMapping,
    groupmap: NameMapping,
}

impl MetadataPlanner {
    /// Builds a planner from its frozen configuration pieces.
    #[must_use]
    pub fn new(
        options: MetadataOptions,
        chmod: ChmodSet,
        usermap: NameMapping,
        groupmap: NameMapping,
    ) -> Self {
        Self {
            options,
            chmod,
            usermap,
            groupmap,
        }
    }

    /// Applies metadata for `src` onto `dst_path`.
    ///
    /// `dst` is the realized destination snapshot when one exists; in dry-run
    /// mode a freshly "created" entry has none, and every step records its
    /// intent instead of comparing. `is_new` reports whether the entry
    /// processor created (or would create) the destination in this run.
    ///
    /// Returns the action records it emitted, in order.
    pub fn apply(
        &self,
        fs: &dyn FileSystem,
        src: &FileMeta,
        dst_path: &Path,
        dst: Option<&FileMeta>,
        is_new: bool,
        dry_run: bool,
    ) -> Result<Vec<ActionRecord>, FsError> {
        let mut records = Vec::new();
        self.apply_times(fs, src, dst_path, dst, dry_run, &mut records)?;
        self.apply_perms(fs, src, dst_path, dst, is_new, dry_run, &mut records)?;
        self.apply_owner(fs, src, dst_path, dst, dry_run, &mut records)?;
        Ok(records)
    }

    fn apply_times(
        &self,
        fs: &dyn FileSystem,
        src: &FileMeta,
        dst_path: &Path,
        dst: Option<&FileMeta>,
        dry_run: bool,
        records: &mut Vec<ActionRecord>,
    ) -> Result<(), FsError> {
        if !self.options.preserve_times {
            return Ok(());
        }
        if let Some(dst) = dst {
            if dst.is_dir() != src.is_dir() {
                return Ok(());
            }
            let drift = (src.mtime_ms() - dst.mtime_ms()).abs();
            if drift <= self.options.times_tolerance_ms {
                return Ok(());
            }
        }
        if !dry_run {
            fs.set_times(dst_path, src.mtime_ms())?;
        }
        records.push(record(ActionTag::UpdateTimes, dst_path, dry_run));
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_perms(
        &self,
        fs: &dyn FileSystem,
        src: &FileMeta,
        dst_path: &Path,
        dst: Option<&FileMeta>,
        is_new: bool,
        dry_run: bool,
        records: &mut Vec<ActionRecord>,
    ) -> Result<(), FsError> {
        let has_rule = self.chmod.has_rule_for(src.is_dir());
        if !(self.options.preserve_perms || (is_new && has_rule)) {
            return Ok(());
        }
        let base = if self.options.preserve_perms {
            src.perms()
        } else {
            dst.map_or(src.perms(), FileMeta::perms)
        };
        let new_mode = self.chmod.apply(base, src.is_dir());
        if let Some(dst) = dst {
            if new_mode == dst.perms() {
                return Ok(());
            }
        }
        if !dry_run {
            fs.set_permission(dst_path, new_mode)?;
        }
        records.push(record(ActionTag::UpdatePerms, dst_path, dry_run));
        Ok(())
    }

    fn apply_owner(
        &self,
        fs: &dyn FileSystem,
        src: &FileMeta,
        dst_path: &Path,
        dst: Option<&FileMeta>,
        dry_run: bool,
        records: &mut Vec<ActionRecord>,
    ) -> Result<(), FsError> {
        let new_owner = self
            .options
            .preserve_owner
            .then(|| self.usermap.resolve(src.owner()))
            .filter(|owner| dst.map_or(true, |dst| dst.owner() != *owner));
        let new_group = self
            .options
            .preserve_group
            .then(|| self.groupmap.resolve(src.group()))
            .filter(|group| dst.map_or(true, |dst| dst.group() != *group));

        if new_owner.is_none() && new_group.is_none() {
            return Ok(());
        }
        if !dry_run {
            fs.set_owner(dst_path, new_owner, new_group)?;
        }
        records.push(record(ActionTag::UpdateOwnerGroup, dst_path, dry_run));
        Ok(())
    }
}

fn record(tag: ActionTag, dst_path: &Path, dry_run: bool) -> ActionRecord {
    let mode = if dry_run {
        ActionMode::DryRun
    } else {
        ActionMode::Applied
    };
    ActionRecord::new(tag, dst_path).with_mode(mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::MappingKind;
    use dfs::LocalFs;
    use std::fs;
    use tempfile::tempdir;

    fn planner(options: MetadataOptions) -> MetadataPlanner {
        MetadataPlanner::new(
            options,
            ChmodSet::default(),
            NameMapping::default(),
            NameMapping::default(),
        )
    }

    fn tags(records: &[ActionRecord]) -> Vec<ActionTag> {
        records.iter().map(ActionRecord::tag).collect()
    }

    #[test]
    fn preserves_mtime_beyond_tolerance() {
        let temp = tempdir().expect("tempdir");
        let src_path = temp.path().join("src");
        let dst_path = temp.path().join("dst");
        fs::write(&src_path, b"data").expect("write src");
        fs::write(&dst_path, b"data").expect("write dst");

        let fs_handle = LocalFs::new();
        fs_handle
            .set_times(&src_path, 1_500_000_000_000)
            .expect("stamp src");
        let src = fs_handle.stat(&src_path).expect("stat src");
        let dst = fs_handle.stat(&dst_path).expect("stat dst");

        let planner = planner(MetadataOptions {
            preserve_times: true,
            ..MetadataOptions::default()
        });
        let records = planner
            .apply(&fs_handle, &src, &dst_path, Some(&dst), false, false)
            .expect("apply");
        assert_eq!(tags(&records), [ActionTag::UpdateTimes]);
        assert_eq!(
            fs_handle.stat(&dst_path).expect("stat").mtime_ms(),
            1_500_000_000_000
        );
    }

    #[test]
    fn mtime_within_tolerance_is_left_alone() {
        let temp = tempdir().expect("tempdir");
        let src_path = temp.path().join("src");
        let dst_path = temp.path().join("dst");
        fs::write(&src_path, b"data").expect("write src");
        fs::write(&dst_path, b"data").expect("write dst");

        let fs_handle = LocalFs::new();
        fs_handle
            .set_times(&src_path, 1_500_000_000_000)
            .expect("stamp src");
        fs_handle
            .set_times(&dst_path, 1_500_000_000_800)
            .expect("stamp dst");
        let src = fs_handle.stat(&src_path).expect("stat src");
        let dst = fs_handle.stat(&dst_path).expect("stat dst");

        let planner = planner(MetadataOptions {
            preserve_times: true,
            ..MetadataOptions::default()
        });
        let records = planner
            .apply(&fs_handle, &src, &dst_path, Some(&dst), false, false)
            .expect("apply");
        assert!(records.is_empty());
    }

    #[test]
    fn preserve_perms_uses_source_as_base() {
        let temp = tempdir().expect("tempdir");
        let src_path = temp.path().join("src");
        let dst_path = temp.path().join("dst");
        fs::write(&src_path, b"data").expect("write src");
        fs::write(&dst_path, b"data").expect("write dst");

        let fs_handle = LocalFs::new();
        fs_handle.set_permission(&src_path, 0o640).expect("chmod src");
        fs_handle.set_permission(&dst_path, 0o666).expect("chmod dst");
        let src = fs_handle.stat(&src_path).expect("stat src");
        let dst = fs_handle.stat(&dst_path).expect("stat dst");

        let planner = planner(MetadataOptions {
            preserve_perms: true,
            ..MetadataOptions::default()
        });
        let records = planner
            .apply(&fs_handle, &src, &dst_path, Some(&dst), false, false)
            .expect("apply");
        assert_eq!(tags(&records), [ActionTag::UpdatePerms]);
        assert_eq!(fs_handle.stat(&dst_path).expect("stat").perms(), 0o640);
    }

    #[test]
    fn chmod_applies_to_new_entries_without_preserve() {
        let temp = tempdir().expect("tempdir");
        let src_path = temp.path().join("src");
        let dst_path = temp.path().join("dst");
        fs::write(&src_path, b"data").expect("write src");
        fs::write(&dst_path, b"data").expect("write dst");

        let fs_handle = LocalFs::new();
        fs_handle.set_permission(&dst_path, 0o600).expect("chmod dst");
        let src = fs_handle.stat(&src_path).expect("stat src");
        let dst = fs_handle.stat(&dst_path).expect("stat dst");

        let planner = MetadataPlanner::new(
            MetadataOptions::default(),
            ChmodSet::parse(["F664"]).expect("chmod parses"),
            NameMapping::default(),
            NameMapping::default(),
        );

        // Not new: the chmod-only path does not fire.
        let records = planner
            .apply(&fs_handle, &src, &dst_path, Some(&dst), false, false)
            .expect("apply");
        assert!(records.is_empty());

        // New entry: chmod rewrites the fresh copy's bits.
        let records = planner
            .apply(&fs_handle, &src, &dst_path, Some(&dst), true, false)
            .expect("apply");
        assert_eq!(tags(&records), [ActionTag::UpdatePerms]);
        assert_eq!(fs_handle.stat(&dst_path).expect("stat").perms(), 0o664);
    }

    #[test]
    fn dry_run_records_intent_without_writing() {
        let temp = tempdir().expect("tempdir");
        let src_path = temp.path().join("src");
        fs::write(&src_path, b"data").expect("write src");

        let fs_handle = LocalFs::new();
        fs_handle
            .set_times(&src_path, 1_500_000_000_000)
            .expect("stamp src");
        let src = fs_handle.stat(&src_path).expect("stat src");

        let planner = planner(MetadataOptions {
            preserve_times: true,
            ..MetadataOptions::default()
        });
        let intended = temp.path().join("would-be-dst");
        let records = planner
            .apply(&fs_handle, &src, &intended, None, true, true)
            .expect("apply");
        assert_eq!(tags(&records), [ActionTag::UpdateTimes]);
        assert_eq!(records[0].mode(), ActionMode::DryRun);
        assert!(!intended.exists());
    }

    #[test]
    fn owner_mapping_resolves_before_comparison() {
        // No filesystem mutation: destination already carries the mapped
        // owner, so no set_owner call (and no record) happens.
        let temp = tempdir().expect("tempdir");
        let dst_path = temp.path().join("dst");
        fs::write(&dst_path, b"data").expect("write dst");

        let fs_handle = LocalFs::new();
        let dst = fs_handle.stat(&dst_path).expect("stat dst");
        let src = FileMeta::new(
            temp.path().join("src"),
            dfs::EntryKind::File,
            4,
            0,
            0o644,
            "remoteuser",
            dst.group(),
        );

        let planner = MetadataPlanner::new(
            MetadataOptions {
                preserve_owner: true,
                preserve_group: true,
                ..MetadataOptions::default()
            },
            ChmodSet::default(),
            NameMapping::parse(MappingKind::User, [format!("remoteuser:{}", dst.owner())])
                .expect("mapping parses"),
            NameMapping::default(),
        );
        let records = planner
            .apply(&fs_handle, &src, &dst_path, Some(&dst), false, false)
            .expect("apply");
        assert!(records.is_empty());
    }
}
