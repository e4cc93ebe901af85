use logging::{ActionMode, ActionRecord, ActionTag};

/// Ordered record of everything a run did (or, in dry-run, would do).
///
/// Every action is emitted as a tracing event exactly once, at the moment it
/// is recorded, and kept for callers that prefer to inspect results
/// programmatically.
#[derive(Debug, Default)]
pub struct SyncSummary {
    records: Vec<ActionRecord>,
}

impl SyncSummary {
    /// Emits and stores a record.
    pub(crate) fn push(&mut self, record: ActionRecord) {
        record.emit();
        self.records.push(record);
    }

    /// Emits and stores a batch of records, preserving order.
    pub(crate) fn extend(&mut self, records: Vec<ActionRecord>) {
        for record in records {
            self.push(record);
        }
    }

    /// Returns every record in emission order.
    #[must_use]
    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    fn count(&self, tag: ActionTag) -> usize {
        self.records
            .iter()
            .filter(|record| record.tag() == tag)
            .count()
    }

    /// Files copied to a previously missing destination (including log-only
    /// and dry-run intents).
    #[must_use]
    pub fn files_copied(&self) -> usize {
        self.count(ActionTag::CopyFile)
    }

    /// Existing destination files overwritten with new content.
    #[must_use]
    pub fn files_updated(&self) -> usize {
        self.count(ActionTag::UpdateFile)
    }

    /// Files found already in sync.
    #[must_use]
    pub fn files_unchanged(&self) -> usize {
        self.count(ActionTag::SameFile)
    }

    /// Files skipped by `existing`, `ignore-existing`, or `update`.
    #[must_use]
    pub fn files_skipped(&self) -> usize {
        self.count(ActionTag::SkipFile)
    }

    /// Directories skipped because recursion was off.
    #[must_use]
    pub fn dirs_skipped(&self) -> usize {
        self.count(ActionTag::SkipDir)
    }

    /// Destination directories created.
    #[must_use]
    pub fn dirs_created(&self) -> usize {
        self.count(ActionTag::CreateDir)
    }

    /// Destination files replaced by directories.
    #[must_use]
    pub fn dirs_overwritten(&self) -> usize {
        self.count(ActionTag::OverwriteDir)
    }

    /// Extraneous destination entries deleted.
    #[must_use]
    pub fn deletions(&self) -> usize {
        self.count(ActionTag::DeleteDst)
    }

    /// Source entries dropped by filter rules.
    #[must_use]
    pub fn excluded_sources(&self) -> usize {
        self.count(ActionTag::ExcludeSrc)
    }

    /// Extraneous destination entries protected from deletion.
    #[must_use]
    pub fn protected_destinations(&self) -> usize {
        self.count(ActionTag::ExcludeDst)
    }

    /// Empty destination directories pruned.
    #[must_use]
    pub fn pruned_dirs(&self) -> usize {
        self.count(ActionTag::PruneDir)
    }

    /// Modification-time updates.
    #[must_use]
    pub fn times_updated(&self) -> usize {
        self.count(ActionTag::UpdateTimes)
    }

    /// Permission updates.
    #[must_use]
    pub fn perms_updated(&self) -> usize {
        self.count(ActionTag::UpdatePerms)
    }

    /// Owner/group updates.
    #[must_use]
    pub fn owners_updated(&self) -> usize {
        self.count(ActionTag::UpdateOwnerGroup)
    }

    /// Number of filesystem mutations actually performed.
    ///
    /// Dry-run and log-only records never count. A second run over unchanged
    /// trees should report zero here.
    #[must_use]
    pub fn mutations(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.mode() == ActionMode::Applied)
            .filter(|record| {
                matches!(
                    record.tag(),
                    ActionTag::CopyFile
                        | ActionTag::UpdateFile
                        | ActionTag::CreateDir
                        | ActionTag::OverwriteDir
                        | ActionTag::DeleteDst
                        | ActionTag::PruneDir
                        | ActionTag::UpdateTimes
                        | ActionTag::UpdatePerms
                        | ActionTag::UpdateOwnerGroup
                )
            })
            .count()
    }
}
