use clap::{ArgAction, Parser};
use engine::SyncOptions;

/// rsync-style tree synchronization between local and HDFS filesystems.
///
/// Sources are `file:` or `hdfs://` URIs; a trailing slash copies a
/// directory's contents instead of the directory itself. Without `--dst` the
/// run only logs what it would copy.
#[derive(Debug, Parser)]
#[command(name = "dsync", version, about)]
pub struct Cli {
    /// Source URIs; globs are expanded on the source filesystem
    #[arg(required = true)]
    pub sources: Vec<String>,

    /// Destination URI; omit for log-only mode
    #[arg(long)]
    pub dst: Option<String>,

    /// Perform no filesystem changes, log intended actions instead
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Descend into directories
    #[arg(short = 'r', long)]
    pub recurse: bool,

    /// Copy directories as opaque units without descending
    #[arg(long, conflicts_with = "recurse")]
    pub copy_dirs: bool,

    /// Delete empty destination directories after processing
    #[arg(long)]
    pub prune_empty_dirs: bool,

    /// Allow same-name sources, taking the first per conflict ordering
    #[arg(long)]
    pub resolve_conflicts: bool,

    /// Order same-name sources by most recent modification time
    #[arg(long)]
    pub use_most_recent: bool,

    /// Update existing destination entries only, never create new ones
    #[arg(long)]
    pub existing: bool,

    /// Create new destination entries only, never update existing ones
    #[arg(long)]
    pub ignore_existing: bool,

    /// Among existing entries, update only when the source is newer
    #[arg(short = 'u', long)]
    pub update: bool,

    /// Treat entries with equal length as equal
    #[arg(long, conflicts_with = "ignore_times")]
    pub size_only: bool,

    /// Treat every entry as changed, forcing updates
    #[arg(long)]
    pub ignore_times: bool,

    /// Modification-time tolerance in milliseconds
    #[arg(long, value_name = "MS", default_value_t = engine::DEFAULT_TIMES_TOLERANCE_MS)]
    pub modify_window_ms: i64,

    /// Replicate source modification times
    #[arg(short = 't', long = "times")]
    pub preserve_times: bool,

    /// Replicate source permissions
    #[arg(short = 'p', long = "perms")]
    pub preserve_perms: bool,

    /// Replicate source owners (through --usermap)
    #[arg(short = 'o', long = "owner")]
    pub preserve_owner: bool,

    /// Replicate source groups (through --groupmap)
    #[arg(short = 'g', long = "group")]
    pub preserve_group: bool,

    /// Permission rule: octal or symbolic, optionally F/D-prefixed
    #[arg(long, value_name = "RULE")]
    pub chmod: Vec<String>,

    /// Owner remapping `pattern:name`, first match wins
    #[arg(long, value_name = "FROM:TO", conflicts_with = "chown")]
    pub usermap: Vec<String>,

    /// Group remapping `pattern:name`, first match wins
    #[arg(long, value_name = "FROM:TO", conflicts_with = "chown")]
    pub groupmap: Vec<String>,

    /// Force ownership to `[user][:group]` on every entry
    #[arg(long, value_name = "USER:GROUP")]
    pub chown: Option<String>,

    /// Delete destination entries that have no source counterpart
    #[arg(long = "delete")]
    pub delete_extraneous: bool,

    /// Delete even filter-excluded extraneous entries
    #[arg(long, requires = "delete_extraneous")]
    pub delete_excluded: bool,

    /// Filter rule `+|-[!/] PATTERN`, evaluated in order
    #[arg(
        short = 'f',
        long = "filter",
        value_name = "RULE",
        allow_hyphen_values = true
    )]
    pub filter: Vec<String>,

    /// Increase verbosity (repeatable)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Log errors only
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Translates parsed arguments into engine options.
    pub fn into_options(self) -> SyncOptions {
        let mut options = SyncOptions::new(self.sources)
            .dry_run(self.dry_run)
            .recurse(self.recurse)
            .copy_dirs(self.copy_dirs)
            .prune_empty_dirs(self.prune_empty_dirs)
            .resolve_conflicts(self.resolve_conflicts)
            .use_most_recent(self.use_most_recent)
            .existing(self.existing)
            .ignore_existing(self.ignore_existing)
            .update(self.update)
            .size_only(self.size_only)
            .ignore_times(self.ignore_times)
            .times_tolerance_ms(self.modify_window_ms)
            .preserve_times(self.preserve_times)
            .preserve_perms(self.preserve_perms)
            .preserve_owner(self.preserve_owner)
            .preserve_group(self.preserve_group)
            .chmod(self.chmod)
            .usermap(self.usermap)
            .groupmap(self.groupmap)
            .delete_extraneous(self.delete_extraneous)
            .delete_excluded(self.delete_excluded)
            .filter_rules(self.filter);
        if let Some(dst) = self.dst {
            options = options.destination(dst);
        }
        if let Some(chown) = self.chown {
            options = options.chown(chown);
        }
        options
    }
}
