//! The option surface of a run and its validation into a frozen config.

use dfs::{Uri, UriError};
use filters::{FilterError, FilterSet};
use meta::{
    ChmodError, ChmodSet, MappingKind, MappingParseError, MetadataOptions, MetadataPlanner,
    NameMapping,
};
use thiserror::Error;

/// Default tolerance when comparing modification times, in milliseconds.
pub const DEFAULT_TIMES_TOLERANCE_MS: i64 = 1000;

/// Errors raised while validating the option set.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No source was provided.
    #[error("at least one source is required")]
    NoSources,
    /// Two options cannot be combined.
    #[error("{0}")]
    IncompatibleFlags(&'static str),
    /// A source or destination URI failed to parse.
    #[error(transparent)]
    Uri(#[from] UriError),
    /// Sources use more than one scheme.
    #[error("all sources must share one scheme")]
    MixedSchemes,
    /// Sources name more than one HDFS authority.
    #[error("all sources must share one hdfs authority")]
    MixedAuthorities,
    /// A filter rule failed to parse or compile.
    #[error(transparent)]
    Filter(#[from] FilterError),
    /// A chmod command failed to parse or violated composition rules.
    #[error(transparent)]
    Chmod(#[from] ChmodError),
    /// A usermap/groupmap entry failed to parse.
    #[error(transparent)]
    Mapping(#[from] MappingParseError),
    /// The `--chown` shorthand was malformed.
    #[error("invalid chown '{0}': expected [user][:group]")]
    InvalidChown(String),
}

/// Options that shape a synchronization run.
///
/// Built once, validated, then frozen into the engine's internal config.
/// Setters are chainable and never fail; all validation happens in one place
/// when the engine is constructed.
#[derive(Clone, Debug)]
pub struct SyncOptions {
    sources: Vec<String>,
    dst: Option<String>,
    dry_run: bool,
    recurse: bool,
    copy_dirs: bool,
    prune_empty_dirs: bool,
    resolve_conflicts: bool,
    use_most_recent: bool,
    existing: bool,
    ignore_existing: bool,
    update: bool,
    size_only: bool,
    ignore_times: bool,
    times_tolerance_ms: i64,
    preserve_times: bool,
    preserve_perms: bool,
    preserve_owner: bool,
    preserve_group: bool,
    chmod: Vec<String>,
    usermap: Vec<String>,
    groupmap: Vec<String>,
    chown: Option<String>,
    delete_extraneous: bool,
    delete_excluded: bool,
    filter_rules: Vec<String>,
}

impl SyncOptions {
    /// Starts an option set for the given source URIs.
    #[must_use]
    pub fn new<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
            dst: None,
            dry_run: false,
            recurse: false,
            copy_dirs: false,
            prune_empty_dirs: false,
            resolve_conflicts: false,
            use_most_recent: false,
            existing: false,
            ignore_existing: false,
            update: false,
            size_only: false,
            ignore_times: false,
            times_tolerance_ms: DEFAULT_TIMES_TOLERANCE_MS,
            preserve_times: false,
            preserve_perms: false,
            preserve_owner: false,
            preserve_group: false,
            chmod: Vec::new(),
            usermap: Vec::new(),
            groupmap: Vec::new(),
            chown: None,
            delete_extraneous: false,
            delete_excluded: false,
            filter_rules: Vec::new(),
        }
    }

    /// Sets the destination URI. Without one the run is log-only.
    #[must_use]
    pub fn destination(mut self, dst: impl Into<String>) -> Self {
        self.dst = Some(dst.into());
        self
    }

    /// Performs no filesystem mutations; intended actions log at INFO.
    #[must_use]
    pub const fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Descends into directories.
    #[must_use]
    pub const fn recurse(mut self, enabled: bool) -> Self {
        self.recurse = enabled;
        self
    }

    /// Copies directories as opaque units without descending.
    #[must_use]
    pub const fn copy_dirs(mut self, enabled: bool) -> Self {
        self.copy_dirs = enabled;
        self
    }

    /// Deletes empty destination directories after processing.
    #[must_use]
    pub const fn prune_empty_dirs(mut self, enabled: bool) -> Self {
        self.prune_empty_dirs = enabled;
        self
    }

    /// Allows ambiguous same-name sources, taking the head of the ordered
    /// list.
    #[must_use]
    pub const fn resolve_conflicts(mut self, enabled: bool) -> Self {
        self.resolve_conflicts = enabled;
        self
    }

    /// Orders same-name sources by most recent modification time.
    #[must_use]
    pub const fn use_most_recent(mut self, enabled: bool) -> Self {
        self.use_most_recent = enabled;
        self
    }

    /// Updates only; never creates new destination entries.
    #[must_use]
    pub const fn existing(mut self, enabled: bool) -> Self {
        self.existing = enabled;
        self
    }

    /// Creates only; never updates existing destination entries.
    #[must_use]
    pub const fn ignore_existing(mut self, enabled: bool) -> Self {
        self.ignore_existing = enabled;
        self
    }

    /// Among existing entries, updates only when the source is newer.
    #[must_use]
    pub const fn update(mut self, enabled: bool) -> Self {
        self.update = enabled;
        self
    }

    /// Considers entries equal when their lengths match.
    #[must_use]
    pub const fn size_only(mut self, enabled: bool) -> Self {
        self.size_only = enabled;
        self
    }

    /// Always considers entries unequal, forcing updates.
    #[must_use]
    pub const fn ignore_times(mut self, enabled: bool) -> Self {
        self.ignore_times = enabled;
        self
    }

    /// Sets the modification-time equality tolerance in milliseconds.
    #[must_use]
    pub const fn times_tolerance_ms(mut self, tolerance: i64) -> Self {
        self.times_tolerance_ms = tolerance;
        self
    }

    /// Replicates source modification times.
    #[must_use]
    pub const fn preserve_times(mut self, enabled: bool) -> Self {
        self.preserve_times = enabled;
        self
    }

    /// Replicates source permission bits.
    #[must_use]
    pub const fn preserve_perms(mut self, enabled: bool) -> Self {
        self.preserve_perms = enabled;
        self
    }

    /// Replicates source owners through the user mapping.
    #[must_use]
    pub const fn preserve_owner(mut self, enabled: bool) -> Self {
        self.preserve_owner = enabled;
        self
    }

    /// Replicates source groups through the group mapping.
    #[must_use]
    pub const fn preserve_group(mut self, enabled: bool) -> Self {
        self.preserve_group = enabled;
        self
    }

    /// Adds chmod commands.
    #[must_use]
    pub fn chmod<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chmod.extend(commands.into_iter().map(Into::into));
        self
    }

    /// Adds owner remapping entries.
    #[must_use]
    pub fn usermap<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.usermap.extend(entries.into_iter().map(Into::into));
        self
    }

    /// Adds group remapping entries.
    #[must_use]
    pub fn groupmap<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groupmap.extend(entries.into_iter().map(Into::into));
        self
    }

    /// Sets the `[user][:group]` ownership shorthand.
    #[must_use]
    pub fn chown(mut self, spec: impl Into<String>) -> Self {
        self.chown = Some(spec.into());
        self
    }

    /// Deletes destination entries with no source counterpart.
    #[must_use]
    pub const fn delete_extraneous(mut self, enabled: bool) -> Self {
        self.delete_extraneous = enabled;
        self
    }

    /// Deletes even filter-excluded extraneous entries.
    #[must_use]
    pub const fn delete_excluded(mut self, enabled: bool) -> Self {
        self.delete_excluded = enabled;
        self
    }

    /// Adds filter rules, evaluated in order.
    #[must_use]
    pub fn filter_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter_rules
            .extend(rules.into_iter().map(Into::into));
        self
    }

    /// Validates the option set and freezes it into the engine config.
    pub(crate) fn into_config(self) -> Result<Config, ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        if self.size_only && self.ignore_times {
            return Err(ConfigError::IncompatibleFlags(
                "size-only and ignore-times are mutually exclusive",
            ));
        }
        if self.delete_excluded && !self.delete_extraneous {
            return Err(ConfigError::IncompatibleFlags(
                "delete-excluded requires delete",
            ));
        }
        if self.recurse && self.copy_dirs {
            return Err(ConfigError::IncompatibleFlags(
                "recurse and copy-dirs are mutually exclusive",
            ));
        }
        if self.chown.is_some() && (!self.usermap.is_empty() || !self.groupmap.is_empty()) {
            return Err(ConfigError::IncompatibleFlags(
                "chown cannot be combined with usermap or groupmap",
            ));
        }

        let mut sources = Vec::with_capacity(self.sources.len());
        for raw in &self.sources {
            // A trailing slash means "the contents of": rewrite to a glob.
            let rewritten = if raw.ends_with('/') {
                format!("{raw}*")
            } else {
                raw.clone()
            };
            sources.push(Uri::parse(&rewritten)?);
        }
        let scheme = sources[0].scheme();
        if sources.iter().any(|uri| uri.scheme() != scheme) {
            return Err(ConfigError::MixedSchemes);
        }
        // The run binds a single source-side client, so every root must name
        // the same endpoint, not just the same scheme.
        let authority = sources[0].authority();
        if sources.iter().any(|uri| uri.authority() != authority) {
            return Err(ConfigError::MixedAuthorities);
        }

        let dst = self.dst.as_deref().map(Uri::parse).transpose()?;

        let filter = FilterSet::parse(&self.filter_rules)?;
        let chmod = ChmodSet::parse(&self.chmod)?;

        let (usermap, groupmap) = match &self.chown {
            Some(spec) => parse_chown(spec)?,
            None => (
                NameMapping::parse(MappingKind::User, &self.usermap)?,
                NameMapping::parse(MappingKind::Group, &self.groupmap)?,
            ),
        };

        let planner = MetadataPlanner::new(
            MetadataOptions {
                preserve_times: self.preserve_times,
                preserve_perms: self.preserve_perms,
                preserve_owner: self.preserve_owner,
                preserve_group: self.preserve_group,
                times_tolerance_ms: self.times_tolerance_ms,
            },
            chmod,
            usermap,
            groupmap,
        );

        Ok(Config {
            sources,
            dst,
            dry_run: self.dry_run,
            recurse: self.recurse,
            copy_dirs: self.copy_dirs,
            prune_empty_dirs: self.prune_empty_dirs,
            resolve_conflicts: self.resolve_conflicts,
            use_most_recent: self.use_most_recent,
            existing: self.existing,
            ignore_existing: self.ignore_existing,
            update: self.update,
            size_only: self.size_only,
            ignore_times: self.ignore_times,
            times_tolerance_ms: self.times_tolerance_ms,
            delete_extraneous: self.delete_extraneous,
            delete_excluded: self.delete_excluded,
            filter,
            planner,
        })
    }
}

/// Expands `[user][:group]` into terminal catch-all mappings.
fn parse_chown(spec: &str) -> Result<(NameMapping, NameMapping), ConfigError> {
    let (user, group) = match spec.split_once(':') {
        Some((user, group)) => (user, group),
        None => (spec, ""),
    };
    if user.is_empty() && group.is_empty() {
        return Err(ConfigError::InvalidChown(spec.to_string()));
    }
    let usermap = if user.is_empty() {
        NameMapping::empty(MappingKind::User)
    } else {
        NameMapping::chown(MappingKind::User, user)
    };
    let groupmap = if group.is_empty() {
        NameMapping::empty(MappingKind::Group)
    } else {
        NameMapping::chown(MappingKind::Group, group)
    };
    Ok((usermap, groupmap))
}

/// The frozen, validated configuration the walker runs against.
#[derive(Debug)]
pub(crate) struct Config {
    pub(crate) sources: Vec<Uri>,
    pub(crate) dst: Option<Uri>,
    pub(crate) dry_run: bool,
    pub(crate) recurse: bool,
    pub(crate) copy_dirs: bool,
    pub(crate) prune_empty_dirs: bool,
    pub(crate) resolve_conflicts: bool,
    pub(crate) use_most_recent: bool,
    pub(crate) existing: bool,
    pub(crate) ignore_existing: bool,
    pub(crate) update: bool,
    pub(crate) size_only: bool,
    pub(crate) ignore_times: bool,
    pub(crate) times_tolerance_ms: i64,
    pub(crate) delete_extraneous: bool,
    pub(crate) delete_excluded: bool,
    pub(crate) filter: FilterSet,
    pub(crate) planner: MetadataPlanner,
}
