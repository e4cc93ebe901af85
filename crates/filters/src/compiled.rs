use std::borrow::Cow;
use std::path::Path;

use globset::{GlobBuilder, GlobMatcher};

use crate::error::FilterError;
use crate::rule::{FilterAction, FilterRule};

/// A rule compiled for repeated evaluation.
///
/// The raw predicates (anchored, dir-only, full-path) are captured at compile
/// time; the rule text is never re-parsed while matching.
#[derive(Debug)]
pub(crate) struct CompiledRule {
    action: FilterAction,
    matcher: GlobMatcher,
    negate: bool,
    full_path: bool,
    force_full_path: bool,
    anchored: bool,
    dir_only: bool,
}

impl CompiledRule {
    pub(crate) fn compile(rule: FilterRule) -> Result<Self, FilterError> {
        let dir_only = rule.pattern.len() > 1 && rule.pattern.ends_with('/');
        let core = if dir_only {
            &rule.pattern[..rule.pattern.len() - 1]
        } else {
            rule.pattern.as_str()
        };
        let anchored = core.starts_with('/');
        let full_path = rule.force_full_path || core.contains('/') || core.contains("**");

        let glob = GlobBuilder::new(core)
            .literal_separator(true)
            .backslash_escape(true)
            .build()
            .map_err(|source| FilterError::Compile {
                pattern: rule.pattern.clone(),
                source,
            })?;

        Ok(Self {
            action: rule.action,
            matcher: glob.compile_matcher(),
            negate: rule.negate,
            full_path,
            force_full_path: rule.force_full_path,
            anchored,
            dir_only,
        })
    }

    pub(crate) const fn action(&self) -> FilterAction {
        self.action
    }

    /// Reports whether the rule applies to the given entry.
    ///
    /// `base` is the entry's root-of-transfer directory; anchored rules match
    /// against the path with that prefix stripped.
    pub(crate) fn applies(&self, path: &Path, is_dir: bool, base: Option<&Path>) -> bool {
        if self.dir_only && !is_dir {
            return false;
        }
        let candidate = self.candidate(path, base);
        let matched = self.matcher.is_match(Path::new(candidate.as_ref()));
        matched != self.negate
    }

    fn candidate<'a>(&self, path: &'a Path, base: Option<&Path>) -> Cow<'a, str> {
        let absolute = path.to_string_lossy();
        if !self.full_path {
            return match path.file_name() {
                Some(name) => name.to_string_lossy(),
                None => absolute,
            };
        }
        if self.anchored && !self.force_full_path {
            if let Some(base) = base {
                let base_text = base.to_string_lossy();
                if let Some(stripped) = absolute.strip_prefix(base_text.as_ref()) {
                    // A root base of "/" leaves no leading separator behind.
                    return if stripped.starts_with('/') {
                        Cow::Owned(stripped.to_string())
                    } else {
                        Cow::Owned(format!("/{stripped}"))
                    };
                }
            }
        }
        absolute
    }
}
