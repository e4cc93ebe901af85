use std::path::Path;

use crate::compiled::CompiledRule;
use crate::error::FilterError;
use crate::rule::{FilterAction, FilterRule};

/// Outcome of the deletion-pass scan for an extraneous destination entry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeleteVerdict {
    /// No rule protects the entry; it may be deleted.
    Delete,
    /// An exclude rule applies and delete-excluded is off; keep the entry.
    Protected,
}

/// Ordered collection of compiled filter rules.
///
/// Evaluation scans rules in definition order; the first applicable rule
/// decides. An entry no rule applies to is included.
#[derive(Debug, Default)]
pub struct FilterSet {
    rules: Vec<CompiledRule>,
}

impl FilterSet {
    /// Parses and compiles rule strings in order.
    pub fn parse<I, S>(lines: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = lines
            .into_iter()
            .map(|line| FilterRule::parse(line.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rules(rules)
    }

    /// Compiles already-parsed rules in order.
    pub fn from_rules<I>(rules: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = FilterRule>,
    {
        let rules = rules
            .into_iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Reports whether the set contains no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the action of the first applicable rule, if any.
    #[must_use]
    pub fn first_match(
        &self,
        path: &Path,
        is_dir: bool,
        base: Option<&Path>,
    ) -> Option<FilterAction> {
        self.rules
            .iter()
            .find(|rule| rule.applies(path, is_dir, base))
            .map(CompiledRule::action)
    }

    /// Reports whether an entry survives the copy-side selection.
    #[must_use]
    pub fn allows(&self, path: &Path, is_dir: bool, base: Option<&Path>) -> bool {
        !matches!(
            self.first_match(path, is_dir, base),
            Some(FilterAction::Exclude)
        )
    }

    /// Runs the deletion-pass selection for an extraneous destination entry.
    ///
    /// An applicable exclude rule protects the entry from deletion unless
    /// `delete_excluded` overrides the protection.
    #[must_use]
    pub fn delete_verdict(
        &self,
        path: &Path,
        is_dir: bool,
        base: Option<&Path>,
        delete_excluded: bool,
    ) -> DeleteVerdict {
        match self.first_match(path, is_dir, base) {
            Some(FilterAction::Exclude) if !delete_excluded => DeleteVerdict::Protected,
            _ => DeleteVerdict::Delete,
        }
    }
}
