use crate::error::FilterError;

/// Action taken when a rule applies to an entry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FilterAction {
    /// Keep the matching entry.
    Include,
    /// Drop the matching entry (or protect it from deletion).
    Exclude,
}

/// A parsed, not-yet-compiled filter rule.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FilterRule {
    pub(crate) action: FilterAction,
    pub(crate) pattern: String,
    pub(crate) negate: bool,
    pub(crate) force_full_path: bool,
}

impl FilterRule {
    /// Creates an include rule for `pattern`.
    #[must_use]
    pub fn include(pattern: impl Into<String>) -> Self {
        Self {
            action: FilterAction::Include,
            pattern: pattern.into(),
            negate: false,
            force_full_path: false,
        }
    }

    /// Creates an exclude rule for `pattern`.
    #[must_use]
    pub fn exclude(pattern: impl Into<String>) -> Self {
        Self {
            action: FilterAction::Exclude,
            pattern: pattern.into(),
            negate: false,
            force_full_path: false,
        }
    }

    /// Marks the rule as applying when the pattern does **not** match.
    #[must_use]
    pub const fn with_negate(mut self, negate: bool) -> Self {
        self.negate = negate;
        self
    }

    /// Forces matching against the full path even for basename-shaped
    /// patterns.
    #[must_use]
    pub const fn with_full_path(mut self, force: bool) -> Self {
        self.force_full_path = force;
        self
    }

    /// Returns the rule action.
    #[must_use]
    pub const fn action(&self) -> FilterAction {
        self.action
    }

    /// Returns the pattern text.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parses rule text of the form `<polarity>[<modifiers>] <pattern>`.
    ///
    /// The polarity is `+` or `-`; modifiers are any combination of `!` and
    /// `/`; exactly one space separates them from the pattern, which must be
    /// non-empty and must not begin with a space.
    pub fn parse(text: &str) -> Result<Self, FilterError> {
        let mut chars = text.chars();
        let action = match chars.next() {
            Some('+') => FilterAction::Include,
            Some('-') => FilterAction::Exclude,
            _ => {
                return Err(FilterError::parse(
                    text,
                    "rule must start with '+' or '-'",
                ))
            }
        };

        let mut negate = false;
        let mut force_full_path = false;
        loop {
            match chars.next() {
                Some('!') => {
                    if negate {
                        return Err(FilterError::parse(text, "duplicate '!' modifier"));
                    }
                    negate = true;
                }
                Some('/') => {
                    if force_full_path {
                        return Err(FilterError::parse(text, "duplicate '/' modifier"));
                    }
                    force_full_path = true;
                }
                Some(' ') => break,
                Some(other) => {
                    return Err(FilterError::parse(
                        text,
                        format!("unknown modifier '{other}'"),
                    ))
                }
                None => {
                    return Err(FilterError::parse(
                        text,
                        "missing space separator before pattern",
                    ))
                }
            }
        }

        let pattern: String = chars.collect();
        if pattern.is_empty() {
            return Err(FilterError::parse(text, "pattern must not be empty"));
        }
        if pattern.starts_with(' ') {
            return Err(FilterError::parse(
                text,
                "exactly one space must separate modifiers from the pattern",
            ));
        }

        Ok(Self {
            action,
            pattern,
            negate,
            force_full_path,
        })
    }
}
