use thiserror::Error;

/// Error produced while parsing or compiling filter rules.
///
/// Rule problems are configuration problems: the engine never sees a rule
/// that failed to compile.
#[derive(Debug, Error)]
pub enum FilterError {
    /// The rule text did not follow `<polarity>[<modifiers>] <pattern>`.
    #[error("invalid filter rule '{rule}': {reason}")]
    Parse {
        /// The offending rule text.
        rule: String,
        /// Why parsing failed.
        reason: String,
    },
    /// The pattern did not compile into a glob matcher.
    #[error("failed to compile filter pattern '{pattern}': {source}")]
    Compile {
        /// The offending pattern.
        pattern: String,
        /// Compile error from the glob engine.
        #[source]
        source: globset::Error,
    },
}

impl FilterError {
    pub(crate) fn parse(rule: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            rule: rule.to_string(),
            reason: reason.into(),
        }
    }
}
