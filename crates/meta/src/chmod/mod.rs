//! Parser and evaluator for `--chmod` permission rules.
//!
//! Each command is either an octal replacement or a single symbolic edit,
//! optionally prefixed with `F` (files only) or `D` (directories only):
//! `644`, `D755`, `u+r`, `Fgo-w`, `a=rX`. The CLI also accepts several
//! edits joined by commas in one argument. Per entry kind, at most one
//! octal replacement is allowed, and octal and symbolic rules never mix.

mod apply;
mod parse;
mod spec;

use std::fmt;

use apply::apply_symbolic;
use parse::parse_command;
use spec::{Clause, ClauseKind, KindSelector, SymbolicClause};

/// Error produced when a chmod specification fails to parse or violates the
/// per-kind composition constraints.
#[derive(Debug, Eq, PartialEq)]
pub struct ChmodError {
    message: String,
}

impl ChmodError {
    pub(crate) fn new(text: impl Into<String>) -> Self {
        Self {
            message: text.into(),
        }
    }
}

impl fmt::Display for ChmodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ChmodError {}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
enum KindRule {
    #[default]
    None,
    Octal(u32),
    Symbolic(Vec<SymbolicClause>),
}

impl KindRule {
    fn push(&mut self, kind_name: &str, clause: &ClauseKind) -> Result<(), ChmodError> {
        match clause {
            ClauseKind::Octal(mode) => match self {
                Self::None => {
                    *self = Self::Octal(*mode);
                    Ok(())
                }
                Self::Octal(_) => Err(ChmodError::new(format!(
                    "at most one octal chmod is allowed for {kind_name}"
                ))),
                Self::Symbolic(_) => Err(ChmodError::new(format!(
                    "octal and symbolic chmod rules cannot be mixed for {kind_name}"
                ))),
            },
            ClauseKind::Symbolic(symbolic) => match self {
                Self::None => {
                    *self = Self::Symbolic(vec![*symbolic]);
                    Ok(())
                }
                Self::Symbolic(chain) => {
                    chain.push(*symbolic);
                    Ok(())
                }
                Self::Octal(_) => Err(ChmodError::new(format!(
                    "octal and symbolic chmod rules cannot be mixed for {kind_name}"
                ))),
            },
        }
    }

    fn apply(&self, base: u32, is_dir: bool) -> u32 {
        match self {
            Self::None => base,
            Self::Octal(mode) => *mode,
            Self::Symbolic(chain) => chain
                .iter()
                .fold(base, |mode, clause| apply_symbolic(mode, clause, is_dir)),
        }
    }

    const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Parsed permission rules, split per entry kind.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ChmodSet {
    file: KindRule,
    dir: KindRule,
}

impl ChmodSet {
    /// Parses a list of chmod commands, each optionally comma-joined.
    pub fn parse<I, S>(commands: I) -> Result<Self, ChmodError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for command in commands {
            for part in command.as_ref().split(',') {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }
                let clause = parse_command(part)?;
                set.push(&clause)?;
            }
        }
        Ok(set)
    }

    fn push(&mut self, clause: &Clause) -> Result<(), ChmodError> {
        match clause.selector {
            KindSelector::Files => self.file.push("files", &clause.kind),
            KindSelector::Directories => self.dir.push("directories", &clause.kind),
            KindSelector::All => {
                self.file.push("files", &clause.kind)?;
                self.dir.push("directories", &clause.kind)
            }
        }
    }

    /// Reports whether no rule exists at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.file.is_none() && self.dir.is_none()
    }

    /// Reports whether a rule exists for the given entry kind.
    #[must_use]
    pub const fn has_rule_for(&self, is_dir: bool) -> bool {
        if is_dir {
            !self.dir.is_none()
        } else {
            !self.file.is_none()
        }
    }

    /// Applies the rules for the entry kind to `base`, returning the new
    /// mode. Without a rule for the kind, `base` comes back unchanged.
    #[must_use]
    pub fn apply(&self, base: u32, is_dir: bool) -> u32 {
        if is_dir {
            self.dir.apply(base, is_dir)
        } else {
            self.file.apply(base, is_dir)
        }
    }
}
