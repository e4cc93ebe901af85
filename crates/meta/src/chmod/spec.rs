#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum KindSelector {
    #[default]
    All,
    Files,
    Directories,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Operation {
    Add,
    Remove,
    Assign,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct WhoMask {
    pub(crate) user: bool,
    pub(crate) group: bool,
    pub(crate) other: bool,
}

impl WhoMask {
    pub(crate) const fn all() -> Self {
        Self {
            user: true,
            group: true,
            other: true,
        }
    }

    pub(crate) const fn none() -> Self {
        Self {
            user: false,
            group: false,
            other: false,
        }
    }

    pub(crate) const fn is_none(self) -> bool {
        !self.user && !self.group && !self.other
    }

    pub(crate) const fn covers_all(self) -> bool {
        self.user && self.group && self.other
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct PermFlags {
    pub(crate) read: bool,
    pub(crate) write: bool,
    pub(crate) exec: bool,
    /// `X`: execute only for directories or entries that already carry an
    /// execute bit.
    pub(crate) exec_conditional: bool,
    pub(crate) sticky: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct SymbolicClause {
    pub(crate) op: Operation,
    pub(crate) who: WhoMask,
    pub(crate) perms: PermFlags,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ClauseKind {
    Octal(u32),
    Symbolic(SymbolicClause),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Clause {
    pub(crate) selector: KindSelector,
    pub(crate) kind: ClauseKind,
}
