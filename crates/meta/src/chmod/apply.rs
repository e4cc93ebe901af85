use super::spec::{Operation, PermFlags, SymbolicClause};

const STICKY_BIT: u32 = 0o1000;

/// Applies one symbolic edit to `mode`.
pub(crate) fn apply_symbolic(mode: u32, clause: &SymbolicClause, is_dir: bool) -> u32 {
    let mut result = mode;

    for shift in [6u32, 3, 0] {
        let selected = match shift {
            6 => clause.who.user,
            3 => clause.who.group,
            _ => clause.who.other,
        };
        if !selected {
            continue;
        }

        let mask = 0o7 << shift;
        let requested = requested_bits(&clause.perms, mode, is_dir) << shift;
        let current = result & mask;
        let updated = match clause.op {
            Operation::Add => current | requested,
            Operation::Remove => current & !requested,
            Operation::Assign => requested,
        };
        result = (result & !mask) | (updated & mask);
    }

    // The sticky bit sits outside the per-subject triads; honor it when the
    // edit covers "other" or everyone.
    if clause.perms.sticky && (clause.who.other || clause.who.covers_all()) {
        result = match clause.op {
            Operation::Add | Operation::Assign => result | STICKY_BIT,
            Operation::Remove => result & !STICKY_BIT,
        };
    } else if clause.op == Operation::Assign && clause.who.covers_all() {
        result &= !STICKY_BIT;
    }

    result
}

/// Resolves the `rwxXt` flags into a permission triad for one subject.
///
/// `X` grants execute only to directories and to entries that already carry
/// any execute bit in the pre-edit mode.
fn requested_bits(perms: &PermFlags, original_mode: u32, is_dir: bool) -> u32 {
    let mut bits = 0;
    if perms.read {
        bits |= 0o4;
    }
    if perms.write {
        bits |= 0o2;
    }
    if perms.exec {
        bits |= 0o1;
    }
    if perms.exec_conditional && (is_dir || original_mode & 0o111 != 0) {
        bits |= 0o1;
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::super::spec::{Operation, WhoMask};
    use super::*;

    fn clause(op: Operation, who: WhoMask, perms: PermFlags) -> SymbolicClause {
        SymbolicClause { op, who, perms }
    }

    fn user_only() -> WhoMask {
        WhoMask {
            user: true,
            group: false,
            other: false,
        }
    }

    #[test]
    fn add_grants_bits_for_selected_subjects() {
        let edit = clause(
            Operation::Add,
            user_only(),
            PermFlags {
                write: true,
                ..PermFlags::default()
            },
        );
        assert_eq!(apply_symbolic(0o444, &edit, false), 0o644);
    }

    #[test]
    fn remove_clears_bits_only_where_selected() {
        let edit = clause(
            Operation::Remove,
            WhoMask {
                user: false,
                group: true,
                other: true,
            },
            PermFlags {
                write: true,
                ..PermFlags::default()
            },
        );
        assert_eq!(apply_symbolic(0o666, &edit, false), 0o644);
    }

    #[test]
    fn assign_replaces_the_selected_triad() {
        let edit = clause(
            Operation::Assign,
            user_only(),
            PermFlags {
                read: true,
                exec: true,
                ..PermFlags::default()
            },
        );
        assert_eq!(apply_symbolic(0o677, &edit, false), 0o577);
    }

    #[test]
    fn conditional_exec_applies_to_directories() {
        let edit = clause(
            Operation::Add,
            WhoMask::all(),
            PermFlags {
                exec_conditional: true,
                ..PermFlags::default()
            },
        );
        assert_eq!(apply_symbolic(0o644, &edit, true), 0o755);
        // A plain file without any exec bit stays exec-free.
        assert_eq!(apply_symbolic(0o644, &edit, false), 0o644);
        // A file with one exec bit gains the rest.
        assert_eq!(apply_symbolic(0o744, &edit, false), 0o755);
    }

    #[test]
    fn sticky_bit_follows_other_subject() {
        let edit = clause(
            Operation::Add,
            WhoMask::all(),
            PermFlags {
                sticky: true,
                ..PermFlags::default()
            },
        );
        assert_eq!(apply_symbolic(0o777, &edit, true), 0o1777);

        let removal = clause(
            Operation::Remove,
            WhoMask {
                user: false,
                group: false,
                other: true,
            },
            PermFlags {
                sticky: true,
                ..PermFlags::default()
            },
        );
        assert_eq!(apply_symbolic(0o1777, &removal, true), 0o1777 & !0o1000);
    }

    #[test]
    fn assign_all_without_sticky_clears_it() {
        let edit = clause(
            Operation::Assign,
            WhoMask::all(),
            PermFlags {
                read: true,
                write: true,
                ..PermFlags::default()
            },
        );
        assert_eq!(apply_symbolic(0o1666, &edit, false), 0o666);
    }
}
