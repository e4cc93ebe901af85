use super::spec::{Clause, ClauseKind, KindSelector, Operation, PermFlags, SymbolicClause, WhoMask};
use super::ChmodError;

/// Parses one chmod command: `[FD]?` followed by an octal mode
/// (`[01]?[0-7]{3}`) or a symbolic edit (`[ugoa]{0,3}[+=-][rwxXt]{1,4}`).
pub(crate) fn parse_command(text: &str) -> Result<Clause, ChmodError> {
    let mut chars = text.chars().peekable();

    let selector = match chars.peek() {
        Some('F') => {
            chars.next();
            KindSelector::Files
        }
        Some('D') => {
            chars.next();
            KindSelector::Directories
        }
        _ => KindSelector::All,
    };

    let body: String = chars.collect();
    if body.is_empty() {
        return Err(ChmodError::new(format!("chmod '{text}' has no mode")));
    }

    let kind = if body.chars().all(|ch| ch.is_ascii_digit()) {
        ClauseKind::Octal(parse_octal(text, &body)?)
    } else {
        ClauseKind::Symbolic(parse_symbolic(text, &body)?)
    };

    Ok(Clause { selector, kind })
}

fn parse_octal(command: &str, body: &str) -> Result<u32, ChmodError> {
    let valid = match body.len() {
        3 => body.chars().all(|ch| ('0'..='7').contains(&ch)),
        4 => {
            let mut chars = body.chars();
            matches!(chars.next(), Some('0') | Some('1'))
                && chars.all(|ch| ('0'..='7').contains(&ch))
        }
        _ => false,
    };
    if !valid {
        return Err(ChmodError::new(format!(
            "chmod '{command}' is not a valid octal mode"
        )));
    }
    u32::from_str_radix(body, 8)
        .map_err(|_| ChmodError::new(format!("chmod '{command}' is not a valid octal mode")))
}

fn parse_symbolic(command: &str, body: &str) -> Result<SymbolicClause, ChmodError> {
    let mut chars = body.chars().peekable();

    let mut who = WhoMask::none();
    let mut who_len = 0usize;
    loop {
        match chars.peek().copied() {
            Some('u') => who.user = true,
            Some('g') => who.group = true,
            Some('o') => who.other = true,
            Some('a') => who = WhoMask::all(),
            _ => break,
        }
        chars.next();
        who_len += 1;
        if who_len > 3 {
            return Err(ChmodError::new(format!(
                "chmod '{command}' names too many subjects"
            )));
        }
    }
    if who.is_none() {
        who = WhoMask::all();
    }

    let op = match chars.next() {
        Some('+') => Operation::Add,
        Some('-') => Operation::Remove,
        Some('=') => Operation::Assign,
        _ => {
            return Err(ChmodError::new(format!(
                "chmod '{command}' is missing a '+', '-', or '=' operator"
            )))
        }
    };

    let mut perms = PermFlags::default();
    let mut perm_len = 0usize;
    for ch in chars {
        match ch {
            'r' => perms.read = true,
            'w' => perms.write = true,
            'x' => perms.exec = true,
            'X' => perms.exec_conditional = true,
            't' => perms.sticky = true,
            other => {
                return Err(ChmodError::new(format!(
                    "chmod '{command}' uses unsupported permission '{other}'"
                )))
            }
        }
        perm_len += 1;
    }
    if perm_len == 0 || perm_len > 4 {
        return Err(ChmodError::new(format!(
            "chmod '{command}' must list between one and four of 'rwxXt'"
        )));
    }

    Ok(SymbolicClause { op, who, perms })
}
