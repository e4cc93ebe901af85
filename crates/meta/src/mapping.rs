use std::fmt;

use thiserror::Error;

/// Distinguishes user from group mappings in parse errors and flags.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MappingKind {
    /// Owner mapping, `--usermap`.
    #[default]
    User,
    /// Group mapping, `--groupmap`.
    Group,
}

impl MappingKind {
    /// Returns the command-line flag the mapping kind belongs to.
    #[must_use]
    pub const fn flag(self) -> &'static str {
        match self {
            Self::User => "--usermap",
            Self::Group => "--groupmap",
        }
    }
}

impl fmt::Display for MappingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

/// Error returned when a mapping specification fails to parse.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{message}")]
pub struct MappingParseError {
    kind: MappingKind,
    message: String,
}

impl MappingParseError {
    fn new(kind: MappingKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the mapping kind the error belongs to.
    #[must_use]
    pub const fn kind(&self) -> MappingKind {
        self.kind
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct MappingRule {
    pattern: String,
    value: String,
}

/// Ordered owner or group name remappings.
///
/// Each rule is `pattern:value` where the pattern may use `*` and `?`
/// wildcards. The first matching rule wins; a name no rule matches passes
/// through unchanged. Ownership is name-based on both filesystem schemes, so
/// values are applied verbatim.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NameMapping {
    rules: Vec<MappingRule>,
    kind: MappingKind,
}

impl NameMapping {
    /// Creates an empty mapping of the given kind.
    #[must_use]
    pub const fn empty(kind: MappingKind) -> Self {
        Self {
            rules: Vec::new(),
            kind,
        }
    }

    /// Parses mapping entries. Each entry is one or more comma-separated
    /// `pattern:value` pairs.
    pub fn parse<I, S>(kind: MappingKind, entries: I) -> Result<Self, MappingParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Vec::new();
        for entry in entries {
            for raw in entry.as_ref().split(',') {
                let pair = raw.trim();
                if pair.is_empty() {
                    return Err(MappingParseError::new(
                        kind,
                        format!("{} entries must not be empty", kind.flag()),
                    ));
                }
                let (pattern, value) = pair.split_once(':').ok_or_else(|| {
                    MappingParseError::new(
                        kind,
                        format!("no colon found in {}: {pair}", kind.flag()),
                    )
                })?;
                if pattern.is_empty() {
                    return Err(MappingParseError::new(
                        kind,
                        format!("{} entries must name a source pattern: {pair}", kind.flag()),
                    ));
                }
                if value.is_empty() {
                    return Err(MappingParseError::new(
                        kind,
                        format!("no name found after colon in {}: {pair}", kind.flag()),
                    ));
                }
                rules.push(MappingRule {
                    pattern: pattern.to_string(),
                    value: value.to_string(),
                });
            }
        }
        Ok(Self { rules, kind })
    }

    /// Builds the terminal catch-all mapping the `--chown` shorthand expands
    /// to.
    #[must_use]
    pub fn chown(kind: MappingKind, value: impl Into<String>) -> Self {
        Self {
            rules: vec![MappingRule {
                pattern: "*".to_string(),
                value: value.into(),
            }],
            kind,
        }
    }

    /// Returns the replacement for `name`, if any rule matches.
    #[must_use]
    pub fn map(&self, name: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| wildcard_matches(&rule.pattern, name))
            .map(|rule| rule.value.as_str())
    }

    /// Applies the mapping, passing unmatched names through.
    #[must_use]
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.map(name).unwrap_or(name)
    }

    /// Reports whether the mapping holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Shell-style matching with `*` (any run) and `?` (single character).
fn wildcard_matches(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    let mut pat_index = 0;
    let mut text_index = 0;
    let mut star: Option<(usize, usize)> = None;

    while text_index < text.len() {
        match pattern.get(pat_index) {
            Some('?') => {
                pat_index += 1;
                text_index += 1;
            }
            Some('*') => {
                star = Some((pat_index, text_index));
                pat_index += 1;
            }
            Some(&ch) if ch == text[text_index] => {
                pat_index += 1;
                text_index += 1;
            }
            _ => match star {
                Some((star_pat, star_text)) => {
                    pat_index = star_pat + 1;
                    text_index = star_text + 1;
                    star = Some((star_pat, star_text + 1));
                }
                None => return false,
            },
        }
    }

    while pattern.get(pat_index) == Some(&'*') {
        pat_index += 1;
    }
    pat_index == pattern.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_rule_wins() {
        let mapping = NameMapping::parse(MappingKind::User, ["alice:app", "a*:batch"])
            .expect("parses");
        assert_eq!(mapping.map("alice"), Some("app"));
        assert_eq!(mapping.map("amy"), Some("batch"));
        assert_eq!(mapping.map("bob"), None);
    }

    #[test]
    fn resolve_passes_unmatched_names_through() {
        let mapping = NameMapping::parse(MappingKind::Group, ["staff:eng"]).expect("parses");
        assert_eq!(mapping.resolve("staff"), "eng");
        assert_eq!(mapping.resolve("wheel"), "wheel");
    }

    #[test]
    fn comma_separated_entries_parse() {
        let mapping =
            NameMapping::parse(MappingKind::User, ["a:x,b:y"]).expect("parses");
        assert_eq!(mapping.map("a"), Some("x"));
        assert_eq!(mapping.map("b"), Some("y"));
    }

    #[test]
    fn chown_shorthand_maps_everything() {
        let mapping = NameMapping::chown(MappingKind::User, "svc");
        assert_eq!(mapping.map("whoever"), Some("svc"));
    }

    #[test]
    fn rejects_entry_without_colon() {
        let error = NameMapping::parse(MappingKind::User, ["nomatch"]).expect_err("rejected");
        assert!(error.to_string().contains("no colon"));
        assert_eq!(error.kind(), MappingKind::User);
    }

    #[test]
    fn rejects_empty_value() {
        assert!(NameMapping::parse(MappingKind::Group, ["x:"]).is_err());
        assert!(NameMapping::parse(MappingKind::Group, [":x"]).is_err());
        assert!(NameMapping::parse(MappingKind::Group, [""]).is_err());
    }

    #[test]
    fn wildcard_star_spans_runs() {
        assert!(wildcard_matches("svc-*", "svc-etl"));
        assert!(wildcard_matches("*", "anything"));
        assert!(wildcard_matches("a*c", "abc"));
        assert!(wildcard_matches("a*c", "ac"));
        assert!(!wildcard_matches("a*c", "abd"));
    }

    #[test]
    fn wildcard_question_is_single() {
        assert!(wildcard_matches("u?er", "user"));
        assert!(!wildcard_matches("u?er", "usser"));
        assert!(!wildcard_matches("u?er", "uer"));
    }

    #[test]
    fn trailing_stars_collapse() {
        assert!(wildcard_matches("ab**", "ab"));
        assert!(wildcard_matches("ab*", "ab"));
    }
}
