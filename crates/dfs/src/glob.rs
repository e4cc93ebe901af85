//! Trait-generic glob expansion.
//!
//! Source roots may be glob patterns. Expansion walks the pattern component
//! by component: literal components are joined directly, wildcard components
//! are resolved by listing the directories reached so far. Both backends get
//! the same semantics because everything goes through [`FileSystem`].

use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};

use crate::error::FsError;
use crate::meta::FileMeta;
use crate::FileSystem;

/// Reports whether a path component needs matcher-based expansion.
fn is_wildcard(component: &str) -> bool {
    component
        .bytes()
        .any(|byte| matches!(byte, b'*' | b'?' | b'[' | b'{' | b'\\'))
}

fn component_matcher(component: &str) -> Result<GlobMatcher, FsError> {
    let glob = GlobBuilder::new(component)
        .literal_separator(true)
        .backslash_escape(true)
        .build()
        .map_err(|source| FsError::Pattern {
            pattern: component.to_string(),
            source,
        })?;
    Ok(glob.compile_matcher())
}

pub(crate) fn expand<F>(fs: &F, pattern: &Path) -> Result<Option<Vec<FileMeta>>, FsError>
where
    F: FileSystem + ?Sized,
{
    let mut components = Vec::new();
    let mut wildcard_seen = false;
    for component in pattern.components() {
        match component {
            Component::RootDir => {}
            Component::Normal(text) => {
                let text = text.to_str().ok_or_else(|| FsError::non_utf8(pattern))?;
                wildcard_seen |= is_wildcard(text);
                components.push(text);
            }
            // CurDir/ParentDir never survive config validation; treat the
            // whole pattern as a literal lookup if they appear.
            _ => {
                wildcard_seen = false;
                break;
            }
        }
    }

    if !wildcard_seen {
        return if fs.exists(pattern)? {
            Ok(Some(vec![fs.stat(pattern)?]))
        } else {
            Ok(None)
        };
    }

    let root = PathBuf::from("/");
    let mut frontier = vec![fs.stat(&root)?];
    for component in components {
        let mut next = Vec::new();
        if is_wildcard(component) {
            let matcher = component_matcher(component)?;
            for parent in &frontier {
                if !parent.is_dir() {
                    continue;
                }
                for child in fs.list(parent.path())? {
                    if matcher.is_match(Path::new(child.name())) {
                        next.push(child);
                    }
                }
            }
        } else {
            for parent in &frontier {
                if !parent.is_dir() {
                    continue;
                }
                let candidate = parent.path().join(component);
                if fs.exists(&candidate)? {
                    next.push(fs.stat(&candidate)?);
                }
            }
        }
        frontier = next;
        if frontier.is_empty() {
            break;
        }
    }

    Ok(Some(frontier))
}
