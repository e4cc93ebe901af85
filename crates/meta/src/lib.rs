//! # Overview
//!
//! `meta` owns everything dsync does to an entry after its bytes are in
//! place: permission mutation through chmod rules, owner/group remapping
//! through ordered name mappings, and modification-time preservation. The
//! [`MetadataPlanner`] applies the three concerns in a fixed order (times,
//! then permissions, then ownership) and always after any recursive descent,
//! so a preserved directory mtime is not clobbered by changes to its
//! children.
//!
//! # Design
//!
//! - [`ChmodSet`] keeps one rule slot per entry kind (file/directory). A kind
//!   holds either a single octal replacement or an ordered chain of symbolic
//!   edits; the two never mix within a kind.
//! - [`NameMapping`] is an ordered `pattern:value` list with `*`/`?`
//!   wildcards; the first matching pattern wins and unmatched names pass
//!   through unchanged. Ownership is name-based on both schemes, so mapping
//!   happens before any local id resolution.
//! - Every planner step has a dry-run branch that records the intended
//!   change without touching the filesystem.

mod chmod;
mod mapping;
mod planner;

pub use chmod::{ChmodError, ChmodSet};
pub use mapping::{MappingKind, MappingParseError, NameMapping};
pub use planner::{MetadataOptions, MetadataPlanner};
