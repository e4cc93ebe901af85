#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `filters` implements the ordered include/exclude rule language that governs
//! which entries dsync copies and which destination entries it may delete.
//! Rules are written as `<polarity>[<modifiers>] <pattern>` where the polarity
//! is `+` (include) or `-` (exclude), the modifiers are any combination of `!`
//! (negate the match) and `/` (force matching against the full path), and the
//! pattern is a glob.
//!
//! # Pattern semantics
//!
//! `*` matches within one path component, `**` crosses components, `?` matches
//! a single character, and `\` escapes. A trailing `/` restricts the rule to
//! directories. A leading `/` anchors the pattern to the entry's base path,
//! the root-of-transfer directory the entry was discovered under. A pattern
//! containing `/` anywhere except as its trailing character, or containing
//! `**`, matches full paths; any other pattern matches basenames.
//!
//! # Evaluation
//!
//! Rules are scanned in definition order and the **first** applicable rule
//! decides: `+` keeps the entry, `-` drops it. An entry no rule applies to is
//! kept. The same scan protects destination entries from deletion sweeps; see
//! [`FilterSet::delete_verdict`].
//!
//! # Errors
//!
//! Malformed rule text and unparsable globs surface as [`FilterError`] when
//! the set is built; evaluation itself cannot fail.
//!
//! # Examples
//!
//! ```
//! use filters::FilterSet;
//! use std::path::Path;
//!
//! let set = FilterSet::parse(["- *.tmp", "+ keep.tmp"]).expect("rules compile");
//! assert!(set.allows(Path::new("/src/notes.txt"), false, None));
//! assert!(!set.allows(Path::new("/src/scratch.tmp"), false, None));
//! // First match wins: the exclude shadows the later include.
//! assert!(!set.allows(Path::new("/src/keep.tmp"), false, None));
//! ```

mod compiled;
mod error;
mod rule;
mod set;

pub use error::FilterError;
pub use rule::{FilterAction, FilterRule};
pub use set::{DeleteVerdict, FilterSet};
