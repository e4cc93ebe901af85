use std::path::PathBuf;

use filters::{FilterAction, FilterSet};
use proptest::prelude::*;

proptest! {
    // Evaluation never panics, whatever path shows up against literal rules.
    #[test]
    fn evaluation_is_total(segments in proptest::collection::vec("[a-zA-Z0-9._-]{1,12}", 1..6)) {
        let set = FilterSet::parse(["- *.tmp", "+ keep*", "- /top"]).expect("compiles");
        let path: PathBuf = std::iter::once("/".to_string()).chain(segments).collect();
        let _ = set.allows(&path, false, None);
        let _ = set.allows(&path, true, Some(std::path::Path::new("/")));
    }

    // With no rules, everything is included.
    #[test]
    fn empty_set_includes_everything(segment in "[a-zA-Z0-9._-]{1,16}") {
        let set = FilterSet::default();
        let path = PathBuf::from("/base").join(segment);
        prop_assert!(set.allows(&path, false, None));
        prop_assert_eq!(set.first_match(&path, false, None), None);
    }

    // A catch-all exclude drops every basename.
    #[test]
    fn catch_all_exclude_drops_everything(segment in "[a-zA-Z0-9._-]{1,16}") {
        let set = FilterSet::parse(["- *"]).expect("compiles");
        let path = PathBuf::from("/base").join(segment);
        prop_assert_eq!(set.first_match(&path, false, None), Some(FilterAction::Exclude));
    }
}
