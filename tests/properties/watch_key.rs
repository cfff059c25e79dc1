//! Property tests for path identity used when coalescing notifications.

use std::path::Path;

use proptest::prelude::*;

use droprelay::domain::value_objects::WatchKey;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Paths that differ only in ASCII case share one key.
    #[test]
    fn property_case_never_splits_a_key(path in "[A-Za-z0-9/._-]{1,64}") {
        prop_assert_eq!(
            WatchKey::new(Path::new(&path.to_uppercase())),
            WatchKey::new(Path::new(&path.to_lowercase()))
        );
    }

    /// PROPERTY: Separator style never splits a key.
    #[test]
    fn property_separator_style_never_splits_a_key(
        segments in proptest::collection::vec("[a-z0-9._-]{1,12}", 1..=5),
    ) {
        prop_assert_eq!(
            WatchKey::new(Path::new(&segments.join("\\"))),
            WatchKey::new(Path::new(&segments.join("/")))
        );
    }

    /// PROPERTY: Keys are idempotent: normalizing a key's text again is a no-op.
    #[test]
    fn property_key_is_a_fixed_point(path in "(?s).{0,64}") {
        let key = WatchKey::new(Path::new(&path));
        prop_assert_eq!(WatchKey::new(Path::new(&key.to_string())), key.clone());
    }
}
