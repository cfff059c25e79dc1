//! Property tests for remote target path construction.

use std::path::Path;

use proptest::prelude::*;

use droprelay::domain::value_objects::RemotePath;

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9._-]{1,16}")
        .unwrap()
        .prop_filter("not a dot segment", |s| s != "." && s != "..")
}

fn folder_segments() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(segment(), 1..=4)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Building a remote path never panics on arbitrary input.
    #[test]
    fn property_for_upload_never_panics(
        folder in "(?s).{0,64}",
        local in "(?s).{0,128}",
    ) {
        let _ = RemotePath::for_upload(&folder, Path::new(&local));
    }

    /// PROPERTY: The target is always `folder/basename` with forward slashes,
    /// whichever separator style the folder was written in.
    #[test]
    fn property_joins_folder_and_basename(
        segments in folder_segments(),
        local_dirs in proptest::collection::vec(segment(), 0..=3),
        name in segment(),
        backslashes in any::<bool>(),
        trailing in any::<bool>(),
    ) {
        let separator = if backslashes { "\\" } else { "/" };
        let mut folder = segments.join(separator);
        if trailing {
            folder.push_str(separator);
        }
        let mut local = local_dirs.join("/");
        local.push('/');
        local.push_str(&name);

        let target = RemotePath::for_upload(&folder, Path::new(&local)).unwrap();

        prop_assert_eq!(target.as_str(), format!("{}/{}", segments.join("/"), name));
        prop_assert!(!target.as_str().contains('\\'));
        prop_assert!(!target.as_str().contains("//"));
    }

    /// PROPERTY: A Windows-style local path yields the same target as its
    /// forward-slash twin.
    #[cfg(windows)]
    #[test]
    fn property_local_separator_style_is_irrelevant(
        dirs in proptest::collection::vec(segment(), 1..=3),
        name in segment(),
    ) {
        let unix = format!("/{}/{}", dirs.join("/"), name);
        let windows = format!("C:\\{}\\{}", dirs.join("\\"), name);

        prop_assert_eq!(
            RemotePath::for_upload("remote", Path::new(&unix)).unwrap(),
            RemotePath::for_upload("remote", Path::new(&windows)).unwrap()
        );
    }
}
