//! Property check: the compiled watch scope agrees with a component-wise
//! oracle over arbitrary directory layouts.

use std::path::PathBuf;

use proptest::prelude::*;

use sitewatch::fs::mock::MockFileSystem;
use sitewatch::watch::build_watch_pattern;

fn segments(max_len: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,3}", 1..=max_len)
}

/// True when `path` has `base` as a strict component-wise prefix.
fn strictly_under(path: &[String], base: &[String]) -> bool {
    path.len() > base.len() && path[..base.len()] == *base
}

fn identity_fs(root: &PathBuf, dirs: &[&[String]]) -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.map_realpath(root, root);
    for dir in dirs {
        let abs = root.join(dir.join("/"));
        fs.map_realpath(&abs, &abs);
    }
    fs
}

proptest! {
    #[test]
    fn nested_destination_agrees_with_oracle(
        src in segments(2),
        suffix in segments(2),
        path in segments(5),
    ) {
        let root = PathBuf::from("/prj");
        let dst: Vec<String> = src.iter().chain(suffix.iter()).cloned().collect();
        let fs = identity_fs(&root, &[src.as_slice(), dst.as_slice()]);

        let config_files = vec!["conf.yml".to_string()];
        let pattern = build_watch_pattern(
            &fs,
            &root,
            &src.join("/"),
            &dst.join("/"),
            &config_files,
        ).unwrap();

        let expected = strictly_under(&path, &src) && !strictly_under(&path, &dst);
        prop_assert_eq!(pattern.matches(&path.join("/")), expected);
        prop_assert!(pattern.matches("conf.yml"));
    }

    #[test]
    fn independent_destination_agrees_with_oracle(
        src in segments(2),
        path in segments(5),
    ) {
        let root = PathBuf::from("/prj");
        // Segment names are at most three characters, so this destination
        // can never be related to the generated source.
        let dst = vec!["outdir".to_string()];
        let fs = identity_fs(&root, &[src.as_slice(), dst.as_slice()]);

        let config_files = vec!["conf.yml".to_string()];
        let pattern = build_watch_pattern(
            &fs,
            &root,
            &src.join("/"),
            "outdir",
            &config_files,
        ).unwrap();

        let expected = strictly_under(&path, &src);
        prop_assert_eq!(pattern.matches(&path.join("/")), expected);
    }
}
