//! Property-based tests for fingerprint determinism guarantees

use detect_changes::tree::fingerprint;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn file_set() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    prop::collection::btree_map(
        "[a-z]{1,3}(/[a-z]{1,3}){0,2}\\.txt",
        prop::collection::vec(any::<u8>(), 0..256),
        1..8,
    )
}

/// Write `files` in the given order. Names that collide with an existing
/// directory (or vice versa) are skipped.
fn materialize<'a>(root: &Path, files: impl Iterator<Item = (&'a String, &'a Vec<u8>)>) {
    for (name, content) in files {
        let target = root.join(name);
        if fs::create_dir_all(target.parent().unwrap()).is_err() {
            continue;
        }
        let _ = fs::write(target, content);
    }
}

/// Test that fingerprinting is deterministic and creation-order independent
#[test]
fn test_fingerprint_order_independence_property() {
    let mut runner = proptest::test_runner::TestRunner::new(ProptestConfig::with_cases(32));

    runner
        .run(&file_set(), |files| {
            let forward = TempDir::new().unwrap();
            let backward = TempDir::new().unwrap();
            materialize(forward.path(), files.iter());
            materialize(backward.path(), files.iter().rev());

            let a = fingerprint(forward.path());
            let b = fingerprint(backward.path());
            prop_assert_eq!(&a, &fingerprint(forward.path()));
            prop_assert_eq!(a, b);
            Ok(())
        })
        .unwrap();
}

/// Test that appending a byte to any file changes the fingerprint
#[test]
fn test_fingerprint_edit_sensitivity_property() {
    let mut runner = proptest::test_runner::TestRunner::new(ProptestConfig::with_cases(32));

    runner
        .run(&(file_set(), any::<prop::sample::Index>(), any::<u8>()), |(files, pick, byte)| {
            let tree = TempDir::new().unwrap();
            materialize(tree.path(), files.iter());

            let written: Vec<_> = files
                .keys()
                .filter(|name| tree.path().join(name).is_file())
                .collect();
            prop_assume!(!written.is_empty());

            let before = fingerprint(tree.path());
            let target = tree.path().join(written[pick.index(written.len())]);
            let mut content = fs::read(&target).unwrap();
            content.push(byte);
            fs::write(&target, content).unwrap();

            prop_assert_ne!(before, fingerprint(tree.path()));
            Ok(())
        })
        .unwrap();
}
