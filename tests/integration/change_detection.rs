//! End-to-end change detection against real git histories

use detect_changes::detect::{ChangeDetector, VerdictBasis};
use detect_changes::resolve::{CommitResolver, EventContext};
use detect_changes::types::{parse_module_list, CommitPair, CommitRef};
use detect_changes::vcs::GitCli;
use std::fs;
use tempfile::TempDir;

use crate::integration::test_utils::three_module_history;
use crate::integration::TestRepo;

const NULL_SHA: &str = "0000000000000000000000000000000000000000";

#[test]
fn test_unchanged_modified_and_missing_modules() {
    let (repo, base, head) = three_module_history();
    let git = GitCli::new(repo.path());
    let commits = CommitPair {
        base: Some(CommitRef::new(base.as_str())),
        head: CommitRef::new(head.as_str()),
    };

    let report = ChangeDetector::new(&git)
        .detect(&commits, &parse_module_list("service-a service-b service-c"))
        .unwrap();

    assert_eq!(report.changed("service-a"), Some(false));
    assert_eq!(report.changed("service-b"), Some(true));
    assert_eq!(report.changed("service-c"), Some(false));
    assert_eq!(report.verdicts()[2].basis, VerdictBasis::MissingAtHead);

    match &report.verdicts()[0].basis {
        VerdictBasis::Compared { base, head } => {
            assert!(!base.is_empty());
            assert_eq!(base, head);
        }
        other => panic!("expected comparison, got {:?}", other),
    }
}

#[test]
fn test_module_added_at_head_is_changed() {
    let repo = TestRepo::init();
    repo.write("service-a/a.txt", "a\n");
    let base = repo.commit("base");
    repo.write("service-new/n.txt", "n\n");
    let head = repo.commit("head");

    let git = GitCli::new(repo.path());
    let commits = CommitPair {
        base: Some(CommitRef::new(base.as_str())),
        head: CommitRef::new(head.as_str()),
    };
    let report = ChangeDetector::new(&git)
        .detect(&commits, &parse_module_list("service-new service-a"))
        .unwrap();

    assert_eq!(report.changed("service-new"), Some(true));
    assert_eq!(report.changed("service-a"), Some(false));
}

#[test]
fn test_rename_within_module_is_changed() {
    let repo = TestRepo::init();
    repo.write("svc/old_name.rs", "same body\n");
    let base = repo.commit("base");
    repo.git(&["mv", "svc/old_name.rs", "svc/new_name.rs"]);
    let head = repo.commit("rename");

    let git = GitCli::new(repo.path());
    let commits = CommitPair {
        base: Some(CommitRef::new(base.as_str())),
        head: CommitRef::new(head.as_str()),
    };
    let report = ChangeDetector::new(&git)
        .detect(&commits, &parse_module_list("svc"))
        .unwrap();
    assert_eq!(report.changed("svc"), Some(true));
}

#[cfg(unix)]
#[test]
fn test_retargeted_symlink_is_changed() {
    let repo = TestRepo::init();
    repo.write("svc/a.txt", "same\n");
    repo.write("svc/b.txt", "same\n");
    repo.symlink("svc/current", "a.txt");
    let base = repo.commit("base");
    repo.symlink("svc/current", "b.txt");
    let head = repo.commit("retarget");

    let git = GitCli::new(repo.path());
    let commits = CommitPair {
        base: Some(CommitRef::new(base.as_str())),
        head: CommitRef::new(head.as_str()),
    };
    let report = ChangeDetector::new(&git)
        .detect(&commits, &parse_module_list("svc"))
        .unwrap();
    assert_eq!(report.changed("svc"), Some(true));
}

#[cfg(unix)]
#[test]
fn test_symlink_only_module_added_at_head_is_changed() {
    let repo = TestRepo::init();
    repo.write("other/x", "x\n");
    let base = repo.commit("base");
    repo.symlink("links/x", "../other/x");
    let head = repo.commit("add links");

    let git = GitCli::new(repo.path());
    let commits = CommitPair {
        base: Some(CommitRef::new(base.as_str())),
        head: CommitRef::new(head.as_str()),
    };
    let report = ChangeDetector::new(&git)
        .detect(&commits, &parse_module_list("links other"))
        .unwrap();
    assert_eq!(report.changed("links"), Some(true));
    assert_eq!(report.changed("other"), Some(false));
}

#[test]
fn test_dash_prefixed_module_is_treated_as_path() {
    let repo = TestRepo::init();
    repo.write("-svc/lib.rs", "v1\n");
    let base = repo.commit("base");
    repo.write("-svc/lib.rs", "v2\n");
    let head = repo.commit("edit");

    let git = GitCli::new(repo.path());
    let commits = CommitPair {
        base: Some(CommitRef::new(base.as_str())),
        head: CommitRef::new(head.as_str()),
    };
    let report = ChangeDetector::new(&git)
        .detect(&commits, &parse_module_list("-svc"))
        .unwrap();
    assert_eq!(report.changed("-svc"), Some(true));
}

#[test]
fn test_change_outside_module_is_ignored() {
    let repo = TestRepo::init();
    repo.write("svc/lib.rs", "lib\n");
    repo.write("README.md", "v1\n");
    let base = repo.commit("base");
    repo.write("README.md", "v2\n");
    repo.write("other/new.rs", "new\n");
    let head = repo.commit("head");

    let git = GitCli::new(repo.path());
    let commits = CommitPair {
        base: Some(CommitRef::new(base.as_str())),
        head: CommitRef::new(head.as_str()),
    };
    let report = ChangeDetector::new(&git)
        .detect(&commits, &parse_module_list("svc"))
        .unwrap();
    assert_eq!(report.changed("svc"), Some(false));
}

#[test]
fn test_push_from_null_revision_uses_parent() {
    let (repo, _base, head) = three_module_history();
    let git = GitCli::new(repo.path());
    let event = EventContext {
        event_name: "push".to_string(),
        event_path: None,
        event_before: Some(NULL_SHA.to_string()),
        sha: Some(head.clone()),
    };

    let commits = CommitResolver::new(&git).resolve(&event);
    let report = ChangeDetector::new(&git)
        .detect(&commits, &parse_module_list("service-a service-b"))
        .unwrap();

    assert_eq!(report.changed("service-a"), Some(false));
    assert_eq!(report.changed("service-b"), Some(true));
}

#[test]
fn test_first_commit_without_parent_marks_everything_changed() {
    let repo = TestRepo::init();
    repo.write("svc/lib.rs", "lib\n");
    let only = repo.commit("initial");

    let git = GitCli::new(repo.path());
    let event = EventContext {
        event_name: "push".to_string(),
        event_path: None,
        event_before: Some(NULL_SHA.to_string()),
        sha: Some(only),
    };

    let commits = CommitResolver::new(&git).resolve(&event);
    assert_eq!(commits.base, None);

    let report = ChangeDetector::new(&git)
        .detect(&commits, &parse_module_list("svc"))
        .unwrap();
    assert_eq!(report.changed("svc"), Some(true));
}

#[test]
fn test_pull_request_event_file() {
    let (repo, base, head) = three_module_history();
    let event_dir = TempDir::new().unwrap();
    let event_file = event_dir.path().join("event.json");
    fs::write(
        &event_file,
        format!(
            r#"{{"action":"opened","pull_request":{{"number":7,"base":{{"ref":"main","sha":"{}"}},"head":{{"ref":"topic","sha":"{}"}}}}}}"#,
            base, head
        ),
    )
    .unwrap();

    let git = GitCli::new(repo.path());
    let event = EventContext {
        event_name: "pull_request".to_string(),
        event_path: Some(event_file),
        event_before: None,
        sha: Some("merge-commit-we-do-not-use".to_string()),
    };

    let commits = CommitResolver::new(&git).resolve(&event);
    assert_eq!(commits.base, Some(CommitRef::new(base.as_str())));
    assert_eq!(commits.head, CommitRef::new(head.as_str()));

    let report = ChangeDetector::new(&git)
        .detect(&commits, &parse_module_list("service-b"))
        .unwrap();
    assert_eq!(report.changed("service-b"), Some(true));
}

#[test]
fn test_scratch_workspace_cleaned_up() {
    let (repo, base, head) = three_module_history();
    let scratch = TempDir::new().unwrap();
    let git = GitCli::new(repo.path());
    let commits = CommitPair {
        base: Some(CommitRef::new(base.as_str())),
        head: CommitRef::new(head.as_str()),
    };

    ChangeDetector::new(&git)
        .with_scratch_dir(Some(scratch.path().to_path_buf()))
        .detect(&commits, &parse_module_list("service-a service-b service-c"))
        .unwrap();

    assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
}
