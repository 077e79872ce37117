//! Shared test utilities for integration tests
//!
//! Provides throwaway git repositories driven through the `git` CLI so tests
//! exercise the same collaborator the binary uses.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A scratch git repository removed when dropped
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Initialize an empty repository with a fixed identity.
    pub fn init() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Self { dir };
        repo.git(&["init", "-q"]);
        repo.git(&["config", "user.name", "Detect Changes Tests"]);
        repo.git(&["config", "user.email", "tests@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn path_buf(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) {
        let target = self.dir.path().join(relative);
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(target, content).unwrap();
    }

    /// Point `relative` at `target`, replacing any existing link.
    #[cfg(unix)]
    pub fn symlink(&self, relative: &str, target: &str) {
        let link = self.dir.path().join(relative);
        fs::create_dir_all(link.parent().unwrap()).unwrap();
        if fs::symlink_metadata(&link).is_ok() {
            fs::remove_file(&link).unwrap();
        }
        std::os::unix::fs::symlink(target, link).unwrap();
    }

    pub fn remove(&self, relative: &str) {
        let target = self.dir.path().join(relative);
        if target.is_dir() {
            fs::remove_dir_all(target).unwrap();
        } else {
            fs::remove_file(target).unwrap();
        }
    }

    /// Stage everything and commit, returning the new commit id.
    pub fn commit(&self, message: &str) -> String {
        self.git(&["add", "-A"]);
        self.git(&["commit", "-q", "--allow-empty", "-m", message]);
        self.head()
    }

    pub fn head(&self) -> String {
        self.git(&["rev-parse", "HEAD"]).trim().to_string()
    }

    /// Run git in the repository, panicking on failure.
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .arg("-C")
            .arg(self.dir.path())
            .args(args)
            .output()
            .expect("git must be installed to run integration tests");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }
}

/// Three-module history used by several tests.
///
/// Base holds `service-a`, `service-b` and `service-c`; head keeps
/// `service-a` untouched, edits one file in `service-b` and deletes
/// `service-c`. Returns `(repo, base, head)`.
pub fn three_module_history() -> (TestRepo, String, String) {
    let repo = TestRepo::init();
    repo.write("service-a/src/main.rs", "fn main() { println!(\"a\"); }\n");
    repo.write("service-a/Cargo.toml", "[package]\nname = \"a\"\n");
    repo.write("service-b/app.py", "print('b')\n");
    repo.write("service-b/conf/settings.yaml", "debug: false\n");
    repo.write("service-c/README.md", "# c\n");
    let base = repo.commit("base");

    repo.write("service-b/app.py", "print('b, but different')\n");
    repo.remove("service-c");
    let head = repo.commit("head");

    (repo, base, head)
}
