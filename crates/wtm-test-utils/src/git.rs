//! Git fixtures built with the `git` CLI.

use std::fs;
use std::path::Path;
use std::process::Command;

/// Run `git` in `dir`, returning trimmed stdout.
///
/// # Panics
/// Panics if git cannot be spawned or exits unsuccessfully.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .unwrap_or_else(|e| panic!("failed to run `git {args:?}` in {}: {e}", dir.display()));

    if !output.status.success() {
        panic!(
            "`git {args:?}` failed in {}:\n{}",
            dir.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }

    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Configure a throwaway identity so commits work on CI machines.
pub fn configure_identity(dir: &Path) {
    git(dir, &["config", "user.email", "test@test.com"]);
    git(dir, &["config", "user.name", "Test User"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}

/// Write `file` with `content` and commit it.
pub fn commit_file(dir: &Path, file: &str, content: &str, message: &str) {
    let target = dir.join(file);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&target, content)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", target.display()));
    git(dir, &["add", file]);
    git(dir, &["commit", "-m", message]);
}

/// Create a bare repository at `path` whose HEAD points at `main`.
pub fn init_bare(path: &Path) {
    fs::create_dir_all(path).unwrap();
    git(path, &["init", "--bare"]);
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
}

/// Clone `origin` into `dest` with an identity configured.
pub fn clone(origin: &Path, dest: &Path) {
    let parent = dest.parent().expect("clone destination needs a parent");
    let origin = origin.to_str().expect("utf-8 origin path");
    let dest_str = dest.to_str().expect("utf-8 destination path");
    git(parent, &["clone", "--quiet", origin, dest_str]);
    configure_identity(dest);
}

/// Current HEAD commit id of `dir`.
pub fn head_id(dir: &Path) -> String {
    git(dir, &["rev-parse", "HEAD"])
}
