//! Stamps the binary with the commit it was built from, for `--version`.

use std::process::Command;

/// `git describe` output such as `3f2a9c1e07-dirty`, if git and a
/// repository are available.
fn describe() -> Option<String> {
    let out = Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=10"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let commit = String::from_utf8(out.stdout).ok()?;
    let commit = commit.trim();
    (!commit.is_empty()).then(|| commit.to_owned())
}

fn main() {
    let commit = describe().unwrap_or_else(|| "unknown".to_owned());
    println!("cargo:rustc-env=REGREP_BUILD_COMMIT={commit}");

    // HEAD moves on commit and checkout; the index changes the dirty flag.
    for watched in [".git/HEAD", ".git/index"] {
        println!("cargo:rerun-if-changed={watched}");
    }
}
