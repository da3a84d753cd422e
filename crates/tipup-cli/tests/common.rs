#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Integration tests drive real `git` against a local fixture upstream;
/// skip when it is not on PATH.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

pub fn run_git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args([
            "-c",
            "user.name=tipup-tests",
            "-c",
            "user.email=tests@tipup.invalid",
        ])
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to spawn git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

pub struct Upstream {
    pub dir: TempDir,
    pub url: String,
}

impl Upstream {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn rev_short(&self, rev: &str) -> String {
        run_git(self.path(), &["rev-parse", "--short", rev])
    }

    /// Adds `patch_sets` review revisions for a changelist, leaving the
    /// mainline where it was. Returns the head commit of the highest
    /// patch set.
    pub fn add_change(&self, id: u64, patch_sets: u32) -> String {
        let base = run_git(self.path(), &["rev-parse", "HEAD"]);
        let shard = format!("{:02}", id % 100);
        let mut last = base.clone();
        for ps in 1..=patch_sets {
            fs::write(
                self.path().join("cl.txt"),
                format!("change {id} patch set {ps}\n"),
            )
            .expect("write change file");
            run_git(self.path(), &["add", "-A"]);
            run_git(
                self.path(),
                &["commit", "-q", "-m", &format!("change {id} ps {ps}")],
            );
            last = run_git(self.path(), &["rev-parse", "HEAD"]);
            run_git(
                self.path(),
                &[
                    "update-ref",
                    &format!("refs/changes/{shard}/{id}/{ps}"),
                    "HEAD",
                ],
            );
        }
        run_git(
            self.path(),
            &[
                "update-ref",
                &format!("refs/changes/{shard}/{id}/meta"),
                "HEAD",
            ],
        );
        run_git(self.path(), &["reset", "-q", "--hard", &base]);
        last
    }

    /// Lands a mainline commit replacing the build script.
    pub fn set_build_script(&self, body: &str) {
        write_executable(&self.path().join("src").join("make.bash"), body);
        run_git(self.path(), &["add", "-A"]);
        run_git(self.path(), &["commit", "-q", "-m", "update the build script"]);
    }

    /// Lands one more commit on the mainline.
    pub fn advance_mainline(&self, marker: &str) {
        fs::write(self.path().join("landed.txt"), format!("{marker}\n"))
            .expect("write landed file");
        run_git(self.path(), &["add", "-A"]);
        run_git(self.path(), &["commit", "-q", "-m", marker]);
    }
}

pub const MAKE_BASH: &str = r#"#!/bin/sh
set -e
mkdir -p ../bin
cat > ../bin/sdk <<'SDKEOF'
#!/bin/sh
echo sdk-tip "$@"
SDKEOF
chmod +x ../bin/sdk
if [ -n "$TIPUP_TEST_COUNTER" ]; then
    echo build >> "$TIPUP_TEST_COUNTER"
fi
"#;

/// A local source tree standing in for the canonical upstream: a `main`
/// branch whose build script installs a stub toolchain binary and bumps a
/// counter so tests can assert how many builds actually ran.
pub fn fixture_upstream() -> Upstream {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().to_path_buf();
    run_git(&path, &["init", "-q"]);
    run_git(&path, &["checkout", "-q", "-b", "main"]);

    let src = path.join("src");
    fs::create_dir_all(&src).expect("create src");
    write_executable(&src.join("make.bash"), MAKE_BASH);
    fs::write(path.join(".gitignore"), "/bin/\n").expect("write gitignore");
    fs::write(path.join("VERSION"), "tip\n").expect("write version");
    run_git(&path, &["add", "-A"]);
    run_git(&path, &["commit", "-q", "-m", "seed the source tree"]);

    let url = format!("file://{}", path.display());
    Upstream { dir, url }
}

pub fn write_executable(path: &Path, body: &str) {
    fs::write(path, body).expect("write script");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("chmod");
    }
}

pub struct SdkDir {
    pub dir: TempDir,
}

impl SdkDir {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn root(&self) -> PathBuf {
        self.path().join("tip")
    }
}

pub fn sdk_dir() -> SdkDir {
    SdkDir {
        dir: tempfile::tempdir().expect("tempdir"),
    }
}
