use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs4::FileExt;

/// Advisory exclusive lock covering one download of an install root.
///
/// Held for the duration of the pipeline so a second concurrent download
/// targeting the same root reports a conflict instead of interleaving
/// checkout and build steps. Released when dropped. The lock file is a
/// sibling of the root (`<root>.lock`), never inside the worktree, so the
/// cleanup passes cannot see it.
#[derive(Debug)]
pub struct InstallLock {
    _file: File,
}

impl InstallLock {
    /// # Errors
    /// Returns an error when the lock file cannot be created; `Ok(None)`
    /// means another process holds the lock.
    pub fn try_acquire(root: &Path) -> Result<Option<Self>> {
        let path = lock_path(root);
        fs::create_dir_all(root)
            .with_context(|| format!("failed to create {}", root.display()))?;
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self { _file: file })),
            Err(err) if err.kind() == ErrorKind::WouldBlock => Ok(None),
            #[cfg(windows)]
            Err(err) if matches!(err.raw_os_error(), Some(32 | 33)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

fn lock_path(root: &Path) -> PathBuf {
    let mut path = root.as_os_str().to_os_string();
    path.push(".lock");
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquisition_is_refused_while_held() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let root = dir.path().join("tip");
        let held = InstallLock::try_acquire(&root)?;
        assert!(held.is_some());
        assert!(InstallLock::try_acquire(&root)?.is_none());
        drop(held);
        assert!(InstallLock::try_acquire(&root)?.is_some());
        Ok(())
    }

    #[test]
    fn acquisition_creates_the_root_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let root = dir.path().join("sdk").join("tip");
        let lock = InstallLock::try_acquire(&root)?;
        assert!(lock.is_some());
        assert!(root.is_dir());
        Ok(())
    }

    #[test]
    fn lock_file_stays_out_of_the_worktree() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let root = dir.path().join("tip");
        let _lock = InstallLock::try_acquire(&root)?;
        assert!(dir.path().join("tip.lock").exists());
        assert_eq!(std::fs::read_dir(&root)?.count(), 0);
        Ok(())
    }
}
