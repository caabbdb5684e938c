//! Filesystem plumbing shared by backend setup.
//!
//! Lives outside the orchestration core: the loader and traverser never
//! touch directories themselves, backends call this during init.

use std::fs;
use std::io;
use std::path::Path;

/// Delete `path` recursively if it exists, then recreate it empty.
pub fn reset_dir(path: &Path) -> io::Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)?;
    }
    fs::create_dir_all(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_dir_clears_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("db");
        fs::create_dir_all(target.join("nested")).unwrap();
        fs::write(target.join("nested/file.bin"), b"x").unwrap();

        reset_dir(&target).unwrap();

        assert!(target.exists());
        assert_eq!(fs::read_dir(&target).unwrap().count(), 0);
    }

    #[test]
    fn reset_dir_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("fresh/db");
        reset_dir(&target).unwrap();
        assert!(target.is_dir());
    }
}
