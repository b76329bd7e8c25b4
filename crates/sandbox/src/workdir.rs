//! Scoped temporary working directory.

use std::io;
use std::path::Path;
use tempfile::TempDir;

/// A uniquely named temporary directory that is removed when dropped.
///
/// Removal happens exactly once, on whichever path leaves the scope:
/// normal return, `?` propagation, or unwinding.
#[derive(Debug)]
pub struct ScopedWorkdir {
    dir: Option<TempDir>,
}

impl ScopedWorkdir {
    /// Create a fresh directory under the system temp dir.
    pub fn create(prefix: &str) -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix(prefix).tempdir()?;
        log::debug!("Created working directory {}", dir.path().display());
        Ok(Self { dir: Some(dir) })
    }

    pub fn path(&self) -> &Path {
        match &self.dir {
            Some(dir) => dir.path(),
            None => Path::new(""),
        }
    }

    /// Remove the directory now, reporting failures instead of logging them.
    pub fn close(mut self) -> io::Result<()> {
        match self.dir.take() {
            Some(dir) => dir.close(),
            None => Ok(()),
        }
    }
}

impl Drop for ScopedWorkdir {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            match dir.close() {
                Ok(()) => log::debug!("Removed working directory {}", path.display()),
                Err(e) => log::warn!("Failed to remove {}: {}", path.display(), e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_directory_is_prefixed_and_removed_on_drop() {
        let workdir = ScopedWorkdir::create("deck_workdir_test_").unwrap();
        let path = workdir.path().to_path_buf();

        assert!(path.is_dir());
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("deck_workdir_test_"));

        fs::create_dir(path.join("assets")).unwrap();
        fs::write(path.join("assets").join("logo.png"), b"png").unwrap();

        drop(workdir);
        assert!(!path.exists());
    }

    #[test]
    fn test_directories_are_distinct() {
        let a = ScopedWorkdir::create("deck_workdir_test_").unwrap();
        let b = ScopedWorkdir::create("deck_workdir_test_").unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_removed_on_early_return() {
        fn fails(seen: &mut Option<std::path::PathBuf>) -> io::Result<()> {
            let workdir = ScopedWorkdir::create("deck_workdir_test_")?;
            *seen = Some(workdir.path().to_path_buf());
            Err(io::Error::new(io::ErrorKind::Other, "script failed"))
        }

        let mut seen = None;
        assert!(fails(&mut seen).is_err());
        assert!(!seen.unwrap().exists());
    }

    #[test]
    fn test_explicit_close() {
        let workdir = ScopedWorkdir::create("deck_workdir_test_").unwrap();
        let path = workdir.path().to_path_buf();
        workdir.close().unwrap();
        assert!(!path.exists());
    }
}
