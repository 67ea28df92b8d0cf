//! Scratch directory for extracted catalog documents.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

const TEMP_PREFIX: &str = "arcade-gamelist-";

enum Location {
    /// Fresh system temp directory
    Temp(Option<TempDir>),
    /// User-supplied directory this run created, along with the topmost
    /// ancestor that didn't exist before
    Created { path: PathBuf, root: PathBuf },
    /// User-supplied directory that already existed
    Existing(PathBuf),
}

/// A directory owned by one conversion run, cleaned up on drop.
///
/// Directories the run created are removed entirely. A directory that
/// already existed only loses the files recorded with [`ScratchDir::track`].
pub struct ScratchDir {
    location: Location,
    tracked: Vec<PathBuf>,
}

impl ScratchDir {
    /// A new directory under the system temp dir.
    pub fn temporary() -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix(TEMP_PREFIX).tempdir()?;
        log::debug!("Using temp directory: {}", dir.path().display());
        Ok(Self {
            location: Location::Temp(Some(dir)),
            tracked: Vec::new(),
        })
    }

    /// Use `path`, creating it if needed.
    pub fn at(path: &Path) -> std::io::Result<Self> {
        let location = if path.is_dir() {
            Location::Existing(path.to_path_buf())
        } else {
            let root = first_missing_ancestor(path);
            std::fs::create_dir_all(path)?;
            Location::Created {
                path: path.to_path_buf(),
                root,
            }
        };
        Ok(Self {
            location,
            tracked: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        match &self.location {
            Location::Temp(Some(dir)) => dir.path(),
            Location::Temp(None) => Path::new(""),
            Location::Created { path, .. } | Location::Existing(path) => path,
        }
    }

    /// Record a file written into the directory so it is removed on drop.
    pub fn track(&mut self, file: PathBuf) {
        self.tracked.push(file);
    }
}

fn first_missing_ancestor(path: &Path) -> PathBuf {
    path.ancestors()
        .take_while(|p| !p.as_os_str().is_empty() && !p.exists())
        .last()
        .unwrap_or(path)
        .to_path_buf()
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let display = self.path().display().to_string();
        let result = match &mut self.location {
            Location::Temp(dir) => match dir.take() {
                Some(dir) => dir.close(),
                None => Ok(()),
            },
            Location::Created { root, .. } => std::fs::remove_dir_all(root),
            Location::Existing(_) => {
                for file in &self.tracked {
                    if let Err(e) = std::fs::remove_file(file) {
                        log::warn!("Failed to remove {}: {e}", file.display());
                    }
                }
                Ok(())
            }
        };

        match result {
            Ok(()) => log::debug!("Cleaned up temp directory: {display}"),
            Err(e) => log::warn!("Failed to clean up temp directory: {e}"),
        }
    }
}

#[cfg(test)]
#[path = "tests/scratch_tests.rs"]
mod tests;
