//! Rendered pages kept on disk until the catalog goes away.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::{ApplicationResult, IoResultExt};
use crate::infrastructure::traits::FileSystem;

const ARTIFACT_PREFIX: &str = "manview-";
const ARTIFACT_SUFFIX: &str = ".html";

/// Records every transient page written for a render request and removes
/// them all on `release_all` or drop.
///
/// Pages are never deduplicated: two renders of the same document may use
/// different options and each gets its own file.
pub struct ArtifactTracker {
    fs: Arc<dyn FileSystem>,
    /// Directory for new pages, system temp dir if None
    dir: Option<PathBuf>,
    paths: Vec<PathBuf>,
}

impl ArtifactTracker {
    pub fn new(fs: Arc<dyn FileSystem>, dir: Option<PathBuf>) -> Self {
        Self {
            fs,
            dir,
            paths: Vec::new(),
        }
    }

    /// Write `content` to a new file and track it.
    pub fn persist(&mut self, content: &str) -> ApplicationResult<PathBuf> {
        let dir = self.dir.clone().unwrap_or_else(std::env::temp_dir);
        let mut file = tempfile::Builder::new()
            .prefix(ARTIFACT_PREFIX)
            .suffix(ARTIFACT_SUFFIX)
            .tempfile_in(&dir)
            .with_path_context("create rendered page in", &dir)?;
        let path = absolute(file.path());

        file.write_all(content.as_bytes())
            .and_then(|_| file.flush())
            .with_path_context("write rendered page", &path)?;
        file.keep()
            .map_err(|e| e.error)
            .with_path_context("keep rendered page", &path)?;

        self.track(path.clone());
        Ok(path)
    }

    /// Register an existing file for removal at teardown.
    pub fn track(&mut self, path: PathBuf) {
        debug!("track: {}", path.display());
        self.paths.push(path);
    }

    /// Remove every tracked file, best effort. Returns the number removed.
    ///
    /// Failures are logged and skipped; a file that is already gone counts as
    /// released. Calling it again is a no-op.
    pub fn release_all(&mut self) -> usize {
        let mut removed = 0;
        for path in self.paths.drain(..) {
            match self.fs.remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("release_all: already gone: {}", path.display());
                }
                Err(e) => warn!("release_all: cannot remove {}: {}", path.display(), e),
            }
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl Drop for ArtifactTracker {
    fn drop(&mut self) {
        if !self.paths.is_empty() {
            let removed = self.release_all();
            debug!("drop: released {} rendered pages", removed);
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
