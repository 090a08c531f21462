//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing the catalog
//! to be tested with mock implementations.

use std::io;
use std::path::Path;
use std::process::Output;

use crate::domain::ListingEntry;
use crate::infrastructure::InfraResult;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// External command runner abstraction.
pub trait CommandRunner: Send + Sync {
    /// Run a command with arguments and extra environment variables.
    fn run(&self, cmd: &str, args: &[&str], envs: &[(&str, &str)]) -> io::Result<Output>;
}

/// Output flavor requested from a document render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFormat {
    /// Plain text, layout preserved, no styling
    Plain,
    /// Complete HTML page with bold/underline styling
    Html,
}

/// Options for one render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Line width in columns
    pub width: u16,
    pub format: RenderFormat,
    /// Light text on dark background for HTML pages
    pub dark: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 80,
            format: RenderFormat::Html,
            dark: true,
        }
    }
}

impl RenderOptions {
    pub fn plain(width: u16) -> Self {
        Self {
            width,
            format: RenderFormat::Plain,
            dark: false,
        }
    }
}

/// Source of documents for a location: listing, rendering, summarizing.
///
/// Implementations choose how documents are found and formatted; the catalog
/// only relies on rendered text putting headings at column 0 and indenting
/// body lines.
pub trait DocumentProvider: Send + Sync {
    /// Enumerate the documents reachable from `location`.
    /// Returns `Ok(None)` when nothing is found there.
    fn list(&self, location: &Path) -> InfraResult<Option<Vec<ListingEntry>>>;

    /// Render one document completely.
    fn render(
        &self,
        location: &Path,
        document: &str,
        category: &str,
        options: &RenderOptions,
    ) -> InfraResult<String>;

    /// One-line description of one document.
    fn summarize(&self, location: &Path, document: &str, category: &str) -> InfraResult<String>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// Real command runner implementation.
#[derive(Debug, Default)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run(&self, cmd: &str, args: &[&str], envs: &[(&str, &str)]) -> io::Result<Output> {
        std::process::Command::new(cmd)
            .args(args)
            .envs(envs.iter().copied())
            .output()
    }
}
