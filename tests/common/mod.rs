//! Test doubles shared by the integration tests

#![allow(dead_code)]

use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use manview::domain::ListingEntry;
use manview::infrastructure::traits::{DocumentProvider, FileSystem, RenderFormat, RenderOptions};
use manview::infrastructure::{InfraError, InfraResult};

pub const LS_PAGE: &str = "\
LS(1)                     User Commands                    LS(1)

NAME
       ls - list directory contents

SYNOPSIS
       ls [OPTION]... [FILE]...

DESCRIPTION
       List information about the FILEs.

       Sort entries alphabetically.

SEE ALSO
       dir(1)
";

/// Provider answering from fixed data and counting every call.
#[derive(Default)]
pub struct FakeProvider {
    pub listing: Option<Vec<ListingEntry>>,
    pub page: String,
    pub summary: String,
    pub fail: bool,
    /// Listing still works, render and summarize fail
    pub fail_documents: bool,
    pub list_calls: AtomicUsize,
    pub render_calls: AtomicUsize,
    pub summarize_calls: AtomicUsize,
    pub rendered: Mutex<Vec<(String, String, RenderFormat)>>,
}

impl FakeProvider {
    pub fn with_listing(entries: &[(&str, &str)]) -> Self {
        Self {
            listing: Some(
                entries
                    .iter()
                    .map(|(doc, cat)| ListingEntry::new(*doc, *cat))
                    .collect(),
            ),
            page: LS_PAGE.to_string(),
            summary: "ls (1)               - list directory contents\n".to_string(),
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
            + self.render_calls.load(Ordering::SeqCst)
            + self.summarize_calls.load(Ordering::SeqCst)
    }

    fn failure(&self) -> InfraError {
        InfraError::Command {
            program: "man".to_string(),
            message: "simulated failure".to_string(),
            exit_code: Some(16),
        }
    }
}

impl DocumentProvider for FakeProvider {
    fn list(&self, _location: &Path) -> InfraResult<Option<Vec<ListingEntry>>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(self.failure());
        }
        Ok(self.listing.clone())
    }

    fn render(
        &self,
        _location: &Path,
        document: &str,
        category: &str,
        options: &RenderOptions,
    ) -> InfraResult<String> {
        self.render_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail || self.fail_documents {
            return Err(self.failure());
        }
        self.rendered.lock().unwrap().push((
            document.to_string(),
            category.to_string(),
            options.format,
        ));
        Ok(match options.format {
            RenderFormat::Plain => self.page.clone(),
            RenderFormat::Html => format!("<html><body><pre>{}</pre></body></html>", self.page),
        })
    }

    fn summarize(&self, _location: &Path, _document: &str, _category: &str) -> InfraResult<String> {
        self.summarize_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail || self.fail_documents {
            return Err(self.failure());
        }
        Ok(self.summary.clone())
    }
}

/// Real filesystem whose removals always fail.
#[derive(Default)]
pub struct StickyFileSystem {
    pub remove_attempts: AtomicUsize,
}

impl FileSystem for StickyFileSystem {
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

    fn remove_file(&self, _path: &Path) -> io::Result<()> {
        self.remove_attempts.fetch_add(1, Ordering::SeqCst);
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "simulated permission denied",
        ))
    }
}
