//! `man`-backed document provider
//!
//! Lists pages with `man -k` (or by scanning `man<N>/` directories), renders
//! them with `man -P cat` and looks up one-line descriptions with `man -f`.

use std::path::Path;
use std::process::Output;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::config::{ListingStrategy, ManSettings};
use crate::domain::ListingEntry;
use crate::infrastructure::overstrike;
use crate::infrastructure::traits::{
    CommandRunner, DocumentProvider, FileSystem, RenderFormat, RenderOptions,
};
use crate::infrastructure::{InfraError, InfraResult};

/// Compression suffixes man pages are commonly installed with.
const COMPRESSED_SUFFIXES: &[&str] = &["gz", "bz2", "xz", "lzma", "Z", "zst"];

fn apropos_regex() -> &'static Regex {
    static APROPOS: OnceLock<Regex> = OnceLock::new();
    APROPOS.get_or_init(|| {
        Regex::new(r"^\s*([^\s,(]+)(?:,\s*[^\s,(]+)*\s*\(([^)\s]+)\)")
            .expect("valid apropos regex")
    })
}

/// Parse one `man -k` line: `name[, alias...] (category) - description`.
pub fn parse_apropos_line(line: &str) -> Option<ListingEntry> {
    let caps = apropos_regex().captures(line)?;
    Some(ListingEntry::new(&caps[1], &caps[2]))
}

/// Parse a page file name below `man<N>/`, e.g. `ls.1.gz` → `("ls", "1")`.
pub fn parse_page_file_name(file_name: &str) -> Option<ListingEntry> {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, ext)) if COMPRESSED_SUFFIXES.contains(&ext) => stem,
        _ => file_name,
    };
    let (name, category) = stem.rsplit_once('.')?;
    if name.is_empty() || category.is_empty() {
        return None;
    }
    Some(ListingEntry::new(name, category))
}

/// Provider running the system `man` against a MANPATH location.
pub struct ManProvider {
    cmd: Arc<dyn CommandRunner>,
    fs: Arc<dyn FileSystem>,
    settings: ManSettings,
}

impl ManProvider {
    pub fn new(cmd: Arc<dyn CommandRunner>, fs: Arc<dyn FileSystem>, settings: ManSettings) -> Self {
        Self { cmd, fs, settings }
    }

    fn run_man(&self, location: &Path, args: &[&str], envs: &[(&str, &str)]) -> InfraResult<Output> {
        let manpath = location.to_string_lossy();
        let mut all_envs = vec![("MANPATH", &*manpath)];
        all_envs.extend_from_slice(envs);

        debug!("run_man: {} {:?} MANPATH={}", self.settings.command, args, manpath);
        self.cmd
            .run(&self.settings.command, args, &all_envs)
            .map_err(|e| InfraError::io(format!("spawn {}", self.settings.command), e))
    }

    /// Stdout of a finished command; a failed command with no output is an error.
    fn stdout_or_error(&self, output: Output) -> InfraResult<String> {
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() && stdout.trim().is_empty() {
            return Err(InfraError::Command {
                program: self.settings.command.clone(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                exit_code: output.status.code(),
            });
        }
        Ok(stdout)
    }

    #[instrument(level = "debug", skip(self))]
    fn list_apropos(&self, location: &Path) -> InfraResult<Option<Vec<ListingEntry>>> {
        let output = self.run_man(location, &["-k", "."], &[])?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let entries: Vec<ListingEntry> = stdout.lines().filter_map(parse_apropos_line).collect();

        if entries.is_empty() {
            debug!(
                "list_apropos: nothing found, status={:?} stderr={}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(None);
        }
        Ok(Some(entries))
    }

    #[instrument(level = "debug", skip(self))]
    fn list_scan(&self, location: &Path) -> InfraResult<Option<Vec<ListingEntry>>> {
        if !self.fs.is_dir(location) {
            return Ok(None);
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(location)
            .min_depth(2)
            .max_depth(2)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_dir() {
                continue;
            }
            let in_man_dir = entry
                .path()
                .parent()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().starts_with("man"))
                .unwrap_or(false);
            if !in_man_dir {
                continue;
            }
            if let Some(page) = parse_page_file_name(&entry.file_name().to_string_lossy()) {
                entries.push(page);
            }
        }

        debug!("list_scan: found {} pages", entries.len());
        Ok((!entries.is_empty()).then_some(entries))
    }
}

impl DocumentProvider for ManProvider {
    fn list(&self, location: &Path) -> InfraResult<Option<Vec<ListingEntry>>> {
        match self.settings.listing {
            ListingStrategy::Apropos => self.list_apropos(location),
            ListingStrategy::Scan => self.list_scan(location),
        }
    }

    #[instrument(level = "debug", skip(self, options))]
    fn render(
        &self,
        location: &Path,
        document: &str,
        category: &str,
        options: &RenderOptions,
    ) -> InfraResult<String> {
        let width = options.width.to_string();
        let mut envs = vec![("COLUMNS", width.as_str()), ("MANWIDTH", width.as_str())];
        if options.format == RenderFormat::Html {
            envs.push(("MAN_KEEP_FORMATTING", "1"));
            envs.push(("GROFF_NO_SGR", "1"));
        }

        let output = self.run_man(location, &["-P", "cat", category, document], &envs)?;
        let text = self.stdout_or_error(output)?;

        Ok(match options.format {
            RenderFormat::Plain => overstrike::strip(&text),
            RenderFormat::Html => {
                let title = format!("{document}({category})");
                overstrike::to_html_page(&text, &title, options.dark)
            }
        })
    }

    #[instrument(level = "debug", skip(self))]
    fn summarize(&self, location: &Path, document: &str, category: &str) -> InfraResult<String> {
        let output = self.run_man(location, &["-f", document], &[])?;
        let text = self.stdout_or_error(output)?;

        let spaced = format!("{document} ({category})");
        let tight = format!("{document}({category})");
        Ok(text
            .lines()
            .filter(|line| line.contains(&spaced) || line.contains(&tight))
            .map(|line| format!("{line}\n"))
            .collect())
    }
}
