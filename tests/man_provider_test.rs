//! Tests for ManProvider against a scripted command runner

use std::collections::HashMap;
use std::fs;
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use manview::config::{ListingStrategy, ManSettings};
use manview::domain::ListingEntry;
use manview::infrastructure::man::ManProvider;
use manview::infrastructure::traits::{
    CommandRunner, DocumentProvider, RealFileSystem, RenderOptions,
};
use manview::infrastructure::InfraError;

#[ctor::ctor]
fn init() {
    manview::util::testing::init_test_setup();
}

/// One recorded invocation: program, arguments, extra environment.
type Invocation = (String, Vec<String>, HashMap<String, String>);

/// Runner replying with a fixed output and recording every call.
struct ScriptedRunner {
    stdout: String,
    stderr: String,
    code: i32,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    fn ok(stdout: &str) -> Self {
        Self::exiting(0, stdout, "")
    }

    fn exiting(code: i32, stdout: &str, stderr: &str) -> Self {
        Self {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            code,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn last_call(&self) -> Invocation {
        self.calls.lock().unwrap().last().cloned().expect("one call")
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, cmd: &str, args: &[&str], envs: &[(&str, &str)]) -> io::Result<Output> {
        self.calls.lock().unwrap().push((
            cmd.to_string(),
            args.iter().map(|a| a.to_string()).collect(),
            envs.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ));
        Ok(Output {
            // wait status: exit code lives in the high byte
            status: ExitStatus::from_raw(self.code << 8),
            stdout: self.stdout.clone().into_bytes(),
            stderr: self.stderr.clone().into_bytes(),
        })
    }
}

struct MissingProgram;

impl CommandRunner for MissingProgram {
    fn run(&self, _cmd: &str, _args: &[&str], _envs: &[(&str, &str)]) -> io::Result<Output> {
        Err(io::Error::new(io::ErrorKind::NotFound, "No such file"))
    }
}

fn provider(runner: Arc<dyn CommandRunner>, listing: ListingStrategy) -> ManProvider {
    ManProvider::new(
        runner,
        Arc::new(RealFileSystem),
        ManSettings {
            command: "man".to_string(),
            listing,
        },
    )
}

// ============================================================
// Listing
// ============================================================

#[test]
fn given_apropos_output_when_list_then_parses_entries_with_manpath() {
    // Arrange
    let runner = Arc::new(ScriptedRunner::ok(
        "ls (1)               - list directory contents\n\
         getpwent, setpwent (3) - get password file entry\n\
         reboot (8)           - reboot the machine\n",
    ));
    let man = provider(runner.clone(), ListingStrategy::Apropos);

    // Act
    let entries = man.list(Path::new("/opt/man")).unwrap();

    // Assert
    assert_eq!(
        entries,
        Some(vec![
            ListingEntry::new("ls", "1"),
            ListingEntry::new("getpwent", "3"),
            ListingEntry::new("reboot", "8"),
        ])
    );
    let (cmd, args, envs) = runner.last_call();
    assert_eq!(cmd, "man");
    assert_eq!(args, vec!["-k", "."]);
    assert_eq!(envs.get("MANPATH").map(String::as_str), Some("/opt/man"));
}

#[test]
fn given_apropos_finds_nothing_when_list_then_none() {
    let runner = Arc::new(ScriptedRunner::exiting(16, "", ".: nothing appropriate.\n"));
    let man = provider(runner, ListingStrategy::Apropos);

    assert_eq!(man.list(Path::new("/nonexistent")).unwrap(), None);
}

#[test]
fn given_missing_man_program_when_list_then_io_error() {
    let man = provider(Arc::new(MissingProgram), ListingStrategy::Apropos);

    let err = man.list(Path::new("/opt/man")).unwrap_err();

    assert!(matches!(err, InfraError::Io { .. }));
}

#[test]
fn given_man_directories_when_scan_list_then_finds_pages_by_file_name() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let man1 = temp.path().join("man1");
    let man8 = temp.path().join("man8");
    fs::create_dir_all(&man1).unwrap();
    fs::create_dir_all(&man8).unwrap();
    fs::write(man1.join("ls.1.gz"), "").unwrap();
    fs::write(man1.join("cat.1"), "").unwrap();
    fs::write(man8.join("reboot.8"), "").unwrap();
    fs::write(temp.path().join("index.db"), "").unwrap();
    fs::create_dir_all(temp.path().join("cat1")).unwrap();
    fs::write(temp.path().join("cat1").join("ls.1"), "").unwrap();

    let runner = Arc::new(ScriptedRunner::ok(""));
    let man = provider(runner.clone(), ListingStrategy::Scan);

    // Act
    let entries = man.list(temp.path()).unwrap().expect("pages found");

    // Assert - sorted walk, cat1/ is not a man directory
    assert_eq!(
        entries,
        vec![
            ListingEntry::new("cat", "1"),
            ListingEntry::new("ls", "1"),
            ListingEntry::new("reboot", "8"),
        ]
    );
    assert!(runner.calls.lock().unwrap().is_empty());
}

#[test]
fn given_missing_directory_when_scan_list_then_none() {
    let temp = TempDir::new().unwrap();
    let man = provider(Arc::new(ScriptedRunner::ok("")), ListingStrategy::Scan);

    assert_eq!(man.list(&temp.path().join("absent")).unwrap(), None);
    assert_eq!(man.list(temp.path()).unwrap(), None);
}

// ============================================================
// Rendering
// ============================================================

#[test]
fn given_overstruck_output_when_render_plain_then_strips_formatting() {
    // Arrange
    let runner = Arc::new(ScriptedRunner::ok(
        "N\x08NA\x08AM\x08ME\x08E\n       _\x08l_\x08s - list\n",
    ));
    let man = provider(runner.clone(), ListingStrategy::Apropos);

    // Act
    let text = man
        .render(Path::new("/opt/man"), "ls", "1", &RenderOptions::plain(72))
        .unwrap();

    // Assert
    assert_eq!(text, "NAME\n       ls - list\n");
    let (_, args, envs) = runner.last_call();
    assert_eq!(args, vec!["-P", "cat", "1", "ls"]);
    assert_eq!(envs.get("MANWIDTH").map(String::as_str), Some("72"));
    assert_eq!(envs.get("COLUMNS").map(String::as_str), Some("72"));
    assert!(!envs.contains_key("MAN_KEEP_FORMATTING"));
}

#[test]
fn given_overstruck_output_when_render_html_then_full_page_with_styling() {
    // Arrange
    let runner = Arc::new(ScriptedRunner::ok("N\x08NA\x08AM\x08ME\x08E\n  a < b\n"));
    let man = provider(runner.clone(), ListingStrategy::Apropos);

    // Act
    let html = man
        .render(Path::new("/opt/man"), "ls", "1", &RenderOptions::default())
        .unwrap();

    // Assert
    assert!(html.contains("<html"));
    assert!(html.contains("<title>ls(1)</title>"));
    assert!(html.contains("<b>NAME</b>"));
    assert!(html.contains("a &lt; b"));
    let (_, _, envs) = runner.last_call();
    assert_eq!(
        envs.get("MAN_KEEP_FORMATTING").map(String::as_str),
        Some("1")
    );
}

#[test]
fn given_unknown_page_when_render_then_command_error() {
    let runner = Arc::new(ScriptedRunner::exiting(
        16,
        "",
        "No manual entry for nope in section 1\n",
    ));
    let man = provider(runner, ListingStrategy::Apropos);

    let err = man
        .render(Path::new("/opt/man"), "nope", "1", &RenderOptions::plain(80))
        .unwrap_err();

    match err {
        InfraError::Command {
            message, exit_code, ..
        } => {
            assert_eq!(message, "No manual entry for nope in section 1");
            assert_eq!(exit_code, Some(16));
        }
        other => panic!("expected command error, got {other:?}"),
    }
}

// ============================================================
// Summaries
// ============================================================

#[test]
fn given_whatis_lines_when_summarize_then_keeps_matching_category_only() {
    // Arrange
    let runner = Arc::new(ScriptedRunner::ok(
        "printf (1)           - format and print data\n\
         printf (3)           - formatted output conversion\n",
    ));
    let man = provider(runner.clone(), ListingStrategy::Apropos);

    // Act
    let summary = man
        .summarize(Path::new("/opt/man"), "printf", "3")
        .unwrap();

    // Assert
    assert_eq!(summary, "printf (3)           - formatted output conversion\n");
    let (_, args, _) = runner.last_call();
    assert_eq!(args, vec!["-f", "printf"]);
}

#[test]
fn given_no_matching_category_when_summarize_then_empty() {
    let runner = Arc::new(ScriptedRunner::ok("printf (1)  - format and print data\n"));
    let man = provider(runner, ListingStrategy::Apropos);

    let summary = man
        .summarize(Path::new("/opt/man"), "printf", "3p")
        .unwrap();

    assert_eq!(summary, "");
}
