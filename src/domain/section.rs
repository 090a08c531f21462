//! Section extraction from formatted manual text.
//!
//! Rendered reference pages put headings at column 0 and indent the body:
//!
//! ```text
//! SYNOPSIS
//!     foo [-x]
//!
//! DESCRIPTION
//!     Does the thing.
//! ```
//!
//! A section therefore runs from its heading up to the next unindented,
//! non-blank line. This is a layout heuristic, not a markup parser: a heading
//! word appearing unindented inside another section's body ends the scan early.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    Inside,
}

/// Extracts the section headed `name`, heading line included.
///
/// Every emitted line is terminated by `\n`. Returns an empty string when no
/// unindented line equals `name`.
pub fn extract_section(text: &str, name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return String::new();
    }

    let mut state = ScanState::Outside;
    let mut section = String::new();

    for line in text.lines() {
        match state {
            ScanState::Outside => {
                if is_heading(line, name) {
                    state = ScanState::Inside;
                    push_line(&mut section, line);
                }
            }
            ScanState::Inside => {
                if is_body(line) {
                    push_line(&mut section, line);
                } else {
                    break;
                }
            }
        }
    }

    section
}

/// Unindented, non-blank lines, i.e. every heading in document order.
pub fn headings(text: &str) -> Vec<&str> {
    text.lines()
        .filter(|line| !is_body(line))
        .map(str::trim_end)
        .collect()
}

fn is_heading(line: &str, name: &str) -> bool {
    !starts_indented(line) && line.trim_end() == name
}

fn is_body(line: &str) -> bool {
    line.trim().is_empty() || starts_indented(line)
}

fn starts_indented(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

fn push_line(section: &mut String, line: &str) {
    section.push_str(line);
    section.push('\n');
}
