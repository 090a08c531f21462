//! Conversion of terminal overstrike output into plain text or HTML
//!
//! Formatters like grotty mark bold as `X\bX` and underline as `_\bX`.

use std::sync::OnceLock;

use regex::Regex;

const BACKSPACE: char = '\u{8}';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Style {
    bold: bool,
    underline: bool,
}

fn sgr_regex() -> &'static Regex {
    static SGR: OnceLock<Regex> = OnceLock::new();
    SGR.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").expect("valid SGR regex"))
}

/// Remove ANSI escape sequences.
fn strip_sgr(text: &str) -> std::borrow::Cow<'_, str> {
    sgr_regex().replace_all(text, "")
}

/// Resolve overstrike sequences into styled characters.
fn cells(text: &str) -> Vec<(char, Style)> {
    let chars: Vec<char> = strip_sgr(text).chars().collect();
    let mut cells = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        let mut ch = chars[i];
        let mut style = Style::default();
        i += 1;
        if ch == BACKSPACE {
            continue;
        }

        while i + 1 < chars.len() && chars[i] == BACKSPACE {
            let over = chars[i + 1];
            if over == ch {
                style.bold = true;
            } else if ch == '_' {
                ch = over;
                style.underline = true;
            } else if over == '_' {
                style.underline = true;
            } else {
                ch = over;
            }
            i += 2;
        }
        cells.push((ch, style));
    }
    cells
}

/// Plain text with all styling removed.
pub fn strip(text: &str) -> String {
    cells(text).into_iter().map(|(ch, _)| ch).collect()
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// HTML fragment with `<b>` and `<u>` runs for styled text.
pub fn to_html_fragment(text: &str) -> String {
    let mut html = String::new();
    let mut run = String::new();
    let mut current = Style::default();

    for (ch, style) in cells(text) {
        if style != current {
            flush_run(&mut html, &run, current);
            run.clear();
            current = style;
        }
        run.push(ch);
    }
    flush_run(&mut html, &run, current);
    html
}

fn flush_run(html: &mut String, run: &str, style: Style) {
    if run.is_empty() {
        return;
    }
    let escaped = escape_html(run);
    match (style.bold, style.underline) {
        (false, false) => html.push_str(&escaped),
        (true, false) => html.push_str(&format!("<b>{escaped}</b>")),
        (false, true) => html.push_str(&format!("<u>{escaped}</u>")),
        (true, true) => html.push_str(&format!("<b><u>{escaped}</u></b>")),
    }
}

/// Complete HTML page showing `text` preformatted.
pub fn to_html_page(text: &str, title: &str, dark: bool) -> String {
    let colors = if dark {
        "color:#ffffff;background-color:#000000"
    } else {
        "color:#000000;background-color:#ffffff"
    };
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body style=\"{}\">\n<pre>\n{}</pre>\n</body>\n</html>\n",
        escape_html(title),
        colors,
        to_html_fragment(text)
    )
}
