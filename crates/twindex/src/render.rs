//! Markdown-lite to HTML conversion for extracted sections.
//!
//! The pipeline is strict and ordered. The input is HTML-escaped first; every
//! later stage works on escaped text and only introduces its own tags, so
//! generated markup is never re-escaped and markup in the input never survives.
//!
//! 1. escape `& < > " '`
//! 2. pipe tables
//! 3. `#`/`##`/`###` headings
//! 4. bold (`**x**`, `__x__`), then italic (`*x*`, `_x_`), between tags only
//! 5. list items, with the first run wrapped in `<ul>`
//! 6. blank-line separated blocks wrapped in `<p>` unless already markup
//!
//! This is a heuristic renderer for model output, not a markdown parser.
//! Overlapping spans are resolved by replacing all bold spans before any
//! italic span and can mis-nest on pathological input.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;

use crate::sections::NO_DATA;

static H4: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^### (.+)$").unwrap());
static H3: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^## (.+)$").unwrap());
static H2: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^# (.+)$").unwrap());

static BOLD_STAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static BOLD_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"__(.+?)__").unwrap());
static ITALIC_STAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").unwrap());
static ITALIC_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_(.+?)_").unwrap());

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[-•*][ \t]+(.+)$").unwrap());

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

/// Render one section's text as an HTML fragment.
///
/// Blank input renders the [`NO_DATA`] placeholder paragraph.
pub fn format_markdown(text: &str) -> String {
    if text.trim().is_empty() {
        return format!("<p>{NO_DATA}</p>");
    }

    let html = escape_html(&text.replace("\r\n", "\n"));
    let html = convert_tables(&html);
    let html = convert_headings(&html);
    let html = convert_emphasis(&html);
    let html = convert_lists(&html);
    wrap_paragraphs(&html)
}

fn is_table_line(line: &str) -> bool {
    let t = line.trim();
    t.len() >= 2 && t.starts_with('|') && t.ends_with('|')
}

fn split_cells(row: &str) -> Vec<&str> {
    let parts: Vec<&str> = row.trim().split('|').collect();
    match parts.as_slice() {
        [_, inner @ .., _] => inner.iter().map(|c| c.trim()).collect(),
        _ => Vec::new(),
    }
}

/// `|---|:---:|` style alignment rows carry no content.
fn is_alignment_row(cells: &[&str]) -> bool {
    !cells.is_empty()
        && cells
            .iter()
            .all(|c| c.contains('-') && c.chars().all(|ch| matches!(ch, '-' | ':')))
}

fn render_table(rows: &[&str]) -> String {
    let mut out = String::from("<table>");
    let mut header = true;
    for row in rows {
        let cells = split_cells(row);
        if is_alignment_row(&cells) {
            continue;
        }
        let tag = if header { "th" } else { "td" };
        header = false;
        out.push_str("<tr>");
        for cell in cells {
            let _ = write!(out, "<{tag}>{cell}</{tag}>");
        }
        out.push_str("</tr>");
    }
    out.push_str("</table>");
    out
}

/// Replace each contiguous run of `|…|` lines with a single-line table.
fn convert_tables(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;
    while i < lines.len() {
        if is_table_line(lines[i]) {
            let start = i;
            while i < lines.len() && is_table_line(lines[i]) {
                i += 1;
            }
            out.push(render_table(&lines[start..i]));
        } else {
            out.push(lines[i].to_string());
            i += 1;
        }
    }
    out.join("\n")
}

fn convert_headings(text: &str) -> String {
    let html = H4.replace_all(text, "<h4>${1}</h4>");
    let html = H3.replace_all(&html, "<h3>${1}</h3>");
    H2.replace_all(&html, "<h2>${1}</h2>").into_owned()
}

/// Apply emphasis to the text between generated tags only, so spans never
/// cross a table cell or heading boundary.
fn convert_emphasis(text: &str) -> String {
    let mut segments = TAG.split(text);
    let mut out = emphasize(segments.next().unwrap_or_default());
    for (tag, segment) in TAG.find_iter(text).zip(segments) {
        out.push_str(tag.as_str());
        out.push_str(&emphasize(segment));
    }
    out
}

fn emphasize(text: &str) -> String {
    let html = BOLD_STAR.replace_all(text, "<strong>${1}</strong>");
    let html = BOLD_UNDERSCORE.replace_all(&html, "<strong>${1}</strong>");
    let html = ITALIC_STAR.replace_all(&html, "<em>${1}</em>");
    ITALIC_UNDERSCORE
        .replace_all(&html, "<em>${1}</em>")
        .into_owned()
}

fn is_list_line(line: &str) -> bool {
    line.starts_with("<li>") && line.ends_with("</li>")
}

/// Turn bullet lines into `<li>` items and wrap the first contiguous run of
/// items in `<ul>`. Later runs stay as bare items.
fn convert_lists(text: &str) -> String {
    let html = LIST_ITEM.replace_all(text, "<li>${1}</li>");
    let mut lines: Vec<String> = html.split('\n').map(str::to_string).collect();

    if let Some(start) = lines.iter().position(|l| is_list_line(l)) {
        let end = lines[start..]
            .iter()
            .position(|l| !is_list_line(l))
            .map_or(lines.len(), |n| start + n);
        lines[start].insert_str(0, "<ul>");
        lines[end - 1].push_str("</ul>");
    }
    lines.join("\n")
}

fn is_block_markup(block: &str) -> bool {
    ["<h", "<table", "<ul", "<li"]
        .iter()
        .any(|tag| block.contains(tag))
}

fn wrap_paragraphs(text: &str) -> String {
    text.split("\n\n")
        .map(|block| {
            if is_block_markup(block) {
                block.to_string()
            } else {
                let trimmed = block.trim();
                if trimmed.is_empty() {
                    String::new()
                } else {
                    format!("<p>{trimmed}</p>")
                }
            }
        })
        .collect()
}
