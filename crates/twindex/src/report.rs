//! Rendered simulation results.
//!
//! A [`SimulationReport`] holds one HTML fragment per [`SectionKey`], in
//! display order, next to the untouched raw response. It can be printed as
//! text or written out as a standalone HTML document.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::render::{escape_html, format_markdown};
use crate::sections::{SectionKey, parse_output};

/// One section, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSection {
    pub key: SectionKey,
    pub title: &'static str,
    /// HTML fragment. The placeholder paragraph when the section is missing.
    pub html: String,
    /// Whether the response contained a non-empty body for this section.
    pub present: bool,
}

/// Everything produced by one successful simulation.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub sections: Vec<RenderedSection>,
    pub raw: String,
    pub generated_at: DateTime<Utc>,
}

impl SimulationReport {
    /// Extract and render every section of `raw`.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = parse_output(&raw);
        debug!("Extracted {}/{} sections", parsed.found(), SectionKey::ALL.len());

        let sections = parsed
            .iter()
            .map(|(key, body)| RenderedSection {
                key,
                title: key.title(),
                html: format_markdown(body),
                present: parsed.is_present(key),
            })
            .collect();

        Self {
            sections,
            raw,
            generated_at: Utc::now(),
        }
    }

    pub fn section(&self, key: SectionKey) -> Option<&RenderedSection> {
        self.sections.iter().find(|s| s.key == key)
    }

    /// Keys with no usable body in the response.
    pub fn missing(&self) -> Vec<SectionKey> {
        self.sections
            .iter()
            .filter(|s| !s.present)
            .map(|s| s.key)
            .collect()
    }

    /// Plain listing of each section title followed by its fragment.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            let _ = write!(out, "## {}\n{}\n\n", section.title, section.html);
        }
        out
    }

    /// Standalone HTML document with every section and the raw response.
    pub fn to_html_document(&self) -> String {
        let mut out = String::from(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Health Trajectory Simulation</title>\n</head>\n<body>\n\
             <h1>Health Trajectory Simulation</h1>\n",
        );
        for section in &self.sections {
            let _ = writeln!(
                out,
                "<section id=\"{}\"><h2>{}</h2>{}</section>",
                section.key.slug(),
                escape_html(section.title),
                section.html
            );
        }
        let _ = writeln!(
            out,
            "<section id=\"full-response\"><h2>Full response</h2><pre>{}</pre></section>",
            escape_html(&self.raw)
        );
        let _ = writeln!(
            out,
            "<footer>Generated {}</footer>",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        out.push_str("</body>\n</html>\n");
        out
    }

    /// Write [`to_html_document`](Self::to_html_document) to `path`.
    pub fn write_html(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let path = path.as_ref();
        std::fs::write(path, self.to_html_document())
            .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
        info!("Report written to {}", path.display());
        Ok(())
    }
}
