//! Section extraction from the backend's free-text answer.
//!
//! The backend is asked for five labelled sections (see
//! [`SectionKey::format_label`]) but its output is not guaranteed to follow
//! the requested headings, casing, order or punctuation. Extraction is a
//! line scanner with an explicit contract:
//!
//! 1. The first line containing the key's [`HeadingPattern`] is the heading
//!    line.
//! 2. Text after the first colon on the heading line opens the body; a
//!    heading line without a colon contributes nothing.
//! 3. The body runs over the following lines up to, not including, the first
//!    boundary line (see [`is_boundary`]) or the end of input.
//! 4. An empty body, or no heading line at all, is a missing section.
//!
//! Every key scans the whole text independently, so extraction is a pure
//! function of the input and the order in which keys are extracted never
//! changes a result.

use tracing::trace;

/// Placeholder shown for a section the answer does not contain.
pub const NO_DATA: &str = "No data available";

/// One of the five sections of a simulation answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKey {
    RiskComparison,
    RiskDrivers,
    RiskChange,
    CauseEffect,
    SimpleSummary,
}

impl SectionKey {
    /// All keys in display order.
    pub const ALL: [SectionKey; 5] = [
        SectionKey::RiskComparison,
        SectionKey::RiskDrivers,
        SectionKey::RiskChange,
        SectionKey::CauseEffect,
        SectionKey::SimpleSummary,
    ];

    fn index(self) -> usize {
        match self {
            SectionKey::RiskComparison => 0,
            SectionKey::RiskDrivers => 1,
            SectionKey::RiskChange => 2,
            SectionKey::CauseEffect => 3,
            SectionKey::SimpleSummary => 4,
        }
    }

    /// The heading pattern that locates this section.
    pub fn pattern(self) -> HeadingPattern {
        match self {
            SectionKey::RiskComparison => {
                HeadingPattern::AnyOf(&["risk_comparison_table", "risk comparison"])
            }
            SectionKey::RiskDrivers => {
                HeadingPattern::AnyOf(&["key_risk_drivers", "key risk drivers"])
            }
            SectionKey::RiskChange => {
                HeadingPattern::AnyOf(&["estimated_risk_change", "estimated risk change"])
            }
            SectionKey::CauseEffect => HeadingPattern::Ordered {
                first: "cause",
                then: "effect",
            },
            SectionKey::SimpleSummary => {
                HeadingPattern::AnyOf(&["simple_summary", "simple summary"])
            }
        }
    }

    /// Label requested in the prompt's OUTPUT_FORMAT block.
    pub fn format_label(self) -> &'static str {
        match self {
            SectionKey::RiskComparison => "Risk_Comparison_Table",
            SectionKey::RiskDrivers => "Key_Risk_Drivers",
            SectionKey::RiskChange => "Estimated_Risk_Change_Percentage",
            SectionKey::CauseEffect => "Cause_Effect_Explanation",
            SectionKey::SimpleSummary => "Simple_Summary",
        }
    }

    /// Instruction that follows the label in the OUTPUT_FORMAT block.
    pub fn format_hint(self) -> &'static str {
        match self {
            SectionKey::RiskComparison => {
                "(with scenarios, risk levels, HbA1c trend, glucose trend)"
            }
            SectionKey::RiskDrivers => "(bullet list of lifestyle factors)",
            SectionKey::RiskChange => "(e.g., \"-28% relative risk reduction\")",
            SectionKey::CauseEffect => {
                "(explain how sleep, sugar, activity, stress affect diabetes risk)"
            }
            SectionKey::SimpleSummary => {
                "(Explain like I am 12 - very simple language, friendly tone, no medical jargon)"
            }
        }
    }

    /// Title shown above the rendered section.
    pub fn title(self) -> &'static str {
        match self {
            SectionKey::RiskComparison => "Risk Comparison",
            SectionKey::RiskDrivers => "Key Risk Drivers",
            SectionKey::RiskChange => "Estimated Risk Change",
            SectionKey::CauseEffect => "Cause & Effect",
            SectionKey::SimpleSummary => "Simple Summary",
        }
    }

    /// Stable identifier, usable as an HTML id.
    pub fn slug(self) -> &'static str {
        match self {
            SectionKey::RiskComparison => "risk-comparison",
            SectionKey::RiskDrivers => "risk-drivers",
            SectionKey::RiskChange => "risk-change",
            SectionKey::CauseEffect => "cause-effect",
            SectionKey::SimpleSummary => "simple-summary",
        }
    }
}

/// Case-insensitive heading matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingPattern {
    /// Any of the given lowercase literals; the leftmost occurrence wins,
    /// earlier alternatives win ties.
    AnyOf(&'static [&'static str]),
    /// `first` followed anywhere later on the line by `then`. The match
    /// ends at the first occurrence of `then`.
    Ordered {
        first: &'static str,
        then: &'static str,
    },
}

impl HeadingPattern {
    /// Byte span `(start, end)` of the match within `line`, if any.
    pub fn find(&self, line: &str) -> Option<(usize, usize)> {
        // ASCII lowercasing keeps byte offsets aligned with `line`.
        let lower = line.to_ascii_lowercase();
        match *self {
            HeadingPattern::AnyOf(alternatives) => {
                let mut best: Option<(usize, usize)> = None;
                for alt in alternatives {
                    if let Some(start) = lower.find(alt)
                        && best.is_none_or(|(s, _)| start < s)
                    {
                        best = Some((start, start + alt.len()));
                    }
                }
                best
            }
            HeadingPattern::Ordered { first, then } => {
                let start = lower.find(first)?;
                let after = start + first.len();
                let tail = lower.get(after..)?;
                let offset = tail.find(then)?;
                Some((start, after + offset + then.len()))
            }
        }
    }

    /// Whether the line's leading token starts this heading.
    fn leads(&self, head: &str) -> bool {
        self.find(head).is_some_and(|(start, _)| start == 0)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn is_decoration(c: char) -> bool {
    c.is_whitespace() || matches!(c, '*' | '_' | '#')
}

/// Whether `line` ends the body of the section above it.
///
/// A boundary starts at column 0 and is one of:
/// - a label line, whose leading token starts with an uppercase letter or
///   `_` and is underscore-joined (`Key_Risk_Drivers`, `OUTPUT_FORMAT`) or an
///   all-uppercase word ending in a colon (`SUMMARY:`);
/// - a line led by any section heading (`## Simple Summary`);
/// - a horizontal rule (`---`, `___`, `***`).
///
/// Bullets, signed numbers, table rows and prose are never boundaries.
pub fn is_boundary(line: &str) -> bool {
    let Some(first) = line.chars().next() else {
        return false;
    };
    if first.is_whitespace() {
        return false;
    }

    let trimmed = line.trim_end();
    if trimmed.len() >= 3
        && let Some(rule) = trimmed.chars().next()
        && matches!(rule, '-' | '_' | '*')
        && trimmed.chars().all(|c| c == rule)
    {
        return true;
    }

    let head = line.trim_start_matches('#').trim_start();
    if head.starts_with("* ") || head.starts_with("*\t") {
        return false;
    }
    let head = head.trim_start_matches('*');

    if SectionKey::ALL.iter().any(|k| k.pattern().leads(head)) {
        return true;
    }

    let raw_token = head.split_whitespace().next().unwrap_or("");
    let token = raw_token.trim_end_matches(['*', ':']);
    let Some(lead) = token.chars().next() else {
        return false;
    };
    if !(lead.is_ascii_uppercase() || lead == '_') || !token.chars().all(is_word_char) {
        return false;
    }

    let underscore_label = token.contains('_') && token.chars().any(|c| c.is_alphanumeric());
    let shouted_label = raw_token.trim_end_matches('*').ends_with(':')
        && token.len() >= 2
        && token
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(|c| c.is_uppercase());
    underscore_label || shouted_label
}

/// Body text carried on the heading line itself: whatever follows the first
/// colon after the heading token. Without a colon the whole line is heading.
fn heading_remainder(line: &str, token_end: usize) -> &str {
    let (_, rest) = line.split_at(token_end);
    match rest.split_once(':') {
        Some((_, after)) if !after.chars().all(is_decoration) => after.trim(),
        _ => "",
    }
}

/// Extract one section's body, or `None` when it is absent or blank.
pub fn extract_section(text: &str, key: SectionKey) -> Option<String> {
    let pattern = key.pattern();
    let mut lines = text.lines();
    let (heading, token_end) = lines
        .by_ref()
        .find_map(|line| pattern.find(line).map(|(_, end)| (line, end)))?;

    let mut body = vec![heading_remainder(heading, token_end)];
    body.extend(lines.take_while(|line| !is_boundary(line)));

    let joined = body.join("\n");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        trace!(section = key.slug(), "heading found but body is empty");
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// The five sections of one answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSections {
    values: [Option<String>; 5],
}

impl ParsedSections {
    /// Section text, or [`NO_DATA`] when the section is missing.
    pub fn get(&self, key: SectionKey) -> &str {
        self.values[key.index()].as_deref().unwrap_or(NO_DATA)
    }

    pub fn is_present(&self, key: SectionKey) -> bool {
        self.values[key.index()].is_some()
    }

    /// Number of sections found.
    pub fn found(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionKey, &str)> {
        SectionKey::ALL.into_iter().map(|k| (k, self.get(k)))
    }

    fn insert(&mut self, key: SectionKey, value: Option<String>) {
        self.values[key.index()] = value;
    }
}

/// Split a raw answer into its five sections.
pub fn parse_output(raw: &str) -> ParsedSections {
    let mut sections = ParsedSections::default();
    for key in SectionKey::ALL {
        sections.insert(key, extract_section(raw, key));
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKDOWN_ANSWER: &str = "\
## Risk_Comparison_Table
| Scenario | Risk Level | HbA1c Trend | Glucose Trend |
|---|---|---|---|
| A | High | Rising | Rising |
| B | Moderate | Stable | Falling |

## Key_Risk_Drivers
- Short sleep (5.5 h)
- High sugar intake
- Low daily steps

## Estimated_Risk_Change_Percentage
-28% relative risk reduction

## Cause_Effect_Explanation
Better sleep improves insulin sensitivity.
**Less sugar** means fewer glucose spikes.

## Simple_Summary
If you sleep more and walk more, your body handles sugar better!
";

    #[test]
    fn markdown_answer_yields_all_five_sections() {
        let parsed = parse_output(MARKDOWN_ANSWER);
        assert_eq!(parsed.found(), 5);
        assert_eq!(
            parsed.get(SectionKey::RiskComparison),
            "| Scenario | Risk Level | HbA1c Trend | Glucose Trend |\n\
             |---|---|---|---|\n\
             | A | High | Rising | Rising |\n\
             | B | Moderate | Stable | Falling |"
        );
        assert_eq!(
            parsed.get(SectionKey::RiskDrivers),
            "- Short sleep (5.5 h)\n- High sugar intake\n- Low daily steps"
        );
        assert_eq!(
            parsed.get(SectionKey::RiskChange),
            "-28% relative risk reduction"
        );
        assert_eq!(
            parsed.get(SectionKey::CauseEffect),
            "Better sleep improves insulin sensitivity.\n**Less sugar** means fewer glucose spikes."
        );
        assert_eq!(
            parsed.get(SectionKey::SimpleSummary),
            "If you sleep more and walk more, your body handles sugar better!"
        );
    }

    #[test]
    fn inline_bodies_after_colon() {
        let raw = "\
Risk Comparison: Scenario B lowers risk.
KEY RISK DRIVERS:
• Poor sleep
Estimated_Risk_Change_Percentage: **-28%** relative risk reduction
Simple Summary: Walk more!";
        let parsed = parse_output(raw);
        assert_eq!(
            parsed.get(SectionKey::RiskComparison),
            "Scenario B lowers risk."
        );
        assert_eq!(parsed.get(SectionKey::RiskDrivers), "• Poor sleep");
        assert_eq!(
            parsed.get(SectionKey::RiskChange),
            "**-28%** relative risk reduction"
        );
        assert_eq!(parsed.get(SectionKey::SimpleSummary), "Walk more!");
        assert!(!parsed.is_present(SectionKey::CauseEffect));
    }

    #[test]
    fn inline_cause_effect_body_may_mention_effect() {
        let raw = "\
Cause_Effect_Explanation: Short sleep has a strong effect on insulin.

Simple_Summary: Sleep more.";
        assert_eq!(
            extract_section(raw, SectionKey::CauseEffect).as_deref(),
            Some("Short sleep has a strong effect on insulin.")
        );

        let raw = "Cause_Effect_Explanation: Sugar spikes glucose; the effect: insulin resistance.";
        assert_eq!(
            parse_output(raw).get(SectionKey::CauseEffect),
            "Sugar spikes glucose; the effect: insulin resistance."
        );
    }

    #[test]
    fn missing_section_is_placeholder_and_others_unaffected() {
        let raw = MARKDOWN_ANSWER.replace("## Key_Risk_Drivers", "## Drivers");
        let parsed = parse_output(&raw);
        assert_eq!(parsed.get(SectionKey::RiskDrivers), NO_DATA);
        assert!(!parsed.is_present(SectionKey::RiskDrivers));
        assert_eq!(
            parsed.get(SectionKey::RiskChange),
            "-28% relative risk reduction"
        );
        assert_eq!(parsed.found(), 4);
    }

    #[test]
    fn whitespace_only_body_is_missing() {
        let raw = "Simple_Summary:   \n   \n\t\nOUTPUT_FORMAT: done";
        assert_eq!(extract_section(raw, SectionKey::SimpleSummary), None);
        assert_eq!(parse_output(raw).get(SectionKey::SimpleSummary), NO_DATA);
    }

    #[test]
    fn decorated_heading_lines_leave_no_residue() {
        let raw = "**Simple_Summary:**\nEat more greens.";
        assert_eq!(
            extract_section(raw, SectionKey::SimpleSummary).as_deref(),
            Some("Eat more greens.")
        );
    }

    #[test]
    fn extraction_is_idempotent_and_order_independent() {
        let first = parse_output(MARKDOWN_ANSWER);
        let second = parse_output(MARKDOWN_ANSWER);
        assert_eq!(first, second);

        let mut reversed = SectionKey::ALL;
        reversed.reverse();
        for key in reversed {
            assert_eq!(
                extract_section(MARKDOWN_ANSWER, key).as_deref().unwrap_or(NO_DATA),
                first.get(key)
            );
        }
    }

    #[test]
    fn cause_effect_matches_anywhere_on_a_line() {
        for heading in [
            "### Cause → Effect Explanation",
            "CAUSE AND EFFECT:",
            "Cause_Effect_Explanation",
            "The cause-and-effect picture",
        ] {
            let raw = format!("{heading}\nSleep affects insulin.");
            assert_eq!(
                extract_section(&raw, SectionKey::CauseEffect).as_deref(),
                Some("Sleep affects insulin."),
                "heading {heading:?}"
            );
        }
        assert_eq!(
            extract_section("Effect before cause\nbody", SectionKey::CauseEffect),
            None
        );
    }

    #[test]
    fn first_heading_line_wins() {
        let raw = "Simple Summary: first\n\nSimple Summary: second";
        assert_eq!(
            extract_section(raw, SectionKey::SimpleSummary).as_deref(),
            Some("first")
        );
    }

    #[test]
    fn body_stops_at_first_boundary() {
        let raw = "\
Key_Risk_Drivers:
- Sugar
  Indented_Note stays in the body
---
- Not part of the section";
        assert_eq!(
            extract_section(raw, SectionKey::RiskDrivers).as_deref(),
            Some("- Sugar\n  Indented_Note stays in the body")
        );
    }

    #[test]
    fn boundary_classification() {
        assert!(is_boundary("Key_Risk_Drivers"));
        assert!(is_boundary("OUTPUT_FORMAT:"));
        assert!(is_boundary("SUMMARY:"));
        assert!(is_boundary("## Simple Summary"));
        assert!(is_boundary("**Key Risk Drivers**"));
        assert!(is_boundary("---"));
        assert!(is_boundary("***"));

        assert!(!is_boundary("- High sugar intake"));
        assert!(!is_boundary("* High sugar intake"));
        assert!(!is_boundary("-28% relative risk reduction"));
        assert!(!is_boundary("| A | High |"));
        assert!(!is_boundary("Better sleep improves insulin sensitivity."));
        assert!(!is_boundary("BMI is 23.1"));
        assert!(!is_boundary("  Key_Risk_Drivers"));
        assert!(!is_boundary(""));
    }

    #[test]
    fn heading_pattern_spans() {
        let p = SectionKey::RiskComparison.pattern();
        assert_eq!(p.find("## RISK COMPARISON table"), Some((3, 18)));
        assert_eq!(p.find("nothing here"), None);

        let ce = SectionKey::CauseEffect.pattern();
        assert_eq!(ce.find("Cause/Effect and effect"), Some((0, 12)));
    }

    #[test]
    fn every_requested_label_is_found_by_its_own_pattern() {
        for key in SectionKey::ALL {
            let line = format!("- {} {}", key.format_label(), key.format_hint());
            assert!(
                key.pattern().find(&line).is_some(),
                "{} not matched",
                key.format_label()
            );
        }
    }

    #[test]
    fn empty_input_has_no_sections() {
        let parsed = parse_output("");
        assert_eq!(parsed.found(), 0);
        assert!(parsed.iter().all(|(_, text)| text == NO_DATA));
    }
}
