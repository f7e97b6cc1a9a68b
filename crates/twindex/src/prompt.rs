//! Simulation prompt assembly.
//!
//! [`PromptBuilder`] assembles labelled sections (`LABEL:` followed by its
//! body) separated by blank lines. [`build_prompt`] uses it to turn a
//! validated [`FormInputs`] into the fixed seven-section simulation prompt.

use crate::error::SimulationError;
use crate::form::FormInputs;
use crate::sections::SectionKey;

/// Builder for labelled multi-section prompts.
///
/// Sections are joined with double newlines. Sections with an empty body are
/// silently skipped.
///
/// # Example
///
/// ```
/// use twindex::prompt::PromptBuilder;
///
/// let prompt = PromptBuilder::new()
///     .section("CONTEXT", "Today is Monday.")
///     .section_lines("STEPS", ["1. Read", "2. Answer"])
///     .section("EMPTY", "")
///     .build();
///
/// assert_eq!(
///     prompt.as_str(),
///     "CONTEXT:\nToday is Monday.\n\nSTEPS:\n1. Read\n2. Answer"
/// );
/// ```
#[derive(Debug, Default)]
pub struct PromptBuilder {
    sections: Vec<String>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a labelled section. Skipped if `body` is empty.
    pub fn section(mut self, label: &str, body: impl Into<String>) -> Self {
        let body = body.into();
        if !body.is_empty() {
            self.sections.push(format!("{label}:\n{body}"));
        }
        self
    }

    /// Append a labelled section whose body is one line per item.
    pub fn section_lines<I, S>(self, label: &str, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let body = lines
            .into_iter()
            .map(|l| l.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        self.section(label, body)
    }

    /// Join all sections with blank lines and trim the result.
    pub fn build(self) -> Prompt {
        Prompt(self.sections.join("\n\n").trim().to_string())
    }
}

/// A finished prompt. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Prompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

const TASKS: [&str; 5] = [
    "1. Simulate the future health risk trajectory for each scenario",
    "2. Estimate relative change in Type 2 Diabetes risk as a percentage",
    "3. Identify key lifestyle factors driving risk",
    "4. Provide preventive, lifestyle-based suggestions",
    "5. Explain reasoning using clear cause → effect logic",
];

/// Validate `inputs` and build the simulation prompt.
///
/// Fails with [`SimulationError::Validation`] naming the first empty
/// required field; nothing is built in that case.
pub fn build_prompt(inputs: &FormInputs) -> Result<Prompt, SimulationError> {
    inputs.validate()?;

    let prompt = PromptBuilder::new()
        .section_lines(
            "PATIENT_PROFILE",
            [
                format!("Name: {}", inputs.name),
                format!("Age: {}", inputs.age),
                format!("Gender: {}", inputs.gender),
                format!("BMI: {}", inputs.bmi_display()),
                format!("Family_History: {}", inputs.family_history),
            ],
        )
        .section_lines(
            "BASELINE_LAB_DATA",
            [
                format!("Fasting_Glucose: {} mg/dL", inputs.fasting_glucose),
                format!("HbA1c: {}%", inputs.hba1c),
            ],
        )
        .section_lines(
            "CURRENT_LIFESTYLE",
            [
                format!("Sleep: {} hours/night", inputs.sleep),
                format!("Daily_Steps: {}", inputs.daily_steps),
                format!("Sugar_Intake: {}", inputs.sugar_intake),
                format!("Stress_Level: {}", inputs.stress_level),
            ],
        )
        .section_lines(
            "SCENARIOS_TO_SIMULATE",
            [
                "A) Current lifestyle continues unchanged".to_string(),
                format!(
                    "B) Sleep increased to {} hours, sugar intake reduced to {}, daily steps increased to {}",
                    inputs.target_sleep, inputs.target_sugar_intake, inputs.target_steps
                ),
            ],
        )
        .section("SIMULATION_TIMEFRAME", format!("{} months", inputs.duration))
        .section_lines("TASKS", TASKS)
        .section_lines(
            "OUTPUT_FORMAT",
            SectionKey::ALL
                .iter()
                .map(|k| format!("- {} {}", k.format_label(), k.format_hint())),
        )
        .build();

    Ok(prompt)
}
