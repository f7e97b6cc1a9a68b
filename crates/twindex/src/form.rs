//! Form inputs: the sixteen user-entered fields, validation, and BMI.
//!
//! Values are kept as text, the way a form delivers them. Form files may
//! spell any field as a string or a number; a missing field deserializes as
//! an empty string so that [`FormInputs::validate`] reports it by label
//! instead of the parser rejecting the whole file.
//!
//! BMI has no field of its own. [`FormInputs::bmi`] derives it from the
//! current height and weight on every read, so it always reflects the latest
//! values and cannot be entered directly (a `bmi` key in a form file is an
//! unknown-field error).

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::SimulationError;

/// One of the required form fields, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Age,
    Gender,
    FamilyHistory,
    Height,
    Weight,
    FastingGlucose,
    HbA1c,
    Sleep,
    DailySteps,
    SugarIntake,
    StressLevel,
    TargetSleep,
    TargetSteps,
    TargetSugarIntake,
    Duration,
}

impl FormField {
    /// Every required field, in the order validation checks them.
    pub const REQUIRED: [FormField; 16] = [
        FormField::Name,
        FormField::Age,
        FormField::Gender,
        FormField::FamilyHistory,
        FormField::Height,
        FormField::Weight,
        FormField::FastingGlucose,
        FormField::HbA1c,
        FormField::Sleep,
        FormField::DailySteps,
        FormField::SugarIntake,
        FormField::StressLevel,
        FormField::TargetSleep,
        FormField::TargetSteps,
        FormField::TargetSugarIntake,
        FormField::Duration,
    ];

    /// Key used in form files.
    pub fn key(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Age => "age",
            FormField::Gender => "gender",
            FormField::FamilyHistory => "family_history",
            FormField::Height => "height",
            FormField::Weight => "weight",
            FormField::FastingGlucose => "fasting_glucose",
            FormField::HbA1c => "hba1c",
            FormField::Sleep => "sleep",
            FormField::DailySteps => "daily_steps",
            FormField::SugarIntake => "sugar_intake",
            FormField::StressLevel => "stress_level",
            FormField::TargetSleep => "target_sleep",
            FormField::TargetSteps => "target_steps",
            FormField::TargetSugarIntake => "target_sugar_intake",
            FormField::Duration => "duration",
        }
    }

    /// Human-readable label shown in validation messages.
    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Age => "Age",
            FormField::Gender => "Gender",
            FormField::FamilyHistory => "Family History",
            FormField::Height => "Height (cm)",
            FormField::Weight => "Weight (kg)",
            FormField::FastingGlucose => "Fasting Glucose (mg/dL)",
            FormField::HbA1c => "HbA1c (%)",
            FormField::Sleep => "Sleep (hours/night)",
            FormField::DailySteps => "Daily Steps",
            FormField::SugarIntake => "Sugar Intake",
            FormField::StressLevel => "Stress Level",
            FormField::TargetSleep => "Target Sleep (hours)",
            FormField::TargetSteps => "Target Daily Steps",
            FormField::TargetSugarIntake => "Target Sugar Intake",
            FormField::Duration => "Simulation Duration (months)",
        }
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A form value as it may appear in a file: text or a bare number.
#[derive(Deserialize, JsonSchema)]
#[serde(untagged)]
enum FieldValue {
    Text(String),
    Integer(i64),
    Number(f64),
}

impl FieldValue {
    fn into_text(self) -> String {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Number(n) => n.to_string(),
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    FieldValue::deserialize(deserializer).map(FieldValue::into_text)
}

/// Health-lifestyle form inputs.
///
/// Aliases accept the camelCase field ids used by the browser form
/// (`familyHistory`, `hbA1c`, ...), so exported form state loads as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct FormInputs {
    #[serde(deserialize_with = "lenient_string")]
    #[schemars(with = "FieldValue")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    #[schemars(with = "FieldValue")]
    pub age: String,
    #[serde(deserialize_with = "lenient_string")]
    #[schemars(with = "FieldValue")]
    pub gender: String,
    /// Height in centimetres.
    #[serde(deserialize_with = "lenient_string")]
    #[schemars(with = "FieldValue")]
    pub height: String,
    /// Weight in kilograms.
    #[serde(deserialize_with = "lenient_string")]
    #[schemars(with = "FieldValue")]
    pub weight: String,
    #[serde(alias = "familyHistory", deserialize_with = "lenient_string")]
    #[schemars(with = "FieldValue")]
    pub family_history: String,
    /// Fasting glucose in mg/dL.
    #[serde(alias = "fastingGlucose", deserialize_with = "lenient_string")]
    #[schemars(with = "FieldValue")]
    pub fasting_glucose: String,
    /// HbA1c in percent.
    #[serde(alias = "hbA1c", deserialize_with = "lenient_string")]
    #[schemars(with = "FieldValue")]
    pub hba1c: String,
    /// Hours per night.
    #[serde(deserialize_with = "lenient_string")]
    #[schemars(with = "FieldValue")]
    pub sleep: String,
    #[serde(alias = "dailySteps", deserialize_with = "lenient_string")]
    #[schemars(with = "FieldValue")]
    pub daily_steps: String,
    #[serde(alias = "sugarIntake", deserialize_with = "lenient_string")]
    #[schemars(with = "FieldValue")]
    pub sugar_intake: String,
    #[serde(alias = "stressLevel", deserialize_with = "lenient_string")]
    #[schemars(with = "FieldValue")]
    pub stress_level: String,
    #[serde(alias = "targetSleep", deserialize_with = "lenient_string")]
    #[schemars(with = "FieldValue")]
    pub target_sleep: String,
    #[serde(alias = "targetSteps", deserialize_with = "lenient_string")]
    #[schemars(with = "FieldValue")]
    pub target_steps: String,
    #[serde(alias = "targetSugarIntake", deserialize_with = "lenient_string")]
    #[schemars(with = "FieldValue")]
    pub target_sugar_intake: String,
    /// Simulation timeframe in months.
    #[serde(deserialize_with = "lenient_string")]
    #[schemars(with = "FieldValue")]
    pub duration: String,
}

impl FormInputs {
    /// Current value of a field.
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Age => &self.age,
            FormField::Gender => &self.gender,
            FormField::FamilyHistory => &self.family_history,
            FormField::Height => &self.height,
            FormField::Weight => &self.weight,
            FormField::FastingGlucose => &self.fasting_glucose,
            FormField::HbA1c => &self.hba1c,
            FormField::Sleep => &self.sleep,
            FormField::DailySteps => &self.daily_steps,
            FormField::SugarIntake => &self.sugar_intake,
            FormField::StressLevel => &self.stress_level,
            FormField::TargetSleep => &self.target_sleep,
            FormField::TargetSteps => &self.target_steps,
            FormField::TargetSugarIntake => &self.target_sugar_intake,
            FormField::Duration => &self.duration,
        }
    }

    /// Replace a field's value.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Name => &mut self.name,
            FormField::Age => &mut self.age,
            FormField::Gender => &mut self.gender,
            FormField::FamilyHistory => &mut self.family_history,
            FormField::Height => &mut self.height,
            FormField::Weight => &mut self.weight,
            FormField::FastingGlucose => &mut self.fasting_glucose,
            FormField::HbA1c => &mut self.hba1c,
            FormField::Sleep => &mut self.sleep,
            FormField::DailySteps => &mut self.daily_steps,
            FormField::SugarIntake => &mut self.sugar_intake,
            FormField::StressLevel => &mut self.stress_level,
            FormField::TargetSleep => &mut self.target_sleep,
            FormField::TargetSteps => &mut self.target_steps,
            FormField::TargetSugarIntake => &mut self.target_sugar_intake,
            FormField::Duration => &mut self.duration,
        };
        *slot = value.into();
    }

    /// Check that every required field is non-blank.
    ///
    /// Reports the first missing field in [`FormField::REQUIRED`] order.
    pub fn validate(&self) -> Result<(), SimulationError> {
        match FormField::REQUIRED
            .into_iter()
            .find(|f| self.value(*f).trim().is_empty())
        {
            Some(field) => {
                debug!(field = field.key(), "form validation failed");
                Err(SimulationError::validation(field))
            }
            None => Ok(()),
        }
    }

    /// BMI derived from the current height and weight, rounded to one decimal.
    ///
    /// `None` unless both parse as numbers greater than zero.
    pub fn bmi(&self) -> Option<f64> {
        let height = self.height.trim().parse::<f64>().ok()?;
        let weight = self.weight.trim().parse::<f64>().ok()?;
        calculate_bmi(height, weight)
    }

    /// BMI formatted with one decimal, or an empty string when not derivable.
    pub fn bmi_display(&self) -> String {
        self.bmi().map(|b| format!("{b:.1}")).unwrap_or_default()
    }

    /// Load a form file. `.toml` files are parsed as TOML, everything else
    /// as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read form file '{}': {e}", path.display()))?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            toml::from_str(&content)
                .map_err(|e| format!("failed to parse form file '{}': {e}", path.display()))
        } else {
            serde_json::from_str(&content)
                .map_err(|e| format!("failed to parse form file '{}': {e}", path.display()))
        }
    }
}

/// BMI = weight_kg / (height_m)², rounded to one decimal.
///
/// Height is given in centimetres. Returns `None` when either value is not
/// strictly positive.
pub fn calculate_bmi(height_cm: f64, weight_kg: f64) -> Option<f64> {
    if !(height_cm > 0.0 && weight_kg > 0.0) {
        return None;
    }
    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    Some((bmi * 10.0).round() / 10.0)
}

/// JSON Schema describing the form-file format.
pub fn form_schema() -> serde_json::Value {
    let schema = schemars::schema_for!(FormInputs);
    serde_json::to_value(schema)
        .unwrap_or_else(|_| serde_json::json!({"type": "object", "properties": {}}))
}

#[cfg(test)]
pub(crate) fn sample_inputs() -> FormInputs {
    FormInputs {
        name: "Asha".into(),
        age: "45".into(),
        gender: "Female".into(),
        height: "180".into(),
        weight: "75".into(),
        family_history: "Type 2 Diabetes (mother)".into(),
        fasting_glucose: "108".into(),
        hba1c: "5.9".into(),
        sleep: "5.5".into(),
        daily_steps: "3200".into(),
        sugar_intake: "High".into(),
        stress_level: "Moderate".into(),
        target_sleep: "7.5".into(),
        target_steps: "8000".into(),
        target_sugar_intake: "Low".into(),
        duration: "12".into(),
    }
}
