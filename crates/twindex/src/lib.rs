//! Health trajectory simulator.
//!
//! `twindex` turns a patient form (profile, labs, current lifestyle and a
//! target lifestyle) into a structured prompt, sends it to a simulation
//! backend over HTTP, and renders the model's loosely formatted answer into
//! five fixed HTML sections: risk comparison, key risk drivers, estimated
//! risk change, cause and effect, and a plain-language summary.
//!
//! # Getting started
//!
//! ```ignore
//! use twindex::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), String> {
//!     let inputs = FormInputs::from_path("patient.toml")?;
//!     let client = SimulationClient::new(ClientConfig::from_env())?;
//!
//!     let report = submit(&client, &inputs).await.map_err(|e| e.to_string())?;
//!     println!("{}", report.to_text());
//!     Ok(())
//! }
//! ```
//!
//! # Where to find things
//!
//! - **Collect and check patient data:** [`FormInputs`](form::FormInputs) holds
//!   every field as entered. [`FormInputs::validate`](form::FormInputs::validate)
//!   reports the first empty field and BMI is derived with
//!   [`calculate_bmi`](form::calculate_bmi).
//!
//! - **Build the prompt:** [`build_prompt`](prompt::build_prompt) produces the
//!   fixed seven-section prompt. [`PromptBuilder`](prompt::PromptBuilder) is
//!   the general `LABEL:` section builder underneath it.
//!
//! - **Talk to the backend:** [`SimulationClient`](api::SimulationClient) posts
//!   the prompt using a [`ClientConfig`](api::ClientConfig). Implement
//!   [`SimulationBackend`](api::SimulationBackend) to plug in anything else.
//!
//! - **Make sense of the answer:** [`parse_output`](sections::parse_output)
//!   splits the raw text into [`SectionKey`](sections::SectionKey) sections and
//!   [`format_markdown`](render::format_markdown) renders each one as escaped
//!   HTML. [`SimulationReport`](report::SimulationReport) bundles the result.
//!
//! - **Run the whole flow:** [`submit`](submit::submit).
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`form`] | Form fields, validation, BMI, form files |
//! | [`prompt`] | Prompt builder and the simulation prompt |
//! | [`api`] | Backend trait, client configuration, HTTP client |
//! | [`sections`] | Section headings and the line-scanning extractor |
//! | [`render`] | Markdown-lite to HTML |
//! | [`report`] | Rendered sections and the HTML report document |
//! | [`submit`] | End-to-end submission |
//! | [`error`] | [`SimulationError`](error::SimulationError) |

pub mod api;
pub mod error;
pub mod form;
pub mod prelude;
pub mod prompt;
pub mod render;
pub mod report;
pub mod sections;
pub mod submit;

pub use error::SimulationError;
pub use form::{FormField, FormInputs};
pub use report::SimulationReport;
pub use submit::submit;
