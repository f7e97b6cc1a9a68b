//! Convenience re-exports for common `twindex` types.
//!
//! ```ignore
//! use twindex::prelude::*;
//! ```

pub use crate::api::{BackendFuture, ClientConfig, SimulationBackend, SimulationClient};
pub use crate::error::SimulationError;
pub use crate::form::{FormField, FormInputs, calculate_bmi};
pub use crate::prompt::{Prompt, PromptBuilder, build_prompt};
pub use crate::render::format_markdown;
pub use crate::report::{RenderedSection, SimulationReport};
pub use crate::sections::{NO_DATA, ParsedSections, SectionKey, parse_output};
pub use crate::submit::submit;
