//! The submission flow: validate, build the prompt, call the backend, render.

use tracing::{debug, info, warn};

use crate::api::SimulationBackend;
use crate::error::SimulationError;
use crate::form::FormInputs;
use crate::prompt::build_prompt;
use crate::report::SimulationReport;

/// Run one simulation for `inputs` against `backend`.
///
/// Validation happens before anything else; a missing field fails without
/// touching the backend. Every failure leaves `inputs` untouched so the
/// caller can fix the form and submit again.
pub async fn submit<B>(
    backend: &B,
    inputs: &FormInputs,
) -> Result<SimulationReport, SimulationError>
where
    B: SimulationBackend + ?Sized,
{
    let prompt = build_prompt(inputs)?;
    debug!("Simulation prompt ({} bytes):\n{}", prompt.len(), prompt);

    let raw = backend.simulate(&prompt).await.map_err(|e| {
        warn!(kind = e.kind(), "Simulation failed: {}", e);
        e
    })?;

    let report = SimulationReport::from_raw(raw);
    info!(
        "Simulation complete: {}/{} sections present",
        report.sections.len() - report.missing().len(),
        report.sections.len()
    );
    Ok(report)
}
