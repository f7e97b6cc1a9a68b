//! HTTP client for the simulate endpoint.
//!
//! Wire contract: `POST {"prompt": string}` with a JSON body. A 2xx reply
//! carries `{"result": string}`; anything else may carry `{"detail": ...}`.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::config::ClientConfig;
use super::{BackendFuture, SimulationBackend};
use crate::error::{GENERIC_BACKEND_ERROR, SimulationError};
use crate::prompt::Prompt;

#[derive(Debug, Serialize)]
struct SimulateRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct SimulateResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Async client for the simulate endpoint.
pub struct SimulationClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl SimulationClient {
    /// Build a client from `config`. Fails only if the TLS backend cannot be
    /// initialised.
    pub fn new(config: ClientConfig) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Post `prompt` and return the raw `result` text.
    pub async fn post_prompt(&self, prompt: &str) -> Result<String, SimulationError> {
        debug!(
            "Simulation request: endpoint={}, prompt={} bytes",
            self.config.endpoint,
            prompt.len()
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(&self.config.endpoint)
            .json(&SimulateRequest { prompt })
            .send()
            .await
            .map_err(|e| SimulationError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| SimulationError::Network(format!("failed to read response: {e}")))?;

        debug!(
            "Simulation response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );
        trace!("Simulation response body: {}", text);

        if !status.is_success() {
            let err = error_from_body(status.as_u16(), &text);
            warn!("Simulation backend returned HTTP {}: {}", status, err);
            return Err(err);
        }

        result_from_body(&text)
    }
}

impl SimulationBackend for SimulationClient {
    fn simulate<'a>(&'a self, prompt: &'a Prompt) -> BackendFuture<'a> {
        Box::pin(self.post_prompt(prompt.as_str()))
    }
}

/// Map a non-success reply to [`SimulationError::Backend`].
///
/// The message is the body's `detail` string when there is one. Other JSON
/// detail values are kept as compact JSON text. A missing, null or empty
/// detail, or a body that is not JSON at all, yields [`GENERIC_BACKEND_ERROR`].
fn error_from_body(status: u16, text: &str) -> SimulationError {
    let detail = serde_json::from_str::<ErrorBody>(text)
        .ok()
        .and_then(|body| body.detail)
        .and_then(|detail| match detail {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| GENERIC_BACKEND_ERROR.to_string());
    SimulationError::Backend { status, detail }
}

/// Pull the non-empty `result` string out of a success reply.
fn result_from_body(text: &str) -> Result<String, SimulationError> {
    let parsed: SimulateResponse = serde_json::from_str(text)
        .map_err(|e| SimulationError::Format(format!("failed to parse response: {e}")))?;

    match parsed.result {
        Some(serde_json::Value::String(result)) if !result.is_empty() => Ok(result),
        _ => Err(SimulationError::Format("missing result field".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail_of(err: SimulationError) -> (u16, String) {
        match err {
            SimulationError::Backend { status, detail } => (status, detail),
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[test]
    fn request_serialises_as_prompt_object() {
        let json = serde_json::to_string(&SimulateRequest { prompt: "hi" }).unwrap();
        assert_eq!(json, r#"{"prompt":"hi"}"#);
    }

    #[test]
    fn error_uses_detail_string() {
        let (status, detail) = detail_of(error_from_body(400, r#"{"detail":"No prompt provided"}"#));
        assert_eq!(status, 400);
        assert_eq!(detail, "No prompt provided");
    }

    #[test]
    fn error_without_detail_is_generic() {
        for body in ["", "Internal Server Error", "{}", r#"{"detail":null}"#, r#"{"detail":""}"#] {
            let (_, detail) = detail_of(error_from_body(500, body));
            assert_eq!(detail, "Backend error", "body {body:?}");
        }
    }

    #[test]
    fn structured_detail_is_kept_as_json() {
        let body = r#"{"detail":[{"loc":["body","prompt"],"msg":"field required"}]}"#;
        let (status, detail) = detail_of(error_from_body(422, body));
        assert_eq!(status, 422);
        assert_eq!(detail, r#"[{"loc":["body","prompt"],"msg":"field required"}]"#);
    }

    #[test]
    fn result_is_returned_verbatim() {
        let text = result_from_body(r#"{"result":"Simple_Summary: ok\n"}"#).unwrap();
        assert_eq!(text, "Simple_Summary: ok\n");
    }

    #[test]
    fn missing_or_empty_result_is_format_error() {
        for body in ["{}", r#"{"result":""}"#, r#"{"result":null}"#, r#"{"result":42}"#] {
            let err = result_from_body(body).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Invalid response format: missing result field",
                "body {body:?}"
            );
        }
    }

    #[test]
    fn non_json_success_body_is_format_error() {
        let err = result_from_body("<html>oops</html>").unwrap_err();
        assert_eq!(err.kind(), "format");
        assert!(err.to_string().starts_with("Invalid response format: failed to parse response"));
    }

    #[test]
    fn client_keeps_its_config() {
        let config = ClientConfig::default().with_endpoint("http://127.0.0.1:1/simulate");
        let client = SimulationClient::new(config.clone()).unwrap();
        assert_eq!(client.config(), &config);
    }
}
