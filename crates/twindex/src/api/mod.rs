//! Backend interaction layer: the simulation endpoint, its configuration, and
//! the seam the submission flow is driven through.
//!
//! - [`config`]: [`ClientConfig`] with endpoint, timeout and user agent,
//!   overridable from the environment.
//! - [`client`]: [`SimulationClient`], the reqwest implementation that posts
//!   `{"prompt": ...}` and maps the reply into a raw response or a
//!   [`SimulationError`].
//!
//! [`SimulationBackend`] abstracts the one network call so tests can run the
//! whole flow against in-memory fakes.

pub mod client;
pub mod config;

use std::future::Future;
use std::pin::Pin;

use crate::error::SimulationError;
use crate::prompt::Prompt;

pub use client::SimulationClient;
pub use config::ClientConfig;

/// Boxed future returned by [`SimulationBackend::simulate`].
pub type BackendFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, SimulationError>> + Send + 'a>>;

/// Something that turns a prompt into the model's raw response text.
pub trait SimulationBackend: Send + Sync {
    /// Run one simulation. Resolves to the non-empty raw response.
    fn simulate<'a>(&'a self, prompt: &'a Prompt) -> BackendFuture<'a>;
}
