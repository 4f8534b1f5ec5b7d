use std::sync::Arc;

use crate::config::Config;
use crate::diagnostics::DiagnosticSink;
use crate::llm_client::CompletionService;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data; every analysis is independent.
#[derive(Clone)]
pub struct AppState {
    /// Completion provider. Default: GroqClient. Tests swap in a stub.
    pub completion: Arc<dyn CompletionService>,
    /// Sink for the pipeline's failure diagnostics. Default: TracingSink.
    pub diagnostics: Arc<dyn DiagnosticSink>,
    pub config: Config,
}
