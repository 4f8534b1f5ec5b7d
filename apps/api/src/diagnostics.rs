//! Diagnostic sink — the hook invoked at the pipeline's defined failure points.
//!
//! The default `TracingSink` forwards to `tracing`. Anything implementing
//! `DiagnosticSink` can be carried in `AppState` instead.

use tracing::{error, warn};

/// Failure points the analysis pipeline reports on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic<'a> {
    /// The provider call did not succeed. `status` is absent for network failures.
    TransportFailure { status: Option<u16>, detail: &'a str },
    /// The completion call failed for any reason; the static report is served.
    AiUnavailable { reason: &'a str },
    /// The completion succeeded but its content could not be read as JSON.
    ContentParseFailure { raw: &'a str, reason: &'a str },
}

pub trait DiagnosticSink: Send + Sync {
    fn record(&self, diagnostic: Diagnostic<'_>);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, diagnostic: Diagnostic<'_>) {
        match diagnostic {
            Diagnostic::TransportFailure { status, detail } => {
                error!(?status, "Groq API error: {detail}");
            }
            Diagnostic::AiUnavailable { reason } => {
                warn!("AI analysis failed, using fallback scores: {reason}");
            }
            Diagnostic::ContentParseFailure { raw, reason } => {
                warn!("Failed to parse AI JSON ({reason}): {raw}");
            }
        }
    }
}
