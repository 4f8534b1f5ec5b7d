//! Resume analysis pipeline.
//!
//! Flow: extract_signals → compute_heuristic_scores → build_analysis_prompt →
//!       CompletionService::complete → reconcile.
//!
//! The heuristic path always runs first, so a report can be produced no
//! matter how the completion call goes. Only provider rate limits are
//! surfaced to the caller; every other failure degrades to the static report.

use tracing::{info, warn};

use crate::analysis::prompts::build_analysis_prompt;
use crate::analysis::reconcile::reconcile;
use crate::analysis::scoring::compute_heuristic_scores;
use crate::analysis::signals::extract_signals;
use crate::diagnostics::DiagnosticSink;
use crate::errors::AppError;
use crate::llm_client::CompletionService;
use crate::models::report::AnalysisReport;

pub mod handlers;
pub mod prompts;
pub mod reconcile;
pub mod scoring;
pub mod signals;

/// Runs the full analysis for one resume.
pub async fn analyze_resume(
    resume_text: &str,
    job_description: &str,
    completion: &dyn CompletionService,
    diagnostics: &dyn DiagnosticSink,
) -> Result<AnalysisReport, AppError> {
    info!(
        "Processing resume with {} characters",
        resume_text.chars().count()
    );

    let signals = extract_signals(resume_text);
    let scores = compute_heuristic_scores(&signals);
    info!(
        "Heuristic scores: overall={} ats={} job_match={}",
        scores.overall_score, scores.ats_score, scores.job_match_score
    );

    let prompt = build_analysis_prompt(resume_text, job_description);
    let outcome = completion.complete(&prompt.prompt, prompt.max_tokens).await;

    if let Err(e) = &outcome {
        if e.is_rate_limited() {
            warn!("Completion provider rate limited the request: {e}");
            return Err(AppError::RateLimited);
        }
    }

    Ok(reconcile(outcome, &scores, diagnostics))
}
