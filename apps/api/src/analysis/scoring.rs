use crate::analysis::signals::ResumeSignals;

const BASELINE_SCORE: u32 = 60;

/// The three headline scores. Heuristic sums are left unclamped; bounding to
/// 0–100 happens when the final report is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSet {
    pub overall_score: u32,
    pub ats_score: u32,
    pub job_match_score: u32,
}

/// Baseline scores from extracted signals alone. Deterministic, no LLM call.
///
/// Every bonus is evaluated against the original signals:
/// - education mentions "Engineering" → overall +10
/// - skills mention "Python" → overall +5
/// - skills mention "SQL" → overall +5
/// - contact has an email ("@") → ats +10
/// - projects text longer than 10 chars → overall +5
///
/// `job_match_score` stays at baseline; only the completion service moves it.
pub fn compute_heuristic_scores(signals: &ResumeSignals) -> ScoreSet {
    let mut overall_score = BASELINE_SCORE;
    let mut ats_score = BASELINE_SCORE;

    if signals.education.contains("Engineering") {
        overall_score += 10;
    }
    if signals.skills.contains("Python") {
        overall_score += 5;
    }
    if signals.skills.contains("SQL") {
        overall_score += 5;
    }
    if signals.contact.contains('@') {
        ats_score += 10;
    }
    if signals.projects.chars().count() > 10 {
        overall_score += 5;
    }

    ScoreSet {
        overall_score,
        ats_score,
        job_match_score: BASELINE_SCORE,
    }
}
