//! Response reconciliation — merges the model's JSON with heuristic scores.
//!
//! Two terminal paths:
//! - AI available: the completion text is parsed leniently and every report
//!   field takes the model's value when it is present and well-typed, else
//!   the heuristic score or the static default.
//! - AI unavailable: the static report, carrying the heuristic scores.
//!
//! Defaults are shared between both paths, so unusable model output yields
//! exactly the report an unavailable service would. Nothing here can fail.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::analysis::scoring::ScoreSet;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::llm_client::LlmError;
use crate::models::report::{AnalysisReport, AtsAnalysis, Improvement, Recommendation, Strength};

const MAX_SCORE: u32 = 100;

/// Fixed priority/impact for improvements that arrive as bare titles.
const AI_IMPROVEMENT_PRIORITY: &str = "High";
const AI_IMPROVEMENT_IMPACT: &str = "Significant improvement expected";

#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("response JSON is not an object")]
    NotAnObject,
}

/// Parses completion text as a JSON object.
///
/// Tolerates markdown code fences and prose around the object: if the whole
/// text does not parse, the outermost `{ ... }` span is tried before giving up.
pub fn parse_ai_payload(text: &str) -> Result<Map<String, Value>, ParseFailure> {
    let text = strip_json_fences(text);

    let value = match serde_json::from_str::<Value>(text) {
        Ok(v) => v,
        Err(e) => match outermost_object(text) {
            Some(span) => serde_json::from_str::<Value>(span).map_err(|_| e)?,
            None => return Err(e.into()),
        },
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ParseFailure::NotAnObject),
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start()),
        None => text,
    }
}

fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

// ────────────────────────────────────────────────────────────────────────────
// Typed view of the model's output. `None` means absent or wrongly typed.
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq)]
struct AiAnalysis {
    score: Option<u32>,
    ats_score: Option<u32>,
    job_match_score: Option<u32>,
    strengths: Option<Vec<String>>,
    improvements: Option<Vec<String>>,
    ats_analysis: Option<AiAtsAnalysis>,
    recommendations: Option<Vec<Recommendation>>,
}

#[derive(Debug, Default, PartialEq)]
struct AiAtsAnalysis {
    formatting: Option<String>,
    keywords: Option<String>,
    sections: Option<String>,
    readability: Option<String>,
    recommendations: Option<Vec<String>>,
}

impl AiAnalysis {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            score: obj.get("score").and_then(score_value),
            ats_score: obj.get("atsScore").and_then(score_value),
            job_match_score: obj.get("jobMatchScore").and_then(score_value),
            strengths: obj.get("strengths").and_then(string_list),
            improvements: obj.get("improvements").and_then(string_list),
            ats_analysis: obj
                .get("atsAnalysis")
                .and_then(Value::as_object)
                .map(AiAtsAnalysis::from_object),
            recommendations: obj.get("recommendations").and_then(recommendation_list),
        }
    }
}

impl AiAtsAnalysis {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            formatting: obj.get("formatting").and_then(non_empty_string),
            keywords: obj.get("keywords").and_then(non_empty_string),
            sections: obj.get("sections").and_then(non_empty_string),
            readability: obj.get("readability").and_then(non_empty_string),
            recommendations: obj.get("recommendations").and_then(string_list),
        }
    }
}

/// Any JSON number, rounded and bounded to 0–100. Numeric strings are rejected.
fn score_value(value: &Value) -> Option<u32> {
    let n = value.as_f64().filter(|n| n.is_finite())?;
    Some(n.round().clamp(0.0, MAX_SCORE as f64) as u32)
}

fn non_empty_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// The string elements of an array. Non-string elements are skipped; an
/// array with nothing usable counts as absent.
fn string_list(value: &Value) -> Option<Vec<String>> {
    let items: Vec<String> = value
        .as_array()?
        .iter()
        .filter_map(non_empty_string)
        .collect();
    (!items.is_empty()).then_some(items)
}

fn recommendation_list(value: &Value) -> Option<Vec<Recommendation>> {
    let items: Vec<Recommendation> = value
        .as_array()?
        .iter()
        .filter_map(|item| {
            Some(Recommendation {
                category: item.get("category").and_then(non_empty_string)?,
                suggestion: item.get("suggestion").and_then(non_empty_string)?,
            })
        })
        .collect();
    (!items.is_empty()).then_some(items)
}

// ────────────────────────────────────────────────────────────────────────────
// Static defaults
// ────────────────────────────────────────────────────────────────────────────

fn default_strengths() -> Vec<Strength> {
    vec![
        Strength {
            title: "Strong Academic Performance".to_string(),
            description: "Excellent academic record showing consistent achievement.".to_string(),
        },
        Strength {
            title: "Complete Contact Information".to_string(),
            description: "Includes email, phone, and links to professional profiles.".to_string(),
        },
    ]
}

fn default_improvements() -> Vec<Improvement> {
    vec![
        Improvement {
            title: "Add a Professional Summary".to_string(),
            description: "2–3 line summary at the top highlighting skills and goals.".to_string(),
            priority: "High".to_string(),
            impact: "Helps recruiters quickly understand your profile".to_string(),
        },
        Improvement {
            title: "Expand Project Details".to_string(),
            description:
                "Include technologies, features, and outcomes in project descriptions.".to_string(),
            priority: "High".to_string(),
            impact: "Demonstrates practical technical experience".to_string(),
        },
    ]
}

fn default_ats_analysis() -> AtsAnalysis {
    AtsAnalysis {
        formatting: "Clean but limited analysis available".to_string(),
        keywords: "Needs improvement - add role-specific keywords".to_string(),
        sections: "Standard sections present".to_string(),
        readability: "Good".to_string(),
        recommendations: default_ats_recommendations(),
    }
}

fn default_ats_recommendations() -> Vec<String> {
    vec![
        "Add industry keywords (e.g., Software Development, Databases)".to_string(),
        "Include relevant coursework and certifications".to_string(),
    ]
}

fn default_recommendations() -> Vec<Recommendation> {
    [
        ("Content", "Add measurable achievements in projects and education"),
        ("Skills", "Expand with frameworks/tools used"),
        ("Format", "Maintain consistent formatting and section order"),
    ]
    .into_iter()
    .map(|(category, suggestion)| Recommendation {
        category: category.to_string(),
        suggestion: suggestion.to_string(),
    })
    .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Reconciliation
// ────────────────────────────────────────────────────────────────────────────

/// Builds the final report from the completion outcome and heuristic scores.
///
/// Callers that want to surface some failures (rate limits) must inspect the
/// error before handing it over; once here, every failure becomes the static
/// report.
pub fn reconcile(
    outcome: Result<String, LlmError>,
    heuristic: &ScoreSet,
    diagnostics: &dyn DiagnosticSink,
) -> AnalysisReport {
    match outcome {
        Ok(raw) => {
            let ai = match parse_ai_payload(&raw) {
                Ok(obj) => AiAnalysis::from_object(&obj),
                Err(failure) => {
                    diagnostics.record(Diagnostic::ContentParseFailure {
                        raw: &raw,
                        reason: &failure.to_string(),
                    });
                    AiAnalysis::default()
                }
            };
            merge(ai, heuristic)
        }
        Err(error) => {
            diagnostics.record(Diagnostic::AiUnavailable {
                reason: &error.to_string(),
            });
            fallback_report(heuristic)
        }
    }
}

/// The report served whenever the completion service is unavailable.
pub fn fallback_report(heuristic: &ScoreSet) -> AnalysisReport {
    merge(AiAnalysis::default(), heuristic)
}

fn merge(ai: AiAnalysis, heuristic: &ScoreSet) -> AnalysisReport {
    let strengths = match ai.strengths {
        Some(items) => items
            .into_iter()
            .map(|s| Strength {
                title: s.clone(),
                description: s,
            })
            .collect(),
        None => default_strengths(),
    };

    let improvements = match ai.improvements {
        Some(items) => items
            .into_iter()
            .map(|s| Improvement {
                title: s.clone(),
                description: s,
                priority: AI_IMPROVEMENT_PRIORITY.to_string(),
                impact: AI_IMPROVEMENT_IMPACT.to_string(),
            })
            .collect(),
        None => default_improvements(),
    };

    let ats_analysis = match ai.ats_analysis {
        Some(ats) => {
            let defaults = default_ats_analysis();
            AtsAnalysis {
                formatting: ats.formatting.unwrap_or(defaults.formatting),
                keywords: ats.keywords.unwrap_or(defaults.keywords),
                sections: ats.sections.unwrap_or(defaults.sections),
                readability: ats.readability.unwrap_or(defaults.readability),
                recommendations: ats.recommendations.unwrap_or(defaults.recommendations),
            }
        }
        None => default_ats_analysis(),
    };

    AnalysisReport {
        overall_score: ai.score.unwrap_or(heuristic.overall_score).min(MAX_SCORE),
        ats_score: ai.ats_score.unwrap_or(heuristic.ats_score).min(MAX_SCORE),
        job_match_score: ai
            .job_match_score
            .unwrap_or(heuristic.job_match_score)
            .min(MAX_SCORE),
        strengths,
        improvements,
        ats_analysis,
        recommendations: ai.recommendations.unwrap_or_else(default_recommendations),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::testing::RecordingSink;

    fn heuristic() -> ScoreSet {
        ScoreSet {
            overall_score: 85,
            ats_score: 70,
            job_match_score: 60,
        }
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_parse_recovers_object_from_surrounding_prose() {
        let obj = parse_ai_payload("Here is the analysis:\n{\"score\": 77}\nHope this helps!").unwrap();
        assert_eq!(obj["score"], 77);
    }

    #[test]
    fn test_parse_rejects_plain_prose() {
        assert!(matches!(
            parse_ai_payload("Sorry, I cannot comply."),
            Err(ParseFailure::InvalidJson(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_object_json() {
        assert!(matches!(
            parse_ai_payload("[1, 2, 3]"),
            Err(ParseFailure::NotAnObject)
        ));
    }

    #[test]
    fn test_parse_rejects_truncated_json() {
        assert!(parse_ai_payload("{\"score\": 90, \"strengths\": [\"Clear").is_err());
    }

    #[test]
    fn test_full_ai_payload_is_used() {
        let raw = r#"{
            "score": 88,
            "atsScore": 75,
            "jobMatchScore": 64,
            "strengths": ["Solid Rust experience", "Clear layout"],
            "improvements": ["Quantify impact"],
            "atsAnalysis": {
                "formatting": "Simple single column",
                "keywords": "Good coverage",
                "sections": "All standard sections",
                "readability": "High",
                "recommendations": ["Add a skills summary"]
            },
            "recommendations": [
                {"category": "Content", "suggestion": "Add metrics"}
            ]
        }"#;
        let sink = RecordingSink::default();

        let report = reconcile(Ok(raw.to_string()), &heuristic(), &sink);
        assert_eq!(report.overall_score, 88);
        assert_eq!(report.ats_score, 75);
        assert_eq!(report.job_match_score, 64);
        assert_eq!(
            report.strengths,
            vec![
                Strength {
                    title: "Solid Rust experience".to_string(),
                    description: "Solid Rust experience".to_string(),
                },
                Strength {
                    title: "Clear layout".to_string(),
                    description: "Clear layout".to_string(),
                },
            ]
        );
        assert_eq!(report.improvements.len(), 1);
        assert_eq!(report.improvements[0].title, "Quantify impact");
        assert_eq!(report.improvements[0].priority, "High");
        assert_eq!(
            report.improvements[0].impact,
            "Significant improvement expected"
        );
        assert_eq!(report.ats_analysis.formatting, "Simple single column");
        assert_eq!(
            report.ats_analysis.recommendations,
            vec!["Add a skills summary".to_string()]
        );
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].suggestion, "Add metrics");
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_partial_scores_fall_back_per_field() {
        let sink = RecordingSink::default();
        let report = reconcile(
            Ok(r#"{"score":90,"atsScore":80}"#.to_string()),
            &heuristic(),
            &sink,
        );

        assert_eq!(report.overall_score, 90);
        assert_eq!(report.ats_score, 80);
        assert_eq!(report.job_match_score, 60);
        assert_eq!(report.strengths, default_strengths());
        assert_eq!(report.improvements, default_improvements());
        assert_eq!(report.ats_analysis, default_ats_analysis());
        assert_eq!(report.recommendations, default_recommendations());
    }

    #[test]
    fn test_garbage_text_matches_unavailable_report() {
        let sink = RecordingSink::default();
        let report = reconcile(
            Ok("Sorry, I cannot comply.".to_string()),
            &heuristic(),
            &sink,
        );

        assert_eq!(report, fallback_report(&heuristic()));
        assert_eq!(sink.events(), vec!["content_parse_failure"]);
    }

    #[test]
    fn test_any_adapter_failure_yields_static_report() {
        for error in [
            LlmError::Configuration,
            LlmError::EmptyResponse,
            LlmError::Transport {
                status: 500,
                message: "boom".to_string(),
            },
        ] {
            let sink = RecordingSink::default();
            let report = reconcile(Err(error), &heuristic(), &sink);
            assert_eq!(report.overall_score, 85);
            assert_eq!(report.ats_score, 70);
            assert_eq!(report.job_match_score, 60);
            assert_eq!(report.strengths, default_strengths());
            assert_eq!(sink.events(), vec!["ai_unavailable"]);
        }
    }

    #[test]
    fn test_fallback_report_is_stable() {
        assert_eq!(fallback_report(&heuristic()), fallback_report(&heuristic()));
    }

    #[test]
    fn test_zero_score_from_ai_is_kept() {
        let sink = RecordingSink::default();
        let report = reconcile(Ok(r#"{"score":0}"#.to_string()), &heuristic(), &sink);
        assert_eq!(report.overall_score, 0);
    }

    #[test]
    fn test_wrongly_typed_scores_use_heuristics() {
        let sink = RecordingSink::default();
        let report = reconcile(
            Ok(r#"{"score":"95","atsScore":null,"jobMatchScore":true}"#.to_string()),
            &heuristic(),
            &sink,
        );
        assert_eq!(report.overall_score, 85);
        assert_eq!(report.ats_score, 70);
        assert_eq!(report.job_match_score, 60);
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        let sink = RecordingSink::default();
        let report = reconcile(
            Ok(r#"{"score":150,"atsScore":-5,"jobMatchScore":72.6}"#.to_string()),
            &heuristic(),
            &sink,
        );
        assert_eq!(report.overall_score, 100);
        assert_eq!(report.ats_score, 0);
        assert_eq!(report.job_match_score, 73);
    }

    #[test]
    fn test_non_string_list_elements_are_skipped() {
        let sink = RecordingSink::default();
        let report = reconcile(
            Ok(r#"{"strengths":["Good", 42, null, ""], "improvements": [1, 2]}"#.to_string()),
            &heuristic(),
            &sink,
        );
        assert_eq!(report.strengths.len(), 1);
        assert_eq!(report.strengths[0].title, "Good");
        assert_eq!(report.improvements, default_improvements());
    }

    #[test]
    fn test_partial_ats_analysis_fills_missing_subfields() {
        let sink = RecordingSink::default();
        let report = reconcile(
            Ok(r#"{"atsAnalysis":{"keywords":"Missing cloud terms","recommendations":"not a list"}}"#
                .to_string()),
            &heuristic(),
            &sink,
        );
        let defaults = default_ats_analysis();
        assert_eq!(report.ats_analysis.keywords, "Missing cloud terms");
        assert_eq!(report.ats_analysis.formatting, defaults.formatting);
        assert_eq!(report.ats_analysis.recommendations, defaults.recommendations);
    }

    #[test]
    fn test_malformed_recommendations_are_dropped() {
        let sink = RecordingSink::default();
        let report = reconcile(
            Ok(r#"{"recommendations":[{"category":"Skills"},"text",{"category":"Format","suggestion":"Use one font"}]}"#
                .to_string()),
            &heuristic(),
            &sink,
        );
        assert_eq!(
            report.recommendations,
            vec![Recommendation {
                category: "Format".to_string(),
                suggestion: "Use one font".to_string(),
            }]
        );
    }

    #[test]
    fn test_fenced_payload_is_accepted() {
        let sink = RecordingSink::default();
        let report = reconcile(
            Ok("```json\n{\"jobMatchScore\": 42}\n```".to_string()),
            &heuristic(),
            &sink,
        );
        assert_eq!(report.job_match_score, 42);
        assert!(sink.events().is_empty());
    }
}
