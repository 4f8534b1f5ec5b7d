//! Prompt construction for the resume-analysis completion call.

use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, NOT_PROVIDED};

/// Resume text beyond this many characters is not sent to the model.
pub const MAX_RESUME_CHARS: usize = 1000;

/// Output token budget for the analysis flow.
pub const ANALYSIS_MAX_TOKENS: u32 = 600;

/// Analysis prompt template.
/// Replace: {json_only}, {resume_text}, {job_description}
const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an ATS and resume evaluator.
Analyze the following resume against the given job description.
{json_only}

Resume:
{resume_text}

Job Description:
{job_description}

Output format:

{
  "score": 0-100,
  "atsScore": 0-100,
  "jobMatchScore": 0-100,
  "strengths": ["Full sentence strength 1", "Full sentence strength 2"],
  "improvements": ["Full sentence improvement 1", "Full sentence improvement 2"],
  "atsAnalysis": {
    "formatting": "Brief analysis",
    "keywords": "Brief analysis",
    "sections": "Brief analysis",
    "readability": "Brief analysis",
    "recommendations": ["Rec 1", "Rec 2"]
  },
  "recommendations": [
    { "category": "Content", "suggestion": "..." },
    { "category": "Skills", "suggestion": "..." },
    { "category": "Format", "suggestion": "..." }
  ]
}"#;

/// A ready-to-send prompt plus its output token budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisPrompt {
    pub prompt: String,
    pub max_tokens: u32,
}

pub fn build_analysis_prompt(resume_text: &str, job_description: &str) -> AnalysisPrompt {
    let resume_excerpt: String = resume_text.chars().take(MAX_RESUME_CHARS).collect();
    let job_description = if job_description.is_empty() {
        NOT_PROVIDED
    } else {
        job_description
    };

    let prompt = ANALYSIS_PROMPT_TEMPLATE
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{resume_text}", &resume_excerpt)
        .replace("{job_description}", job_description);

    AnalysisPrompt {
        prompt,
        max_tokens: ANALYSIS_MAX_TOKENS,
    }
}
