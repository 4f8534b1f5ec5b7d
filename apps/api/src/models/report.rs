use serde::{Deserialize, Serialize};

/// Final analysis returned to clients. Every field is always populated,
/// whether or not the completion service contributed to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub overall_score: u32,
    pub ats_score: u32,
    pub job_match_score: u32,
    pub strengths: Vec<Strength>,
    pub improvements: Vec<Improvement>,
    pub ats_analysis: AtsAnalysis,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strength {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    pub title: String,
    pub description: String,
    pub priority: String,
    pub impact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsAnalysis {
    pub formatting: String,
    pub keywords: String,
    pub sections: String,
    pub readability: String,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub suggestion: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serializes_camel_case_fields() {
        let report = AnalysisReport {
            overall_score: 70,
            ats_score: 60,
            job_match_score: 60,
            strengths: vec![],
            improvements: vec![],
            ats_analysis: AtsAnalysis {
                formatting: "Good".to_string(),
                keywords: "Good".to_string(),
                sections: "Good".to_string(),
                readability: "Good".to_string(),
                recommendations: vec![],
            },
            recommendations: vec![],
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["overallScore"], 70);
        assert_eq!(value["atsScore"], 60);
        assert_eq!(value["jobMatchScore"], 60);
        assert!(value["atsAnalysis"]["recommendations"].is_array());
        assert!(value.get("overall_score").is_none());
    }
}
