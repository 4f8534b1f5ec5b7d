//! Signal extraction — coarse structural fields pulled from raw resume text.
//!
//! Pure keyword/pattern heuristics. Never fails: missing fields come back as
//! empty strings, and `name` falls back to "Unknown".

/// Lines containing any of these mark education history.
const EDUCATION_MARKERS: &[&str] = &["Bachelor", "12th", "10th", "%", "Engineering"];

/// How many lines (header included) make up the skills block.
const SKILLS_WINDOW: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeSignals {
    pub name: String,
    pub contact: String,
    pub education: String,
    pub skills: String,
    pub projects: String,
}

/// Splits text into lines, dropping blank ones. Order is preserved and the
/// surviving lines are returned untrimmed.
pub fn normalize_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect()
}

pub fn extract_signals(text: &str) -> ResumeSignals {
    let lines = normalize_lines(text);

    let name = lines
        .first()
        .map(|l| l.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    let contact = lines
        .iter()
        .find(|l| l.contains('@') || l.contains('+'))
        .map(|l| l.to_string())
        .unwrap_or_default();

    let education = join_matching(&lines, |l| {
        EDUCATION_MARKERS.iter().any(|marker| l.contains(marker))
    });

    let skills = lines
        .iter()
        .position(|l| l.to_lowercase().contains("skill"))
        .map(|start| {
            let end = (start + SKILLS_WINDOW).min(lines.len());
            lines[start..end].join(" ")
        })
        .unwrap_or_default();

    let projects = join_matching(&lines, |l| {
        let lower = l.to_lowercase();
        lower.contains("project") || lower.contains("management")
    });

    ResumeSignals {
        name,
        contact,
        education,
        skills,
        projects,
    }
}

fn join_matching(lines: &[&str], predicate: impl Fn(&str) -> bool) -> String {
    lines
        .iter()
        .copied()
        .filter(|l| predicate(l))
        .collect::<Vec<_>>()
        .join(" ")
}
