use std::collections::HashSet;

use super::{IssueType, QualityIssue, QualityMetrics, Severity};

/// 100 minus fixed deductions for missing features and per-issue penalties,
/// clamped to 0–100.
pub fn overall_score(metrics: &QualityMetrics, issues: &[QualityIssue]) -> i32 {
    let mut score: i32 = 100;

    if !metrics.has_definitions {
        score -= 10;
    }
    if !metrics.has_conclusions {
        score -= 5;
    }
    if !metrics.has_proper_lists {
        score -= 5;
    }
    if !metrics.has_ai_summary {
        score -= 15;
    }
    if !metrics.has_qa_coverage {
        score -= 10;
    }

    let errors = issues.iter().filter(|i| i.severity == Severity::Error).count() as i32;
    let warnings = issues.iter().filter(|i| i.severity == Severity::Warning).count() as i32;
    score -= errors * 5;
    score -= warnings * 2;

    score.clamp(0, 100)
}

pub fn recommendations(metrics: &QualityMetrics, issues: &[QualityIssue]) -> Vec<String> {
    let mut out = Vec::new();
    let mut add = |s: &str| out.push(s.to_string());

    if !metrics.has_definitions {
        add("Add clear definition sentences using patterns like \"X 是指...\" or \"X is defined as...\"");
    }
    if !metrics.has_conclusions {
        add("Add explicit conclusion markers like \"因此\" or \"therefore\" to make conclusions clear");
    }
    if !metrics.has_proper_lists {
        add("Use <ul> or <ol> tags for lists instead of plain text enumeration");
    }
    if !metrics.paragraph_length_ok {
        add("Break long paragraphs (>300 characters) into smaller, more digestible chunks");
    }
    if !metrics.avoids_vague_terms {
        add("Replace vague terms (可能, 也许, maybe, perhaps) with more definitive language");
    }
    if !metrics.avoids_hyperbole {
        add("Replace hyperbolic terms (颠覆, 革命性, revolutionary) with measured, factual language");
    }
    if !metrics.has_citations {
        add("Add citations and references to external sources to improve verifiability and credibility");
    }
    if !metrics.has_ai_summary {
        add("Add an AI Summary section with whatIs, whyImportant, useCases, and keyTakeaways");
    }
    if !metrics.has_qa_coverage {
        add("Add Q&A coverage addressing common questions (definition, comparison, application, limitation)");
    }

    let kinds: HashSet<IssueType> = issues.iter().map(|i| i.kind).collect();
    if kinds.contains(&IssueType::RhetoricalQuestion) {
        add("Convert rhetorical questions to declarative statements for better semantic certainty");
    }
    if kinds.contains(&IssueType::MissingCitations) {
        add("Include external links, references section, or citation markers to support technical claims");
    }

    out
}
