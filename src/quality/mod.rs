//! Content quality validation.
//!
//! Flags what lowers semantic certainty for answer engines: overlong
//! paragraphs, rhetorical questions, vague and hyperbolic wording, and a lack
//! of citations. Every check is plain data in, issues out.

pub mod scoring;
pub mod terms;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::html::{char_len, char_window, paragraphs, strip_tags};
use crate::patterns::{has_list, CONCLUSION_MARKER_RE, DEFINITION_MARKER_RE};
use terms::{TermLists, TermMatcher};

pub const MAX_PARAGRAPH_CHARS: usize = 300;
const LOCATION_CHARS: usize = 50;

static ZH_QUESTION_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"[^。！？]*吗？",
        r"[^。！？]*呢？",
        r"难道[^？]*？",
        r"怎么[^？]*？",
        r"为什么[^？]*？",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static EN_QUESTION_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(?-u:\b)(?:why|how|what|when|where|who)\s+[^.!?]*\?",
        r"(?i)(?-u:\b)(?:isn't|aren't|wasn't|weren't|don't|doesn't|didn't)\s+[^.!?]*\?",
        r"(?i)(?-u:\b)(?:can|could|would|should|will)\s+[^.!?]*\?",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static QA_MARKER_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"(?i)<(?:section|div)[^>]*class="[^"]*qa[^"]*"[^>]*>"#,
        r"(?i)<h[1-6][^>]*>.*?(?:Q&A|Q&amp;A|问答|常见问题|FAQ).*?</h[1-6]>",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static CITATION_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"(?i)<a[^>]*href="https?://[^"]*"[^>]*(?:target="_blank"|rel="[^"]*noopener)[^>]*>"#,
        r#"(?i)<(?:section|div)[^>]*class="[^"]*(?:references|citations|bibliography)[^"]*"[^>]*>"#,
        r"(?i)<h[1-6][^>]*>.*?(?:References|Citations|Bibliography|参考文献|引用|来源).*?</h[1-6]>",
        r"\[\d+\]",
        r"\(\d{4}\)",
        r"<sup[^>]*>\d+</sup>",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static DEFAULT_VALIDATOR: LazyLock<ContentValidator> = LazyLock::new(ContentValidator::new);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    ParagraphLength,
    RhetoricalQuestion,
    VagueTerm,
    Hyperbole,
    MissingCitations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityIssue {
    pub severity: Severity,
    #[serde(rename = "type")]
    pub kind: IssueType,
    pub message: String,
    pub location: String,
}

impl QualityIssue {
    fn warning(kind: IssueType, message: String, location: String) -> Self {
        QualityIssue {
            severity: Severity::Warning,
            kind,
            message,
            location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub has_definitions: bool,
    pub has_conclusions: bool,
    pub has_proper_lists: bool,
    pub paragraph_length_ok: bool,
    pub avoids_vague_terms: bool,
    pub avoids_hyperbole: bool,
    pub has_author_info: bool,
    #[serde(rename = "hasAISummary")]
    pub has_ai_summary: bool,
    #[serde(rename = "hasQACoverage")]
    pub has_qa_coverage: bool,
    pub has_citations: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentQualityReport {
    pub article_id: String,
    pub overall_score: i32,
    pub metrics: QualityMetrics,
    pub issues: Vec<QualityIssue>,
    pub recommendations: Vec<String>,
}

impl ContentQualityReport {
    pub fn issues_of(&self, kind: IssueType) -> impl Iterator<Item = &QualityIssue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }
}

#[derive(Debug, Clone)]
pub struct ContentValidator {
    vague: Vec<TermMatcher>,
    hyperbole: Vec<TermMatcher>,
}

impl Default for ContentValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentValidator {
    pub fn new() -> Self {
        Self::with_terms(TermLists::default())
    }

    pub fn with_terms(lists: TermLists) -> Self {
        ContentValidator {
            vague: terms::compile(lists.vague_zh, lists.vague_en),
            hyperbole: terms::compile(lists.hyperbole_zh, lists.hyperbole_en),
        }
    }

    pub fn validate(
        &self,
        article_id: &str,
        content: &str,
        has_ai_summary: bool,
        has_qa_coverage: bool,
        has_citations: bool,
    ) -> ContentQualityReport {
        let paragraph_issues = self.check_paragraph_length(content);
        let rhetorical_issues = self.check_rhetorical_questions(content);
        let vague_issues = self.check_vague_terms(content);
        let hyperbole_issues = self.check_hyperbole(content);
        let citation_issues = if has_citations {
            Vec::new()
        } else {
            self.check_citations(content)
        };

        let metrics = QualityMetrics {
            has_definitions: DEFINITION_MARKER_RE.is_match(content),
            has_conclusions: CONCLUSION_MARKER_RE.is_match(content),
            has_proper_lists: has_list(content),
            paragraph_length_ok: paragraph_issues.is_empty(),
            avoids_vague_terms: vague_issues.is_empty(),
            avoids_hyperbole: hyperbole_issues.is_empty(),
            // author data lives outside the body and is checked by the caller
            has_author_info: true,
            has_ai_summary,
            has_qa_coverage,
            has_citations: has_citations || self.has_citations(content),
        };

        let issues: Vec<QualityIssue> = paragraph_issues
            .into_iter()
            .chain(rhetorical_issues)
            .chain(vague_issues)
            .chain(hyperbole_issues)
            .chain(citation_issues)
            .collect();

        let overall_score = scoring::overall_score(&metrics, &issues);
        let recommendations = scoring::recommendations(&metrics, &issues);

        debug!(
            article_id,
            score = overall_score,
            issues = issues.len(),
            "validated content"
        );

        ContentQualityReport {
            article_id: article_id.to_string(),
            overall_score,
            metrics,
            issues,
            recommendations,
        }
    }

    pub fn check_paragraph_length(&self, content: &str) -> Vec<QualityIssue> {
        paragraphs(content)
            .into_iter()
            .enumerate()
            .filter_map(|(i, (_, inner))| {
                let len = char_len(&strip_tags(inner));
                (len > MAX_PARAGRAPH_CHARS).then(|| {
                    QualityIssue::warning(
                        IssueType::ParagraphLength,
                        format!(
                            "Paragraph {} exceeds {} characters ({} characters). Consider breaking it into smaller, more digestible chunks.",
                            i + 1,
                            MAX_PARAGRAPH_CHARS,
                            len
                        ),
                        format!("Paragraph {}", i + 1),
                    )
                })
            })
            .collect()
    }

    /// Questions used as rhetoric rather than as Q&A. Content that carries a
    /// Q&A section marker is exempt as a whole.
    pub fn check_rhetorical_questions(&self, content: &str) -> Vec<QualityIssue> {
        if is_qa_content(content) {
            return Vec::new();
        }

        let text = strip_tags(content);
        ZH_QUESTION_RES
            .iter()
            .chain(EN_QUESTION_RES.iter())
            .flat_map(|re| re.find_iter(&text))
            .map(|m| {
                QualityIssue::warning(
                    IssueType::RhetoricalQuestion,
                    format!(
                        "Rhetorical question detected: \"{}\". Consider using a declarative statement instead for better semantic certainty.",
                        m.as_str().trim()
                    ),
                    location(&text, m.start()),
                )
            })
            .collect()
    }

    pub fn check_vague_terms(&self, content: &str) -> Vec<QualityIssue> {
        term_issues(&self.vague, content, IssueType::VagueTerm, |term| {
            format!(
                "Vague term detected: \"{}\". Use more definitive language to improve semantic certainty.",
                term
            )
        })
    }

    pub fn check_hyperbole(&self, content: &str) -> Vec<QualityIssue> {
        term_issues(&self.hyperbole, content, IssueType::Hyperbole, |term| {
            format!(
                "Hyperbolic term detected: \"{}\". Use more measured, factual language to improve verifiability.",
                term
            )
        })
    }

    pub fn check_citations(&self, content: &str) -> Vec<QualityIssue> {
        if self.has_citations(content) {
            return Vec::new();
        }
        vec![QualityIssue::warning(
            IssueType::MissingCitations,
            "No citations or references found. Technical articles should include citations to improve verifiability and credibility.".to_string(),
            "Article content".to_string(),
        )]
    }

    pub fn has_citations(&self, content: &str) -> bool {
        CITATION_RES.iter().any(|re| re.is_match(content))
    }
}

/// One-off validation with the built-in term lists.
pub fn validate_content(
    article_id: &str,
    content: &str,
    has_ai_summary: bool,
    has_qa_coverage: bool,
    has_citations: bool,
) -> ContentQualityReport {
    DEFAULT_VALIDATOR.validate(article_id, content, has_ai_summary, has_qa_coverage, has_citations)
}

pub fn is_qa_content(content: &str) -> bool {
    QA_MARKER_RES.iter().any(|re| re.is_match(content))
}

fn term_issues<F>(
    matchers: &[TermMatcher],
    content: &str,
    kind: IssueType,
    message: F,
) -> Vec<QualityIssue>
where
    F: Fn(&str) -> String,
{
    let text = strip_tags(content);
    matchers
        .iter()
        .flat_map(|m| m.pattern.find_iter(&text).map(move |hit| (m.term, hit.start())))
        .map(|(term, at)| QualityIssue::warning(kind, message(term), location(&text, at)))
        .collect()
}

fn location(text: &str, at: usize) -> String {
    format!("...{}...", char_window(text, at, LOCATION_CHARS, LOCATION_CHARS))
}
