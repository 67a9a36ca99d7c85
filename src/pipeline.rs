//! Whole-article analysis and the batch check report.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::article::{Article, Locale};
use crate::config::Settings;
use crate::error::Result;
use crate::knowledge::{parse_knowledge_blocks, KnowledgeBlock};
use crate::qa::{ArticleInput, QaGenerator, QuestionCoverageMatrix};
use crate::quality::{validate_content, ContentQualityReport};
use crate::schema::{generate_enhanced_schema, validate_enhanced_schema, EnhancedBlogPosting, SchemaOptions, SchemaValidation};
use crate::terminology::{ConflictReport, TerminologyManager};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleAnalysis {
    pub id: String,
    pub locale: Locale,
    pub title: String,
    pub quality: ContentQualityReport,
    pub knowledge_blocks: Vec<KnowledgeBlock>,
    pub qa: QuestionCoverageMatrix,
    pub terminology_issues: Vec<ConflictReport>,
    pub schema: EnhancedBlogPosting,
    pub schema_validation: SchemaValidation,
}

impl ArticleAnalysis {
    pub fn passed(&self, min_score: i32) -> bool {
        self.quality.overall_score >= min_score && self.terminology_issues.is_empty()
    }
}

/// Runs every analyzer over one article.
///
/// Editor-supplied Q&A pairs feed the schema when present; otherwise the
/// generated ones do. Quality flags for summary, Q&A and citations come
/// from the article metadata.
pub fn analyze_article(article: &Article, terms: Option<&TerminologyManager>, settings: &Settings) -> ArticleAnalysis {
    let editor_pairs = article.qa_pairs.as_deref().filter(|p| !p.is_empty());

    let quality = validate_content(
        &article.id,
        &article.content,
        article.ai_summary.is_some(),
        editor_pairs.is_some(),
        !article.citations.is_empty(),
    );

    let knowledge_blocks = parse_knowledge_blocks(&article.content);

    let qa = QaGenerator::new(settings.qa.clone()).generate_from_article(&ArticleInput::from(article));

    let terminology_issues: Vec<ConflictReport> = terms
        .filter(|_| !article.content.is_empty())
        .map(|t| {
            t.validate_terminology_consistency_for(&article.content, Some(article.locale))
                .into_iter()
                .map(|mut c| {
                    c.article_id = article.id.clone();
                    c
                })
                .collect()
        })
        .unwrap_or_default();

    let mut opts = SchemaOptions::from_article(article, &settings.site);
    opts.qa_pairs = editor_pairs.or(Some(qa.qa_pairs.as_slice()));
    let schema = generate_enhanced_schema(&opts);
    let schema_validation = validate_enhanced_schema(&schema);

    debug!(
        id = %article.id,
        score = quality.overall_score,
        blocks = knowledge_blocks.len(),
        qa_pairs = qa.qa_pairs.len(),
        conflicts = terminology_issues.len(),
        "analyzed article"
    );

    ArticleAnalysis {
        id: article.id.clone(),
        locale: article.locale,
        title: article.title.clone(),
        quality,
        knowledge_blocks,
        qa,
        terminology_issues,
        schema,
        schema_validation,
    }
}

/// [`analyze_article`] over a slice on the rayon pool, preserving order.
pub fn analyze_batch(articles: &[Article], terms: Option<&TerminologyManager>, settings: &Settings) -> Vec<ArticleAnalysis> {
    articles
        .par_iter()
        .map(|a| analyze_article(a, terms, settings))
        .collect()
}

/// Reads a JSON file holding one article or an array of them.
pub fn load_articles<P: AsRef<Path>>(path: P) -> Result<Vec<Article>> {
    let raw: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
    let articles: Vec<Article> = if raw.is_array() {
        serde_json::from_value(raw)?
    } else {
        vec![serde_json::from_value(raw)?]
    };
    Ok(articles)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSummary {
    pub total_articles: usize,
    pub articles_checked: usize,
    pub average_score: f64,
    pub pass_rate: f64,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleReport {
    pub id: String,
    pub locale: Locale,
    pub title: String,
    pub quality_report: ContentQualityReport,
    pub terminology_issues: Vec<ConflictReport>,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminologySummary {
    pub total_terms: usize,
    pub conflicts_found: usize,
    pub conflicts: Vec<ConflictReport>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub summary: CheckSummary,
    pub articles: Vec<ArticleReport>,
    pub terminology: TerminologySummary,
    pub recommendations: Vec<String>,
}

impl CheckReport {
    pub fn new(analyses: Vec<ArticleAnalysis>, terms: Option<&TerminologyManager>, min_score: i32) -> Self {
        let articles: Vec<ArticleReport> = analyses
            .into_iter()
            .map(|a| {
                let passed = a.passed(min_score);
                ArticleReport {
                    id: a.id,
                    locale: a.locale,
                    title: a.title,
                    quality_report: a.quality,
                    terminology_issues: a.terminology_issues,
                    passed,
                }
            })
            .collect();

        let total = articles.len();
        let (average_score, pass_rate) = if total == 0 {
            (0.0, 0.0)
        } else {
            let score_sum: i64 = articles.iter().map(|a| a.quality_report.overall_score as i64).sum();
            let passed = articles.iter().filter(|a| a.passed).count();
            (
                round1(score_sum as f64 / total as f64),
                round1(passed as f64 / total as f64 * 100.0),
            )
        };

        let conflicts: Vec<ConflictReport> = articles
            .iter()
            .flat_map(|a| a.terminology_issues.iter().cloned())
            .collect();

        let recommendations = global_recommendations(&articles, &conflicts);

        CheckReport {
            summary: CheckSummary {
                total_articles: total,
                articles_checked: total,
                average_score,
                pass_rate,
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            },
            articles,
            terminology: TerminologySummary {
                total_terms: terms.map_or(0, |t| t.entries().len()),
                conflicts_found: conflicts.len(),
                conflicts,
            },
            recommendations,
        }
    }

    pub fn passed_count(&self) -> usize {
        self.articles.iter().filter(|a| a.passed).count()
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn ids_where(articles: &[ArticleReport], pred: impl Fn(&ArticleReport) -> bool) -> Vec<&str> {
    articles
        .iter()
        .filter(|a| pred(a))
        .map(|a| a.id.as_str())
        .collect()
}

fn global_recommendations(articles: &[ArticleReport], conflicts: &[ConflictReport]) -> Vec<String> {
    let mut out = Vec::new();

    let listed = [
        ("Add AI Summary to", ids_where(articles, |a| !a.quality_report.metrics.has_ai_summary)),
        ("Add Q&A coverage to", ids_where(articles, |a| !a.quality_report.metrics.has_qa_coverage)),
        ("Add citations/references to", ids_where(articles, |a| !a.quality_report.metrics.has_citations)),
    ];
    for (action, ids) in listed {
        if !ids.is_empty() {
            out.push(format!("{} {} article(s): {}", action, ids.len(), ids.join(", ")));
        }
    }

    if !conflicts.is_empty() {
        let mut seen = BTreeSet::new();
        let terms: Vec<&str> = conflicts
            .iter()
            .map(|c| c.term.as_str())
            .filter(|t| seen.insert(*t))
            .collect();
        out.push(format!(
            "Fix terminology conflicts for {} term(s): {}",
            terms.len(),
            terms.join(", ")
        ));
    }

    let counted = [
        ("Break long paragraphs in", ids_where(articles, |a| !a.quality_report.metrics.paragraph_length_ok)),
        ("Remove vague terms from", ids_where(articles, |a| !a.quality_report.metrics.avoids_vague_terms)),
        ("Remove hyperbolic language from", ids_where(articles, |a| !a.quality_report.metrics.avoids_hyperbole)),
    ];
    for (action, ids) in counted {
        if !ids.is_empty() {
            out.push(format!("{} {} article(s)", action, ids.len()));
        }
    }

    out
}
