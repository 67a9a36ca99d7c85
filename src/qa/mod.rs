//! Question coverage matrix generation.
//!
//! Builds the Q&A pairs an answer engine is most likely to be asked about an
//! article: what it is, how it compares, where it applies and where it falls
//! short.

pub mod extract;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::article::{AiSummary, Article};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QaCategory {
    Definition,
    Comparison,
    Application,
    Limitation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaPair {
    pub question: String,
    pub answer: String,
    pub category: QaCategory,
    #[serde(default)]
    pub related_concepts: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    pub has_definition: bool,
    pub has_comparison: bool,
    pub has_application: bool,
    pub has_limitation: bool,
}

impl Coverage {
    pub fn of(pairs: &[QaPair]) -> Self {
        let has = |c: QaCategory| pairs.iter().any(|p| p.category == c);
        Coverage {
            has_definition: has(QaCategory::Definition),
            has_comparison: has(QaCategory::Comparison),
            has_application: has(QaCategory::Application),
            has_limitation: has(QaCategory::Limitation),
        }
    }

    pub fn any(&self) -> bool {
        self.has_definition || self.has_comparison || self.has_application || self.has_limitation
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionCoverageMatrix {
    pub article: String,
    pub qa_pairs: Vec<QaPair>,
    pub coverage: Coverage,
}

/// Which categories to generate and how many pairs to keep. Field names are
/// snake_case so they line up with `geo.toml` and `GEO_QA__*` variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QaConfig {
    pub max_qa_pairs: usize,
    pub include_definition: bool,
    pub include_comparison: bool,
    pub include_application: bool,
    pub include_limitation: bool,
}

impl Default for QaConfig {
    fn default() -> Self {
        QaConfig {
            max_qa_pairs: 10,
            include_definition: true,
            include_comparison: true,
            include_application: true,
            include_limitation: true,
        }
    }
}

/// The slice of an article the generator reads.
#[derive(Debug, Clone)]
pub struct ArticleInput<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub content: &'a str,
    pub ai_summary: Option<&'a AiSummary>,
    pub keywords: Vec<String>,
}

impl<'a> From<&'a Article> for ArticleInput<'a> {
    fn from(article: &'a Article) -> Self {
        ArticleInput {
            id: &article.id,
            title: &article.title,
            content: &article.content,
            ai_summary: article.ai_summary.as_ref(),
            keywords: article.keyword_list(),
        }
    }
}

impl ArticleInput<'_> {
    fn concepts(&self) -> Vec<String> {
        std::iter::once(self.title.to_string())
            .chain(self.keywords.iter().cloned())
            .collect()
    }

    fn pair(&self, category: QaCategory, question: String, answer: String) -> QaPair {
        QaPair {
            question,
            answer,
            category,
            related_concepts: self.concepts(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QaGenerator {
    config: QaConfig,
}

impl QaGenerator {
    pub fn new(config: QaConfig) -> Self {
        QaGenerator { config }
    }

    pub fn generate_from_article(&self, article: &ArticleInput) -> QuestionCoverageMatrix {
        let mut pairs = Vec::new();

        if let Some(summary) = article.ai_summary {
            if self.config.include_definition {
                pairs.extend(definition_pairs(article, summary));
            }
        }
        if self.config.include_comparison {
            pairs.extend(comparison_pairs(article));
        }
        if let Some(summary) = article.ai_summary {
            if self.config.include_application {
                pairs.extend(application_pairs(article, summary));
            }
        }
        if self.config.include_limitation {
            pairs.extend(limitation_pairs(article));
        }

        let generated = pairs.len();
        pairs.truncate(self.config.max_qa_pairs);
        let coverage = Coverage::of(&pairs);

        debug!(
            article = article.id,
            generated,
            kept = pairs.len(),
            "generated qa pairs"
        );

        QuestionCoverageMatrix {
            article: article.id.to_string(),
            qa_pairs: pairs,
            coverage,
        }
    }
}

pub fn generate_qa(article: &ArticleInput, config: QaConfig) -> QuestionCoverageMatrix {
    QaGenerator::new(config).generate_from_article(article)
}

fn definition_pairs(article: &ArticleInput, summary: &AiSummary) -> Vec<QaPair> {
    let title = article.title;
    let mut pairs = vec![article.pair(
        QaCategory::Definition,
        format!("什么是{}？", title),
        summary.what_is.clone(),
    )];
    if !summary.why_important.is_empty() {
        pairs.push(article.pair(
            QaCategory::Definition,
            format!("为什么{}很重要？", title),
            summary.why_important.clone(),
        ));
    }
    pairs
}

fn comparison_pairs(article: &ArticleInput) -> Vec<QaPair> {
    extract::comparisons(article.content)
        .into_iter()
        .map(|c| QaPair {
            question: format!("{}和{}有什么区别？", c.term_a, c.term_b),
            answer: c.explanation,
            category: QaCategory::Comparison,
            related_concepts: vec![c.term_a, c.term_b],
        })
        .collect()
}

fn application_pairs(article: &ArticleInput, summary: &AiSummary) -> Vec<QaPair> {
    if summary.use_cases.is_empty() {
        return Vec::new();
    }
    let title = article.title;
    vec![
        article.pair(
            QaCategory::Application,
            format!("{}适用于哪些场景？", title),
            summary.use_cases.join("；"),
        ),
        article.pair(
            QaCategory::Application,
            format!("什么时候应该使用{}？", title),
            format!("{}主要适用于以下场景：{}。", title, summary.use_cases.join("、")),
        ),
    ]
}

fn limitation_pairs(article: &ArticleInput) -> Vec<QaPair> {
    let limitations = extract::limitations(article.content);
    if limitations.is_empty() {
        return Vec::new();
    }
    let title = article.title;
    let joined = limitations.join("；");
    vec![
        article.pair(
            QaCategory::Limitation,
            format!("{}有哪些局限性？", title),
            joined.clone(),
        ),
        article.pair(
            QaCategory::Limitation,
            format!("使用{}时需要注意什么？", title),
            format!("使用{}时需要注意以下几点：{}。", title, joined),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> AiSummary {
        AiSummary {
            what_is: "闪电贷是同一交易内借入并归还的无抵押贷款。".to_string(),
            why_important: "它让套利与清算无需本金。".to_string(),
            use_cases: vec!["套利".to_string(), "清算".to_string()],
            key_takeaways: vec!["交易失败则整体回滚".to_string()],
        }
    }

    fn input<'a>(content: &'a str, summary: Option<&'a AiSummary>) -> ArticleInput<'a> {
        ArticleInput {
            id: "flash-loans",
            title: "闪电贷",
            content,
            ai_summary: summary,
            keywords: vec!["DeFi".to_string(), "Aave".to_string()],
        }
    }

    fn assert_coverage_matches(m: &QuestionCoverageMatrix) {
        for (flag, cat) in [
            (m.coverage.has_definition, QaCategory::Definition),
            (m.coverage.has_comparison, QaCategory::Comparison),
            (m.coverage.has_application, QaCategory::Application),
            (m.coverage.has_limitation, QaCategory::Limitation),
        ] {
            assert_eq!(flag, m.qa_pairs.iter().any(|p| p.category == cat), "{:?}", cat);
        }
    }

    #[test]
    fn summary_only_yields_definition_and_application() {
        let s = summary();
        let m = generate_qa(&input("<p>没有比较。</p>", Some(&s)), QaConfig::default());
        assert_eq!(m.article, "flash-loans");
        let questions: Vec<_> = m.qa_pairs.iter().map(|p| p.question.as_str()).collect();
        assert_eq!(
            questions,
            vec!["什么是闪电贷？", "为什么闪电贷很重要？", "闪电贷适用于哪些场景？", "什么时候应该使用闪电贷？"]
        );
        assert_eq!(m.qa_pairs[2].answer, "套利；清算");
        assert_eq!(m.qa_pairs[3].answer, "闪电贷主要适用于以下场景：套利、清算。");
        assert_eq!(m.qa_pairs[0].related_concepts, vec!["闪电贷", "DeFi", "Aave"]);
        assert!(m.coverage.has_definition && m.coverage.has_application);
        assert!(!m.coverage.has_comparison && !m.coverage.has_limitation);
        assert_coverage_matches(&m);
    }

    #[test]
    fn without_summary_only_content_categories() {
        let content = "<p>闪电贷和普通贷款的区别在于抵押。</p><p>主要风险是预言机被操纵。</p>";
        let m = generate_qa(&input(content, None), QaConfig::default());
        assert!(!m.coverage.has_definition && !m.coverage.has_application);
        let cmp = &m.qa_pairs[0];
        assert_eq!(cmp.question, "闪电贷和普通贷款有什么区别？");
        assert_eq!(cmp.related_concepts, vec!["闪电贷", "普通贷款"]);
        let lim: Vec<_> = m.qa_pairs.iter().filter(|p| p.category == QaCategory::Limitation).collect();
        assert_eq!(lim.len(), 2);
        assert_eq!(lim[0].answer, "主要风险是预言机被操纵。");
        assert_eq!(lim[1].answer, "使用闪电贷时需要注意以下几点：主要风险是预言机被操纵。。");
        assert_coverage_matches(&m);
    }

    #[test]
    fn empty_why_important_is_skipped() {
        let mut s = summary();
        s.why_important.clear();
        s.use_cases.clear();
        let m = generate_qa(&input("", Some(&s)), QaConfig::default());
        assert_eq!(m.qa_pairs.len(), 1);
        assert_coverage_matches(&m);
    }

    #[test]
    fn truncation_can_drop_coverage() {
        let s = summary();
        let content = "<p>闪电贷的风险很高。</p>";
        let config = QaConfig {
            max_qa_pairs: 3,
            ..QaConfig::default()
        };
        let m = generate_qa(&input(content, Some(&s)), config);
        assert_eq!(m.qa_pairs.len(), 3);
        assert!(!m.coverage.has_limitation);
        assert_coverage_matches(&m);
    }

    #[test]
    fn categories_can_be_disabled() {
        let s = summary();
        let config = QaConfig {
            include_definition: false,
            include_application: false,
            ..QaConfig::default()
        };
        let m = generate_qa(&input("<p>风险很高。</p>", Some(&s)), config);
        assert!(m.qa_pairs.iter().all(|p| p.category == QaCategory::Limitation));
        assert!(!m.coverage.any() || m.coverage.has_limitation);
    }

    #[test]
    fn from_article_and_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/defi_article.html").unwrap();
        let article = Article {
            id: "flash-loans".to_string(),
            title: "闪电贷".to_string(),
            content: html,
            keywords: Some("DeFi, Aave".to_string()),
            ai_summary: Some(summary()),
            ..Article::default()
        };
        let m = QaGenerator::default().generate_from_article(&ArticleInput::from(&article));
        assert!(m.coverage.has_definition);
        assert!(m.coverage.has_comparison);
        assert!(m.coverage.has_application);
        assert!(m.coverage.has_limitation);
        assert!(m.qa_pairs.len() <= 10);
        assert_coverage_matches(&m);
    }

    #[test]
    fn json_shape() {
        let m = generate_qa(&input("<p>风险很高。</p>", None), QaConfig::default());
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["qaPairs"][0]["category"], "limitation");
        assert_eq!(json["coverage"]["hasLimitation"], true);
        assert!(json["qaPairs"][0]["relatedConcepts"].is_array());
    }
}
