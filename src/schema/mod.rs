//! Schema.org structured data for articles.
//!
//! Produces a `BlogPosting` extended with the fields answer engines read
//! for topical grounding (`about`, `teaches`, `mentions`, `isPartOf` and a
//! Q&A `mainEntity`). Site-wide constants live in [`SiteProfile`].

pub mod dates;
pub mod validate;

use serde::{Deserialize, Serialize};

use crate::article::{split_keywords, AiSummary, Article, Locale};
use crate::error::Result;
use crate::qa::QaPair;

pub use dates::{ensure_iso8601, is_valid_iso8601};
pub use validate::{validate_enhanced_schema, SchemaValidation};

pub const SCHEMA_CONTEXT: &str = "https://schema.org";

const MAX_KEYWORD_MENTIONS: usize = 5;

const KNOWN_TECHNOLOGIES: &[&str] = &[
    "Web3",
    "DeFi",
    "NFT",
    "Ethereum",
    "Solidity",
    "Smart Contract",
    "Blockchain",
    "Bitcoin",
    "Polygon",
    "Arbitrum",
    "Optimism",
    "IPFS",
    "MetaMask",
    "OpenZeppelin",
    "Hardhat",
    "Truffle",
    "Foundry",
];

/// (category aliases, zh series, en series)
const SERIES: &[(&[&str], &str, &str)] = &[
    (&["安全", "Security"], "Web3 安全系列", "Web3 Security Series"),
    (&["DeFi"], "DeFi 深度解析系列", "DeFi Deep Dive Series"),
    (&["技术", "Technology"], "区块链技术系列", "Blockchain Technology Series"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorProfile {
    pub name: String,
    #[serde(default)]
    pub job_title_zh: Option<String>,
    #[serde(default)]
    pub job_title_en: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl AuthorProfile {
    fn job_title(&self, locale: Locale) -> Option<&str> {
        match locale {
            Locale::Zh => self.job_title_zh.as_deref(),
            Locale::En => self.job_title_en.as_deref(),
        }
    }
}

/// Publisher identity and known authors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteProfile {
    pub base_url: String,
    pub publisher_zh: String,
    pub publisher_en: String,
    pub logo_path: String,
    pub authors: Vec<AuthorProfile>,
}

impl Default for SiteProfile {
    fn default() -> Self {
        let author = |name: &str, zh: &str, en: &str, url: Option<&str>| AuthorProfile {
            name: name.to_string(),
            job_title_zh: Some(zh.to_string()),
            job_title_en: Some(en.to_string()),
            url: url.map(String::from),
        };
        SiteProfile {
            base_url: "https://develop.matrixlab.work".to_string(),
            publisher_zh: "刻熵科技".to_string(),
            publisher_en: "Ke Entropy Technology".to_string(),
            logo_path: "/logo.png".to_string(),
            authors: vec![
                author(
                    "Seal Wax",
                    "创始人 & 首席架构师",
                    "Founder & Chief Architect",
                    Some("https://yz.matrixlab.work"),
                ),
                author("Matrix Lab 安全团队", "安全研究团队", "Security Research Team", None),
                author("Matrix Lab 研究团队", "研究团队", "Research Team", None),
            ],
        }
    }
}

impl SiteProfile {
    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn author(&self, name: &str) -> Option<&AuthorProfile> {
        self.authors.iter().find(|a| a.name == name)
    }

    fn publisher(&self, locale: Locale) -> SchemaOrganization {
        let name = match locale {
            Locale::Zh => &self.publisher_zh,
            Locale::En => &self.publisher_en,
        };
        SchemaOrganization {
            kind: "Organization".to_string(),
            name: name.clone(),
            logo: SchemaImageObject {
                kind: "ImageObject".to_string(),
                url: format!("{}{}", self.base(), self.logo_path),
            },
            url: self.base().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaPerson {
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaImageObject {
    #[serde(rename = "@type")]
    pub kind: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaOrganization {
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
    pub logo: SchemaImageObject,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDefinedTerm {
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
    pub description: String,
    pub in_defined_term_set: String,
}

/// A `Thing`, or a `SoftwareApplication` for named technologies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaThing {
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaCreativeWorkSeries {
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaAnswer {
    #[serde(rename = "@type")]
    pub kind: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaQuestion {
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
    pub accepted_answer: SchemaAnswer,
}

impl From<&QaPair> for SchemaQuestion {
    fn from(qa: &QaPair) -> Self {
        SchemaQuestion {
            kind: "Question".to_string(),
            name: qa.question.clone(),
            accepted_answer: SchemaAnswer {
                kind: "Answer".to_string(),
                text: qa.answer.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedBlogPosting {
    #[serde(rename = "@type")]
    pub kind: String,
    pub headline: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<SchemaPerson>,
    pub date_published: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<SchemaOrganization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<Vec<SchemaDefinedTerm>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teaches: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentions: Option<Vec<SchemaThing>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_part_of: Option<SchemaCreativeWorkSeries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_entity: Option<Vec<SchemaQuestion>>,
    pub in_language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreConcept {
    pub name: String,
    pub definition: String,
}

/// Everything schema generation reads, borrowed from the caller.
#[derive(Debug, Clone)]
pub struct SchemaOptions<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    /// Comma-separated.
    pub keywords: &'a str,
    pub author: &'a str,
    pub author_bio: Option<&'a str>,
    pub date_published: &'a str,
    pub date_modified: Option<&'a str>,
    pub locale: Locale,
    pub ai_summary: Option<&'a AiSummary>,
    pub qa_pairs: Option<&'a [QaPair]>,
    pub series_name: Option<&'a str>,
    pub mentioned_technologies: Vec<String>,
    pub core_concepts: Vec<CoreConcept>,
    pub site: &'a SiteProfile,
}

impl<'a> SchemaOptions<'a> {
    /// Options for `article`, deriving series, technologies and core
    /// concepts from its metadata when it does not name them.
    pub fn from_article(article: &'a Article, site: &'a SiteProfile) -> Self {
        let keywords = article.keywords.as_deref().unwrap_or("");
        let summary = article.ai_summary.as_ref();
        let description = article
            .description
            .as_deref()
            .or(summary.map(|s| s.what_is.as_str()))
            .unwrap_or("");
        let series_name = article
            .series_name
            .as_deref()
            .or_else(|| determine_article_series(&article.category, article.locale));

        SchemaOptions {
            slug: article.slug(),
            title: &article.title,
            description,
            category: &article.category,
            keywords,
            author: &article.author,
            author_bio: article.author_bio.as_deref(),
            date_published: &article.date_published,
            date_modified: article.date_modified.as_deref(),
            locale: article.locale,
            ai_summary: summary,
            qa_pairs: article.qa_pairs.as_deref(),
            series_name,
            mentioned_technologies: extract_mentioned_technologies(article.keywords.as_deref(), summary),
            core_concepts: extract_core_concepts(summary, article.keywords.as_deref()),
            site,
        }
    }
}

pub fn generate_enhanced_schema(opts: &SchemaOptions) -> EnhancedBlogPosting {
    let site = opts.site;
    let profile = site.author(opts.author);

    let author = SchemaPerson {
        kind: "Person".to_string(),
        name: opts.author.to_string(),
        description: opts.author_bio.map(String::from),
        job_title: profile.and_then(|p| p.job_title(opts.locale)).map(String::from),
        url: profile.and_then(|p| p.url.clone()),
    };

    let about = if !opts.core_concepts.is_empty() {
        Some(
            opts.core_concepts
                .iter()
                .map(|c| defined_term(&c.name, &c.definition, opts.category))
                .collect(),
        )
    } else {
        opts.ai_summary
            .map(|s| vec![defined_term(opts.title, &s.what_is, opts.category)])
    };

    let mentions: Vec<SchemaThing> = if !opts.mentioned_technologies.is_empty() {
        opts.mentioned_technologies
            .iter()
            .map(|t| thing("SoftwareApplication", t))
            .collect()
    } else {
        split_keywords(opts.keywords)
            .iter()
            .take(MAX_KEYWORD_MENTIONS)
            .map(|k| thing("Thing", k))
            .collect()
    };

    let main_entity = opts
        .qa_pairs
        .filter(|pairs| !pairs.is_empty())
        .map(|pairs| pairs.iter().map(SchemaQuestion::from).collect());

    EnhancedBlogPosting {
        kind: "BlogPosting".to_string(),
        headline: opts.title.to_string(),
        description: opts.description.to_string(),
        author: Some(author),
        date_published: ensure_iso8601(opts.date_published),
        date_modified: Some(ensure_iso8601(opts.date_modified.unwrap_or(opts.date_published))),
        image: Some(format!("{}/blog-images/{}-hero.webp", site.base(), opts.slug)),
        publisher: Some(site.publisher(opts.locale)),
        about,
        teaches: opts.ai_summary.map(|s| s.key_takeaways.clone()),
        mentions: (!mentions.is_empty()).then_some(mentions),
        is_part_of: opts.series_name.map(|name| SchemaCreativeWorkSeries {
            kind: "CreativeWorkSeries".to_string(),
            name: name.to_string(),
        }),
        main_entity,
        in_language: opts.locale.language_code().to_string(),
    }
}

#[derive(Serialize)]
struct JsonLd<'a> {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(flatten)]
    schema: &'a EnhancedBlogPosting,
}

/// Pretty-printed JSON-LD ready for a `<script type="application/ld+json">`.
pub fn generate_schema_json_ld(opts: &SchemaOptions) -> Result<String> {
    schema_json_ld(&generate_enhanced_schema(opts))
}

pub fn schema_json_ld(schema: &EnhancedBlogPosting) -> Result<String> {
    let doc = JsonLd {
        context: SCHEMA_CONTEXT,
        schema,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// The first keyword, defined by the summary's `whatIs`.
pub fn extract_core_concepts(summary: Option<&AiSummary>, keywords: Option<&str>) -> Vec<CoreConcept> {
    let (Some(summary), Some(keywords)) = (summary, keywords) else {
        return Vec::new();
    };
    if summary.what_is.is_empty() {
        return Vec::new();
    }
    split_keywords(keywords)
        .into_iter()
        .next()
        .map(|name| CoreConcept {
            name,
            definition: summary.what_is.clone(),
        })
        .into_iter()
        .collect()
}

/// Known technologies named in the keywords (case-insensitive substring) or
/// in the summary's use cases, in first-seen order.
pub fn extract_mentioned_technologies(keywords: Option<&str>, summary: Option<&AiSummary>) -> Vec<String> {
    let Some(keywords) = keywords else {
        return Vec::new();
    };

    let mut found: Vec<&str> = Vec::new();
    let mut add = |tech: &'static str| {
        if !found.contains(&tech) {
            found.push(tech);
        }
    };

    for keyword in split_keywords(keywords) {
        let keyword = keyword.to_lowercase();
        for &tech in KNOWN_TECHNOLOGIES {
            if keyword.contains(&tech.to_lowercase()) {
                add(tech);
            }
        }
    }
    for use_case in summary.map(|s| s.use_cases.as_slice()).unwrap_or_default() {
        for &tech in KNOWN_TECHNOLOGIES {
            if use_case.contains(tech) {
                add(tech);
            }
        }
    }

    found.into_iter().map(String::from).collect()
}

pub fn determine_article_series(category: &str, locale: Locale) -> Option<&'static str> {
    SERIES
        .iter()
        .find(|(categories, _, _)| categories.contains(&category))
        .map(|&(_, zh, en)| match locale {
            Locale::Zh => zh,
            Locale::En => en,
        })
}

fn defined_term(name: &str, description: &str, set: &str) -> SchemaDefinedTerm {
    SchemaDefinedTerm {
        kind: "DefinedTerm".to_string(),
        name: name.to_string(),
        description: description.to_string(),
        in_defined_term_set: set.to_string(),
    }
}

fn thing(kind: &str, name: &str) -> SchemaThing {
    SchemaThing {
        kind: kind.to_string(),
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qa::QaCategory;

    fn summary() -> AiSummary {
        AiSummary {
            what_is: "闪电贷是同一交易内借入并归还的无抵押贷款。".to_string(),
            why_important: "无需本金即可套利。".to_string(),
            use_cases: vec!["在 Ethereum 上套利".to_string()],
            key_takeaways: vec!["原子性保证还款".to_string(), "预言机是主要攻击面".to_string()],
        }
    }

    fn article() -> Article {
        Article {
            id: "flash-loans".to_string(),
            title: "闪电贷".to_string(),
            content: "<p>x</p>".to_string(),
            keywords: Some("DeFi, Aave, 闪电贷".to_string()),
            ai_summary: Some(summary()),
            author: "Seal Wax".to_string(),
            author_bio: Some("Builder".to_string()),
            date_published: "2024-01-15".to_string(),
            category: "DeFi".to_string(),
            qa_pairs: Some(vec![QaPair {
                question: "什么是闪电贷？".to_string(),
                answer: "一种无抵押贷款。".to_string(),
                category: QaCategory::Definition,
                related_concepts: vec![],
            }]),
            ..Article::default()
        }
    }

    #[test]
    fn full_schema_from_article() {
        let site = SiteProfile::default();
        let a = article();
        let schema = generate_enhanced_schema(&SchemaOptions::from_article(&a, &site));

        assert_eq!(schema.kind, "BlogPosting");
        assert_eq!(schema.date_published, "2024-01-15T00:00:00Z");
        assert_eq!(schema.date_modified.as_deref(), Some("2024-01-15T00:00:00Z"));
        assert_eq!(
            schema.image.as_deref(),
            Some("https://develop.matrixlab.work/blog-images/flash-loans-hero.webp")
        );
        assert_eq!(schema.in_language, "zh-CN");

        let author = schema.author.as_ref().unwrap();
        assert_eq!(author.job_title.as_deref(), Some("创始人 & 首席架构师"));
        assert_eq!(author.url.as_deref(), Some("https://yz.matrixlab.work"));

        let publisher = schema.publisher.as_ref().unwrap();
        assert_eq!(publisher.name, "刻熵科技");
        assert_eq!(publisher.logo.url, "https://develop.matrixlab.work/logo.png");

        let about = schema.about.as_ref().unwrap();
        assert_eq!(about.len(), 1);
        assert_eq!(about[0].name, "DeFi");
        assert_eq!(about[0].in_defined_term_set, "DeFi");

        assert_eq!(schema.teaches.as_ref().unwrap().len(), 2);

        let mentions: Vec<_> = schema.mentions.as_ref().unwrap().iter().map(|m| (m.kind.as_str(), m.name.as_str())).collect();
        assert_eq!(mentions, vec![("SoftwareApplication", "DeFi"), ("SoftwareApplication", "Ethereum")]);

        assert_eq!(schema.is_part_of.as_ref().unwrap().name, "DeFi 深度解析系列");
        let main = schema.main_entity.as_ref().unwrap();
        assert_eq!(main.len(), 1);
        assert_eq!(main[0].accepted_answer.text, "一种无抵押贷款。");

        assert!(validate_enhanced_schema(&schema).valid);
    }

    #[test]
    fn minimal_options_omit_optional_fields() {
        let site = SiteProfile::default();
        let opts = SchemaOptions {
            slug: "post",
            title: "Rollups",
            description: "About rollups",
            category: "Misc",
            keywords: "",
            author: "Guest",
            author_bio: None,
            date_published: "2024-03-01T08:00:00Z",
            date_modified: None,
            locale: Locale::En,
            ai_summary: None,
            qa_pairs: None,
            series_name: None,
            mentioned_technologies: vec![],
            core_concepts: vec![],
            site: &site,
        };
        let schema = generate_enhanced_schema(&opts);
        assert!(schema.about.is_none());
        assert!(schema.teaches.is_none());
        assert!(schema.mentions.is_none());
        assert!(schema.is_part_of.is_none());
        assert!(schema.main_entity.is_none());
        assert_eq!(schema.publisher.as_ref().unwrap().name, "Ke Entropy Technology");
        let author = schema.author.as_ref().unwrap();
        assert!(author.job_title.is_none() && author.url.is_none());

        let json = serde_json::to_value(&schema).unwrap();
        let obj = json.as_object().unwrap();
        for key in ["about", "teaches", "mentions", "isPartOf", "mainEntity"] {
            assert!(!obj.contains_key(key), "{}", key);
        }
        assert_eq!(json["author"]["@type"], "Person");
        assert!(json["author"].get("jobTitle").is_none());
    }

    #[test]
    fn keyword_mentions_fallback() {
        let site = SiteProfile::default();
        let mut a = article();
        a.keywords = Some("a, b, c, d, e, f".to_string());
        a.ai_summary = None;
        let schema = generate_enhanced_schema(&SchemaOptions::from_article(&a, &site));
        let mentions = schema.mentions.unwrap();
        assert_eq!(mentions.len(), 5);
        assert!(mentions.iter().all(|m| m.kind == "Thing"));
    }

    #[test]
    fn series_by_category_and_locale() {
        assert_eq!(determine_article_series("安全", Locale::Zh), Some("Web3 安全系列"));
        assert_eq!(determine_article_series("Security", Locale::En), Some("Web3 Security Series"));
        assert_eq!(determine_article_series("Technology", Locale::Zh), Some("区块链技术系列"));
        assert_eq!(determine_article_series("Gossip", Locale::En), None);
    }

    #[test]
    fn technologies_from_keywords_and_use_cases() {
        let s = summary();
        let techs = extract_mentioned_technologies(Some("defi security, Solidity tips"), Some(&s));
        assert_eq!(techs, vec!["DeFi", "Solidity", "Ethereum"]);
        assert!(extract_mentioned_technologies(None, Some(&s)).is_empty());
    }

    #[test]
    fn core_concepts_need_both_inputs() {
        let s = summary();
        assert_eq!(extract_core_concepts(Some(&s), Some(" Aave , DeFi"))[0].name, "Aave");
        assert!(extract_core_concepts(None, Some("Aave")).is_empty());
        assert!(extract_core_concepts(Some(&s), None).is_empty());
        assert!(extract_core_concepts(Some(&s), Some("")).is_empty());
    }

    #[test]
    fn json_ld_has_context_first() {
        let site = SiteProfile::default();
        let a = article();
        let json = generate_schema_json_ld(&SchemaOptions::from_article(&a, &site)).unwrap();
        assert!(json.trim_start().starts_with("{\n  \"@context\": \"https://schema.org\""));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["@type"], "BlogPosting");
        assert_eq!(value["mainEntity"][0]["acceptedAnswer"]["@type"], "Answer");
        assert_eq!(value["isPartOf"]["@type"], "CreativeWorkSeries");
    }
}
