use serde::{Deserialize, Serialize};

use crate::qa::QaPair;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Zh,
    En,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::Zh => "zh",
            Locale::En => "en",
        }
    }

    /// BCP 47 tag used for `inLanguage`.
    pub fn language_code(self) -> &'static str {
        match self {
            Locale::Zh => "zh-CN",
            Locale::En => "en-US",
        }
    }
}

/// Editor-written summary attached to an article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSummary {
    pub what_is: String,
    #[serde(default)]
    pub why_important: String,
    #[serde(default)]
    pub use_cases: Vec<String>,
    #[serde(default)]
    pub key_takeaways: Vec<String>,
}

/// An article as handed over by the site build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Comma-separated keyword list.
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub ai_summary: Option<AiSummary>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub author_bio: Option<String>,
    #[serde(default)]
    pub date_published: String,
    #[serde(default)]
    pub date_modified: Option<String>,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub qa_pairs: Option<Vec<QaPair>>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub series_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub citations: Vec<serde_json::Value>,
}

impl Article {
    pub fn keyword_list(&self) -> Vec<String> {
        split_keywords(self.keywords.as_deref().unwrap_or(""))
    }

    pub fn slug(&self) -> &str {
        self.slug.as_deref().unwrap_or(&self.id)
    }
}

/// Split a comma-separated keyword string, dropping empty items.
pub fn split_keywords(keywords: &str) -> Vec<String> {
    keywords
        .split(',')
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_from_minimal_json() {
        let json = r#"{"id":"a1","title":"智能合约","content":"<p>x</p>","locale":"en"}"#;
        let a: Article = serde_json::from_str(json).unwrap();
        assert_eq!(a.locale, Locale::En);
        assert!(a.ai_summary.is_none());
        assert_eq!(a.slug(), "a1");
    }

    #[test]
    fn summary_uses_camel_case() {
        let json = r#"{"whatIs":"w","whyImportant":"y","useCases":["a"],"keyTakeaways":[]}"#;
        let s: AiSummary = serde_json::from_str(json).unwrap();
        assert_eq!(s.what_is, "w");
        assert_eq!(s.use_cases, vec!["a".to_string()]);
    }

    #[test]
    fn keywords_split_and_trimmed() {
        assert_eq!(split_keywords("Web3, DeFi ,,NFT"), vec!["Web3", "DeFi", "NFT"]);
        assert!(split_keywords("").is_empty());
    }
}
