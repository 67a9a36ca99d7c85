//! Terminology dictionary and consistency checks.
//!
//! A [`TerminologyManager`] wraps one immutable [`TerminologyDictionary`] and
//! answers lookups against it. Alias and canonical-name patterns are compiled
//! once at construction, so the manager can be shared freely across threads.

pub mod dictionary;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::article::Locale;

pub use dictionary::{load_dictionary, parse_dictionary, validate_dictionary, DictionaryValidation};

const DEFINITION_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '。', '，', '；', '：', '！', '？'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermCategory {
    Web3,
    Defi,
    Security,
    Blockchain,
    General,
}

impl TermCategory {
    pub const NAMES: [&'static str; 5] = ["web3", "defi", "security", "blockchain", "general"];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en_definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zh_definition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminologyEntry {
    pub term: String,
    pub canonical_name: String,
    pub aliases: Vec<String>,
    pub definition: String,
    #[serde(default)]
    pub context: String,
    pub related_terms: Vec<String>,
    #[serde(default)]
    pub first_defined_in: String,
    pub category: TermCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<Translation>,
}

impl TerminologyEntry {
    fn matches(&self, needle: &str) -> bool {
        self.canonical_name.to_lowercase() == needle
            || self.term.to_lowercase() == needle
            || self.has_alias(needle)
    }

    fn has_alias(&self, needle: &str) -> bool {
        self.aliases.iter().any(|a| a.to_lowercase() == needle)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminologyDictionary {
    pub version: String,
    pub last_updated: String,
    pub entries: Vec<TerminologyEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub term: String,
    pub canonical_definition: String,
    pub article_definition: String,
    pub article_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermTranslation {
    pub term: String,
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BilingualPair {
    pub zh: String,
    pub en: String,
    pub zh_definition: String,
    pub en_definition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryMetadata {
    pub version: String,
    pub last_updated: String,
}

/// Precompiled patterns for one entry, kept parallel to `entries`.
#[derive(Debug)]
struct EntryPatterns {
    canonical: Option<Regex>,
    aliases: Vec<(usize, Regex)>,
}

#[derive(Debug)]
pub struct TerminologyManager {
    dictionary: TerminologyDictionary,
    patterns: Vec<EntryPatterns>,
}

impl TerminologyManager {
    pub fn new(dictionary: TerminologyDictionary) -> Self {
        let patterns = dictionary
            .entries
            .iter()
            .map(|entry| EntryPatterns {
                canonical: term_pattern(&entry.canonical_name, true),
                aliases: entry
                    .aliases
                    .iter()
                    .enumerate()
                    .filter_map(|(i, alias)| term_pattern(alias, true).map(|re| (i, re)))
                    .collect(),
            })
            .collect();

        debug!(
            version = %dictionary.version,
            entries = dictionary.entries.len(),
            "terminology dictionary loaded"
        );

        TerminologyManager {
            dictionary,
            patterns,
        }
    }

    pub fn entries(&self) -> &[TerminologyEntry] {
        &self.dictionary.entries
    }

    pub fn metadata(&self) -> DictionaryMetadata {
        DictionaryMetadata {
            version: self.dictionary.version.clone(),
            last_updated: self.dictionary.last_updated.clone(),
        }
    }

    /// Case-insensitive lookup by canonical name, term or alias.
    pub fn find_term(&self, term: &str) -> Option<&TerminologyEntry> {
        let needle = term.trim().to_lowercase();
        self.dictionary.entries.iter().find(|e| e.matches(&needle))
    }

    /// The canonical name for `term`, or `term` itself when unknown.
    pub fn canonical_name<'a>(&'a self, term: &'a str) -> &'a str {
        self.find_term(term)
            .map(|e| e.canonical_name.as_str())
            .unwrap_or(term)
    }

    pub fn is_alias(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        self.dictionary.entries.iter().any(|e| e.has_alias(&needle))
    }

    pub fn terms_by_category(&self, category: TermCategory) -> Vec<&TerminologyEntry> {
        self.dictionary
            .entries
            .iter()
            .filter(|e| e.category == category)
            .collect()
    }

    /// Entries named in `term`'s related list. Unknown names are skipped.
    pub fn related_terms(&self, term: &str) -> Vec<&TerminologyEntry> {
        let Some(entry) = self.find_term(term) else {
            return Vec::new();
        };
        entry
            .related_terms
            .iter()
            .filter_map(|related| self.find_term(related))
            .collect()
    }

    /// Flags every alias that appears in `content`, whatever the locale.
    pub fn validate_terminology_consistency(&self, content: &str) -> Vec<ConflictReport> {
        self.alias_conflicts(content, None)
    }

    /// Locale-aware variant: an alias that is the expected term for the
    /// locale is allowed. Without a locale, it is detected from the content.
    pub fn validate_terminology_consistency_for(
        &self,
        content: &str,
        locale: Option<Locale>,
    ) -> Vec<ConflictReport> {
        let locale = locale.unwrap_or_else(|| detect_locale(content));
        self.alias_conflicts(content, Some(locale))
    }

    fn alias_conflicts(&self, content: &str, locale: Option<Locale>) -> Vec<ConflictReport> {
        let mut conflicts = Vec::new();

        for (entry, patterns) in self.dictionary.entries.iter().zip(&self.patterns) {
            let expected = locale.and_then(|l| {
                entry.translation.as_ref().map(|t| match l {
                    Locale::En => t.en.as_deref(),
                    Locale::Zh => t.zh.as_deref(),
                })
            });

            if let Some(expected) = expected {
                if expected == Some(entry.canonical_name.as_str()) {
                    continue;
                }
            }

            for (i, re) in &patterns.aliases {
                let alias = &entry.aliases[*i];
                if matches!(expected, Some(Some(t)) if t == alias.as_str()) {
                    continue;
                }
                if re.is_match(content) {
                    conflicts.push(ConflictReport {
                        term: alias.clone(),
                        canonical_definition: entry.definition.clone(),
                        article_definition: format!(
                            "Using alias \"{}\" instead of canonical name \"{}\"",
                            alias, entry.canonical_name
                        ),
                        article_id: "unknown".to_string(),
                    });
                }
            }
        }

        conflicts
    }

    /// Compares `definition` with the dictionary's, ignoring case,
    /// punctuation and whitespace runs.
    pub fn check_definition_conflict(&self, term: &str, definition: &str) -> Option<ConflictReport> {
        let entry = self.find_term(term)?;
        if normalize_definition(&entry.definition) == normalize_definition(definition) {
            return None;
        }
        Some(ConflictReport {
            term: entry.canonical_name.clone(),
            canonical_definition: entry.definition.clone(),
            article_definition: definition.to_string(),
            article_id: "unknown".to_string(),
        })
    }

    /// Entries whose canonical name occurs in `content`.
    pub fn extract_terms_from_content(&self, content: &str) -> Vec<&TerminologyEntry> {
        self.dictionary
            .entries
            .iter()
            .zip(&self.patterns)
            .filter(|(_, p)| p.canonical.as_ref().is_some_and(|re| re.is_match(content)))
            .map(|(e, _)| e)
            .collect()
    }

    pub fn translation(&self, term: &str, target: Locale) -> Option<TermTranslation> {
        let entry = self.find_term(term)?;
        let t = entry.translation.as_ref()?;
        let (name, definition) = match target {
            Locale::En => (&t.en, &t.en_definition),
            Locale::Zh => (&t.zh, &t.zh_definition),
        };
        Some(TermTranslation {
            term: name.clone().unwrap_or_else(|| entry.canonical_name.clone()),
            definition: definition.clone().unwrap_or_else(|| entry.definition.clone()),
        })
    }

    pub fn has_translation(&self, term: &str) -> bool {
        self.find_term(term).is_some_and(|e| e.translation.is_some())
    }

    pub fn bilingual_pair(&self, term: &str) -> Option<BilingualPair> {
        let zh = self.translation(term, Locale::Zh)?;
        let en = self.translation(term, Locale::En)?;
        Some(BilingualPair {
            zh: zh.term,
            en: en.term,
            zh_definition: zh.definition,
            en_definition: en.definition,
        })
    }

    /// Terms that occur in only one language version of an article.
    pub fn validate_translation_consistency(&self, zh_content: &str, en_content: &str) -> Vec<ConflictReport> {
        let mut issues = Vec::new();

        for entry in &self.dictionary.entries {
            let Some(t) = &entry.translation else {
                continue;
            };
            let zh_term = t.zh.as_deref().unwrap_or(&entry.canonical_name);
            let en_term = t.en.as_deref().unwrap_or(&entry.canonical_name);

            let zh_hits = term_pattern(zh_term, false).map_or(0, |re| re.find_iter(zh_content).count());
            let en_hits = term_pattern(en_term, true).map_or(0, |re| re.find_iter(en_content).count());

            if zh_hits > 0 && en_hits == 0 {
                issues.push(ConflictReport {
                    term: zh_term.to_string(),
                    canonical_definition: format!(
                        "Term appears in Chinese ({} times) but not in English",
                        zh_hits
                    ),
                    article_definition: format!("Missing English translation: {}", en_term),
                    article_id: "translation-consistency-check".to_string(),
                });
            } else if en_hits > 0 && zh_hits == 0 {
                issues.push(ConflictReport {
                    term: en_term.to_string(),
                    canonical_definition: format!(
                        "Term appears in English ({} times) but not in Chinese",
                        en_hits
                    ),
                    article_definition: format!("Missing Chinese translation: {}", zh_term),
                    article_id: "translation-consistency-check".to_string(),
                });
            }
        }

        issues
    }

    /// `智能合约` becomes `智能合约（Smart Contract）` when the entry has an
    /// English name distinct from its canonical one.
    pub fn format_with_english(&self, term: &str) -> String {
        let en = self
            .find_term(term)
            .and_then(|e| {
                let en = e.translation.as_ref()?.en.as_deref()?;
                (en != term && en != e.canonical_name).then_some(en)
            });
        match en {
            Some(en) => format!("{}（{}）", term, en),
            None => term.to_string(),
        }
    }
}

/// Zh when more than a tenth of the characters are CJK ideographs.
pub fn detect_locale(content: &str) -> Locale {
    let total = content.chars().count();
    if total == 0 {
        return Locale::En;
    }
    let cjk = content.chars().filter(|c| is_cjk(*c)).count();
    if cjk as f64 / total as f64 > 0.1 {
        Locale::Zh
    } else {
        Locale::En
    }
}

fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&c)
}

/// Terms with CJK characters match anywhere, others on ASCII word
/// boundaries so they still match against adjacent CJK text.
fn term_pattern(term: &str, case_insensitive: bool) -> Option<Regex> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    let escaped = regex::escape(term);
    let body = if term.chars().any(is_cjk) {
        escaped
    } else {
        format!(r"(?-u:\b){}(?-u:\b)", escaped)
    };
    let flags = if case_insensitive { "(?i)" } else { "" };
    Regex::new(&format!("{}{}", flags, body)).ok()
}

fn normalize_definition(definition: &str) -> String {
    definition
        .to_lowercase()
        .replace(DEFINITION_PUNCTUATION, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> TerminologyManager {
        let json = std::fs::read_to_string("tests/fixtures/terminology.json").unwrap();
        parse_dictionary(&json).unwrap()
    }

    #[test]
    fn lookup_is_case_insensitive_and_trimmed() {
        let m = fixture();
        assert_eq!(m.find_term("  SMART CONTRACT ").unwrap().canonical_name, "Smart Contract");
        assert_eq!(m.find_term("智能合约").unwrap().canonical_name, "Smart Contract");
        assert_eq!(m.find_term("dapp").unwrap().canonical_name, "DApp");
        assert!(m.find_term("Proof of Stake").is_none());
    }

    #[test]
    fn canonical_name_falls_back_to_input() {
        let m = fixture();
        assert_eq!(m.canonical_name("flashloan"), "Flash Loan");
        assert_eq!(m.canonical_name("Rollup"), "Rollup");
    }

    #[test]
    fn alias_never_matches_canonical() {
        let m = fixture();
        assert!(m.is_alias("Flashloan"));
        for entry in m.entries() {
            assert!(!m.is_alias(&entry.canonical_name), "{}", entry.canonical_name);
        }
    }

    #[test]
    fn category_and_related() {
        let m = fixture();
        let defi: Vec<_> = m.terms_by_category(TermCategory::Defi).iter().map(|e| e.canonical_name.as_str()).collect();
        assert_eq!(defi, vec!["Flash Loan"]);
        let related: Vec<_> = m.related_terms("Flash Loan").iter().map(|e| e.canonical_name.as_str()).collect();
        // "Atomic Transaction" is not in the dictionary
        assert_eq!(related, vec!["Smart Contract"]);
        assert!(m.related_terms("unknown").is_empty());
    }

    #[test]
    fn aliases_in_content_are_flagged() {
        let m = fixture();
        let conflicts = m.validate_terminology_consistency("A flashloan drains the pool.");
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].term, "flashloan");
        assert_eq!(
            conflicts[0].article_definition,
            "Using alias \"flashloan\" instead of canonical name \"Flash Loan\""
        );
        assert_eq!(conflicts[0].article_id, "unknown");
        // word boundaries
        assert!(m.validate_terminology_consistency("flashloans are common").is_empty());
    }

    #[test]
    fn english_terms_next_to_chinese() {
        let m = fixture();
        let conflicts = m.validate_terminology_consistency("<p>攻击者用flashloan掏空资金池。</p>");
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].term, "flashloan");
        let found: Vec<_> = m
            .extract_terms_from_content("<p>部署Smart Contract前要审计。</p><p>DApp应用很多</p>")
            .iter()
            .map(|e| e.canonical_name.as_str())
            .collect();
        assert_eq!(found, vec!["Smart Contract", "DApp"]);
    }

    #[test]
    fn locale_aware_consistency_allows_expected_term() {
        let m = fixture();
        // 智能合约 is an alias of Smart Contract but the expected Chinese term
        let zh = "这是一个部署在以太坊上的智能合约，它很常见。";
        assert!(m.validate_terminology_consistency(zh).iter().any(|c| c.term == "智能合约"));
        assert!(m.validate_terminology_consistency_for(zh, None).is_empty());
        assert!(m.validate_terminology_consistency_for(zh, Some(Locale::Zh)).is_empty());
        // entries whose canonical name is the English term skip all aliases in English
        assert!(m.validate_terminology_consistency_for("A smart-contract.", Some(Locale::En)).is_empty());
    }

    #[test]
    fn locale_detection() {
        assert_eq!(detect_locale("闪电贷是一种无抵押贷款"), Locale::Zh);
        assert_eq!(detect_locale("Flash loans are uncollateralized"), Locale::En);
        assert_eq!(detect_locale(""), Locale::En);
    }

    #[test]
    fn definition_conflicts_ignore_formatting() {
        let m = fixture();
        assert!(m
            .check_definition_conflict("Flash Loan", "an uncollateralized loan   borrowed and repaid within ONE transaction")
            .is_none());
        let report = m.check_definition_conflict("flashloan", "A loan with collateral").unwrap();
        assert_eq!(report.term, "Flash Loan");
        assert_eq!(report.article_definition, "A loan with collateral");
        assert!(m.check_definition_conflict("Rollup", "anything").is_none());
    }

    #[test]
    fn extracts_canonical_names() {
        let m = fixture();
        let found: Vec<_> = m
            .extract_terms_from_content("<p>Every flash loan runs inside a smart contract.</p>")
            .iter()
            .map(|e| e.canonical_name.as_str())
            .collect();
        assert_eq!(found, vec!["Smart Contract", "Flash Loan"]);
    }

    #[test]
    fn translations() {
        let m = fixture();
        let en = m.translation("智能合约", Locale::En).unwrap();
        assert_eq!(en.term, "Smart Contract");
        let zh = m.translation("Smart Contract", Locale::Zh).unwrap();
        assert_eq!(zh.term, "智能合约");
        assert_eq!(zh.definition, "运行在区块链上、满足条件时自动执行的程序。");
        assert!(m.has_translation("smart contract"));
        assert!(!m.has_translation("DApp"));
        assert!(m.bilingual_pair("DApp").is_none());
        let pair = m.bilingual_pair("Flash Loan").unwrap();
        assert_eq!(pair.zh, "闪电贷");
        // no English definition given, falls back to the main one
        assert_eq!(pair.en_definition, m.find_term("Flash Loan").unwrap().definition);
    }

    #[test]
    fn translation_consistency() {
        let m = fixture();
        let issues = m.validate_translation_consistency("闪电贷和智能合约", "Smart contracts are everywhere. A smart contract.");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].term, "闪电贷");
        assert_eq!(issues[0].article_definition, "Missing English translation: Flash Loan");
        assert_eq!(issues[0].canonical_definition, "Term appears in Chinese (1 times) but not in English");
    }

    #[test]
    fn english_annotation() {
        let m = fixture();
        // canonical name is already English
        assert_eq!(m.format_with_english("智能合约"), "智能合约");
        assert_eq!(m.format_with_english("重入攻击"), "重入攻击（Reentrancy Attack）");
        assert_eq!(m.format_with_english("未知"), "未知");
    }

    #[test]
    fn metadata_and_sharing() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TerminologyManager>();
        let m = fixture();
        assert_eq!(m.metadata().version, "1.0.0");
    }
}
