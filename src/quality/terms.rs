use regex::Regex;

/// Word lists the validator flags. Chinese terms match anywhere; English
/// terms match on word boundaries, ignoring case.
#[derive(Debug, Clone, Copy)]
pub struct TermLists {
    pub vague_zh: &'static [&'static str],
    pub vague_en: &'static [&'static str],
    pub hyperbole_zh: &'static [&'static str],
    pub hyperbole_en: &'static [&'static str],
}

pub const VAGUE_TERMS_ZH: &[&str] = &[
    "可能", "也许", "大概", "或许", "似乎", "好像", "大约", "左右", "差不多", "基本上",
];

pub const VAGUE_TERMS_EN: &[&str] = &[
    "maybe",
    "perhaps",
    "possibly",
    "probably",
    "might",
    "could be",
    "seems like",
    "appears to",
    "roughly",
    "approximately",
];

pub const HYPERBOLE_TERMS_ZH: &[&str] = &[
    "颠覆", "史无前例", "革命性", "划时代", "空前", "绝无仅有", "前所未有", "最强", "最好", "完美",
    "终极", "极致", "无敌", "碾压", "秒杀",
];

pub const HYPERBOLE_TERMS_EN: &[&str] = &[
    "revolutionary",
    "groundbreaking",
    "unprecedented",
    "game-changing",
    "disruptive",
    "paradigm shift",
    "best ever",
    "perfect",
    "ultimate",
    "unbelievable",
    "amazing",
    "incredible",
    "mind-blowing",
];

impl Default for TermLists {
    fn default() -> Self {
        TermLists {
            vague_zh: VAGUE_TERMS_ZH,
            vague_en: VAGUE_TERMS_EN,
            hyperbole_zh: HYPERBOLE_TERMS_ZH,
            hyperbole_en: HYPERBOLE_TERMS_EN,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TermMatcher {
    pub term: &'static str,
    pub pattern: Regex,
}

/// Compile a Chinese list (substring match) and an English list (ASCII
/// word boundaries, case-insensitive) into one ordered matcher list.
pub fn compile(zh: &[&'static str], en: &[&'static str]) -> Vec<TermMatcher> {
    let zh = zh.iter().map(|&term| TermMatcher {
        term,
        pattern: Regex::new(&regex::escape(term)).unwrap(),
    });
    let en = en.iter().map(|&term| TermMatcher {
        term,
        pattern: Regex::new(&format!(r"(?i)(?-u:\b){}(?-u:\b)", regex::escape(term))).unwrap(),
    });
    zh.chain(en).collect()
}
