use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

use crate::html::{char_window, strip_tags, tags_to_lines};

static AND_DIFFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^，。；！？\s]+)和([^，。；！？\s]+)的区别").unwrap());
static VERSUS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([^，。；！？\s]+)\s*(?:vs|对比)\s*([^，。；！？\s]+)").unwrap());

pub const LIMITATION_KEYWORDS: &[&str] = &[
    "局限性", "缺点", "不足", "注意事项", "风险", "挑战", "问题", "限制",
];

static LIMITATION_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    LIMITATION_KEYWORDS
        .iter()
        .map(|kw| Regex::new(&format!(r"[^。！？\n]*{}[^。！？\n]*[。！？]", regex::escape(kw))).unwrap())
        .collect()
});

const MAX_LIMITATIONS: usize = 5;
const WINDOW_HALF: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub term_a: String,
    pub term_b: String,
    pub explanation: String,
}

/// `A和B的区别` matches first, then `A vs B` / `A对比B`, each in document
/// order. Terms are tag-stripped; a match whose term is only markup is
/// dropped.
pub fn comparisons(content: &str) -> Vec<Comparison> {
    [&*AND_DIFFERENCE_RE, &*VERSUS_RE]
        .into_iter()
        .flat_map(|re| re.captures_iter(content))
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let term_a = strip_tags(caps.get(1)?.as_str());
            let term_b = strip_tags(caps.get(2)?.as_str());
            if term_a.is_empty() || term_b.is_empty() {
                return None;
            }
            let explanation = strip_tags(char_window(content, whole.start(), WINDOW_HALF, WINDOW_HALF));
            Some(Comparison {
                term_a,
                term_b,
                explanation,
            })
        })
        .collect()
}

/// Sentences mentioning a limitation keyword, keyword by keyword, without
/// repeats and capped at five. Sentences never cross element boundaries.
pub fn limitations(content: &str) -> Vec<String> {
    let text = tags_to_lines(content);
    LIMITATION_RES
        .iter()
        .flat_map(|re| re.find_iter(&text))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .unique()
        .take(MAX_LIMITATIONS)
        .collect()
}
