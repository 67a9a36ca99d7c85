use std::sync::LazyLock;

use regex::Regex;

use super::BlockType;
use crate::html::{char_len, strip_tags};
use crate::patterns::has_list;

static TABLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<table[\s>]").unwrap());
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<(?:code|pre)[\s>]").unwrap());

fn base_score(kind: BlockType) -> f64 {
    match kind {
        BlockType::Definition => 0.9,
        BlockType::Conclusion => 0.85,
        BlockType::Comparison => 0.8,
        BlockType::Example => 0.7,
        BlockType::Explanation => 0.6,
    }
}

fn length_factor(len: usize) -> f64 {
    match len {
        0..=9 => 0.5,
        10..=19 => 0.9,
        501.. => 0.7,
        _ => 1.0,
    }
}

/// Heuristic 0–1 score of how well `content` stands on its own.
pub fn extractability(content: &str, kind: BlockType) -> f64 {
    let mut score = base_score(kind) * length_factor(char_len(&strip_tags(content)));

    if has_list(content) {
        score *= 1.1;
    }
    if TABLE_RE.is_match(content) {
        score *= 1.15;
    }
    if CODE_RE.is_match(content) {
        score *= 1.05;
    }

    score.clamp(0.0, 1.0)
}
