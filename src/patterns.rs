//! Marker vocabulary shared by the block parser and the quality validator.

use std::sync::LazyLock;

use regex::Regex;

/// Any definition marker anywhere in the text.
pub static DEFINITION_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)是指|指的是|定义为|is\s+defined\s+as|refers\s+to").unwrap()
});

/// Any conclusion marker anywhere in the text.
pub static CONCLUSION_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)因此|结论是|综上所述|总结来说|therefore|in\s+conclusion|to\s+summarize").unwrap()
});

/// A conclusion marker opening the text.
static CONCLUSION_LEAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:因此|结论是|综上所述|总结来说|总之|therefore|in\s+conclusion|to\s+summarize)")
        .unwrap()
});

static LIST_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<(?:ul|ol)[\s>]").unwrap());

pub fn is_definition_sentence(text: &str) -> bool {
    DEFINITION_MARKER_RE.is_match(text)
}

pub fn is_conclusion_sentence(text: &str) -> bool {
    CONCLUSION_LEAD_RE.is_match(text.trim())
}

pub fn has_list(html: &str) -> bool {
    LIST_RE.is_match(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_markers_both_languages() {
        assert!(is_definition_sentence("DeFi是指去中心化金融"));
        assert!(is_definition_sentence("A wallet REFERS TO a key store"));
        assert!(!is_definition_sentence("智能合约很有用"));
    }

    #[test]
    fn conclusion_must_lead() {
        assert!(is_conclusion_sentence("  因此，我们应当审计合约"));
        assert!(is_conclusion_sentence("In conclusion, audits matter"));
        assert!(!is_conclusion_sentence("我们因此需要审计"));
        assert!(CONCLUSION_MARKER_RE.is_match("我们因此需要审计"));
    }

    #[test]
    fn lists_with_or_without_attributes() {
        assert!(has_list("<ul><li>a</li></ul>"));
        assert!(has_list(r#"<ol class="steps">"#));
        assert!(!has_list("<ultra>"));
    }
}
