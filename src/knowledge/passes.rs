use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::rules::{CueRule, Span, Title};
use super::{BlockSink, BlockType};
use crate::html::{char_len, chars_back, chars_forward, paragraphs, strip_tags, truncate};
use crate::patterns::{is_conclusion_sentence, is_definition_sentence};

static TABLE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<table[^>]*>.*?</table>").unwrap());
static PRE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<pre[^>]*>.*?</pre>").unwrap());
static OPEN_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(?:p|div|section)\b").unwrap());
static CLOSE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(?:p|div|section)>").unwrap());
static FIRST_SENTENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^。.!?！？]+[。.!?！？]").unwrap());

const CONTEXT_CHARS: usize = 500;
const TITLE_CHARS: usize = 50;

pub fn definitions(html: &str, rules: &[CueRule], sink: &mut BlockSink) {
    apply_cues(html, rules, sink);
}

pub fn explanations(html: &str, sink: &mut BlockSink) {
    for (element, _) in paragraphs(html) {
        let text = strip_tags(element);
        if is_definition_sentence(&text) || is_conclusion_sentence(&text) {
            continue;
        }
        let len = char_len(&text);
        if len > 20 && len <= 300 {
            sink.push(BlockType::Explanation, first_sentence_title(&text), element);
        }
    }
}

pub fn comparisons(html: &str, rules: &[CueRule], sink: &mut BlockSink) {
    for m in TABLE_BLOCK_RE.find_iter(html) {
        sink.push(BlockType::Comparison, "Comparison Table".to_string(), m.as_str());
    }
    apply_cues(html, rules, sink);
}

pub fn examples(html: &str, rules: &[CueRule], sink: &mut BlockSink) {
    for m in PRE_BLOCK_RE.find_iter(html) {
        sink.push(BlockType::Example, "Code Example".to_string(), m.as_str());
    }
    apply_cues(html, rules, sink);
}

pub fn conclusions(html: &str, rules: &[CueRule], sink: &mut BlockSink) {
    apply_cues(html, rules, sink);
}

/// Run every rule over `html` in table order, emitting one block per
/// accepted match.
fn apply_cues(html: &str, rules: &[CueRule], sink: &mut BlockSink) {
    for rule in rules {
        for caps in rule.pattern.captures_iter(html) {
            let Some(whole) = caps.get(0) else {
                continue;
            };

            let title = match rule.title {
                Title::Fixed(t) => t.to_string(),
                Title::Term => {
                    let term = group_text(&caps, "term");
                    if term.is_empty() {
                        continue;
                    }
                    format!("Definition: {}", term)
                }
                Title::Pair => {
                    let a = group_text(&caps, "a");
                    let b = group_text(&caps, "b");
                    if a.is_empty() || b.is_empty() {
                        continue;
                    }
                    format!(
                        "Comparison: {} vs {}",
                        truncate(&a, TITLE_CHARS),
                        truncate(&b, TITLE_CHARS)
                    )
                }
            };

            let content = match rule.span {
                Span::Match => {
                    let end = caps.name("body").map(|b| b.end()).unwrap_or(whole.end());
                    &html[whole.start()..end]
                }
                Span::Context => surrounding_context(html, whole.start()),
            };

            let detail = caps
                .name("body")
                .map(|b| strip_tags(b.as_str()))
                .unwrap_or_else(|| strip_tags(content));
            if char_len(&detail) <= rule.min_chars {
                continue;
            }

            sink.push(rule.kind, title, content);
        }
    }
}

fn group_text(caps: &Captures, name: &str) -> String {
    caps.name(name).map(|m| strip_tags(m.as_str())).unwrap_or_default()
}

/// The paragraph, div or section containing byte offset `idx`, bounded to
/// roughly 500 chars on each side.
pub fn surrounding_context(html: &str, idx: usize) -> &str {
    let lo = chars_back(html, idx, CONTEXT_CHARS);
    let start = OPEN_BLOCK_RE
        .find_iter(&html[lo..idx])
        .last()
        .map(|m| lo + m.start())
        .unwrap_or(lo);

    let hi = chars_forward(html, idx, CONTEXT_CHARS);
    let end = CLOSE_BLOCK_RE
        .find(&html[idx..hi])
        .map(|m| idx + m.end())
        .unwrap_or(hi);

    &html[start..end]
}

fn first_sentence_title(text: &str) -> String {
    match FIRST_SENTENCE_RE.find(text) {
        Some(m) => truncate(m.as_str().trim(), TITLE_CHARS),
        None => truncate(text, TITLE_CHARS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_is_enclosing_paragraph() {
        let html = "<p>first para</p><p>例如：一个借贷协议。</p><p>third</p>";
        let idx = html.find("例如").unwrap();
        assert_eq!(surrounding_context(html, idx), "<p>例如：一个借贷协议。</p>");
    }

    #[test]
    fn context_without_tags_is_bounded() {
        let text = "a".repeat(2000);
        let ctx = surrounding_context(&text, 1000);
        assert_eq!(ctx.len(), 1000);
    }

    #[test]
    fn context_skips_pre_when_looking_back() {
        let html = "<div>intro <pre>x</pre> for example here</div>";
        let idx = html.find("for example").unwrap();
        assert_eq!(surrounding_context(html, idx), html);
    }

    #[test]
    fn title_prefers_first_sentence() {
        assert_eq!(first_sentence_title("短句。后面还有很多内容"), "短句。");
        let long = "x".repeat(80);
        assert_eq!(first_sentence_title(&long), format!("{}...", "x".repeat(50)));
    }
}
