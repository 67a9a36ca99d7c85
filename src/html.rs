use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<p(?:\s[^>]*)?>(.*?)</p>").unwrap());

/// Remove every `<…>` tag and trim the result.
pub fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").trim().to_string()
}

/// Like [`strip_tags`] but every tag becomes a line break, so text from
/// separate elements never runs together.
pub fn tags_to_lines(html: &str) -> String {
    TAG_RE.replace_all(html, "\n").into_owned()
}

/// Length in characters, which is what every threshold in the crate counts.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Every `<p>…</p>` in document order as (full element, inner html).
pub fn paragraphs(html: &str) -> Vec<(&str, &str)> {
    PARAGRAPH_RE
        .captures_iter(html)
        .map(|c| {
            let full = c.get(0).map(|m| m.as_str()).unwrap_or_default();
            let inner = c.get(1).map(|m| m.as_str()).unwrap_or_default();
            (full, inner)
        })
        .collect()
}

pub fn floor_boundary(s: &str, mut idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

pub fn ceil_boundary(s: &str, mut idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

/// Byte offset `n` chars to the left of `pos` (or 0).
pub fn chars_back(text: &str, pos: usize, n: usize) -> usize {
    let pos = floor_boundary(text, pos);
    text[..pos]
        .char_indices()
        .rev()
        .take(n)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(pos)
}

/// Byte offset `n` chars to the right of `pos` (or the end of `text`).
pub fn chars_forward(text: &str, pos: usize, n: usize) -> usize {
    let pos = floor_boundary(text, pos);
    text[pos..]
        .char_indices()
        .nth(n)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

/// Slice of `text` spanning `before` chars to the left of byte offset `pos`
/// and `after` chars to the right of it.
pub fn char_window(text: &str, pos: usize, before: usize, after: usize) -> &str {
    let start = chars_back(text, pos, before);
    let end = chars_forward(text, pos, after);
    &text[start..end]
}

/// First `max` chars of `s`, with "..." appended when anything was cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_nested_tags() {
        assert_eq!(strip_tags("  <p>a <b>bold</b> move</p> "), "a bold move");
        assert_eq!(strip_tags(""), "");
    }

    #[test]
    fn tags_become_line_breaks() {
        assert_eq!(tags_to_lines("<p>a</p><p>b</p>"), "\na\n\nb\n");
    }

    #[test]
    fn paragraphs_with_attributes() {
        let html = r#"<p class="lead">one</p><pre>skip</pre><p>two</p>"#;
        let ps = paragraphs(html);
        assert_eq!(ps.len(), 2);
        assert_eq!(ps[0].1, "one");
        assert_eq!(ps[1].0, "<p>two</p>");
    }

    #[test]
    fn paragraph_regex_ignores_pre_and_param() {
        assert!(paragraphs("<pre>x</pre><param>y</param>").is_empty());
    }

    #[test]
    fn window_counts_chars_not_bytes() {
        let text = "一二三四五六七八九十";
        let pos = text.char_indices().nth(5).unwrap().0;
        assert_eq!(char_window(text, pos, 2, 2), "四五六七");
        assert_eq!(char_window(text, 0, 3, 1), "一");
        assert_eq!(char_window(text, text.len(), 2, 5), "九十");
    }

    #[test]
    fn boundaries_snap_inside_multibyte() {
        let s = "a智b";
        assert_eq!(floor_boundary(s, 2), 1);
        assert_eq!(ceil_boundary(s, 2), 4);
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("智能合约很长", 4), "智能合约...");
    }
}
