use std::sync::LazyLock;

use regex::Regex;

use super::BlockType;

/// How a matched cue is titled.
#[derive(Debug, Clone, Copy)]
pub enum Title {
    Fixed(&'static str),
    /// `Definition: <term>` from the `term` group.
    Term,
    /// `Comparison: <a> vs <b>` from the `a` and `b` groups.
    Pair,
}

/// What a matched cue stores as block content.
#[derive(Debug, Clone, Copy)]
pub enum Span {
    /// From the match start to the end of the `body` group (or the match).
    Match,
    /// The paragraph-ish window around the match start.
    Context,
}

#[derive(Debug)]
pub struct CueRule {
    pub kind: BlockType,
    pub pattern: Regex,
    pub title: Title,
    pub span: Span,
    /// The stripped detail (the `body` group, or the content when there is
    /// none) must be longer than this many chars.
    pub min_chars: usize,
}

impl CueRule {
    fn new(kind: BlockType, pattern: &str, title: Title, span: Span, min_chars: usize) -> Self {
        CueRule {
            kind,
            pattern: Regex::new(pattern).unwrap(),
            title,
            span,
            min_chars,
        }
    }
}

/// Cue tables for the four text-driven passes.
#[derive(Debug)]
pub struct BlockRules {
    pub definitions: Vec<CueRule>,
    pub comparisons: Vec<CueRule>,
    pub examples: Vec<CueRule>,
    pub conclusions: Vec<CueRule>,
}

pub static BUILTIN_RULES: LazyLock<BlockRules> = LazyLock::new(BlockRules::builtin);

// A definition body runs until </p>, </div>, a full stop or the end of input.
const ZH_END: &str = r"(?:</p>|</div>|。|$)";
const EN_END: &str = r"(?:</p>|</div>|\.|$)";
const TERM: &str = r"(?P<term>[^<>。.!?！？]+?)";
const BODY: &str = r"(?P<body>[^<>]+?)";

impl BlockRules {
    pub fn builtin() -> Self {
        use BlockType::*;

        let def = |marker: &str, end: &str| {
            CueRule::new(
                Definition,
                &format!("(?i){TERM}{marker}{BODY}{end}"),
                Title::Term,
                Span::Match,
                5,
            )
        };
        let definitions = vec![
            def("是指", ZH_END),
            def("指的是", ZH_END),
            def("定义为", ZH_END),
            CueRule::new(
                Definition,
                &format!("(?i)在本文中[，,]\\s*{TERM}指的是{BODY}{ZH_END}"),
                Title::Term,
                Span::Match,
                5,
            ),
            def(r"\s+is\s+defined\s+as\s+", EN_END),
            def(r"\s+refers\s+to\s+", EN_END),
            def(r"\s+means\s+", EN_END),
            CueRule::new(
                Definition,
                &format!(r"(?i)What\s+is\s+{TERM}\?\s*{BODY}{EN_END}"),
                Title::Term,
                Span::Match,
                5,
            ),
        ];

        let cmp = |pattern: &str| CueRule::new(Comparison, pattern, Title::Pair, Span::Context, 0);
        let comparisons = vec![
            cmp(r"(?i)(?P<a>.+?)和(?P<b>.+?)的区别"),
            cmp(r"(?i)(?P<a>.+?)与(?P<b>.+?)的对比"),
            cmp(r"(?i)(?P<a>.+?)\s+vs\.?\s+(?P<b>.+?)"),
            cmp(r"(?i)(?P<a>.+?)\s+versus\s+(?P<b>.+?)"),
            cmp(r"(?i)difference\s+between\s+(?P<a>.+?)\s+and\s+(?P<b>.+?)"),
        ];

        let example = |pattern: &str| {
            CueRule::new(Example, pattern, Title::Fixed("Example"), Span::Context, 0)
        };
        let examples = vec![
            example(r"例如[：:]"),
            example(r"举例来说"),
            example(r"比如说"),
            example(r"(?i)for\s+example"),
            example(r"(?i)for\s+instance"),
        ];

        let conclusion = |lead: &str, end: &str| {
            CueRule::new(
                Conclusion,
                &format!(r"(?i){lead}\s*(?P<tail>[^<>]+?){end}"),
                Title::Fixed("Conclusion"),
                Span::Context,
                20,
            )
        };
        let conclusions = vec![
            conclusion("因此[，,]", ZH_END),
            conclusion("结论是[：:]", ZH_END),
            conclusion("综上所述[，,]", ZH_END),
            conclusion("总结来说[，,]", ZH_END),
            conclusion("总之[，,]", ZH_END),
            conclusion("therefore[，,]", EN_END),
            conclusion(r"in\s+conclusion[，,]", EN_END),
            conclusion(r"to\s+summarize[，,]", EN_END),
            conclusion(r"in\s+summary[，,]", EN_END),
        ];

        BlockRules {
            definitions,
            comparisons,
            examples,
            conclusions,
        }
    }
}
