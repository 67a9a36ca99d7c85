//! Knowledge block extraction.
//!
//! Five independent passes (definitions, explanations, comparisons,
//! examples, conclusions) run over the same HTML and their blocks are
//! concatenated in that order. Overlapping blocks are kept: a sentence can
//! legitimately yield both a comparison and an example.

pub mod passes;
pub mod rules;
pub mod score;

use serde::{Deserialize, Serialize};
use tracing::debug;

use rules::{BlockRules, BUILTIN_RULES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Definition,
    Explanation,
    Comparison,
    Example,
    Conclusion,
}

impl BlockType {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Definition => "definition",
            BlockType::Explanation => "explanation",
            BlockType::Comparison => "comparison",
            BlockType::Example => "example",
            BlockType::Conclusion => "conclusion",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BlockType,
    pub title: String,
    /// Raw HTML fragment.
    pub content: String,
    pub related_blocks: Vec<String>,
    pub extractability: f64,
}

/// Accumulates blocks for one `parse` call and hands out `kb-<n>` ids.
pub struct BlockSink {
    blocks: Vec<KnowledgeBlock>,
    next_id: usize,
}

impl BlockSink {
    fn new() -> Self {
        BlockSink {
            blocks: Vec::new(),
            next_id: 0,
        }
    }

    pub fn push(&mut self, kind: BlockType, title: String, content: &str) {
        self.next_id += 1;
        self.blocks.push(KnowledgeBlock {
            id: format!("kb-{}", self.next_id),
            kind,
            title,
            content: content.to_string(),
            related_blocks: Vec::new(),
            extractability: score::extractability(content, kind),
        });
    }

    fn len(&self) -> usize {
        self.blocks.len()
    }
}

/// Splits article HTML into knowledge blocks.
///
/// Holds no mutable state, so one parser can serve any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct KnowledgeBlockParser<'r> {
    rules: &'r BlockRules,
}

impl Default for KnowledgeBlockParser<'static> {
    fn default() -> Self {
        KnowledgeBlockParser {
            rules: &BUILTIN_RULES,
        }
    }
}

impl KnowledgeBlockParser<'static> {
    pub fn new() -> Self {
        KnowledgeBlockParser::default()
    }
}

impl<'r> KnowledgeBlockParser<'r> {
    pub fn with_rules(rules: &'r BlockRules) -> Self {
        KnowledgeBlockParser { rules }
    }

    pub fn parse(&self, html: &str) -> Vec<KnowledgeBlock> {
        if html.trim().is_empty() {
            return Vec::new();
        }

        let mut sink = BlockSink::new();

        passes::definitions(html, &self.rules.definitions, &mut sink);
        let after_definitions = sink.len();
        passes::explanations(html, &mut sink);
        let after_explanations = sink.len();
        passes::comparisons(html, &self.rules.comparisons, &mut sink);
        let after_comparisons = sink.len();
        passes::examples(html, &self.rules.examples, &mut sink);
        let after_examples = sink.len();
        passes::conclusions(html, &self.rules.conclusions, &mut sink);

        debug!(
            definitions = after_definitions,
            explanations = after_explanations - after_definitions,
            comparisons = after_comparisons - after_explanations,
            examples = after_examples - after_comparisons,
            conclusions = sink.len() - after_examples,
            "parsed knowledge blocks"
        );

        sink.blocks
    }
}

/// One-off parse with the built-in rules.
pub fn parse_knowledge_blocks(html: &str) -> Vec<KnowledgeBlock> {
    KnowledgeBlockParser::default().parse(html)
}
