//! Generative engine optimization (GEO) analysis for HTML articles.
//!
//! Each analyzer is a pure function of its input: knowledge blocks,
//! content quality, terminology consistency, Q&A coverage and Schema.org
//! structured data. [`pipeline`] runs them together over article batches.

pub mod article;
pub mod config;
pub mod error;
pub mod html;
pub mod knowledge;
pub mod patterns;
pub mod pipeline;
pub mod qa;
pub mod quality;
pub mod schema;
pub mod terminology;

pub use article::{AiSummary, Article, Locale};
pub use config::Settings;
pub use error::{GeoError, Result};
pub use knowledge::{parse_knowledge_blocks, BlockType, KnowledgeBlock, KnowledgeBlockParser};
pub use pipeline::{analyze_article, analyze_batch, ArticleAnalysis, CheckReport};
pub use qa::{generate_qa, QaConfig, QaGenerator, QuestionCoverageMatrix};
pub use quality::{validate_content, ContentQualityReport, ContentValidator};
pub use schema::{generate_enhanced_schema, validate_enhanced_schema, EnhancedBlogPosting, SchemaOptions};
pub use terminology::{load_dictionary, validate_dictionary, TerminologyManager};
