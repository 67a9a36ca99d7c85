use serde::Serialize;

use super::dates::is_valid_iso8601;
use super::EnhancedBlogPosting;

pub const WARNING_PREFIX: &str = "Warning:";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaValidation {
    /// False only when a non-warning error is present.
    pub valid: bool,
    pub errors: Vec<String>,
}

impl SchemaValidation {
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.errors
            .iter()
            .map(String::as_str)
            .filter(|e| e.starts_with(WARNING_PREFIX))
    }
}

pub fn validate_enhanced_schema(schema: &EnhancedBlogPosting) -> SchemaValidation {
    let mut errors: Vec<String> = Vec::new();
    let mut require = |present: bool, field: &str| {
        if !present {
            errors.push(format!("Missing required field: {}", field));
        }
    };

    require(!schema.headline.is_empty(), "headline");
    require(!schema.description.is_empty(), "description");
    require(schema.author.is_some(), "author");
    require(!schema.date_published.is_empty(), "datePublished");

    if schema.author.as_ref().is_some_and(|a| a.name.is_empty()) {
        errors.push("Author is missing required field: name".to_string());
    }

    if !schema.date_published.is_empty() && !is_valid_iso8601(&schema.date_published) {
        errors.push("Invalid datePublished format (must be ISO 8601)".to_string());
    }
    if let Some(modified) = schema.date_modified.as_deref() {
        if !modified.is_empty() && !is_valid_iso8601(modified) {
            errors.push("Invalid dateModified format (must be ISO 8601)".to_string());
        }
    }

    let mut warn_if = |missing: bool, message: &str| {
        if missing {
            errors.push(format!("{} {}", WARNING_PREFIX, message));
        }
    };
    warn_if(schema.publisher.is_none(), "Missing \"publisher\" field");
    warn_if(
        schema.about.as_ref().map_or(true, Vec::is_empty),
        "Missing \"about\" field (core concepts)",
    );
    warn_if(
        schema.teaches.as_ref().map_or(true, Vec::is_empty),
        "Missing \"teaches\" field (knowledge points)",
    );
    warn_if(
        schema.main_entity.as_ref().map_or(true, Vec::is_empty),
        "Missing \"mainEntity\" field (Q&A structure)",
    );

    let valid = errors.iter().all(|e| e.starts_with(WARNING_PREFIX));
    SchemaValidation { valid, errors }
}
