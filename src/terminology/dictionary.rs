use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::{TermCategory, TerminologyDictionary, TerminologyManager};
use crate::error::{GeoError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DictionaryValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Structural check of raw dictionary JSON. Reports every problem found and
/// never fails itself.
pub fn validate_dictionary(data: &Value) -> DictionaryValidation {
    let mut errors = Vec::new();

    if !present(data.get("version")) {
        errors.push("Missing required field: version".to_string());
    }
    if !present(data.get("lastUpdated")) {
        errors.push("Missing required field: lastUpdated".to_string());
    }

    match data.get("entries").and_then(Value::as_array) {
        None => errors.push("Missing or invalid field: entries (must be an array)".to_string()),
        Some(entries) => {
            for (i, entry) in entries.iter().enumerate() {
                validate_entry(i, entry, &mut errors);
            }
            check_alias_collisions(entries, &mut errors);
        }
    }

    DictionaryValidation {
        valid: errors.is_empty(),
        errors,
    }
}

fn validate_entry(i: usize, entry: &Value, errors: &mut Vec<String>) {
    for field in ["term", "canonicalName", "definition"] {
        if !present(entry.get(field)) {
            errors.push(format!("Entry {}: Missing required field: {}", i, field));
        }
    }
    for field in ["aliases", "relatedTerms"] {
        if !entry.get(field).is_some_and(Value::is_array) {
            errors.push(format!("Entry {}: Field '{}' must be an array", i, field));
        }
    }
    match entry.get("category") {
        c if !present(c) => errors.push(format!("Entry {}: Missing required field: category", i)),
        Some(Value::String(c)) if TermCategory::NAMES.contains(&c.as_str()) => {}
        Some(c) => errors.push(format!("Entry {}: Invalid category: {}", i, c)),
        None => {}
    }
}

/// A canonical name must never be listed as an alias, of its own entry or
/// any other.
fn check_alias_collisions(entries: &[Value], errors: &mut Vec<String>) {
    let canonical: HashSet<String> = entries
        .iter()
        .filter_map(|e| e.get("canonicalName").and_then(Value::as_str))
        .map(|c| c.trim().to_lowercase())
        .collect();

    for (i, entry) in entries.iter().enumerate() {
        let aliases = entry.get("aliases").and_then(Value::as_array);
        for alias in aliases.into_iter().flatten().filter_map(Value::as_str) {
            if canonical.contains(&alias.trim().to_lowercase()) {
                errors.push(format!(
                    "Entry {}: Alias \"{}\" is also a canonical name",
                    i, alias
                ));
            }
        }
    }
}

/// Mirrors JSON truthiness: absent, null, false, 0 and "" all count as missing.
fn present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(_) => true,
    }
}

/// Validate and load dictionary JSON text.
pub fn parse_dictionary(json: &str) -> Result<TerminologyManager> {
    let raw: Value = serde_json::from_str(json)?;
    let validation = validate_dictionary(&raw);
    if !validation.valid {
        warn!(errors = validation.errors.len(), "rejecting terminology dictionary");
        return Err(GeoError::InvalidDictionary(validation.errors));
    }
    let dictionary: TerminologyDictionary = serde_json::from_value(raw)?;
    Ok(TerminologyManager::new(dictionary))
}

pub fn load_dictionary<P: AsRef<Path>>(path: P) -> Result<TerminologyManager> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    let manager = parse_dictionary(&json)?;
    info!(
        path = %path.display(),
        entries = manager.entries().len(),
        "loaded terminology dictionary"
    );
    Ok(manager)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;

    use super::*;

    #[test]
    fn fixture_is_valid() {
        let json = std::fs::read_to_string("tests/fixtures/terminology.json").unwrap();
        let raw: Value = serde_json::from_str(&json).unwrap();
        let v = validate_dictionary(&raw);
        assert!(v.valid, "{:?}", v.errors);
    }

    #[test]
    fn missing_top_level_fields() {
        let v = validate_dictionary(&json!({"version": "", "entries": {}}));
        assert!(!v.valid);
        assert_eq!(
            v.errors,
            vec![
                "Missing required field: version",
                "Missing required field: lastUpdated",
                "Missing or invalid field: entries (must be an array)",
            ]
        );
    }

    #[test]
    fn entry_errors_are_indexed() {
        let v = validate_dictionary(&json!({
            "version": "1",
            "lastUpdated": "2025-01-01",
            "entries": [
                {"term": "A", "canonicalName": "A", "definition": "d", "aliases": [], "relatedTerms": [], "category": "defi"},
                {"term": "B", "aliases": "b", "category": "nft"}
            ]
        }));
        assert_eq!(
            v.errors,
            vec![
                "Entry 1: Missing required field: canonicalName",
                "Entry 1: Missing required field: definition",
                "Entry 1: Field 'aliases' must be an array",
                "Entry 1: Field 'relatedTerms' must be an array",
                "Entry 1: Invalid category: \"nft\"",
            ]
        );
    }

    #[test]
    fn canonical_used_as_alias() {
        let v = validate_dictionary(&json!({
            "version": "1",
            "lastUpdated": "2025-01-01",
            "entries": [
                {"term": "DeFi", "canonicalName": "DeFi", "definition": "d", "aliases": [], "relatedTerms": [], "category": "defi"},
                {"term": "Web3", "canonicalName": "Web3", "definition": "d", "aliases": ["defi"], "relatedTerms": [], "category": "web3"}
            ]
        }));
        assert!(!v.valid);
        assert_eq!(v.errors, vec!["Entry 1: Alias \"defi\" is also a canonical name"]);
    }

    #[test]
    fn non_object_input_reports() {
        let v = validate_dictionary(&json!([1, 2, 3]));
        assert_eq!(v.errors.len(), 3);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = std::fs::read_to_string("tests/fixtures/terminology.json").unwrap();
        file.write_all(json.as_bytes()).unwrap();
        let manager = load_dictionary(file.path()).unwrap();
        assert_eq!(manager.entries().len(), 4);
    }

    #[test]
    fn load_rejects_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"version": "1", "entries": []}"#).unwrap();
        match load_dictionary(file.path()) {
            Err(GeoError::InvalidDictionary(errors)) => {
                assert_eq!(errors, vec!["Missing required field: lastUpdated"]);
            }
            other => panic!("unexpected: {:?}", other.map(|m| m.entries().len())),
        }
        assert!(matches!(load_dictionary("/nonexistent/terms.json"), Err(GeoError::Io(_))));
    }
}
