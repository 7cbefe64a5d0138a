//! Parser for the vocabulary dataset.
//!
//! # Format
//! ```json
//! [
//!   { "en": "run", "ja": "走る", "en_example": "He runs fast.",
//!     "ja_example": "彼は速く走る。", "section": "Unit 1" }
//! ]
//! ```

use crate::error::{DatasetError, Result};
use crate::types::VocabEntry;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Parse a JSON dataset into entries.
///
/// The payload must be an array. Falsy elements (`null`, `false`, `0`, `""`)
/// are dropped; other non-object elements are dropped with a warning.
/// Object fields are read leniently: a missing or non-string field becomes
/// empty.
pub fn parse_dataset(content: &str) -> Result<Vec<VocabEntry>> {
    let value: Value = serde_json::from_str(content)?;
    let Value::Array(items) = value else {
        return Err(DatasetError::NotArray);
    };

    let mut entries = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(fields) => entries.push(entry_from_fields(&fields)),
            item if is_falsy(&item) => {}
            other => {
                tracing::warn!(
                    index = idx,
                    kind = value_kind(&other),
                    "skipping non-object dataset element"
                );
            }
        }
    }

    Ok(entries)
}

fn entry_from_fields(fields: &Map<String, Value>) -> VocabEntry {
    let text = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    VocabEntry {
        en: text("en"),
        ja: text("ja"),
        en_example: text("en_example"),
        ja_example: text("ja_example"),
        section: fields
            .get("section")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Distinct, trimmed, non-empty section tags in ascending order.
pub fn sections(entries: &[VocabEntry]) -> Vec<String> {
    entries
        .iter()
        .filter_map(VocabEntry::section_tag)
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
