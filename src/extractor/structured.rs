use serde_json::Value;

use crate::extractor::document::DocumentHandle;

const JSON_LD_SELECTOR: &str = r#"script[type="application/ld+json"]"#;

/// A JSON-LD block that could not be parsed. Never fatal.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredDataParseError {
    /// Position among the page's JSON-LD scripts.
    pub index: usize,
    pub message: String,
}

/// Parses every `<script type="application/ld+json">`, keeping the blocks that
/// are valid JSON and reporting the rest.
pub fn extract_structured_data<D: DocumentHandle>(
    doc: &D,
) -> (Vec<Value>, Vec<StructuredDataParseError>) {
    let mut parsed = Vec::new();
    let mut errors = Vec::new();

    for (index, script) in doc.select_all(JSON_LD_SELECTOR).into_iter().enumerate() {
        match serde_json::from_str::<Value>(doc.text(script).trim()) {
            Ok(value) => parsed.push(value),
            Err(e) => errors.push(StructuredDataParseError {
                index,
                message: e.to_string(),
            }),
        }
    }

    (parsed, errors)
}
