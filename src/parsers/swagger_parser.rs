use super::{get_unified_inputs, InputParser, UnifiedInputs};
use crate::error::{CodegenError, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads Swagger 2.0 / OpenAPI 3.0 documents written as JSON or YAML.
pub struct SwaggerParser;

impl InputParser for SwaggerParser {
    fn format_name(&self) -> &str {
        "swagger"
    }

    fn supported_extensions(&self) -> Vec<&str> {
        vec!["json", "yaml", "yml"]
    }

    fn parse(&self, source: &Path) -> Result<UnifiedInputs> {
        self.validate(source)?;

        let content = fs::read_to_string(source)?;
        let document = parse_document(&content)?;
        debug!(?source, "parsed document");

        get_unified_inputs(&document)
    }
}

/// Parses document text as JSON, falling back to YAML.
pub fn parse_document(content: &str) -> Result<Value> {
    let document: Value = match serde_json::from_str(content) {
        Ok(document) => document,
        Err(json_err) => serde_yaml::from_str(content)
            .map_err(|_| CodegenError::InvalidDocument(json_err.to_string()))?,
    };

    if !document.is_object() {
        return Err(CodegenError::InvalidDocument(
            "document root must be an object".to_string(),
        ));
    }

    Ok(document)
}
