pub mod swagger_parser;
pub mod unified;

use crate::error::Result;
use std::collections::HashMap;
use std::io;
use std::path::Path;

pub use swagger_parser::{parse_document, SwaggerParser};
pub use unified::*;

/// Input parser trait - reads a source file into unified inputs
pub trait InputParser: Send + Sync {
    /// Name of the input format (e.g., "swagger")
    fn format_name(&self) -> &str;

    /// File extensions this parser supports
    fn supported_extensions(&self) -> Vec<&str>;

    /// Parse input file into unified inputs
    fn parse(&self, source: &Path) -> Result<UnifiedInputs>;

    /// Validate input file before parsing
    fn validate(&self, source: &Path) -> Result<()> {
        if !source.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Input file not found: {:?}", source),
            )
            .into());
        }
        Ok(())
    }
}

/// Parser registry for managing available input parsers
pub struct ParserRegistry {
    parsers: HashMap<String, Box<dyn InputParser>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            parsers: HashMap::new(),
        };

        registry.register(Box::new(SwaggerParser));

        registry
    }

    pub fn register(&mut self, parser: Box<dyn InputParser>) {
        self.parsers.insert(parser.format_name().to_string(), parser);
    }

    pub fn get(&self, format: &str) -> Option<&dyn InputParser> {
        self.parsers.get(format).map(|parser| parser.as_ref())
    }

    /// Auto-detect parser from file extension
    pub fn detect(&self, path: &Path) -> Option<&dyn InputParser> {
        let ext = path.extension()?.to_str()?;

        self.parsers
            .values()
            .find(|parser| parser.supported_extensions().contains(&ext))
            .map(|parser| parser.as_ref())
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}
