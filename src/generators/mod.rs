pub mod typescript;

use crate::config::Config;
use crate::parsers::UnifiedInputs;
use crate::registry::Registry;
use anyhow::Result;
use std::collections::HashMap;

pub use typescript::TypeScriptGenerator;

/// Generated output from a generator
#[derive(Debug)]
pub struct GeneratedOutput {
    pub filename: String,
    pub content: String,
    pub metadata: HashMap<String, String>,
}

/// Generator trait - renders a resolved registry as target language code
pub trait Generator: Send + Sync {
    /// Unique name of the generator (e.g., "typescript")
    fn name(&self) -> &str;

    /// File extension for generated output (e.g., "ts")
    fn file_extension(&self) -> &str;

    /// Generate code from the resolved declarations of one document
    fn generate(
        &self,
        inputs: &UnifiedInputs,
        registry: &Registry,
        config: &Config,
    ) -> Result<GeneratedOutput>;

    /// Validate generator-specific configuration
    fn validate_config(&self, _config: &Config) -> Result<()> {
        Ok(())
    }
}

/// Generator registry for managing available code generators
pub struct GeneratorRegistry {
    generators: HashMap<String, Box<dyn Generator>>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            generators: HashMap::new(),
        };

        registry.register(Box::new(TypeScriptGenerator));

        registry
    }

    pub fn register(&mut self, generator: Box<dyn Generator>) {
        self.generators.insert(generator.name().to_string(), generator);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Generator> {
        self.generators.get(name).map(|generator| generator.as_ref())
    }

    pub fn available_generators(&self) -> Vec<&str> {
        self.generators.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
