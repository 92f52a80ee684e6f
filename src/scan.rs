use crate::error::Result;
use crate::parsers::{get_unified_inputs, UnifiedInputs};
use crate::registry::Registry;
use crate::resolver::Resolver;
use serde_json::Value;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Prefix interfaces with `I` and type aliases with `T`
    pub type_with_prefix: bool,
}

/// Result of resolving one document.
#[derive(Debug)]
pub struct Scan {
    pub inputs: UnifiedInputs,
    pub registry: Registry,
}

/// Normalizes `document` and resolves all of its schemas.
pub fn scan(document: &Value, options: ScanOptions) -> Result<Scan> {
    let inputs = get_unified_inputs(document)?;
    Ok(scan_inputs(inputs, options))
}

/// Resolves every schema of already normalized inputs.
pub fn scan_inputs(inputs: UnifiedInputs, options: ScanOptions) -> Scan {
    let mut registry = Registry::with_prefix(options.type_with_prefix);
    Resolver::new(&mut registry).register_all(&inputs.schemas);

    if options.type_with_prefix {
        registry.apply_declaration_names();
    }

    for id in registry.dangling_references() {
        warn!(id, "reference has no matching declaration");
    }
    if registry.collisions() > 0 {
        warn!(collisions = registry.collisions(), "declaration ids were overwritten");
    }
    info!(
        schemas = inputs.schemas.len(),
        declarations = registry.get_declarations().len(),
        "resolved schemas"
    );

    Scan { inputs, registry }
}
