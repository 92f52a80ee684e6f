use crate::error::{CodegenError, Result};
use crate::naming::get_paths_from_ref;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Which document family the inputs came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Swagger 2.0
    Swagger,
    /// OpenAPI 3.x
    OpenApi,
}

/// Swagger 2.0 and OpenAPI 3.0 documents normalized into one shape.
#[derive(Debug, Clone, Serialize)]
pub struct UnifiedInputs {
    pub data_type: DataType,
    pub base_path: String,
    pub paths: IndexMap<String, Value>,
    pub schemas: IndexMap<String, Value>,
    pub parameters: Option<IndexMap<String, Value>>,
    pub responses: Option<IndexMap<String, Value>>,
    pub request_bodies: Option<IndexMap<String, Value>>,
}

impl UnifiedInputs {
    /// Locates the object a local `$ref` points at.
    pub fn lookup_ref(&self, reference: &str) -> Option<&Value> {
        let paths = get_paths_from_ref(reference);
        let [category, id] = paths.as_slice() else {
            return None;
        };

        let table = match category.as_str() {
            "schemas" | "definitions" => Some(&self.schemas),
            "parameters" => self.parameters.as_ref(),
            "responses" => self.responses.as_ref(),
            "requestBodies" => self.request_bodies.as_ref(),
            _ => None,
        }?;
        table.get(id)
    }
}

/// Normalizes a parsed document. Missing sections become empty maps; only a
/// non-object root is rejected.
pub fn get_unified_inputs(document: &Value) -> Result<UnifiedInputs> {
    let root = document
        .as_object()
        .ok_or_else(|| CodegenError::InvalidDocument("document root must be an object".to_string()))?;

    let paths = to_map(root.get("paths")).unwrap_or_default();

    if root.contains_key("openapi") {
        let components = root.get("components");
        let section = |key: &str| to_map(components.and_then(|c| c.get(key)));

        return Ok(UnifiedInputs {
            data_type: DataType::OpenApi,
            base_path: server_base_path(root.get("servers")),
            paths,
            schemas: section("schemas").unwrap_or_default(),
            parameters: section("parameters"),
            responses: section("responses"),
            request_bodies: section("requestBodies"),
        });
    }

    Ok(UnifiedInputs {
        data_type: DataType::Swagger,
        base_path: root
            .get("basePath")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        paths,
        schemas: to_map(root.get("definitions")).unwrap_or_default(),
        parameters: to_map(root.get("parameters")),
        responses: to_map(root.get("responses")),
        request_bodies: None,
    })
}

fn to_map(value: Option<&Value>) -> Option<IndexMap<String, Value>> {
    value?
        .as_object()
        .map(|obj| obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
}

/// Path component of the first server url, e.g. `https://host/api/v1` -> `/api/v1`.
fn server_base_path(servers: Option<&Value>) -> String {
    let Some(url) = servers
        .and_then(Value::as_array)
        .and_then(|list| list.first())
        .and_then(|server| server.get("url"))
        .and_then(Value::as_str)
    else {
        return String::new();
    };

    let without_scheme = match url.split_once("://") {
        Some((_, rest)) => rest.find('/').map(|i| &rest[i..]).unwrap_or(""),
        None => url,
    };
    without_scheme.trim_end_matches('/').to_string()
}
