use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: String,

    /// Swagger / OpenAPI documents to generate from
    #[serde(default)]
    pub data: Vec<PathBuf>,

    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Prefix interfaces with `I` and type aliases with `T`
    #[serde(rename = "typeWithPrefix", default)]
    pub type_with_prefix: bool,

    #[serde(default = "default_generator")]
    pub generator: String,

    /// Directory holding a custom `declarations.ts.tera`
    #[serde(default)]
    pub template: Option<PathBuf>,

    /// Text placed at the top of every generated file (e.g. imports)
    #[serde(rename = "fileHeader", default)]
    pub file_header: Option<String>,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_output() -> PathBuf {
    PathBuf::from(".output")
}

fn default_generator() -> String {
    "typescript".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            data: vec![],
            output: default_output(),
            type_with_prefix: false,
            generator: default_generator(),
            template: None,
            file_header: None,
        }
    }
}
