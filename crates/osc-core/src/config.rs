use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default prefix of the `$ref` pointers that replace schema classes.
pub const DEFAULT_REF_PREFIX: &str = "#/components/schemas/";

/// Options of [`construct_with_options`](crate::transform::construct_with_options).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstructOptions {
    /// Walk the document for schema classes. When off, only the explicitly
    /// passed classes are generated and the document is left as is.
    pub scan_for_schema_classes: bool,
    /// Generate schemas with serialized (aliased) field names.
    pub by_alias: bool,
    /// Prefix of the `$ref` pointers written in place of schema classes.
    pub ref_prefix: String,
    pub on_collision: CollisionPolicy,
}

impl Default for ConstructOptions {
    fn default() -> Self {
        Self {
            scan_for_schema_classes: true,
            by_alias: true,
            ref_prefix: DEFAULT_REF_PREFIX.to_string(),
            on_collision: CollisionPolicy::Overwrite,
        }
    }
}

/// What to do when a generated schema name is already registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Log a warning and replace the registered schema.
    #[default]
    Overwrite,
    /// Log a warning and keep the registered schema.
    KeepExisting,
    /// Fail the construction.
    Error,
}

/// Project configuration loaded from `.osc.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OscConfig {
    pub input: String,
    /// Output file; stdout when unset.
    pub output: Option<String>,
    /// JSON Schema files, or directories of them, registered as schema classes.
    pub schemas: Vec<String>,
    pub construct: ConstructOptions,
}

impl Default for OscConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            output: None,
            schemas: Vec::new(),
            construct: ConstructOptions::default(),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".osc.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<OscConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: OscConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r##"# osc configuration
input: openapi.yaml
# output: openapi.bundled.yaml   # stdout when unset

# JSON Schema files (or directories of *.json files) to register under
# components/schemas. The file stem, in PascalCase, is the schema name.
schemas: []
  # - schemas/
  # - extra/pet-owner.json

construct:
  scan_for_schema_classes: true
  by_alias: true
  ref_prefix: "#/components/schemas/"
  on_collision: overwrite     # overwrite | keep_existing | error
"##
}
