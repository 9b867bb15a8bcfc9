use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),
}

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("failed to write YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of a schema class to produce its schema.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("schema class {name} failed to reflect: {message}")]
    Reflect { name: String, message: String },

    #[error("schema class {name} produced an invalid schema: {source}")]
    InvalidSchema {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConstructError {
    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("schema {name:?} already exists at {ref_path}")]
    Collision { name: String, ref_path: String },
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid reference format: {0}")]
    InvalidRefFormat(String),

    #[error("reference target not found: {0}")]
    RefTargetNotFound(String),

    #[error("schema class left unresolved: {0}")]
    UnresolvedClass(String),

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}
