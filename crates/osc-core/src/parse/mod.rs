pub mod class;
pub mod components;
pub mod example;
pub mod media_type;
pub mod operation;
pub mod parameter;
pub mod reference;
pub mod request_body;
pub mod response;
pub mod schema;
pub mod security;
pub mod server;
pub mod spec;

use crate::error::{DumpError, ParseError};
use spec::OpenApiSpec;

/// Parse an OpenAPI spec from YAML.
pub fn from_yaml(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_yaml_ng::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Parse an OpenAPI spec from JSON.
pub fn from_json(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_json::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Write a spec as YAML. Fails if a schema class is still in the document.
pub fn to_yaml(spec: &OpenApiSpec) -> Result<String, DumpError> {
    Ok(serde_yaml_ng::to_string(spec)?)
}

/// Write a spec as pretty-printed JSON. Fails if a schema class is still in
/// the document.
pub fn to_json(spec: &OpenApiSpec) -> Result<String, DumpError> {
    Ok(serde_json::to_string_pretty(spec)?)
}

fn validate_version(spec: &OpenApiSpec) -> Result<(), ParseError> {
    if !spec.openapi.starts_with("3.") {
        return Err(ParseError::UnsupportedVersion(spec.openapi.clone()));
    }
    Ok(())
}
