use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::example::ExampleOrRef;
use super::operation::{CallbackOrRef, PathItem};
use super::parameter::{HeaderOrRef, ParameterOrRef};
use super::request_body::RequestBodyOrRef;
use super::response::ResponseOrRef;
use super::schema::SchemaOrRef;
use super::security::SecuritySchemeOrRef;

/// Components object holding reusable definitions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, SchemaOrRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, ResponseOrRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, ParameterOrRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub examples: IndexMap<String, ExampleOrRef>,

    #[serde(
        rename = "requestBodies",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub request_bodies: IndexMap<String, RequestBodyOrRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, HeaderOrRef>,

    #[serde(
        rename = "securitySchemes",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub security_schemes: IndexMap<String, SecuritySchemeOrRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub callbacks: IndexMap<String, CallbackOrRef>,

    #[serde(rename = "pathItems", default, skip_serializing_if = "IndexMap::is_empty")]
    pub path_items: IndexMap<String, PathItem>,
}

impl Components {
    /// Whether `section` (as spelled in a `#/components/<section>/` pointer)
    /// holds an entry called `name`. Unknown sections hold nothing.
    pub fn contains(&self, section: &str, name: &str) -> bool {
        match section {
            "schemas" => self.schemas.contains_key(name),
            "responses" => self.responses.contains_key(name),
            "parameters" => self.parameters.contains_key(name),
            "examples" => self.examples.contains_key(name),
            "requestBodies" => self.request_bodies.contains_key(name),
            "headers" => self.headers.contains_key(name),
            "securitySchemes" => self.security_schemes.contains_key(name),
            "callbacks" => self.callbacks.contains_key(name),
            "pathItems" => self.path_items.contains_key(name),
            _ => false,
        }
    }
}
