use serde::{Deserialize, Serialize};

/// A `$ref` pointer to an object defined elsewhere.
///
/// A Reference Object admits no keywords besides `summary` and
/// `description`. A schema that carries `$ref` next to other keywords is
/// not one and loads as a [`Schema`](super::schema::Schema) instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub ref_path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Reference {
    pub fn new(ref_path: impl Into<String>) -> Self {
        Self {
            ref_path: ref_path.into(),
            summary: None,
            description: None,
        }
    }

    /// The last path segment, e.g. `Pet` for `#/components/schemas/Pet`.
    pub fn name(&self) -> &str {
        self.ref_path.rsplit('/').next().unwrap_or(&self.ref_path)
    }
}
