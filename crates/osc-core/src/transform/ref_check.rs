use serde_json::Value;

use crate::error::ResolveError;
use crate::parse::schema::SchemaOrRef;
use crate::parse::spec::OpenApiSpec;

use super::visit::{Inspect, InspectSchemas, inspect_nested};

const COMPONENTS_PREFIX: &str = "#/components/";

/// Check that every `#/components/...` reference in `spec` points at an
/// existing component, and that no schema class is left unresolved.
///
/// External references and local pointers outside `#/components/` (such as
/// `#/$defs/...` inside generated schemas) are not checked.
pub fn check_refs(spec: &OpenApiSpec) -> Result<(), ResolveError> {
    let mut finder = ClassFinder::default();
    spec.inspect(&mut finder);
    if let Some(name) = finder.0 {
        return Err(ResolveError::UnresolvedClass(name));
    }

    let value = serde_json::to_value(spec)?;
    check_value(spec, &value)
}

#[derive(Default)]
struct ClassFinder(Option<String>);

impl InspectSchemas for ClassFinder {
    fn inspect_schema_or_ref(&mut self, node: &SchemaOrRef) {
        if let SchemaOrRef::Class(class) = node {
            self.0.get_or_insert_with(|| class.name().into_owned());
        }
        inspect_nested(self, node);
    }
}

fn check_value(spec: &OpenApiSpec, value: &Value) -> Result<(), ResolveError> {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(ref_path)) = map.get("$ref") {
                check_ref(spec, ref_path)?;
            }
            map.values().try_for_each(|v| check_value(spec, v))
        }
        Value::Array(items) => items.iter().try_for_each(|v| check_value(spec, v)),
        _ => Ok(()),
    }
}

fn check_ref(spec: &OpenApiSpec, ref_path: &str) -> Result<(), ResolveError> {
    if !ref_path.starts_with(COMPONENTS_PREFIX) {
        return Ok(());
    }
    let (section, name) = parse_ref_name(ref_path)?;
    let found = spec
        .components
        .as_ref()
        .is_some_and(|c| c.contains(section, name));
    if found {
        Ok(())
    } else {
        Err(ResolveError::RefTargetNotFound(ref_path.to_string()))
    }
}

/// Parse a `$ref` path like `#/components/schemas/Foo` into its section and
/// component name. Pointers into a component (`.../Foo/properties/id`) yield
/// the component they start from.
fn parse_ref_name(ref_path: &str) -> Result<(&str, &str), ResolveError> {
    let stripped = ref_path
        .strip_prefix(COMPONENTS_PREFIX)
        .ok_or_else(|| ResolveError::InvalidRefFormat(ref_path.to_string()))?;
    let mut segments = stripped.split('/');
    match (segments.next(), segments.next()) {
        (Some(section), Some(name)) if !section.is_empty() && !name.is_empty() => {
            Ok((section, name))
        }
        _ => Err(ResolveError::InvalidRefFormat(ref_path.to_string())),
    }
}
