use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

use schemars::JsonSchema;
use schemars::generate::SchemaSettings;

use super::schema::Schema;
use crate::error::GenerateError;

/// A type that can describe itself as a JSON Schema.
///
/// This is the boundary between documents and whatever produces their
/// schemas: the document only ever sees the name and the generated JSON.
pub trait ReflectSchema: Send + Sync {
    /// Stable name, used both as the `components.schemas` key and as the
    /// `$ref` suffix.
    fn schema_name(&self) -> Cow<'_, str>;

    /// Produce the JSON Schema of this type. `by_alias` asks for serialized
    /// field names rather than declared ones, where the two differ.
    fn reflect_schema(&self, by_alias: bool) -> Result<serde_json::Value, GenerateError>;

    /// Identity of type-backed descriptors. Descriptors returning `None`
    /// are identified by their allocation.
    fn type_key(&self) -> Option<TypeId> {
        None
    }
}

/// Handle to a [`ReflectSchema`], placed in a document as
/// [`SchemaOrRef::Class`](super::schema::SchemaOrRef::Class).
///
/// Equality is identity of the underlying descriptor, never its name.
#[derive(Clone)]
pub struct SchemaClass(Arc<dyn ReflectSchema>);

impl SchemaClass {
    pub fn new(descriptor: impl ReflectSchema + 'static) -> Self {
        Self(Arc::new(descriptor))
    }

    /// Schema class backed by the `schemars` reflection of `T`.
    pub fn of<T: JsonSchema + 'static>() -> Self {
        Self::new(JsonSchemaClass::<T>(PhantomData))
    }

    /// Schema class for a prebuilt JSON Schema.
    pub fn inline(name: impl Into<String>, schema: serde_json::Value) -> Self {
        Self::new(InlineSchemaClass {
            name: name.into(),
            schema,
        })
    }

    pub fn name(&self) -> Cow<'_, str> {
        self.0.schema_name()
    }

    /// Reflect the class and load the result as a [`Schema`].
    ///
    /// A root `$schema` keyword is dropped: the OpenAPI document already
    /// fixes the dialect.
    pub fn generate(&self, by_alias: bool) -> Result<Schema, GenerateError> {
        let mut value = self.0.reflect_schema(by_alias)?;
        if let Some(object) = value.as_object_mut() {
            object.remove("$schema");
        }
        serde_json::from_value(value).map_err(|source| GenerateError::InvalidSchema {
            name: self.name().into_owned(),
            source,
        })
    }

    fn key(&self) -> ClassKey {
        match self.0.type_key() {
            Some(type_id) => ClassKey::Type(type_id),
            None => ClassKey::Instance(Arc::as_ptr(&self.0) as *const () as usize),
        }
    }
}

#[derive(PartialEq, Eq, Hash)]
enum ClassKey {
    Type(TypeId),
    Instance(usize),
}

impl PartialEq for SchemaClass {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for SchemaClass {}

impl Hash for SchemaClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Debug for SchemaClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SchemaClass").field(&self.name()).finish()
    }
}

/// Reflects `T` through `schemars` as a JSON Schema 2020-12 document.
///
/// `schemars` always applies serde renames, so `by_alias` has no effect.
struct JsonSchemaClass<T>(PhantomData<fn() -> T>);

impl<T: JsonSchema + 'static> ReflectSchema for JsonSchemaClass<T> {
    fn schema_name(&self) -> Cow<'_, str> {
        T::schema_name()
    }

    fn reflect_schema(&self, _by_alias: bool) -> Result<serde_json::Value, GenerateError> {
        let mut settings = SchemaSettings::draft2020_12();
        settings.meta_schema = None;
        let schema = settings.into_generator().into_root_schema_for::<T>();
        serde_json::to_value(schema).map_err(|e| GenerateError::Reflect {
            name: T::schema_name().into_owned(),
            message: e.to_string(),
        })
    }

    fn type_key(&self) -> Option<TypeId> {
        Some(TypeId::of::<T>())
    }
}

/// A fixed JSON Schema registered under a fixed name.
struct InlineSchemaClass {
    name: String,
    schema: serde_json::Value,
}

impl ReflectSchema for InlineSchemaClass {
    fn schema_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn reflect_schema(&self, _by_alias: bool) -> Result<serde_json::Value, GenerateError> {
        Ok(self.schema.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde::Serialize;
    use serde_json::json;

    use super::*;
    use crate::parse::schema::{SchemaType, TypeSet};

    #[derive(JsonSchema, Serialize)]
    struct Pet {
        name: String,
        #[serde(rename = "petAge")]
        age: Option<u32>,
    }

    #[derive(JsonSchema)]
    struct Owner {
        #[allow(dead_code)]
        pets: Vec<Pet>,
    }

    #[test]
    fn classes_of_same_type_are_equal() {
        assert_eq!(SchemaClass::of::<Pet>(), SchemaClass::of::<Pet>());
        assert_ne!(SchemaClass::of::<Pet>(), SchemaClass::of::<Owner>());

        let set: HashSet<_> = [SchemaClass::of::<Pet>(), SchemaClass::of::<Pet>()]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn inline_classes_are_identified_by_instance() {
        let a = SchemaClass::inline("Widget", json!({"type": "object"}));
        let b = SchemaClass::inline("Widget", json!({"type": "object"}));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.name(), b.name());
    }

    #[test]
    fn generates_schema_from_json_schema_type() {
        let class = SchemaClass::of::<Pet>();
        assert_eq!(class.name(), "Pet");

        let schema = class.generate(true).unwrap();
        assert_eq!(schema.title.as_deref(), Some("Pet"));
        assert_eq!(
            schema.schema_type,
            Some(TypeSet::Single(SchemaType::Object))
        );
        assert!(schema.properties.contains_key("name"));
        assert!(schema.properties.contains_key("petAge"));
        assert_eq!(schema.required, vec!["name".to_string()]);
        assert!(!schema.extra.contains_key("$schema"));
    }

    #[test]
    fn nested_types_land_in_defs() {
        let schema = SchemaClass::of::<Owner>().generate(true).unwrap();
        assert!(schema.defs.contains_key("Pet"));
    }

    #[test]
    fn inline_class_drops_meta_schema_and_keeps_unknown_keywords() {
        let class = SchemaClass::inline(
            "Widget",
            json!({
                "$schema": "https://json-schema.org/draft/2020-12/schema",
                "type": "object",
                "x-internal": true
            }),
        );
        let schema = class.generate(true).unwrap();
        assert!(!schema.extra.contains_key("$schema"));
        assert_eq!(schema.extra.get("x-internal"), Some(&json!(true)));
    }

    #[test]
    fn invalid_schema_is_reported_with_class_name() {
        let class = SchemaClass::inline("Broken", json!({"type": "not-a-type"}));
        let err = class.generate(true).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::InvalidSchema { ref name, .. } if name == "Broken"
        ));
    }

    #[test]
    fn debug_shows_name() {
        let class = SchemaClass::of::<Pet>();
        assert_eq!(format!("{class:?}"), "SchemaClass(\"Pet\")");
    }
}
