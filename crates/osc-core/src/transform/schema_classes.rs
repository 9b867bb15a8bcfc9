use std::borrow::Cow;

use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};

use crate::config::{CollisionPolicy, ConstructOptions};
use crate::error::ConstructError;
use crate::parse::class::SchemaClass;
use crate::parse::components::Components;
use crate::parse::reference::Reference;
use crate::parse::schema::SchemaOrRef;
use crate::parse::spec::OpenApiSpec;

use super::visit::{Traverse, VisitSchemas, walk_schema_or_ref};

/// Construct a document with every schema class resolved, using default
/// options.
pub fn construct<'a>(
    open_api: &'a OpenApiSpec,
    schema_classes: &[SchemaClass],
) -> Result<Cow<'a, OpenApiSpec>, ConstructError> {
    construct_with_options(open_api, schema_classes, &ConstructOptions::default())
}

/// Construct a document whose `components.schemas` holds the generated
/// schema of every schema class, explicit or found in the document.
///
/// `open_api` is never modified. When there is nothing to generate it is
/// handed back as `Cow::Borrowed`; otherwise the result is a copy in which
/// each [`SchemaOrRef::Class`] is replaced by a reference to its schema.
///
/// Classes are generated in name order. Two classes with the same name
/// produce one entry: the one generated last wins. A generated name that is
/// already registered is resolved by `options.on_collision`; note that the
/// default policy overwrites the registered schema.
pub fn construct_with_options<'a>(
    open_api: &'a OpenApiSpec,
    schema_classes: &[SchemaClass],
    options: &ConstructOptions,
) -> Result<Cow<'a, OpenApiSpec>, ConstructError> {
    let mut new_open_api = open_api.clone();

    let mut classes: IndexSet<SchemaClass> = schema_classes.iter().cloned().collect();
    if options.scan_for_schema_classes {
        classes.extend(extract_schema_classes(&mut new_open_api, &options.ref_prefix));
    }

    if classes.is_empty() {
        return Ok(Cow::Borrowed(open_api));
    }

    let mut classes: Vec<SchemaClass> = classes.into_iter().collect();
    classes.sort_by(|a, b| a.name().cmp(&b.name()));

    let mut generated: IndexMap<String, SchemaOrRef> = IndexMap::new();
    for class in &classes {
        let schema = class.generate(options.by_alias)?;
        generated.insert(class.name().into_owned(), schema.into());
    }

    let components = new_open_api
        .components
        .get_or_insert_with(Components::default);
    merge_schemas(&mut components.schemas, generated, options)?;

    Ok(Cow::Owned(new_open_api))
}

fn merge_schemas(
    registry: &mut IndexMap<String, SchemaOrRef>,
    generated: IndexMap<String, SchemaOrRef>,
    options: &ConstructOptions,
) -> Result<(), ConstructError> {
    let prefix = &options.ref_prefix;
    for (name, schema) in generated {
        if registry.contains_key(&name) {
            match options.on_collision {
                CollisionPolicy::Overwrite => {
                    warn!(
                        "\"{name}\" already exists in {prefix}. \
                         The value of \"{prefix}{name}\" will be overwritten."
                    );
                }
                CollisionPolicy::KeepExisting => {
                    warn!(
                        "\"{name}\" already exists in {prefix}. \
                         The value of \"{prefix}{name}\" is kept."
                    );
                    continue;
                }
                CollisionPolicy::Error => {
                    return Err(ConstructError::Collision {
                        ref_path: format!("{prefix}{name}"),
                        name,
                    });
                }
            }
        }
        registry.insert(name, schema);
    }
    Ok(())
}

/// Replace every schema class in `open_api` with a reference to
/// `{ref_prefix}{name}` and return the distinct classes, in the order they
/// were first found.
///
/// This mutates `open_api`.
pub fn extract_schema_classes(
    open_api: &mut OpenApiSpec,
    ref_prefix: &str,
) -> IndexSet<SchemaClass> {
    let mut extractor = ClassExtractor {
        ref_prefix,
        found: IndexSet::new(),
    };
    open_api.traverse(&mut extractor);
    extractor.found
}

struct ClassExtractor<'a> {
    ref_prefix: &'a str,
    found: IndexSet<SchemaClass>,
}

impl VisitSchemas for ClassExtractor<'_> {
    fn visit_schema_or_ref(&mut self, node: &mut SchemaOrRef) {
        let class = match node {
            SchemaOrRef::Class(class) => class.clone(),
            _ => return walk_schema_or_ref(self, node),
        };
        debug!("schema class found: {class:?}");
        let reference = Reference::new(format!("{}{}", self.ref_prefix, class.name()));
        debug!("replaced with $ref {}", reference.ref_path);
        *node = SchemaOrRef::Ref(reference);
        self.found.insert(class);
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use schemars::JsonSchema;
    use serde_json::json;

    use super::*;
    use crate::parse::media_type::MediaType;
    use crate::parse::operation::{Operation, PathItem};
    use crate::parse::schema::Schema;
    use crate::parse::spec::Info;

    #[derive(JsonSchema)]
    #[allow(dead_code)]
    struct Pet {
        name: String,
    }

    fn base_spec() -> OpenApiSpec {
        OpenApiSpec::new(Info::new("Test", "1.0"))
    }

    fn spec_with_response_schema(schema: SchemaOrRef) -> OpenApiSpec {
        let mut spec = base_spec();
        let mut op = Operation::default();
        let mut response = crate::parse::response::Response::new("ok");
        response
            .content
            .insert("application/json".into(), MediaType::with_schema(schema));
        op.responses.insert(
            "200".into(),
            crate::parse::response::ResponseOrRef::Response(response),
        );
        spec.paths.insert(
            "/pets".into(),
            PathItem {
                get: Some(op),
                ..PathItem::default()
            },
        );
        spec
    }

    #[test]
    fn nothing_to_do_borrows_input() {
        let spec = spec_with_response_schema(Schema::default().into());
        let result = construct(&spec, &[]).unwrap();
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(*result, spec);
    }

    #[test]
    fn scan_disabled_leaves_classes_in_place() {
        let spec = spec_with_response_schema(SchemaOrRef::class::<Pet>());
        let options = ConstructOptions {
            scan_for_schema_classes: false,
            ..ConstructOptions::default()
        };
        let result = construct_with_options(&spec, &[], &options).unwrap();
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn explicit_class_without_scan_only_fills_registry() {
        let spec = spec_with_response_schema(SchemaOrRef::class::<Pet>());
        let options = ConstructOptions {
            scan_for_schema_classes: false,
            ..ConstructOptions::default()
        };
        let result =
            construct_with_options(&spec, &[SchemaClass::of::<Pet>()], &options).unwrap();
        let schemas = &result.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("Pet"));
        // The slot was not scanned, so it still holds the class.
        let slot = result.paths["/pets"].get.as_ref().unwrap().responses["200"].clone();
        match slot {
            crate::parse::response::ResponseOrRef::Response(r) => {
                assert!(matches!(
                    r.content["application/json"].schema,
                    Some(SchemaOrRef::Class(_))
                ));
            }
            _ => panic!("expected inline response"),
        }
    }

    #[test]
    fn custom_ref_prefix_is_used() {
        let spec = spec_with_response_schema(SchemaOrRef::class::<Pet>());
        let options = ConstructOptions {
            ref_prefix: "#/definitions/".to_string(),
            ..ConstructOptions::default()
        };
        let mut copy = spec.clone();
        let found = extract_schema_classes(&mut copy, &options.ref_prefix);
        assert_eq!(found.len(), 1);

        let result = construct_with_options(&spec, &[], &options).unwrap();
        let response = &result.paths["/pets"].get.as_ref().unwrap().responses["200"];
        match response {
            crate::parse::response::ResponseOrRef::Response(r) => {
                assert_eq!(
                    r.content["application/json"]
                        .schema
                        .as_ref()
                        .and_then(SchemaOrRef::as_ref_path),
                    Some("#/definitions/Pet")
                );
            }
            _ => panic!("expected inline response"),
        }
    }

    #[test]
    fn keep_existing_policy_keeps_registered_schema() {
        let mut spec = base_spec();
        let existing: SchemaOrRef = Schema {
            description: Some("hand written".into()),
            ..Schema::default()
        }
        .into();
        spec.components = Some(Components {
            schemas: [("Widget".to_string(), existing.clone())]
                .into_iter()
                .collect(),
            ..Components::default()
        });
        let widget = SchemaClass::inline("Widget", json!({"type": "string"}));
        let options = ConstructOptions {
            on_collision: CollisionPolicy::KeepExisting,
            ..ConstructOptions::default()
        };

        let result = construct_with_options(&spec, &[widget], &options).unwrap();
        assert_eq!(result.components.as_ref().unwrap().schemas["Widget"], existing);
    }

    #[test]
    fn error_policy_rejects_collision() {
        let mut spec = base_spec();
        spec.components = Some(Components {
            schemas: [("Widget".to_string(), Schema::default().into())]
                .into_iter()
                .collect(),
            ..Components::default()
        });
        let widget = SchemaClass::inline("Widget", json!({"type": "string"}));
        let options = ConstructOptions {
            on_collision: CollisionPolicy::Error,
            ..ConstructOptions::default()
        };

        let err = construct_with_options(&spec, &[widget], &options).unwrap_err();
        match err {
            ConstructError::Collision { name, ref_path } => {
                assert_eq!(name, "Widget");
                assert_eq!(ref_path, "#/components/schemas/Widget");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn same_name_classes_collapse_to_last_generated() {
        let first = SchemaClass::inline("Widget", json!({"description": "first"}));
        let second = SchemaClass::inline("Widget", json!({"description": "second"}));
        let base = base_spec();
        let result = construct(&base, &[first, second]).unwrap();
        let schemas = &result.components.as_ref().unwrap().schemas;
        assert_eq!(schemas.len(), 1);
        assert_eq!(
            schemas["Widget"]
                .as_schema()
                .and_then(|s| s.description.as_deref()),
            Some("second")
        );
    }
}
