use osc_core::parse;
use osc_core::parse::operation::CallbackOrRef;
use osc_core::parse::parameter::{HeaderOrRef, ParameterOrRef};
use osc_core::parse::response::ResponseOrRef;
use osc_core::parse::schema::{AdditionalProperties, SchemaOrRef, SchemaType, TypeSet};
use osc_core::parse::spec::{Info, OpenApiSpec};
use osc_core::error::{DumpError, ParseError};

const PETSTORE: &str = include_str!("fixtures/petstore.yaml");

#[test]
fn parse_petstore_yaml() {
    let spec = parse::from_yaml(PETSTORE).expect("should parse petstore");
    assert_eq!(spec.openapi, "3.1.0");
    assert_eq!(spec.info.title, "Petstore");
    assert_eq!(spec.paths.len(), 1);
    assert_eq!(spec.webhooks.len(), 1);
    assert_eq!(spec.servers[0].variables["version"].enum_values, vec!["v1", "v2"]);
    assert_eq!(spec.servers[0].default_url(), "https://petstore.example.com/v1");

    let components = spec.components.as_ref().expect("should have components");
    assert_eq!(components.schemas.len(), 2);
    assert_eq!(components.parameters.len(), 1);
    assert_eq!(components.request_bodies.len(), 1);
    assert_eq!(components.responses.len(), 1);
    assert_eq!(components.security_schemes.len(), 1);
}

#[test]
fn parse_operation_details() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let get = spec.paths["/pets"].get.as_ref().expect("should have GET");
    assert_eq!(get.operation_id.as_deref(), Some("listPets"));
    assert_eq!(
        get.extensions.get("x-codegen-request-body-name"),
        Some(&serde_json::json!("body"))
    );

    assert!(matches!(get.parameters[0], ParameterOrRef::Parameter(_)));
    assert!(matches!(
        &get.parameters[1],
        ParameterOrRef::Ref(r) if r.ref_path == "#/components/parameters/TraceId"
    ));
    assert!(matches!(get.responses["default"], ResponseOrRef::Ref(_)));

    match &get.responses["200"] {
        ResponseOrRef::Response(r) => {
            assert!(matches!(r.headers["x-next"], HeaderOrRef::Header(_)));
            let schema = r.content["application/json"].schema.as_ref().unwrap();
            let items = schema.as_schema().unwrap().items.as_ref().unwrap();
            assert_eq!(items.as_ref_path(), Some("#/components/schemas/Pet"));
        }
        _ => panic!("expected inline response"),
    }

    let post = spec.paths["/pets"].post.as_ref().expect("should have POST");
    match &post.callbacks["onAdopted"] {
        CallbackOrRef::Callback(callback) => {
            assert!(callback["{$request.body#/callbackUrl}"].post.is_some());
        }
        _ => panic!("expected inline callback"),
    }
}

#[test]
fn parse_components_schemas() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let components = spec.components.as_ref().unwrap();

    let pet = components.schemas["Pet"].as_schema().expect("inline Pet");
    assert_eq!(pet.required, vec!["id", "name"]);
    assert_eq!(pet.extra.get("x-entity"), Some(&serde_json::json!("pet")));

    let tag = pet.properties["tag"].as_schema().unwrap();
    assert_eq!(
        tag.schema_type,
        Some(TypeSet::Multiple(vec![SchemaType::String, SchemaType::Null]))
    );

    let attributes = pet.properties["attributes"].as_schema().unwrap();
    assert!(matches!(
        attributes.additional_properties,
        Some(AdditionalProperties::Schema(_))
    ));

    let error = components.schemas["Error"].as_schema().unwrap();
    assert_eq!(
        error.additional_properties,
        Some(AdditionalProperties::Bool(false))
    );
}

#[test]
fn parse_json_document() {
    let json = r##"{
        "openapi": "3.0.3",
        "info": {"title": "Tiny", "version": "0.1"},
        "components": {"schemas": {"Anything": true}}
    }"##;
    let spec = parse::from_json(json).unwrap();
    assert_eq!(spec.info.title, "Tiny");
    assert_eq!(
        spec.components.unwrap().schemas["Anything"],
        SchemaOrRef::Bool(true)
    );
}

#[test]
fn parse_invalid_version() {
    let yaml = r#"
openapi: "2.0.0"
info:
  title: Test
  version: "1.0"
paths: {}
"#;
    let result = parse::from_yaml(yaml);
    assert!(matches!(result, Err(ParseError::UnsupportedVersion(v)) if v == "2.0.0"));
}

#[test]
fn yaml_dump_reloads_to_same_document() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let dumped = parse::to_yaml(&spec).unwrap();
    let reloaded = parse::from_yaml(&dumped).unwrap();
    assert_eq!(reloaded, spec);
}

#[test]
fn dump_fails_while_schema_class_is_unresolved() {
    #[derive(schemars::JsonSchema)]
    #[allow(dead_code)]
    struct Pending {
        id: u64,
    }

    let mut spec = OpenApiSpec::new(Info::new("Pending", "1.0"));
    spec.components = Some(osc_core::parse::components::Components {
        schemas: [("Pending".to_string(), SchemaOrRef::class::<Pending>())]
            .into_iter()
            .collect(),
        ..Default::default()
    });

    assert!(matches!(parse::to_json(&spec), Err(DumpError::Json(_))));
    assert!(matches!(parse::to_yaml(&spec), Err(DumpError::Yaml(_))));
}

#[test]
fn ref_with_sibling_keywords_survives_load_and_dump() {
    let yaml = r##"
openapi: 3.1.0
info:
  title: Siblings
  version: "1.0"
components:
  schemas:
    Owner:
      type: object
      properties:
        pet:
          $ref: "#/components/schemas/Pet"
          description: The owner's pet
          readOnly: true
          default:
            name: Rex
    Pet:
      type: object
"##;
    let spec = parse::from_yaml(yaml).unwrap();
    let owner = spec.components.as_ref().unwrap().schemas["Owner"]
        .as_schema()
        .unwrap();
    let pet = owner.properties["pet"].as_schema().expect("schema with $ref");
    assert_eq!(pet.ref_path.as_deref(), Some("#/components/schemas/Pet"));
    assert_eq!(pet.read_only, Some(true));
    assert_eq!(pet.default_value, Some(serde_json::json!({"name": "Rex"})));

    let reloaded = parse::from_json(&parse::to_json(&spec).unwrap()).unwrap();
    assert_eq!(reloaded, spec);
}
