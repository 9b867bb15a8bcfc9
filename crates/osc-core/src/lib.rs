//! OpenAPI 3.x documents whose schemas come from schema classes.
//!
//! Build an [`OpenApiSpec`](parse::spec::OpenApiSpec) with
//! [`SchemaOrRef::Class`](parse::schema::SchemaOrRef::Class) placeholders in
//! any schema position, then call [`transform::construct`] to replace them
//! with `$ref`s and register the generated schemas under
//! `components.schemas`.

pub mod config;
pub mod error;
pub mod parse;
pub mod transform;

pub use parse::class::{ReflectSchema, SchemaClass};
