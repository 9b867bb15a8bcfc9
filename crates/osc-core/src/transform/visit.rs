//! Traversal of every schema position in a document.
//!
//! Records implement [`Traverse`] (mutable) and [`Inspect`] (shared) by
//! handing each of their set fields that can (transitively) hold a schema to
//! the visitor, in declaration order. Sequences are walked in index order and
//! maps in insertion order. Unset fields (`None`, empty collections) are never
//! entered, and leaves such as strings or raw JSON values are not visited at
//! all. Both walks are generated from the same field lists, so they always
//! reach the same positions.

use indexmap::IndexMap;

use crate::parse::components::Components;
use crate::parse::media_type::{Encoding, MediaType};
use crate::parse::operation::{CallbackOrRef, Operation, PathItem};
use crate::parse::parameter::{Header, HeaderOrRef, Parameter, ParameterOrRef};
use crate::parse::request_body::{RequestBody, RequestBodyOrRef};
use crate::parse::response::{Response, ResponseOrRef};
use crate::parse::schema::{AdditionalProperties, Schema, SchemaOrRef};
use crate::parse::spec::OpenApiSpec;

/// Callback invoked on every schema position reached by a traversal.
pub trait VisitSchemas {
    /// Called once per schema position. The default descends into inline
    /// schemas; overriding implementations that still want to reach nested
    /// positions call [`walk_schema_or_ref`].
    fn visit_schema_or_ref(&mut self, node: &mut SchemaOrRef) {
        walk_schema_or_ref(self, node);
    }
}

/// Descend into the subschemas of an inline schema. Other variants are leaves.
pub fn walk_schema_or_ref<V: VisitSchemas + ?Sized>(visitor: &mut V, node: &mut SchemaOrRef) {
    if let SchemaOrRef::Schema(schema) = node {
        schema.traverse(visitor);
    }
}

/// Read-only counterpart of [`VisitSchemas`].
pub trait InspectSchemas {
    fn inspect_schema_or_ref(&mut self, node: &SchemaOrRef) {
        inspect_nested(self, node);
    }
}

/// Read-only counterpart of [`walk_schema_or_ref`].
pub fn inspect_nested<V: InspectSchemas + ?Sized>(visitor: &mut V, node: &SchemaOrRef) {
    if let SchemaOrRef::Schema(schema) = node {
        schema.inspect(visitor);
    }
}

/// A node of the document tree that may contain schema positions.
pub trait Traverse {
    fn traverse<V: VisitSchemas + ?Sized>(&mut self, visitor: &mut V);
}

/// Shared-reference walk over the same positions as [`Traverse`].
pub trait Inspect {
    fn inspect<V: InspectSchemas + ?Sized>(&self, visitor: &mut V);
}

impl<T: Traverse> Traverse for Vec<T> {
    fn traverse<V: VisitSchemas + ?Sized>(&mut self, visitor: &mut V) {
        for item in self {
            item.traverse(visitor);
        }
    }
}

impl<T: Inspect> Inspect for Vec<T> {
    fn inspect<V: InspectSchemas + ?Sized>(&self, visitor: &mut V) {
        for item in self {
            item.inspect(visitor);
        }
    }
}

impl<T: Traverse> Traverse for IndexMap<String, T> {
    fn traverse<V: VisitSchemas + ?Sized>(&mut self, visitor: &mut V) {
        for value in self.values_mut() {
            value.traverse(visitor);
        }
    }
}

impl<T: Inspect> Inspect for IndexMap<String, T> {
    fn inspect<V: InspectSchemas + ?Sized>(&self, visitor: &mut V) {
        for value in self.values() {
            value.inspect(visitor);
        }
    }
}

impl<T: Traverse> Traverse for Option<T> {
    fn traverse<V: VisitSchemas + ?Sized>(&mut self, visitor: &mut V) {
        if let Some(value) = self {
            value.traverse(visitor);
        }
    }
}

impl<T: Inspect> Inspect for Option<T> {
    fn inspect<V: InspectSchemas + ?Sized>(&self, visitor: &mut V) {
        if let Some(value) = self {
            value.inspect(visitor);
        }
    }
}

impl<T: Traverse> Traverse for Box<T> {
    fn traverse<V: VisitSchemas + ?Sized>(&mut self, visitor: &mut V) {
        (**self).traverse(visitor);
    }
}

impl<T: Inspect> Inspect for Box<T> {
    fn inspect<V: InspectSchemas + ?Sized>(&self, visitor: &mut V) {
        (**self).inspect(visitor);
    }
}

impl Traverse for SchemaOrRef {
    fn traverse<V: VisitSchemas + ?Sized>(&mut self, visitor: &mut V) {
        visitor.visit_schema_or_ref(self);
    }
}

impl Inspect for SchemaOrRef {
    fn inspect<V: InspectSchemas + ?Sized>(&self, visitor: &mut V) {
        visitor.inspect_schema_or_ref(self);
    }
}

/// Records whose schema positions are the listed fields.
macro_rules! schema_fields {
    ($($ty:ty => [$($field:ident),* $(,)?];)*) => {$(
        impl Traverse for $ty {
            fn traverse<V: VisitSchemas + ?Sized>(&mut self, visitor: &mut V) {
                $(self.$field.traverse(visitor);)*
            }
        }

        impl Inspect for $ty {
            fn inspect<V: InspectSchemas + ?Sized>(&self, visitor: &mut V) {
                $(Inspect::inspect(&self.$field, visitor);)*
            }
        }
    )*};
}

/// Unions whose only schema-bearing variant is the listed one; `$ref`
/// variants are leaves.
macro_rules! schema_variant {
    ($($ty:ident::$variant:ident;)*) => {$(
        impl Traverse for $ty {
            fn traverse<V: VisitSchemas + ?Sized>(&mut self, visitor: &mut V) {
                if let $ty::$variant(inner) = self {
                    inner.traverse(visitor);
                }
            }
        }

        impl Inspect for $ty {
            fn inspect<V: InspectSchemas + ?Sized>(&self, visitor: &mut V) {
                if let $ty::$variant(inner) = self {
                    inner.inspect(visitor);
                }
            }
        }
    )*};
}

schema_fields! {
    Schema => [
        properties,
        pattern_properties,
        additional_properties,
        items,
        prefix_items,
        all_of,
        one_of,
        any_of,
        not,
        defs,
    ];
    OpenApiSpec => [paths, webhooks, components];
    Components => [
        schemas,
        responses,
        parameters,
        request_bodies,
        headers,
        callbacks,
        path_items,
    ];
    PathItem => [parameters, get, post, put, delete, patch, options, head, trace];
    Operation => [parameters, request_body, responses, callbacks];
    Parameter => [schema, content];
    Header => [schema, content];
    RequestBody => [content];
    Response => [headers, content];
    MediaType => [schema, item_schema, encoding];
    Encoding => [headers];
}

schema_variant! {
    AdditionalProperties::Schema;
    CallbackOrRef::Callback;
    ParameterOrRef::Parameter;
    HeaderOrRef::Header;
    RequestBodyOrRef::RequestBody;
    ResponseOrRef::Response;
}
