pub mod ref_check;
pub mod schema_classes;
pub mod visit;

pub use ref_check::check_refs;
pub use schema_classes::{construct, construct_with_options, extract_schema_classes};
