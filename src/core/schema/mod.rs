//! Schema registry and structural validation
//!
//! Every module written to a container is validated against a schema first.
//! Schemas live in a [`SchemaRegistry`]; [`SchemaValidator`] checks data
//! against them and reports the first failing field path.

pub mod builtin;
pub mod definition;
pub mod registry;
pub mod validator;

pub use definition::{SchemaDefinition, SchemaNode, SchemaType};
pub use registry::{schema_id_from_path, ResolvedSchema, SchemaRegistry};
pub use validator::{validate_fields, validate_value, SchemaValidator};
