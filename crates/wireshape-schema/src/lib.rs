//! # wireshape-schema: Validate-and-Transform Schemas
//!
//! Composable schemas converting between *wire* values (JSON as sent and
//! received) and *parsed* values (what application code works with), with
//! every validation error tagged by the path of keys and indices leading
//! to it.
//!
//! ## Building Schemas (`primitives`, `literals`, `date`, `list`, `record`,
//! `object`, `union`, `undiscriminated_union`, `lazy`)
//!
//! ```
//! use wireshape_schema::{list, object, property, string, ObjectField, Schema, SchemaOptions, Value};
//!
//! let team = object([
//!     ("name", ObjectField::from(string())),
//!     ("memberIds", property("member_ids", list(string()))),
//! ]);
//! let raw = Value::from(serde_json::json!({"name": "core", "member_ids": ["u1", 2]}));
//! let err = team.parse(&raw, &SchemaOptions::default()).unwrap_err();
//! assert_eq!(err.to_string(), "member_ids -> [1]: Expected string. Received 2.");
//! ```
//!
//! Transforms never short-circuit: a result carries every error found.
//! [`SchemaOptions`] tune unknown-key handling, unknown enum values and
//! union members, and a skip-validation mode that logs failures as
//! `tracing` warnings and passes the input through.
//!
//! ## Declarative Definitions (`definition`, `registry`, `hydrate`)
//!
//! [`SchemaRegistry`] compiles a YAML/JSON document of named types into
//! schemas, including recursive ones. Because the definitions are kept,
//! a registry can also restore dates and sets in parsed documents that
//! were written out as JSON (`hydrate`).
//!
//! ## Crate Policy
//!
//! - Depends only on `wireshape-core` internally.
//! - Schemas are immutable, `Send + Sync`, and shared through `Arc`.
//! - Validation failures are values, never panics.

pub mod date;
pub mod definition;
pub mod hydrate;
pub mod lazy;
pub mod list;
pub mod literals;
pub mod object;
pub mod primitives;
pub mod record;
pub mod registry;
pub mod schema;
pub mod undiscriminated_union;
pub mod union;
pub mod utils;

pub use date::date;
pub use definition::{DefinitionsDocument, TypeDefinition, TypeKind};
pub use lazy::{lazy, lazy_object};
pub use list::{list, set};
pub use literals::{boolean_literal, string_enum, string_literal};
pub use object::{
    extend, object, property, with_parsed_properties, AddedProperty, ObjectField, ObjectLikeExt,
};
pub use primitives::{any, boolean, number, string, unknown};
pub use record::record;
pub use registry::{DefinitionError, SchemaRegistry};
pub use schema::{
    is_schema_optional, is_schema_required, Direction, MaybeValid, ObjectLike, ObjectSchemaRef,
    Schema, SchemaOptions, SchemaRef, SchemaType, UnrecognizedObjectKeys,
};
pub use undiscriminated_union::undiscriminated_union;
pub use union::{discriminant, union, Discriminant};
pub use utils::{FnTransformer, SchemaExt, Transformer};

pub use wireshape_core::{JsonError, Object, ParseError, ValidationError, ValidationErrors, Value};
