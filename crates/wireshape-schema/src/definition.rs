//! # Type Definitions
//!
//! Serde model of a definitions document: a `types` map from type name to
//! [`TypeDefinition`]. Documents are YAML or JSON:
//!
//! ```yaml
//! types:
//!   Pet:
//!     type: union
//!     discriminant: kind
//!     rawDiscriminant: pet_type
//!     members:
//!       dog: { type: ref, name: Dog }
//!   Dog:
//!     type: object
//!     properties:
//!       name: { type: string }
//!       birthDate: { type: date, rawKey: birth_date, optional: true }
//! ```
//!
//! Definitions are plain data; [`SchemaRegistry`](crate::SchemaRegistry)
//! checks and compiles them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A whole definitions document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionsDocument {
    /// Named types, in document order.
    pub types: IndexMap<String, TypeDefinition>,
}

/// One type, possibly nested inside another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    #[serde(flatten)]
    pub kind: TypeKind,

    /// Accept `null` and let object fields of this type be absent.
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,

    /// Wire key when this definition is an object property.
    #[serde(default, rename = "rawKey", skip_serializing_if = "Option::is_none")]
    pub raw_key: Option<String>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl TypeDefinition {
    /// A required definition with no wire alias.
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            optional: false,
            raw_key: None,
        }
    }
}

impl From<TypeKind> for TypeDefinition {
    fn from(kind: TypeKind) -> Self {
        Self::new(kind)
    }
}

/// The shape of a type, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TypeKind {
    String,
    Number,
    Boolean,
    Any,
    Unknown,
    Date,
    Enum {
        values: Vec<String>,
    },
    StringLiteral {
        value: String,
    },
    BooleanLiteral {
        value: bool,
    },
    List {
        items: Box<TypeDefinition>,
    },
    Set {
        items: Box<TypeDefinition>,
    },
    Record {
        key: Box<TypeDefinition>,
        value: Box<TypeDefinition>,
    },
    Object {
        #[serde(default)]
        properties: IndexMap<String, TypeDefinition>,
        /// Names of object types whose properties this one inherits.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        extends: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    Union {
        discriminant: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        raw_discriminant: Option<String>,
        /// Tag to member; each member is an inline object or a reference
        /// to an object type.
        members: IndexMap<String, TypeDefinition>,
    },
    UndiscriminatedUnion {
        variants: Vec<TypeDefinition>,
    },
    /// Another named type of the same document.
    Ref {
        name: String,
    },
}

impl TypeKind {
    /// The `type` tag of this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Any => "any",
            Self::Unknown => "unknown",
            Self::Date => "date",
            Self::Enum { .. } => "enum",
            Self::StringLiteral { .. } => "stringLiteral",
            Self::BooleanLiteral { .. } => "booleanLiteral",
            Self::List { .. } => "list",
            Self::Set { .. } => "set",
            Self::Record { .. } => "record",
            Self::Object { .. } => "object",
            Self::Union { .. } => "union",
            Self::UndiscriminatedUnion { .. } => "undiscriminatedUnion",
            Self::Ref { .. } => "ref",
        }
    }
}
