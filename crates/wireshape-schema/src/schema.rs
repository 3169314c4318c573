//! # Schema Trait, Type Tags and Options
//!
//! A schema is a pair of pure transforms plus a type tag:
//!
//! - [`Schema::parse`] converts a wire value into its parsed form.
//! - [`Schema::json`] converts a parsed value back into its wire form.
//! - [`Schema::schema_type`] reports the [`SchemaType`] tag.
//!
//! ## Required-ness Invariant
//!
//! The type tag alone decides whether an object field may be absent:
//! fields whose schema is tagged `any`, `unknown` or `optional` are
//! optional, every other field is required. See [`is_schema_optional`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use wireshape_core::{Value, ValidationErrors};

/// Outcome of a transform: the converted value, or every error found.
pub type MaybeValid = Result<Value, ValidationErrors>;

/// Shared, type-erased schema.
pub type SchemaRef = Arc<dyn Schema>;

/// Shared, type-erased object-like schema.
pub type ObjectSchemaRef = Arc<dyn ObjectLike>;

/// Type tag of a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SchemaType {
    Date,
    Enum,
    List,
    StringLiteral,
    BooleanLiteral,
    Object,
    Any,
    Boolean,
    Number,
    String,
    Unknown,
    Record,
    Set,
    Union,
    UndiscriminatedUnion,
    Optional,
}

impl SchemaType {
    /// The tag as it appears in definitions documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Enum => "enum",
            Self::List => "list",
            Self::StringLiteral => "stringLiteral",
            Self::BooleanLiteral => "booleanLiteral",
            Self::Object => "object",
            Self::Any => "any",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Unknown => "unknown",
            Self::Record => "record",
            Self::Set => "set",
            Self::Union => "union",
            Self::UndiscriminatedUnion => "undiscriminatedUnion",
            Self::Optional => "optional",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy for object keys that no field schema claims.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnrecognizedObjectKeys {
    /// Report `Unexpected key "<key>"`.
    #[default]
    Fail,
    /// Drop the key silently.
    Strip,
    /// Copy the key and its value unchanged.
    Passthrough,
}

impl FromStr for UnrecognizedObjectKeys {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail" => Ok(Self::Fail),
            "strip" => Ok(Self::Strip),
            "passthrough" => Ok(Self::Passthrough),
            other => Err(format!(
                "unknown policy {other:?}; expected one of: fail, strip, passthrough"
            )),
        }
    }
}

impl fmt::Display for UnrecognizedObjectKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fail => "fail",
            Self::Strip => "strip",
            Self::Passthrough => "passthrough",
        })
    }
}

/// Options threaded through every transform.
///
/// Composite schemas hand a copy to their children with one more
/// breadcrumb appended; see [`SchemaOptions::with_breadcrumb`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaOptions {
    /// What to do with object keys no field claims.
    pub unrecognized_object_keys: UnrecognizedObjectKeys,
    /// Let union values with an unknown discriminant pass through.
    pub allow_unrecognized_union_members: bool,
    /// Let unknown enum strings pass through.
    pub allow_unrecognized_enum_values: bool,
    /// On failure, log a warning and return the input unchanged.
    pub skip_validation: bool,
    /// Path prepended to every reported error.
    pub breadcrumbs_prefix: Vec<String>,
}

impl SchemaOptions {
    /// A copy of these options one level deeper.
    pub fn with_breadcrumb(&self, crumb: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.breadcrumbs_prefix.push(crumb.into());
        next
    }

    /// The breadcrumb path of a child without cloning the options.
    pub fn child_path(&self, crumb: impl Into<String>) -> Vec<String> {
        let mut path = self.breadcrumbs_prefix.clone();
        path.push(crumb.into());
        path
    }
}

/// A bidirectional converter between wire and parsed values.
pub trait Schema: Send + Sync {
    /// Convert a wire value into its parsed form.
    fn parse(&self, raw: &Value, opts: &SchemaOptions) -> MaybeValid;

    /// Convert a parsed value into its wire form.
    fn json(&self, parsed: &Value, opts: &SchemaOptions) -> MaybeValid;

    /// The schema's type tag.
    fn schema_type(&self) -> SchemaType;
}

/// A schema whose values are objects with a known set of properties.
///
/// Object-like schemas can be extended with further properties and can
/// stand as union members.
pub trait ObjectLike: Schema {
    /// Keys as they appear on the wire.
    fn raw_properties(&self) -> Vec<String>;

    /// Keys as they appear on parsed values.
    fn parsed_properties(&self) -> Vec<String>;

    /// Erase to a plain schema.
    fn into_schema(self: Arc<Self>) -> SchemaRef;
}

/// Which side of the conversion to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Wire to parsed.
    Parse,
    /// Parsed to wire.
    Json,
}

impl Direction {
    /// Run `schema` in this direction.
    pub fn apply<S: Schema + ?Sized>(self, schema: &S, value: &Value, opts: &SchemaOptions) -> MaybeValid {
        match self {
            Self::Parse => schema.parse(value, opts),
            Self::Json => schema.json(value, opts),
        }
    }
}

/// Whether a field with this schema may be absent from its object.
pub fn is_schema_optional<S: Schema + ?Sized>(schema: &S) -> bool {
    matches!(
        schema.schema_type(),
        SchemaType::Any | SchemaType::Unknown | SchemaType::Optional
    )
}

/// Whether a field with this schema must be present in its object.
pub fn is_schema_required<S: Schema + ?Sized>(schema: &S) -> bool {
    !is_schema_optional(schema)
}
