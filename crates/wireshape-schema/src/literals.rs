//! # Literal and Enum Schemas

use std::collections::HashSet;

use wireshape_core::Value;

use crate::primitives::identity_schema;
use crate::schema::{SchemaRef, SchemaType};
use crate::utils::incorrect_type;

/// Accepts exactly the string `literal`.
pub fn string_literal(literal: impl Into<String>) -> SchemaRef {
    let literal: String = literal.into();
    let expected = format!("\"{literal}\"");
    identity_schema(SchemaType::StringLiteral, move |value, opts| {
        if value.as_str() == Some(literal.as_str()) {
            Ok(value.clone())
        } else {
            Err(incorrect_type(value, &expected, opts))
        }
    })
}

/// Accepts exactly the boolean `literal`.
pub fn boolean_literal(literal: bool) -> SchemaRef {
    identity_schema(SchemaType::BooleanLiteral, move |value, opts| {
        if value.as_bool() == Some(literal) {
            Ok(value.clone())
        } else {
            Err(incorrect_type(value, &literal.to_string(), opts))
        }
    })
}

/// Accepts strings from a fixed set.
///
/// With `allow_unrecognized_enum_values`, any string is accepted; values
/// that are not strings are always rejected.
pub fn string_enum<I, S>(values: I) -> SchemaRef
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let valid: HashSet<String> = values.into_iter().map(Into::into).collect();
    identity_schema(SchemaType::Enum, move |value, opts| match value {
        Value::String(s) => {
            if valid.contains(s) || opts.allow_unrecognized_enum_values {
                Ok(value.clone())
            } else {
                Err(incorrect_type(value, "enum", opts))
            }
        }
        _ => Err(incorrect_type(value, "string", opts)),
    })
}
