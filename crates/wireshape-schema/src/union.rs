//! # Discriminated Union Schema
//!
//! A union picks its member schema from one string property, the
//! discriminant. The discriminant may use a different key on the wire
//! (see [`discriminant`]); its value is carried across unchanged.
//!
//! ## Validation Rules
//!
//! 1. Non-objects fail with `Expected object. Received …`.
//! 2. An absent or `null` discriminant fails with
//!    `Missing discriminant ("<key>")` at the union's own path.
//! 3. The discriminant value is checked against the member tags at path
//!    `<prefix> -> <key>`. `allow_unrecognized_union_members` lets unknown
//!    tags through; the remaining properties are then copied unchanged.
//!    Otherwise an unknown tag fails with `Unexpected discriminant value`.
//! 4. The remaining properties go through the member schema with the
//!    union's own options.
//! 5. Output is the discriminant first, then the member's output.

use std::collections::HashMap;
use std::sync::Arc;

use wireshape_core::{Object, ValidationErrors, Value};

use crate::literals::string_enum;
use crate::schema::{Direction, MaybeValid, ObjectSchemaRef, Schema, SchemaOptions, SchemaRef, SchemaType};
use crate::utils::{incorrect_type, maybe_skip_validation};

/// Discriminant key, as seen on parsed values and on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discriminant {
    pub parsed: String,
    pub raw: String,
}

/// A discriminant whose wire key differs from its parsed key.
pub fn discriminant(parsed: impl Into<String>, raw: impl Into<String>) -> Discriminant {
    Discriminant {
        parsed: parsed.into(),
        raw: raw.into(),
    }
}

impl From<&str> for Discriminant {
    fn from(key: &str) -> Self {
        discriminant(key, key)
    }
}

impl From<String> for Discriminant {
    fn from(key: String) -> Self {
        discriminant(key.clone(), key)
    }
}

struct UnionSchema {
    discriminant: Discriminant,
    /// Member tags, for checking discriminant values.
    tags: SchemaRef,
    members: HashMap<String, ObjectSchemaRef>,
}

impl UnionSchema {
    fn transform_union(&self, value: &Value, opts: &SchemaOptions, direction: Direction) -> MaybeValid {
        let Value::Object(entries) = value else {
            return Err(incorrect_type(value, "object", opts));
        };

        let (key, transformed_key) = match direction {
            Direction::Parse => (&self.discriminant.raw, &self.discriminant.parsed),
            Direction::Json => (&self.discriminant.parsed, &self.discriminant.raw),
        };

        let tag_value = match entries.get(key.as_str()) {
            Some(v) if !v.is_null() => v,
            _ => {
                return Err(ValidationErrors::single(
                    opts.breadcrumbs_prefix.clone(),
                    format!("Missing discriminant (\"{key}\")"),
                ))
            }
        };

        let tag_opts = SchemaOptions {
            allow_unrecognized_enum_values: opts.allow_unrecognized_union_members,
            breadcrumbs_prefix: opts.child_path(key.as_str()),
            ..Default::default()
        };
        let tag = direction.apply(self.tags.as_ref(), tag_value, &tag_opts)?;

        let rest: Object = entries
            .iter()
            .filter(|(k, _)| *k != key)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let Some(member) = tag.as_str().and_then(|t| self.members.get(t)) else {
            if opts.allow_unrecognized_union_members {
                let mut output = Object::new();
                output.insert(transformed_key.clone(), tag);
                output.extend(rest);
                return Ok(Value::Object(output));
            }
            return Err(ValidationErrors::single(
                opts.child_path(key.as_str()),
                "Unexpected discriminant value",
            ));
        };

        let mut output = Object::new();
        output.insert(transformed_key.clone(), tag_value.clone());
        match direction.apply(member.as_ref(), &Value::Object(rest), opts)? {
            Value::Object(fields) => output.extend(fields),
            // A member that skipped validation on a non-object; keep it whole.
            other => return Ok(other),
        }
        Ok(Value::Object(output))
    }
}

impl Schema for UnionSchema {
    fn parse(&self, raw: &Value, opts: &SchemaOptions) -> MaybeValid {
        maybe_skip_validation(raw, self.transform_union(raw, opts, Direction::Parse), opts)
    }

    fn json(&self, parsed: &Value, opts: &SchemaOptions) -> MaybeValid {
        maybe_skip_validation(parsed, self.transform_union(parsed, opts, Direction::Json), opts)
    }

    fn schema_type(&self) -> SchemaType {
        SchemaType::Union
    }
}

/// A discriminated union of object schemas keyed by tag.
///
/// Add computed properties to a union with
/// [`with_parsed_properties`](crate::with_parsed_properties).
pub fn union<D, I, K>(discriminant: D, members: I) -> SchemaRef
where
    D: Into<Discriminant>,
    I: IntoIterator<Item = (K, ObjectSchemaRef)>,
    K: Into<String>,
{
    let members: HashMap<String, ObjectSchemaRef> =
        members.into_iter().map(|(k, s)| (k.into(), s)).collect();
    let tags = string_enum(members.keys().cloned());
    Arc::new(UnionSchema {
        discriminant: discriminant.into(),
        tags,
        members,
    })
}
