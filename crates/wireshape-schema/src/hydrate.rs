//! # Hydration
//!
//! JSON cannot hold the parsed-only values: a parsed document written out
//! as JSON carries dates as ISO 8601 strings and sets as arrays. Hydration
//! walks such a document alongside its type definition and restores
//! [`Value::Date`] and [`Value::Set`] wherever the definition calls for
//! them, so the result can be handed to [`Schema::json`](crate::Schema::json).
//!
//! Hydration never fails: anything that does not fit the definition is
//! left as it is for validation to report. Undiscriminated unions are
//! left untouched, since no variant can be chosen without validating.

use indexmap::IndexMap;
use wireshape_core::{parse_iso8601, Value};

use crate::definition::{TypeDefinition, TypeKind};

type Types = IndexMap<String, TypeDefinition>;

pub(crate) fn hydrate(types: &Types, definition: &TypeDefinition, value: &Value) -> Value {
    hydrate_kind(types, &definition.kind, value, 0)
}

/// `hops` counts `ref`s followed without descending into the value, so
/// that a chain of references that loops back on itself terminates.
fn hydrate_kind(types: &Types, kind: &TypeKind, value: &Value, hops: usize) -> Value {
    match (kind, value) {
        (_, Value::Null) => Value::Null,
        (TypeKind::Date, Value::String(s)) => match parse_iso8601(s) {
            Ok(dt) => Value::Date(dt),
            Err(_) => value.clone(),
        },
        (TypeKind::List { items }, Value::List(values)) => Value::List(
            values
                .iter()
                .map(|v| hydrate_kind(types, &items.kind, v, 0))
                .collect(),
        ),
        (TypeKind::Set { items }, Value::List(values) | Value::Set(values)) => Value::set_from(
            values
                .iter()
                .map(|v| hydrate_kind(types, &items.kind, v, 0)),
        ),
        (TypeKind::Record { value: item, .. }, Value::Object(entries)) => Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), hydrate_kind(types, &item.kind, v, 0)))
                .collect(),
        ),
        (TypeKind::Object { properties, extends }, Value::Object(entries)) => Value::Object(
            entries
                .iter()
                .map(|(k, v)| {
                    let hydrated = match find_property(types, properties, extends, k) {
                        Some(property) => hydrate_kind(types, &property.kind, v, 0),
                        None => v.clone(),
                    };
                    (k.clone(), hydrated)
                })
                .collect(),
        ),
        (
            TypeKind::Union {
                discriminant,
                members,
                ..
            },
            Value::Object(entries),
        ) => {
            let member = entries
                .get(discriminant)
                .and_then(Value::as_str)
                .and_then(|tag| members.get(tag))
                .and_then(|member| resolve(types, &member.kind, 0));
            match member {
                Some(member) => hydrate_kind(types, member, value, 0),
                None => value.clone(),
            }
        }
        (TypeKind::Ref { name }, _) if hops <= types.len() => match types.get(name) {
            Some(target) => hydrate_kind(types, &target.kind, value, hops + 1),
            None => value.clone(),
        },
        _ => value.clone(),
    }
}

/// Follow `ref`s to the kind they name.
fn resolve<'a>(types: &'a Types, kind: &'a TypeKind, hops: usize) -> Option<&'a TypeKind> {
    match kind {
        TypeKind::Ref { name } if hops <= types.len() => {
            resolve(types, &types.get(name)?.kind, hops + 1)
        }
        TypeKind::Ref { .. } => None,
        other => Some(other),
    }
}

/// The definition of parsed property `key`, looking through base types.
fn find_property<'a>(
    types: &'a Types,
    properties: &'a IndexMap<String, TypeDefinition>,
    extends: &'a [String],
    key: &str,
) -> Option<&'a TypeDefinition> {
    properties.get(key).or_else(|| {
        extends.iter().find_map(|base| match types.get(base).map(|d| &d.kind) {
            Some(TypeKind::Object { properties, extends }) => {
                find_property(types, properties, extends, key)
            }
            _ => None,
        })
    })
}
