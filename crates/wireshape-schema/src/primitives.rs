//! # Primitive Schemas
//!
//! Identity schemas: `parse` and `json` run the same check and return the
//! value unchanged. `string`, `number` and `boolean` accept exactly their
//! JSON kind; `any` and `unknown` accept everything and are treated as
//! optional object fields.

use std::sync::Arc;

use wireshape_core::Value;

use crate::schema::{MaybeValid, Schema, SchemaOptions, SchemaRef, SchemaType};
use crate::utils::{incorrect_type, maybe_skip_validation};

/// A schema whose two directions share one validating function.
pub(crate) struct IdentitySchema<F> {
    schema_type: SchemaType,
    validate: F,
}

impl<F> Schema for IdentitySchema<F>
where
    F: Fn(&Value, &SchemaOptions) -> MaybeValid + Send + Sync,
{
    fn parse(&self, raw: &Value, opts: &SchemaOptions) -> MaybeValid {
        maybe_skip_validation(raw, (self.validate)(raw, opts), opts)
    }

    fn json(&self, parsed: &Value, opts: &SchemaOptions) -> MaybeValid {
        maybe_skip_validation(parsed, (self.validate)(parsed, opts), opts)
    }

    fn schema_type(&self) -> SchemaType {
        self.schema_type
    }
}

pub(crate) fn identity_schema<F>(schema_type: SchemaType, validate: F) -> SchemaRef
where
    F: Fn(&Value, &SchemaOptions) -> MaybeValid + Send + Sync + 'static,
{
    Arc::new(IdentitySchema {
        schema_type,
        validate,
    })
}

pub fn string() -> SchemaRef {
    identity_schema(SchemaType::String, |value, opts| match value {
        Value::String(_) => Ok(value.clone()),
        _ => Err(incorrect_type(value, "string", opts)),
    })
}

pub fn number() -> SchemaRef {
    identity_schema(SchemaType::Number, |value, opts| match value {
        Value::Number(_) => Ok(value.clone()),
        _ => Err(incorrect_type(value, "number", opts)),
    })
}

pub fn boolean() -> SchemaRef {
    identity_schema(SchemaType::Boolean, |value, opts| match value {
        Value::Bool(_) => Ok(value.clone()),
        _ => Err(incorrect_type(value, "boolean", opts)),
    })
}

/// Accepts every value.
pub fn any() -> SchemaRef {
    identity_schema(SchemaType::Any, |value, _| Ok(value.clone()))
}

/// Accepts every value.
pub fn unknown() -> SchemaRef {
    identity_schema(SchemaType::Unknown, |value, _| Ok(value.clone()))
}
