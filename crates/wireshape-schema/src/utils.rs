//! # Schema Utilities
//!
//! Combinators available on every schema through [`SchemaExt`]:
//! [`optional`](SchemaExt::optional), [`transform`](SchemaExt::transform)
//! and the error-returning wrappers
//! [`parse_or_error`](SchemaExt::parse_or_error) /
//! [`json_or_error`](SchemaExt::json_or_error).
//!
//! Also home of the skip-validation fallback shared by the builders.

use std::sync::Arc;

use wireshape_core::{
    incorrect_type_message, JsonError, ParseError, ValidationErrors, Value,
};

use crate::schema::{MaybeValid, ObjectSchemaRef, Schema, SchemaOptions, SchemaRef, SchemaType};

/// Error for a value of the wrong kind, reported at the current breadcrumbs.
pub(crate) fn incorrect_type(value: &Value, expected: &str, opts: &SchemaOptions) -> ValidationErrors {
    ValidationErrors::single(
        opts.breadcrumbs_prefix.clone(),
        incorrect_type_message(value, expected),
    )
}

/// Apply the skip-validation fallback to the outcome of a transform.
///
/// When the transform failed and `opts.skip_validation` is set, every
/// error is logged as a warning and `input` is returned as success.
pub(crate) fn maybe_skip_validation(input: &Value, result: MaybeValid, opts: &SchemaOptions) -> MaybeValid {
    match result {
        Err(errors) if opts.skip_validation => {
            let details: Vec<String> = errors
                .iter()
                .map(|e| {
                    if e.path.is_empty() {
                        format!("  - {}", e.message)
                    } else {
                        format!("  - {}: {}", e.path.join("."), e.message)
                    }
                })
                .collect();
            tracing::warn!(
                error_count = errors.len(),
                "Failed to validate.\n{}",
                details.join("\n")
            );
            Ok(input.clone())
        }
        other => other,
    }
}

/// A reversible post-processing step for [`SchemaExt::transform`].
pub trait Transformer: Send + Sync {
    /// Applied to the parsed value after a successful parse.
    fn transform(&self, parsed: Value) -> Value;

    /// Applied before serializing, to recover what the inner schema expects.
    fn untransform(&self, transformed: &Value) -> Value;
}

/// A [`Transformer`] made of two closures.
pub struct FnTransformer<T, U> {
    transform: T,
    untransform: U,
}

impl<T, U> FnTransformer<T, U>
where
    T: Fn(Value) -> Value + Send + Sync,
    U: Fn(&Value) -> Value + Send + Sync,
{
    pub fn new(transform: T, untransform: U) -> Self {
        Self {
            transform,
            untransform,
        }
    }
}

impl<T, U> Transformer for FnTransformer<T, U>
where
    T: Fn(Value) -> Value + Send + Sync,
    U: Fn(&Value) -> Value + Send + Sync,
{
    fn transform(&self, parsed: Value) -> Value {
        (self.transform)(parsed)
    }

    fn untransform(&self, transformed: &Value) -> Value {
        (self.untransform)(transformed)
    }
}

/// `null` on either side is accepted as-is; anything else is delegated.
struct Optional {
    inner: SchemaRef,
}

impl Schema for Optional {
    fn parse(&self, raw: &Value, opts: &SchemaOptions) -> MaybeValid {
        if raw.is_null() {
            return Ok(Value::Null);
        }
        self.inner.parse(raw, opts)
    }

    fn json(&self, parsed: &Value, opts: &SchemaOptions) -> MaybeValid {
        if parsed.is_null() {
            return Ok(Value::Null);
        }
        self.inner.json(parsed, opts)
    }

    fn schema_type(&self) -> SchemaType {
        SchemaType::Optional
    }
}

struct Transform {
    inner: SchemaRef,
    transformer: Box<dyn Transformer>,
}

impl Schema for Transform {
    fn parse(&self, raw: &Value, opts: &SchemaOptions) -> MaybeValid {
        let parsed = self.inner.parse(raw, opts)?;
        Ok(self.transformer.transform(parsed))
    }

    fn json(&self, parsed: &Value, opts: &SchemaOptions) -> MaybeValid {
        let untransformed = self.transformer.untransform(parsed);
        self.inner.json(&untransformed, opts)
    }

    fn schema_type(&self) -> SchemaType {
        self.inner.schema_type()
    }
}

/// Combinators shared by every schema handle.
pub trait SchemaExt {
    /// The handle as a plain schema.
    fn to_schema(&self) -> SchemaRef;

    /// Accept `null` on both sides. Fields with this schema are optional.
    fn optional(&self) -> SchemaRef {
        Arc::new(Optional {
            inner: self.to_schema(),
        })
    }

    /// Post-process parsed values, and undo it before serializing.
    fn transform<T: Transformer + 'static>(&self, transformer: T) -> SchemaRef {
        Arc::new(Transform {
            inner: self.to_schema(),
            transformer: Box::new(transformer),
        })
    }

    /// Parse, collapsing all validation errors into one [`ParseError`].
    fn parse_or_error(&self, raw: &Value, opts: &SchemaOptions) -> Result<Value, ParseError> {
        self.to_schema()
            .parse(raw, opts)
            .map_err(|errors| ParseError { errors })
    }

    /// Serialize, collapsing all validation errors into one [`JsonError`].
    fn json_or_error(&self, parsed: &Value, opts: &SchemaOptions) -> Result<Value, JsonError> {
        self.to_schema()
            .json(parsed, opts)
            .map_err(|errors| JsonError { errors })
    }
}

impl SchemaExt for SchemaRef {
    fn to_schema(&self) -> SchemaRef {
        Arc::clone(self)
    }
}

impl SchemaExt for ObjectSchemaRef {
    fn to_schema(&self) -> SchemaRef {
        Arc::clone(self).into_schema()
    }
}
