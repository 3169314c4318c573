//! # Record Schema
//!
//! An object used as a map: every entry's key goes through the key schema
//! and its value through the value schema.
//!
//! - Entries whose value is `null` are dropped.
//! - When the key schema is a `number` schema, non-empty keys that read as
//!   a finite number (decimal, or `0x`/`0o`/`0b` integers) are handed to it
//!   as numbers. `Infinity` stays a string key since values only hold
//!   finite numbers.
//! - Key errors are reported under `<key> (key)`, value errors under `<key>`.
//! - Transformed keys are written back as text.

use std::sync::Arc;

use wireshape_core::{Object, ValidationErrors, Value};

use crate::schema::{Direction, MaybeValid, Schema, SchemaOptions, SchemaRef, SchemaType};
use crate::utils::{incorrect_type, maybe_skip_validation};

/// Integers up to 2^53 are exact in an `f64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

struct RecordSchema {
    key: SchemaRef,
    value: SchemaRef,
}

impl RecordSchema {
    fn transform_entries(&self, value: &Value, opts: &SchemaOptions, direction: Direction) -> MaybeValid {
        let Value::Object(entries) = value else {
            return Err(incorrect_type(value, "object", opts));
        };

        let key_is_numeric = self.key.schema_type() == SchemaType::Number;
        let mut transformed = Object::new();
        let mut errors = ValidationErrors::default();

        for (string_key, item) in entries {
            if item.is_null() {
                continue;
            }

            let key = if key_is_numeric {
                numeric_key(string_key).unwrap_or_else(|| Value::from(string_key.as_str()))
            } else {
                Value::from(string_key.as_str())
            };
            let key_text = key.to_key_string();

            let new_key = direction.apply(
                self.key.as_ref(),
                &key,
                &opts.with_breadcrumb(format!("{key_text} (key)")),
            );
            let new_value = direction.apply(self.value.as_ref(), item, &opts.with_breadcrumb(key_text));

            match (new_key, new_value) {
                (Ok(k), Ok(v)) => {
                    if errors.is_empty() {
                        transformed.insert(k.to_key_string(), v);
                    }
                }
                (k, v) => {
                    if let Err(e) = k {
                        errors.append(e);
                    }
                    if let Err(e) = v {
                        errors.append(e);
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(Value::Object(transformed))
        } else {
            Err(errors)
        }
    }
}

/// Read an object key as a number, the way a JavaScript runtime would.
fn numeric_key(key: &str) -> Option<Value> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return None;
    }
    let n: f64 = match radix_integer(trimmed) {
        Some(n) => n,
        None => trimmed.parse().ok()?,
    };
    if !n.is_finite() {
        return None;
    }
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Some(Value::from(n as i64))
    } else {
        Some(Value::from_f64(n))
    }
}

/// `0x1f`, `0o17` and `0b101` forms; unsigned only.
fn radix_integer(text: &str) -> Option<f64> {
    let prefix = text.get(..2)?.to_ascii_lowercase();
    let radix = match prefix.as_str() {
        "0x" => 16,
        "0o" => 8,
        "0b" => 2,
        _ => return None,
    };
    let digits = &text[2..];
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    })
}

impl Schema for RecordSchema {
    fn parse(&self, raw: &Value, opts: &SchemaOptions) -> MaybeValid {
        maybe_skip_validation(raw, self.transform_entries(raw, opts, Direction::Parse), opts)
    }

    fn json(&self, parsed: &Value, opts: &SchemaOptions) -> MaybeValid {
        maybe_skip_validation(parsed, self.transform_entries(parsed, opts, Direction::Json), opts)
    }

    fn schema_type(&self) -> SchemaType {
        SchemaType::Record
    }
}

pub fn record(key: SchemaRef, value: SchemaRef) -> SchemaRef {
    Arc::new(RecordSchema { key, value })
}
