//! # Undiscriminated Union Schema
//!
//! Variants are tried in order and the first success wins. Variants always
//! run with `skip_validation` off; the union itself still honors the flag.
//! When every variant fails, each error is reported with its message
//! prefixed by `[Variant <i>] `.

use std::sync::Arc;

use wireshape_core::{ValidationError, ValidationErrors, Value};

use crate::schema::{Direction, MaybeValid, Schema, SchemaOptions, SchemaRef, SchemaType};
use crate::utils::maybe_skip_validation;

struct UndiscriminatedUnion {
    variants: Vec<SchemaRef>,
}

impl UndiscriminatedUnion {
    fn first_match(&self, value: &Value, opts: &SchemaOptions, direction: Direction) -> MaybeValid {
        let strict = SchemaOptions {
            skip_validation: false,
            ..opts.clone()
        };
        let mut errors = ValidationErrors::default();
        for (index, variant) in self.variants.iter().enumerate() {
            match direction.apply(variant.as_ref(), value, &strict) {
                Ok(v) => return Ok(v),
                Err(e) => {
                    for error in e {
                        errors.push(ValidationError::new(
                            error.path,
                            format!("[Variant {index}] {}", error.message),
                        ));
                    }
                }
            }
        }
        Err(errors)
    }
}

impl Schema for UndiscriminatedUnion {
    fn parse(&self, raw: &Value, opts: &SchemaOptions) -> MaybeValid {
        maybe_skip_validation(raw, self.first_match(raw, opts, Direction::Parse), opts)
    }

    fn json(&self, parsed: &Value, opts: &SchemaOptions) -> MaybeValid {
        maybe_skip_validation(parsed, self.first_match(parsed, opts, Direction::Json), opts)
    }

    fn schema_type(&self) -> SchemaType {
        SchemaType::UndiscriminatedUnion
    }
}

pub fn undiscriminated_union<I>(variants: I) -> SchemaRef
where
    I: IntoIterator<Item = SchemaRef>,
{
    Arc::new(UndiscriminatedUnion {
        variants: variants.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::list;
    use crate::object::{object, property};
    use crate::primitives::{number, string};
    use crate::utils::SchemaExt;
    use serde_json::json;

    #[test]
    fn test_first_matching_variant_wins() {
        let schema = undiscriminated_union([string(), number()]);
        let opts = SchemaOptions::default();
        assert_eq!(schema.parse(&Value::from("a"), &opts).unwrap(), Value::from("a"));
        assert_eq!(schema.parse(&Value::from(2), &opts).unwrap(), Value::from(2));
    }

    #[test]
    fn test_all_variant_errors_prefixed() {
        let schema = undiscriminated_union([string(), list(number())]);
        let opts = SchemaOptions::default().with_breadcrumb("value");
        let err = schema.parse(&Value::Bool(true), &opts).unwrap_err();
        let rendered: Vec<String> = err.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "value: [Variant 0] Expected string. Received true.",
                "value: [Variant 1] Expected list. Received true.",
            ]
        );
    }

    #[test]
    fn test_variants_validate_strictly_under_skip_validation() {
        let schema = undiscriminated_union([
            object([("a", string())]).to_schema(),
            object([("bee", property("b", number()))]).to_schema(),
        ]);
        let opts = SchemaOptions {
            skip_validation: true,
            ..Default::default()
        };
        let parsed = schema.parse(&Value::from(json!({"b": 1})), &opts).unwrap();
        assert_eq!(parsed, Value::from(json!({"bee": 1})));
    }

    #[test]
    fn test_skip_validation_on_union_returns_input() {
        let schema = undiscriminated_union([string()]);
        let opts = SchemaOptions {
            skip_validation: true,
            ..Default::default()
        };
        assert_eq!(schema.json(&Value::from(5), &opts).unwrap(), Value::from(5));
    }

    #[test]
    fn test_optional_variant_accepts_null() {
        let schema = undiscriminated_union([string().optional(), number()]);
        assert_eq!(
            schema.parse(&Value::Null, &SchemaOptions::default()).unwrap(),
            Value::Null
        );
    }
}
