//! # List and Set Schemas
//!
//! Each item is transformed with the breadcrumb `[i]`. Errors from every
//! item are collected; a single bad item fails the whole list.
//!
//! Sets share the list logic on the wire. Parsing produces a
//! de-duplicated [`Value::Set`]; serializing requires one.

use std::sync::Arc;

use wireshape_core::{ValidationErrors, Value};

use crate::schema::{Direction, MaybeValid, Schema, SchemaOptions, SchemaRef, SchemaType};
use crate::utils::{incorrect_type, maybe_skip_validation};

struct ListSchema {
    item: SchemaRef,
}

impl ListSchema {
    fn transform_items(&self, value: &Value, opts: &SchemaOptions, direction: Direction) -> MaybeValid {
        let Value::List(items) = value else {
            return Err(incorrect_type(value, "list", opts));
        };

        let mut transformed = Vec::with_capacity(items.len());
        let mut errors = ValidationErrors::default();
        for (index, item) in items.iter().enumerate() {
            let item_opts = opts.with_breadcrumb(format!("[{index}]"));
            match direction.apply(self.item.as_ref(), item, &item_opts) {
                Ok(v) => transformed.push(v),
                Err(e) => errors.append(e),
            }
        }

        if errors.is_empty() {
            Ok(Value::List(transformed))
        } else {
            Err(errors)
        }
    }
}

impl Schema for ListSchema {
    fn parse(&self, raw: &Value, opts: &SchemaOptions) -> MaybeValid {
        maybe_skip_validation(raw, self.transform_items(raw, opts, Direction::Parse), opts)
    }

    fn json(&self, parsed: &Value, opts: &SchemaOptions) -> MaybeValid {
        maybe_skip_validation(parsed, self.transform_items(parsed, opts, Direction::Json), opts)
    }

    fn schema_type(&self) -> SchemaType {
        SchemaType::List
    }
}

pub fn list(item: SchemaRef) -> SchemaRef {
    Arc::new(ListSchema { item })
}

struct SetSchema {
    list: SchemaRef,
}

impl SetSchema {
    fn parse_set(&self, raw: &Value, opts: &SchemaOptions) -> MaybeValid {
        match self.list.parse(raw, opts)? {
            Value::List(items) => Ok(Value::set_from(items)),
            // The list fell back to its unvalidated input.
            other => Ok(other),
        }
    }

    fn json_set(&self, parsed: &Value, opts: &SchemaOptions) -> MaybeValid {
        let Value::Set(items) = parsed else {
            return Err(incorrect_type(parsed, "Set", opts));
        };
        self.list.json(&Value::List(items.clone()), opts)
    }
}

impl Schema for SetSchema {
    fn parse(&self, raw: &Value, opts: &SchemaOptions) -> MaybeValid {
        maybe_skip_validation(raw, self.parse_set(raw, opts), opts)
    }

    fn json(&self, parsed: &Value, opts: &SchemaOptions) -> MaybeValid {
        maybe_skip_validation(parsed, self.json_set(parsed, opts), opts)
    }

    fn schema_type(&self) -> SchemaType {
        SchemaType::Set
    }
}

pub fn set(item: SchemaRef) -> SchemaRef {
    Arc::new(SetSchema { list: list(item) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{number, string};
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn test_list_parses_each_item() {
        let schema = list(string());
        let parsed = schema.parse(&v(json!(["a", "b"])), &SchemaOptions::default()).unwrap();
        assert_eq!(parsed, v(json!(["a", "b"])));
    }

    #[test]
    fn test_list_collects_every_item_error() {
        let schema = list(number());
        let opts = SchemaOptions::default().with_breadcrumb("scores");
        let err = schema.parse(&v(json!([1, "two", 3, null])), &opts).unwrap_err();
        let rendered: Vec<String> = err.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "scores -> [1]: Expected number. Received \"two\".",
                "scores -> [3]: Expected number. Received null.",
            ]
        );
    }

    #[test]
    fn test_list_rejects_non_lists_at_prefix() {
        let opts = SchemaOptions::default().with_breadcrumb("tags");
        let err = list(string()).parse(&v(json!({"a": 1})), &opts).unwrap_err();
        assert_eq!(err.to_string(), "tags: Expected list. Received object.");
    }

    #[test]
    fn test_nested_list_breadcrumbs() {
        let schema = list(list(number()));
        let err = schema
            .parse(&v(json!([[1], [2, "x"]])), &SchemaOptions::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "[1] -> [1]: Expected number. Received \"x\".");
    }

    #[test]
    fn test_set_dedupes_on_parse() {
        let schema = set(string());
        let parsed = schema
            .parse(&v(json!(["a", "b", "a"])), &SchemaOptions::default())
            .unwrap();
        assert_eq!(parsed, Value::Set(vec![Value::from("a"), Value::from("b")]));
        assert_eq!(schema.schema_type(), SchemaType::Set);
    }

    #[test]
    fn test_set_treats_equal_numbers_as_one_member() {
        let parsed = set(number())
            .parse(&v(json!([1, 1.0, 2])), &SchemaOptions::default())
            .unwrap();
        assert_eq!(parsed, Value::Set(vec![Value::from(1), Value::from(2)]));
    }

    #[test]
    fn test_set_json_requires_set() {
        let schema = set(string());
        let opts = SchemaOptions::default();
        let err = schema.json(&v(json!(["a"])), &opts).unwrap_err();
        assert_eq!(err.to_string(), "Expected Set. Received list.");

        let wire = schema
            .json(&Value::Set(vec![Value::from("x"), Value::from("y")]), &opts)
            .unwrap();
        assert_eq!(wire, v(json!(["x", "y"])));
    }

    #[test]
    fn test_list_skip_validation_returns_raw_items() {
        let opts = SchemaOptions {
            skip_validation: true,
            ..Default::default()
        };
        let raw = v(json!([1, "two"]));
        assert_eq!(list(number()).parse(&raw, &opts).unwrap(), raw);
    }
}
