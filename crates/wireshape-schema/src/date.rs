//! # Date Schema
//!
//! Wire form: an ISO 8601 string. Parsed form: [`Value::Date`].
//! Serializing always emits `YYYY-MM-DDTHH:MM:SS.sssZ`, so a wire string
//! survives a round trip unchanged only when it is already in that form.

use std::sync::Arc;

use wireshape_core::{format_iso8601, parse_iso8601, Value};

use crate::schema::{MaybeValid, Schema, SchemaOptions, SchemaRef, SchemaType};
use crate::utils::{incorrect_type, maybe_skip_validation};

struct DateSchema;

impl DateSchema {
    fn parse_date(raw: &Value, opts: &SchemaOptions) -> MaybeValid {
        let Value::String(s) = raw else {
            return Err(incorrect_type(raw, "string", opts));
        };
        parse_iso8601(s)
            .map(Value::Date)
            .map_err(|_| incorrect_type(raw, "ISO 8601 date string", opts))
    }

    fn json_date(parsed: &Value, opts: &SchemaOptions) -> MaybeValid {
        match parsed {
            Value::Date(dt) => Ok(Value::String(format_iso8601(dt))),
            _ => Err(incorrect_type(parsed, "Date object", opts)),
        }
    }
}

impl Schema for DateSchema {
    fn parse(&self, raw: &Value, opts: &SchemaOptions) -> MaybeValid {
        maybe_skip_validation(raw, Self::parse_date(raw, opts), opts)
    }

    fn json(&self, parsed: &Value, opts: &SchemaOptions) -> MaybeValid {
        maybe_skip_validation(parsed, Self::json_date(parsed, opts), opts)
    }

    fn schema_type(&self) -> SchemaType {
        SchemaType::Date
    }
}

pub fn date() -> SchemaRef {
    Arc::new(DateSchema)
}
