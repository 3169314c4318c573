//! # Object Schemas
//!
//! An object schema maps parsed field names to child schemas. A field may
//! use a different key on the wire through [`property`]:
//!
//! ```
//! use wireshape_schema::{date, object, property, string, ObjectField, Schema, SchemaOptions, Value};
//!
//! let user = object([
//!     ("id", ObjectField::from(string())),
//!     ("createdAt", property("created_at", date())),
//! ]);
//! let raw = Value::from(serde_json::json!({"id": "u1", "created_at": "2026-01-15"}));
//! let parsed = user.parse(&raw, &SchemaOptions::default()).unwrap();
//! assert!(parsed.get("createdAt").is_some());
//! ```
//!
//! ## Validation Rules
//!
//! 1. Non-objects fail with `Expected object. Received …`.
//! 2. Every present key is looked up (wire key when parsing, parsed key when
//!    serializing). A successful child result is stored under the other
//!    side's key; a failed one keeps the original key and value and its
//!    errors are collected.
//! 3. Keys without a field follow
//!    [`UnrecognizedObjectKeys`](crate::UnrecognizedObjectKeys).
//! 4. Every required field that is absent is reported at the object's own
//!    path as `Missing required key "<key>"`.
//! 5. Nothing short-circuits: all errors are returned together. With
//!    `skip_validation` the partially transformed object is returned.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use wireshape_core::{Object, ValidationError, ValidationErrors, Value};

use crate::schema::{
    is_schema_required, Direction, MaybeValid, ObjectLike, ObjectSchemaRef, Schema, SchemaOptions,
    SchemaRef, SchemaType, UnrecognizedObjectKeys,
};
use crate::utils::{incorrect_type, maybe_skip_validation};

/// One field of an object schema.
#[derive(Clone)]
pub struct ObjectField {
    raw_key: Option<String>,
    schema: SchemaRef,
}

impl ObjectField {
    /// The wire key, or `parsed_key` when the field is not aliased.
    fn raw_key<'a>(&'a self, parsed_key: &'a str) -> &'a str {
        self.raw_key.as_deref().unwrap_or(parsed_key)
    }
}

impl From<SchemaRef> for ObjectField {
    fn from(schema: SchemaRef) -> Self {
        Self {
            raw_key: None,
            schema,
        }
    }
}

impl From<ObjectSchemaRef> for ObjectField {
    fn from(schema: ObjectSchemaRef) -> Self {
        Self {
            raw_key: None,
            schema: schema.into_schema(),
        }
    }
}

/// A field whose wire key differs from its parsed key.
pub fn property(raw_key: impl Into<String>, schema: impl Into<ObjectField>) -> ObjectField {
    let field = schema.into();
    ObjectField {
        raw_key: Some(raw_key.into()),
        schema: field.schema,
    }
}

struct ObjectSchema {
    /// Parsed key and field, in declaration order.
    fields: Vec<(String, ObjectField)>,
    by_raw_key: HashMap<String, usize>,
    by_parsed_key: HashMap<String, usize>,
}

impl ObjectSchema {
    fn new(fields: Vec<(String, ObjectField)>) -> Self {
        let mut by_raw_key = HashMap::new();
        let mut by_parsed_key = HashMap::new();
        for (index, (parsed_key, field)) in fields.iter().enumerate() {
            by_raw_key.insert(field.raw_key(parsed_key).to_string(), index);
            by_parsed_key.insert(parsed_key.clone(), index);
        }
        Self {
            fields,
            by_raw_key,
            by_parsed_key,
        }
    }

    fn transform_object(&self, value: &Value, opts: &SchemaOptions, direction: Direction) -> MaybeValid {
        let (lookup, required_keys): (&HashMap<String, usize>, Vec<String>) = match direction {
            Direction::Parse => (
                &self.by_raw_key,
                self.fields
                    .iter()
                    .filter(|(_, field)| is_schema_required(field.schema.as_ref()))
                    .map(|(parsed_key, field)| field.raw_key(parsed_key).to_string())
                    .collect(),
            ),
            Direction::Json => (
                &self.by_parsed_key,
                self.fields
                    .iter()
                    .filter(|(_, field)| is_schema_required(field.schema.as_ref()))
                    .map(|(parsed_key, _)| parsed_key.clone())
                    .collect(),
            ),
        };

        validate_and_transform_object(value, &required_keys, opts, |key| {
            let (parsed_key, field) = &self.fields[*lookup.get(key)?];
            let transformed_key = match direction {
                Direction::Parse => parsed_key.clone(),
                Direction::Json => field.raw_key(parsed_key).to_string(),
            };
            Some((transformed_key, field.schema.as_ref(), direction))
        })
    }
}

/// The object algorithm shared by [`object`] schemas.
///
/// `get_property` maps an input key to the output key, the child schema
/// and the direction to run it in; `None` marks an unrecognized key.
fn validate_and_transform_object<'s, F>(
    value: &Value,
    required_keys: &[String],
    opts: &SchemaOptions,
    get_property: F,
) -> MaybeValid
where
    F: Fn(&str) -> Option<(String, &'s dyn Schema, Direction)>,
{
    let Value::Object(entries) = value else {
        return Err(incorrect_type(value, "object", opts));
    };

    let mut present: HashSet<&str> = HashSet::new();
    let mut errors = ValidationErrors::default();
    let mut transformed = Object::new();

    for (key, item) in entries {
        match get_property(key) {
            Some((transformed_key, schema, direction)) => {
                present.insert(key.as_str());
                match direction.apply(schema, item, &opts.with_breadcrumb(key.as_str())) {
                    Ok(v) => {
                        transformed.insert(transformed_key, v);
                    }
                    Err(e) => {
                        transformed.insert(key.clone(), item.clone());
                        errors.append(e);
                    }
                }
            }
            None => match opts.unrecognized_object_keys {
                UnrecognizedObjectKeys::Fail => errors.push(ValidationError::new(
                    opts.child_path(key.as_str()),
                    format!("Unexpected key \"{key}\""),
                )),
                UnrecognizedObjectKeys::Strip => {}
                UnrecognizedObjectKeys::Passthrough => {
                    transformed.insert(key.clone(), item.clone());
                }
            },
        }
    }

    for key in required_keys {
        if !present.contains(key.as_str()) {
            errors.push(ValidationError::new(
                opts.breadcrumbs_prefix.clone(),
                format!("Missing required key \"{key}\""),
            ));
        }
    }

    if errors.is_empty() || opts.skip_validation {
        Ok(Value::Object(transformed))
    } else {
        Err(errors)
    }
}

impl Schema for ObjectSchema {
    fn parse(&self, raw: &Value, opts: &SchemaOptions) -> MaybeValid {
        maybe_skip_validation(raw, self.transform_object(raw, opts, Direction::Parse), opts)
    }

    fn json(&self, parsed: &Value, opts: &SchemaOptions) -> MaybeValid {
        maybe_skip_validation(parsed, self.transform_object(parsed, opts, Direction::Json), opts)
    }

    fn schema_type(&self) -> SchemaType {
        SchemaType::Object
    }
}

impl ObjectLike for ObjectSchema {
    fn raw_properties(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|(parsed_key, field)| field.raw_key(parsed_key).to_string())
            .collect()
    }

    fn parsed_properties(&self) -> Vec<String> {
        self.fields.iter().map(|(parsed_key, _)| parsed_key.clone()).collect()
    }

    fn into_schema(self: Arc<Self>) -> SchemaRef {
        self
    }
}

/// An object schema from `(parsed key, field)` pairs.
pub fn object<I, K, F>(fields: I) -> ObjectSchemaRef
where
    I: IntoIterator<Item = (K, F)>,
    K: Into<String>,
    F: Into<ObjectField>,
{
    Arc::new(ObjectSchema::new(
        fields.into_iter().map(|(k, f)| (k.into(), f.into())).collect(),
    ))
}

// ─── Extension ───────────────────────────────────────────────────────

/// `base` plus the properties of `extension`.
///
/// Input keys are split by whether the extension declares them; each half
/// goes through its own schema and the results are merged, base first.
struct ExtendedObject {
    base: ObjectSchemaRef,
    extension: ObjectSchemaRef,
}

impl ExtendedObject {
    fn transform_halves(&self, value: &Value, opts: &SchemaOptions, direction: Direction) -> MaybeValid {
        let Value::Object(entries) = value else {
            return Err(incorrect_type(value, "object", opts));
        };

        let extension_keys: HashSet<String> = match direction {
            Direction::Parse => self.extension.raw_properties(),
            Direction::Json => self.extension.parsed_properties(),
        }
        .into_iter()
        .collect();

        let (extension_part, base_part): (Object, Object) = entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .partition(|(k, _)| extension_keys.contains(k));

        let base = direction.apply(self.base.as_ref(), &Value::Object(base_part), opts);
        let extension = direction.apply(self.extension.as_ref(), &Value::Object(extension_part), opts);

        match (base, extension) {
            (Ok(Value::Object(mut merged)), Ok(Value::Object(extra))) => {
                merged.extend(extra);
                Ok(Value::Object(merged))
            }
            (Ok(base), Ok(_)) => Ok(base),
            (base, extension) => {
                let mut errors = ValidationErrors::default();
                if let Err(e) = base {
                    errors.append(e);
                }
                if let Err(e) = extension {
                    errors.append(e);
                }
                Err(errors)
            }
        }
    }
}

impl Schema for ExtendedObject {
    fn parse(&self, raw: &Value, opts: &SchemaOptions) -> MaybeValid {
        self.transform_halves(raw, opts, Direction::Parse)
    }

    fn json(&self, parsed: &Value, opts: &SchemaOptions) -> MaybeValid {
        self.transform_halves(parsed, opts, Direction::Json)
    }

    fn schema_type(&self) -> SchemaType {
        SchemaType::Object
    }
}

impl ObjectLike for ExtendedObject {
    fn raw_properties(&self) -> Vec<String> {
        let mut keys = self.base.raw_properties();
        keys.extend(self.extension.raw_properties());
        keys
    }

    fn parsed_properties(&self) -> Vec<String> {
        let mut keys = self.base.parsed_properties();
        keys.extend(self.extension.parsed_properties());
        keys
    }

    fn into_schema(self: Arc<Self>) -> SchemaRef {
        self
    }
}

/// `base` extended with the properties of `extension`.
pub fn extend(base: ObjectSchemaRef, extension: ObjectSchemaRef) -> ObjectSchemaRef {
    Arc::new(ExtendedObject { base, extension })
}

// ─── Parsed-only properties ──────────────────────────────────────────

/// A property added to parsed values by [`with_parsed_properties`].
#[derive(Clone)]
pub enum AddedProperty {
    /// The same value every time.
    Constant(Value),
    /// Computed from the parsed object.
    Computed(Arc<dyn Fn(&Value) -> Value + Send + Sync>),
}

impl AddedProperty {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(f))
    }

    fn resolve(&self, parsed: &Value) -> Value {
        match self {
            Self::Constant(v) => v.clone(),
            Self::Computed(f) => f(parsed),
        }
    }
}

impl From<Value> for AddedProperty {
    fn from(v: Value) -> Self {
        Self::Constant(v)
    }
}

struct WithParsedProperties<S: ?Sized> {
    inner: Arc<S>,
    properties: Vec<(String, AddedProperty)>,
}

impl<S: Schema + ?Sized> Schema for WithParsedProperties<S> {
    fn parse(&self, raw: &Value, opts: &SchemaOptions) -> MaybeValid {
        let parsed = self.inner.parse(raw, opts)?;
        let additions: Vec<(String, Value)> = self
            .properties
            .iter()
            .map(|(key, property)| (key.clone(), property.resolve(&parsed)))
            .collect();
        match parsed {
            Value::Object(mut o) => {
                o.extend(additions);
                Ok(Value::Object(o))
            }
            other => Ok(other),
        }
    }

    fn json(&self, parsed: &Value, opts: &SchemaOptions) -> MaybeValid {
        let Value::Object(entries) = parsed else {
            return Err(incorrect_type(parsed, "object", opts));
        };
        let added: HashSet<&str> = self.properties.iter().map(|(k, _)| k.as_str()).collect();
        let without_added: Object = entries
            .iter()
            .filter(|(k, _)| !added.contains(k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self.inner.json(&Value::Object(without_added), opts)
    }

    fn schema_type(&self) -> SchemaType {
        self.inner.schema_type()
    }
}

impl ObjectLike for WithParsedProperties<dyn ObjectLike> {
    fn raw_properties(&self) -> Vec<String> {
        self.inner.raw_properties()
    }

    fn parsed_properties(&self) -> Vec<String> {
        self.inner.parsed_properties()
    }

    fn into_schema(self: Arc<Self>) -> SchemaRef {
        self
    }
}

fn collect_properties<I, K, P>(properties: I) -> Vec<(String, AddedProperty)>
where
    I: IntoIterator<Item = (K, P)>,
    K: Into<String>,
    P: Into<AddedProperty>,
{
    properties
        .into_iter()
        .map(|(k, p)| (k.into(), p.into()))
        .collect()
}

/// Add properties to the parsed values of any object-producing schema,
/// such as a union. The added keys are removed again before serializing.
pub fn with_parsed_properties<I, K, P>(schema: SchemaRef, properties: I) -> SchemaRef
where
    I: IntoIterator<Item = (K, P)>,
    K: Into<String>,
    P: Into<AddedProperty>,
{
    Arc::new(WithParsedProperties {
        inner: schema,
        properties: collect_properties(properties),
    })
}

/// Object-only combinators on [`ObjectSchemaRef`].
pub trait ObjectLikeExt {
    /// This object plus the properties of `extension`.
    fn extend(&self, extension: ObjectSchemaRef) -> ObjectSchemaRef;

    /// Add properties to parsed values; see [`with_parsed_properties`].
    fn with_parsed_properties<I, K, P>(&self, properties: I) -> ObjectSchemaRef
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<AddedProperty>;
}

impl ObjectLikeExt for ObjectSchemaRef {
    fn extend(&self, extension: ObjectSchemaRef) -> ObjectSchemaRef {
        extend(Arc::clone(self), extension)
    }

    fn with_parsed_properties<I, K, P>(&self, properties: I) -> ObjectSchemaRef
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<AddedProperty>,
    {
        let schema: Arc<WithParsedProperties<dyn ObjectLike>> = Arc::new(WithParsedProperties {
            inner: Arc::clone(self),
            properties: collect_properties(properties),
        });
        schema
    }
}
