//! # Lazy Schemas
//!
//! Deferred construction for recursive schemas. The getter runs at most
//! once, on first use from any thread; every later call reuses its result.
//! A lazy schema reports the type tag of the schema it resolves to, so a
//! lazily built optional field is still optional.

use std::sync::{Arc, OnceLock};

use wireshape_core::Value;

use crate::schema::{MaybeValid, ObjectLike, ObjectSchemaRef, Schema, SchemaOptions, SchemaRef, SchemaType};

type Getter<S> = Box<dyn Fn() -> Arc<S> + Send + Sync>;

struct Lazy<S: ?Sized> {
    getter: Getter<S>,
    resolved: OnceLock<Arc<S>>,
}

impl<S: ?Sized> Lazy<S> {
    fn new(getter: Getter<S>) -> Self {
        Self {
            getter,
            resolved: OnceLock::new(),
        }
    }

    fn resolve(&self) -> &Arc<S> {
        self.resolved.get_or_init(|| (self.getter)())
    }
}

impl<S: Schema + ?Sized> Schema for Lazy<S> {
    fn parse(&self, raw: &Value, opts: &SchemaOptions) -> MaybeValid {
        self.resolve().parse(raw, opts)
    }

    fn json(&self, parsed: &Value, opts: &SchemaOptions) -> MaybeValid {
        self.resolve().json(parsed, opts)
    }

    fn schema_type(&self) -> SchemaType {
        self.resolve().schema_type()
    }
}

impl ObjectLike for Lazy<dyn ObjectLike> {
    fn raw_properties(&self) -> Vec<String> {
        self.resolve().raw_properties()
    }

    fn parsed_properties(&self) -> Vec<String> {
        self.resolve().parsed_properties()
    }

    fn into_schema(self: Arc<Self>) -> SchemaRef {
        self
    }
}

/// A schema built by `getter` on first use.
pub fn lazy<F>(getter: F) -> SchemaRef
where
    F: Fn() -> SchemaRef + Send + Sync + 'static,
{
    let schema: Arc<Lazy<dyn Schema>> = Arc::new(Lazy::new(Box::new(getter)));
    schema
}

/// An object schema built by `getter` on first use.
///
/// Unlike [`lazy`], the result can be extended or used as a union member.
pub fn lazy_object<F>(getter: F) -> ObjectSchemaRef
where
    F: Fn() -> ObjectSchemaRef + Send + Sync + 'static,
{
    let schema: Arc<Lazy<dyn ObjectLike>> = Arc::new(Lazy::new(Box::new(getter)));
    schema
}
