//! # Schema Registry
//!
//! Compiles a [`DefinitionsDocument`] into named schemas.
//!
//! ## Loading
//!
//! Documents are checked before anything is compiled. Loading fails with a
//! [`DefinitionError`] when a reference names a type that does not exist,
//! when `extends` or a union member names something other than an object
//! type, when `extends` chains loop, or when `ref` types only refer to
//! each other in a loop without any concrete type in between.
//!
//! ## References
//!
//! `ref` definitions compile to lazy schemas that look the target up in
//! the registry on first use, so types may refer to themselves or to each
//! other. These lookups hold a weak handle: schemas taken from a registry
//! work for as long as some clone of the registry is alive.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use thiserror::Error;
use wireshape_core::{ValidationErrors, Value};

use crate::date::date;
use crate::definition::{DefinitionsDocument, TypeDefinition, TypeKind};
use crate::hydrate::hydrate;
use crate::lazy::{lazy, lazy_object};
use crate::list::{list, set};
use crate::literals::{boolean_literal, string_enum, string_literal};
use crate::object::{object, property, ObjectField, ObjectLikeExt};
use crate::primitives::{any, boolean, number, string, unknown};
use crate::record::record;
use crate::schema::{
    MaybeValid, ObjectLike, ObjectSchemaRef, Schema, SchemaOptions, SchemaRef, SchemaType,
};
use crate::undiscriminated_union::undiscriminated_union;
use crate::union::{discriminant, union};
use crate::utils::SchemaExt;

/// Error loading or using a definitions document.
#[derive(Error, Debug)]
pub enum DefinitionError {
    /// The document file could not be read.
    #[error("definitions load error for '{path}': {reason}")]
    Load {
        /// Path of the document.
        path: String,
        /// Why it could not be read.
        reason: String,
    },

    /// The document is not valid YAML/JSON or does not match the format.
    #[error("invalid definitions document: {0}")]
    Syntax(String),

    /// A reference names a type the document does not define.
    #[error("type '{owner}' references unknown type '{name}'")]
    UnknownReference {
        /// Type containing the reference.
        owner: String,
        /// The missing type.
        name: String,
    },

    /// `extends` or a union member names a type that is not an object.
    #[error("type '{owner}' uses '{name}' as {role}, but it is not an object type")]
    NotAnObject {
        /// Type containing the reference.
        owner: String,
        /// The referenced type (or union tag for inline members).
        name: String,
        /// `"a base type"` or `"a union member"`.
        role: &'static str,
    },

    /// `extends` chains loop back to `name`.
    #[error("type '{0}' extends itself")]
    CircularExtends(String),

    /// A chain of `ref` types leads back to `name` without reaching a
    /// concrete type.
    #[error("type '{0}' is a reference to itself")]
    CircularReference(String),

    /// Lookup of a type the registry does not have.
    #[error("unknown type '{0}'")]
    UnknownType(String),
}

struct RegistryInner {
    definitions: IndexMap<String, TypeDefinition>,
    schemas: HashMap<String, SchemaRef>,
    objects: HashMap<String, ObjectSchemaRef>,
}

/// Named schemas compiled from a definitions document.
///
/// Cloning is cheap; clones share the compiled schemas.
#[derive(Clone)]
pub struct SchemaRegistry {
    inner: Arc<RegistryInner>,
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("types", &self.names())
            .finish()
    }
}

impl SchemaRegistry {
    /// Check and compile a parsed document.
    pub fn from_document(document: DefinitionsDocument) -> Result<Self, DefinitionError> {
        check_document(&document.types)?;

        let definitions = document.types;
        let inner = Arc::new_cyclic(|weak: &Weak<RegistryInner>| {
            let compiler = Compiler { registry: weak };
            let mut schemas = HashMap::new();
            let mut objects = HashMap::new();
            for (name, definition) in &definitions {
                let schema = match &definition.kind {
                    TypeKind::Object { properties, extends } => {
                        let compiled = compiler.object(properties, extends);
                        objects.insert(name.clone(), Arc::clone(&compiled));
                        compiler.finish(compiled.to_schema(), definition)
                    }
                    _ => compiler.compile(definition),
                };
                schemas.insert(name.clone(), schema);
            }
            RegistryInner {
                definitions,
                schemas,
                objects,
            }
        });

        tracing::debug!(
            types = inner.definitions.len(),
            objects = inner.objects.len(),
            "compiled schema registry"
        );
        Ok(Self { inner })
    }

    /// Load a JSON document.
    pub fn from_json_str(document: &str) -> Result<Self, DefinitionError> {
        let document: DefinitionsDocument = serde_json::from_str(document)
            .map_err(|e| DefinitionError::Syntax(format!("invalid JSON: {e}")))?;
        Self::from_document(document)
    }

    /// Load a YAML document. JSON documents are accepted as well.
    pub fn from_yaml_str(document: &str) -> Result<Self, DefinitionError> {
        let document: DefinitionsDocument = serde_yaml::from_str(document)
            .map_err(|e| DefinitionError::Syntax(format!("invalid YAML: {e}")))?;
        Self::from_document(document)
    }

    /// Load a document file.
    ///
    /// The format follows the file extension: `.yaml`/`.yml` for YAML,
    /// JSON otherwise.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| DefinitionError::Load {
            path: path.display().to_string(),
            reason: format!("cannot read file: {e}"),
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        tracing::debug!(path = %path.display(), "loading definitions");
        match ext {
            "yaml" | "yml" => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    /// The schema of a named type.
    pub fn get(&self, name: &str) -> Option<SchemaRef> {
        self.inner.schemas.get(name).cloned()
    }

    /// The object schema of a named object type.
    pub fn get_object(&self, name: &str) -> Option<ObjectSchemaRef> {
        self.inner.objects.get(name).cloned()
    }

    /// Like [`get`](Self::get), failing for unknown names.
    pub fn schema(&self, name: &str) -> Result<SchemaRef, DefinitionError> {
        self.get(name)
            .ok_or_else(|| DefinitionError::UnknownType(name.to_string()))
    }

    /// The definition a named type was compiled from.
    pub fn definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.inner.definitions.get(name)
    }

    /// Type names in document order.
    pub fn names(&self) -> Vec<&str> {
        self.inner.definitions.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.definitions.is_empty()
    }

    /// Parse `raw` as the named type.
    pub fn parse(&self, name: &str, raw: &Value, opts: &SchemaOptions) -> Result<MaybeValid, DefinitionError> {
        Ok(self.schema(name)?.parse(raw, opts))
    }

    /// Serialize `parsed` as the named type.
    pub fn json(&self, name: &str, parsed: &Value, opts: &SchemaOptions) -> Result<MaybeValid, DefinitionError> {
        Ok(self.schema(name)?.json(parsed, opts))
    }

    /// Restore dates and sets in a parsed document that went through JSON.
    ///
    /// See [`crate::hydrate`] for the rules.
    pub fn hydrate(&self, name: &str, value: &Value) -> Result<Value, DefinitionError> {
        let definition = self
            .definition(name)
            .ok_or_else(|| DefinitionError::UnknownType(name.to_string()))?;
        Ok(hydrate(&self.inner.definitions, definition, value))
    }
}

impl FromStr for SchemaRegistry {
    type Err = DefinitionError;

    /// Same as [`SchemaRegistry::from_yaml_str`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_yaml_str(s)
    }
}

// ─── Checks ──────────────────────────────────────────────────────────

fn check_document(types: &IndexMap<String, TypeDefinition>) -> Result<(), DefinitionError> {
    for (name, definition) in types {
        check_definition(name, definition, types)?;
    }
    check_extends_cycles(types)?;
    check_reference_cycles(types)
}

fn is_object_type(types: &IndexMap<String, TypeDefinition>, name: &str) -> bool {
    matches!(
        types.get(name).map(|d| &d.kind),
        Some(TypeKind::Object { .. })
    )
}

fn check_definition(
    owner: &str,
    definition: &TypeDefinition,
    types: &IndexMap<String, TypeDefinition>,
) -> Result<(), DefinitionError> {
    let unknown = |name: &str| DefinitionError::UnknownReference {
        owner: owner.to_string(),
        name: name.to_string(),
    };

    match &definition.kind {
        TypeKind::Ref { name } => {
            if !types.contains_key(name) {
                return Err(unknown(name));
            }
        }
        TypeKind::List { items } | TypeKind::Set { items } => {
            check_definition(owner, items, types)?;
        }
        TypeKind::Record { key, value } => {
            check_definition(owner, key, types)?;
            check_definition(owner, value, types)?;
        }
        TypeKind::Object { properties, extends } => {
            for property in properties.values() {
                check_definition(owner, property, types)?;
            }
            for base in extends {
                if !types.contains_key(base) {
                    return Err(unknown(base));
                }
                if !is_object_type(types, base) {
                    return Err(DefinitionError::NotAnObject {
                        owner: owner.to_string(),
                        name: base.clone(),
                        role: "a base type",
                    });
                }
            }
        }
        TypeKind::Union { members, .. } => {
            for (tag, member) in members {
                match &member.kind {
                    TypeKind::Object { .. } => check_definition(owner, member, types)?,
                    TypeKind::Ref { name } => {
                        if !types.contains_key(name) {
                            return Err(unknown(name));
                        }
                        if !is_object_type(types, name) {
                            return Err(DefinitionError::NotAnObject {
                                owner: owner.to_string(),
                                name: name.clone(),
                                role: "a union member",
                            });
                        }
                    }
                    _ => {
                        return Err(DefinitionError::NotAnObject {
                            owner: owner.to_string(),
                            name: tag.clone(),
                            role: "a union member",
                        })
                    }
                }
            }
        }
        TypeKind::UndiscriminatedUnion { variants } => {
            for variant in variants {
                check_definition(owner, variant, types)?;
            }
        }
        TypeKind::String
        | TypeKind::Number
        | TypeKind::Boolean
        | TypeKind::Any
        | TypeKind::Unknown
        | TypeKind::Date
        | TypeKind::Enum { .. }
        | TypeKind::StringLiteral { .. }
        | TypeKind::BooleanLiteral { .. } => {}
    }
    Ok(())
}

/// Depth-first walk of the `extends` graph of named object types.
fn check_extends_cycles(types: &IndexMap<String, TypeDefinition>) -> Result<(), DefinitionError> {
    fn visit<'a>(
        name: &'a str,
        types: &'a IndexMap<String, TypeDefinition>,
        in_progress: &mut HashSet<&'a str>,
        done: &mut HashSet<&'a str>,
    ) -> Result<(), DefinitionError> {
        if done.contains(name) {
            return Ok(());
        }
        if !in_progress.insert(name) {
            return Err(DefinitionError::CircularExtends(name.to_string()));
        }
        if let Some(TypeKind::Object { extends, .. }) = types.get(name).map(|d| &d.kind) {
            for base in extends {
                visit(base, types, in_progress, done)?;
            }
        }
        in_progress.remove(name);
        done.insert(name);
        Ok(())
    }

    let mut in_progress = HashSet::new();
    let mut done = HashSet::new();
    for name in types.keys() {
        visit(name, types, &mut in_progress, &mut done)?;
    }
    Ok(())
}

/// Follow each `ref`-to-`ref` chain; every type has at most one such edge.
fn check_reference_cycles(types: &IndexMap<String, TypeDefinition>) -> Result<(), DefinitionError> {
    let mut done: HashSet<&str> = HashSet::new();
    for start in types.keys() {
        let mut chain: HashSet<&str> = HashSet::new();
        let mut current = start.as_str();
        while let Some(TypeKind::Ref { name }) = types.get(current).map(|d| &d.kind) {
            if done.contains(current) {
                break;
            }
            if !chain.insert(current) {
                return Err(DefinitionError::CircularReference(current.to_string()));
            }
            current = name.as_str();
        }
        done.extend(chain);
    }
    Ok(())
}

// ─── Compilation ─────────────────────────────────────────────────────

struct Compiler<'a> {
    registry: &'a Weak<RegistryInner>,
}

impl Compiler<'_> {
    fn compile(&self, definition: &TypeDefinition) -> SchemaRef {
        let schema = match &definition.kind {
            TypeKind::String => string(),
            TypeKind::Number => number(),
            TypeKind::Boolean => boolean(),
            TypeKind::Any => any(),
            TypeKind::Unknown => unknown(),
            TypeKind::Date => date(),
            TypeKind::Enum { values } => string_enum(values.iter().cloned()),
            TypeKind::StringLiteral { value } => string_literal(value.clone()),
            TypeKind::BooleanLiteral { value } => boolean_literal(*value),
            TypeKind::List { items } => list(self.compile(items)),
            TypeKind::Set { items } => set(self.compile(items)),
            TypeKind::Record { key, value } => record(self.compile(key), self.compile(value)),
            TypeKind::Object { properties, extends } => self.object(properties, extends).to_schema(),
            TypeKind::Union {
                discriminant: parsed,
                raw_discriminant,
                members,
            } => {
                let raw = raw_discriminant.clone().unwrap_or_else(|| parsed.clone());
                union(
                    discriminant(parsed.clone(), raw),
                    members
                        .iter()
                        .map(|(tag, member)| (tag.clone(), self.union_member(member))),
                )
            }
            TypeKind::UndiscriminatedUnion { variants } => {
                undiscriminated_union(variants.iter().map(|v| self.compile(v)))
            }
            TypeKind::Ref { name } => self.reference(name),
        };
        self.finish(schema, definition)
    }

    /// Apply the flags shared by every definition.
    fn finish(&self, schema: SchemaRef, definition: &TypeDefinition) -> SchemaRef {
        if definition.optional {
            schema.optional()
        } else {
            schema
        }
    }

    fn object(&self, properties: &IndexMap<String, TypeDefinition>, extends: &[String]) -> ObjectSchemaRef {
        let own = object(properties.iter().map(|(key, definition)| {
            let schema = self.compile(definition);
            let field = match &definition.raw_key {
                Some(raw_key) => property(raw_key.clone(), schema),
                None => ObjectField::from(schema),
            };
            (key.clone(), field)
        }));
        extends
            .iter()
            .fold(own, |acc, base| acc.extend(self.object_reference(base)))
    }

    fn union_member(&self, member: &TypeDefinition) -> ObjectSchemaRef {
        match &member.kind {
            TypeKind::Object { properties, extends } => self.object(properties, extends),
            TypeKind::Ref { name } => self.object_reference(name),
            other => unresolved_object(other.tag()),
        }
    }

    fn reference(&self, name: &str) -> SchemaRef {
        let registry = Weak::clone(self.registry);
        let name = name.to_string();
        lazy(move || {
            registry
                .upgrade()
                .and_then(|inner| inner.schemas.get(&name).cloned())
                .unwrap_or_else(|| unresolved(&name))
        })
    }

    fn object_reference(&self, name: &str) -> ObjectSchemaRef {
        let registry = Weak::clone(self.registry);
        let name = name.to_string();
        lazy_object(move || {
            registry
                .upgrade()
                .and_then(|inner| inner.objects.get(&name).cloned())
                .unwrap_or_else(|| unresolved_object(&name))
        })
    }
}

/// Stands in for a reference whose registry has been dropped.
struct Unresolved {
    name: String,
    schema_type: SchemaType,
}

fn unresolved(name: &str) -> SchemaRef {
    Arc::new(Unresolved {
        name: name.to_string(),
        schema_type: SchemaType::Unknown,
    })
}

fn unresolved_object(name: &str) -> ObjectSchemaRef {
    Arc::new(Unresolved {
        name: name.to_string(),
        schema_type: SchemaType::Object,
    })
}

impl Unresolved {
    fn fail(&self, opts: &SchemaOptions) -> MaybeValid {
        Err(ValidationErrors::single(
            opts.breadcrumbs_prefix.clone(),
            format!("Unresolved type \"{}\"", self.name),
        ))
    }
}

impl Schema for Unresolved {
    fn parse(&self, _raw: &Value, opts: &SchemaOptions) -> MaybeValid {
        self.fail(opts)
    }

    fn json(&self, _parsed: &Value, opts: &SchemaOptions) -> MaybeValid {
        self.fail(opts)
    }

    fn schema_type(&self) -> SchemaType {
        self.schema_type
    }
}

impl ObjectLike for Unresolved {
    fn raw_properties(&self) -> Vec<String> {
        Vec::new()
    }

    fn parsed_properties(&self) -> Vec<String> {
        Vec::new()
    }

    fn into_schema(self: Arc<Self>) -> SchemaRef {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DOCUMENT: &str = r#"
types:
  Node:
    type: object
    properties:
      value: { type: number }
      next: { type: ref, name: Node, optional: true }
  Named:
    type: object
    properties:
      name: { type: string }
  Person:
    type: object
    extends: [Named]
    properties:
      birthDate: { type: date, rawKey: birth_date }
  Color:
    type: enum
    values: [red, green]
"#;

    fn registry() -> SchemaRegistry {
        DOCUMENT.parse().unwrap()
    }

    #[test]
    fn test_names_in_document_order() {
        let registry = registry();
        assert_eq!(registry.names(), vec!["Node", "Named", "Person", "Color"]);
        assert_eq!(registry.len(), 4);
        assert!(registry.get_object("Person").is_some());
        assert!(registry.get_object("Color").is_none());
    }

    #[test]
    fn test_recursive_reference() {
        let registry = registry();
        let raw = Value::from(json!({"value": 1, "next": {"value": 2, "next": null}}));
        let parsed = registry
            .parse("Node", &raw, &SchemaOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(parsed, raw);

        let bad = Value::from(json!({"value": 1, "next": {"value": "two"}}));
        let err = registry
            .parse("Node", &bad, &SchemaOptions::default())
            .unwrap()
            .unwrap_err();
        assert_eq!(err.to_string(), "next -> value: Expected number. Received \"two\".");
    }

    #[test]
    fn test_extends_and_raw_keys() {
        let registry = registry();
        let raw = Value::from(json!({"name": "Ada", "birth_date": "1815-12-10"}));
        let parsed = registry
            .parse("Person", &raw, &SchemaOptions::default())
            .unwrap()
            .unwrap();
        assert!(matches!(parsed.get("birthDate"), Some(Value::Date(_))));
        assert_eq!(parsed.get("name"), Some(&Value::from("Ada")));
    }

    #[test]
    fn test_unknown_type_lookup() {
        let err = registry()
            .parse("Missing", &Value::Null, &SchemaOptions::default())
            .unwrap_err();
        assert!(matches!(err, DefinitionError::UnknownType(ref n) if n == "Missing"));
    }

    #[test]
    fn test_unknown_reference_rejected() {
        let err = SchemaRegistry::from_yaml_str(
            "types:\n  A: { type: list, items: { type: ref, name: B } }\n",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "type 'A' references unknown type 'B'");
    }

    #[test]
    fn test_non_object_union_member_rejected() {
        let doc = r#"
types:
  U:
    type: union
    discriminant: type
    members:
      a: { type: ref, name: S }
  S: { type: string }
"#;
        let err = SchemaRegistry::from_yaml_str(doc).unwrap_err();
        assert!(matches!(
            err,
            DefinitionError::NotAnObject { role: "a union member", .. }
        ));
    }

    #[test]
    fn test_non_object_base_rejected() {
        let doc = "types:\n  A: { type: object, extends: [B] }\n  B: { type: number }\n";
        let err = SchemaRegistry::from_yaml_str(doc).unwrap_err();
        assert_eq!(
            err.to_string(),
            "type 'A' uses 'B' as a base type, but it is not an object type"
        );
    }

    #[test]
    fn test_circular_extends_rejected() {
        let doc = "types:\n  A: { type: object, extends: [B] }\n  B: { type: object, extends: [A] }\n";
        let err = SchemaRegistry::from_yaml_str(doc).unwrap_err();
        assert!(matches!(err, DefinitionError::CircularExtends(_)));
    }

    #[test]
    fn test_circular_reference_rejected() {
        let doc = "types:\n  A: { type: ref, name: B }\n  B: { type: ref, name: A }\n";
        let err = SchemaRegistry::from_yaml_str(doc).unwrap_err();
        assert!(matches!(err, DefinitionError::CircularReference(_)));

        let doc = "types:\n  Loop: { type: ref, name: Loop, optional: true }\n";
        let err = SchemaRegistry::from_yaml_str(doc).unwrap_err();
        assert_eq!(err.to_string(), "type 'Loop' is a reference to itself");
    }

    #[test]
    fn test_reference_chain_to_concrete_type_loads() {
        let doc = "types:\n  A: { type: ref, name: B }\n  B: { type: ref, name: C }\n  C: { type: string }\n  D: { type: ref, name: A }\n";
        let registry = SchemaRegistry::from_yaml_str(doc).unwrap();
        assert_eq!(registry.get("D").unwrap().schema_type(), SchemaType::String);
        let parsed = registry
            .parse("D", &Value::from("x"), &SchemaOptions::default())
            .unwrap();
        assert_eq!(parsed.unwrap(), Value::from("x"));
    }

    #[test]
    fn test_syntax_error() {
        let err = SchemaRegistry::from_json_str("{\"types\": 3}").unwrap_err();
        assert!(matches!(err, DefinitionError::Syntax(_)));
    }

    #[test]
    fn test_dropped_registry_reports_unresolved() {
        let schema = registry().get("Node").unwrap();
        let raw = Value::from(json!({"value": 1, "next": {"value": 2}}));
        let err = schema.parse(&raw, &SchemaOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "next: Unresolved type \"Node\"");
    }
}
