//! Integration test: load the pet store definitions and round-trip
//! realistic documents through the compiled schemas.

use std::io::Write;
use std::path::PathBuf;

use serde_json::json;
use wireshape_schema::{
    DefinitionError, SchemaOptions, SchemaRegistry, UnrecognizedObjectKeys, Value,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn store() -> SchemaRegistry {
    SchemaRegistry::from_path(fixture("store.yaml")).expect("Failed to load store.yaml")
}

fn rendered(errors: &wireshape_schema::ValidationErrors) -> Vec<String> {
    errors.iter().map(ToString::to_string).collect()
}

#[test]
fn test_fixture_types() {
    let registry = store();
    assert_eq!(
        registry.names(),
        vec!["Resource", "Owner", "Pet", "Dog", "Inventory", "Price", "Category"]
    );
}

#[test]
fn test_owner_round_trip() {
    let registry = store();
    let opts = SchemaOptions::default();
    let raw = Value::from(json!({
        "id": "o1",
        "created_at": "2026-01-15T09:30:00.000Z",
        "display_name": "Sam",
        "pets": [
            {"type": "dog", "name": "Rex", "good_boy": true, "tricks": ["sit", "fetch"]},
            {"type": "cat", "indoor": true, "lives": 9}
        ]
    }));

    let parsed = registry.parse("Owner", &raw, &opts).unwrap().unwrap();
    assert!(matches!(parsed.get("createdAt"), Some(Value::Date(_))));
    assert_eq!(parsed.get("displayName"), Some(&Value::from("Sam")));

    let pets = parsed.get("pets").and_then(Value::as_list).unwrap();
    assert_eq!(pets[0].get("species"), Some(&Value::from("dog")));
    assert_eq!(pets[0].get("goodBoy"), Some(&Value::Bool(true)));
    assert!(matches!(pets[0].get("tricks"), Some(Value::Set(_))));
    assert_eq!(pets[1].get("lives"), Some(&Value::from(9)));

    let wire = registry.json("Owner", &parsed, &opts).unwrap().unwrap();
    assert_eq!(wire, raw);
}

#[test]
fn test_owner_errors_carry_paths() {
    let registry = store();
    let raw = Value::from(json!({
        "id": "o1",
        "created_at": "2026-01-15",
        "pets": [
            {"type": "dog", "name": 1, "good_boy": false},
            {"type": "fish"}
        ]
    }));
    let opts = SchemaOptions::default().with_breadcrumb("owner");
    let err = registry.parse("Owner", &raw, &opts).unwrap().unwrap_err();
    assert_eq!(
        rendered(&err),
        vec![
            "owner -> pets -> [0] -> name: Expected string. Received 1.",
            "owner -> pets -> [0] -> good_boy: Expected true. Received false.",
            "owner -> pets -> [1] -> type: Expected enum. Received \"fish\".",
            "owner: Missing required key \"display_name\"",
        ]
    );
}

#[test]
fn test_unknown_pet_allowed_with_option() {
    let registry = store();
    let opts = SchemaOptions {
        allow_unrecognized_union_members: true,
        ..Default::default()
    };
    let parsed = registry
        .parse("Pet", &Value::from(json!({"type": "fish", "fins": 4})), &opts)
        .unwrap()
        .unwrap();
    assert_eq!(parsed, Value::from(json!({"species": "fish", "fins": 4})));
}

#[test]
fn test_record_and_undiscriminated_union() {
    let registry = store();
    let opts = SchemaOptions::default();

    let inventory = registry
        .parse("Inventory", &Value::from(json!({"kibble": 3, "treats": null})), &opts)
        .unwrap()
        .unwrap();
    assert_eq!(inventory, Value::from(json!({"kibble": 3})));

    assert_eq!(
        registry.parse("Price", &Value::from(3), &opts).unwrap().unwrap(),
        Value::from(3)
    );
    let err = registry
        .parse("Price", &Value::from(json!({"amount": 5, "currency": "USD"})), &opts)
        .unwrap()
        .unwrap_err();
    assert_eq!(
        rendered(&err),
        vec![
            "[Variant 0] Expected number. Received object.",
            "currency: [Variant 1] Expected \"EUR\". Received \"USD\".",
        ]
    );
}

#[test]
fn test_recursive_category_and_passthrough() {
    let registry = store();
    let raw = Value::from(json!({
        "label": "animals",
        "children": [{"label": "dogs", "children": [], "legacy": 1}]
    }));

    let err = registry
        .parse("Category", &raw, &SchemaOptions::default())
        .unwrap()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "children -> [0] -> legacy: Unexpected key \"legacy\""
    );

    let opts = SchemaOptions {
        unrecognized_object_keys: UnrecognizedObjectKeys::Passthrough,
        ..Default::default()
    };
    assert_eq!(registry.parse("Category", &raw, &opts).unwrap().unwrap(), raw);
}

#[test]
fn test_json_definitions_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{"types": {{"Flag": {{"type": "object", "properties": {{"on": {{"type": "boolean", "rawKey": "is_on"}}}}}}}}}}"#
    )
    .unwrap();

    let registry = SchemaRegistry::from_path(file.path()).unwrap();
    let parsed = registry
        .parse("Flag", &Value::from(json!({"is_on": true})), &SchemaOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(parsed, Value::from(json!({"on": true})));
}

#[test]
fn test_missing_file_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = SchemaRegistry::from_path(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, DefinitionError::Load { .. }));
}
