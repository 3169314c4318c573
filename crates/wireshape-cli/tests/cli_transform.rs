//! Integration test: drive the parse/serialize handlers end to end with
//! definitions, inputs and config files written to a temporary directory.

use std::path::{Path, PathBuf};

use wireshape_cli::config::CliConfig;
use wireshape_cli::transform::{run_transform, OptionFlags, TransformArgs};
use wireshape_schema::Direction;

const DEFINITIONS: &str = r#"
types:
  Event:
    type: object
    properties:
      title: { type: string }
      startsAt: { type: date, rawKey: starts_at }
      tags: { type: set, items: { type: string } }
      kind: { type: enum, values: [talk, workshop] }
"#;

struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("events.yaml"), DEFINITIONS).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn args(&self, definitions: Option<&Path>, input: Option<PathBuf>) -> TransformArgs {
        TransformArgs {
            definitions: definitions.map(Path::to_path_buf),
            type_name: "Event".to_string(),
            input,
            options: OptionFlags::default(),
        }
    }
}

struct Outcome {
    code: u8,
    stdout: String,
    stderr: String,
}

fn run(direction: Direction, args: &TransformArgs, config: &CliConfig, stdin: &str) -> Outcome {
    let mut stdin = stdin.as_bytes();
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = run_transform(direction, args, config, &mut stdin, &mut stdout, &mut stderr).unwrap();
    Outcome {
        code,
        stdout: String::from_utf8(stdout).unwrap(),
        stderr: String::from_utf8(stderr).unwrap(),
    }
}

const WIRE: &str = r#"{"title": "Intro", "starts_at": "2026-05-04T09:00:00.000Z", "tags": ["rust", "rust", "cli"], "kind": "talk"}"#;

#[test]
fn parse_then_serialize_round_trips() {
    let fixture = Fixture::new();
    let definitions = fixture.path("events.yaml");
    let args = fixture.args(Some(&definitions), None);

    let parsed = run(Direction::Parse, &args, &CliConfig::default(), WIRE);
    assert_eq!(parsed.code, 0, "stderr: {}", parsed.stderr);
    let parsed_json: serde_json::Value = serde_json::from_str(&parsed.stdout).unwrap();
    assert_eq!(
        parsed_json,
        serde_json::json!({
            "title": "Intro",
            "startsAt": "2026-05-04T09:00:00.000Z",
            "tags": ["rust", "cli"],
            "kind": "talk"
        })
    );

    let wire = run(Direction::Json, &args, &CliConfig::default(), &parsed.stdout);
    assert_eq!(wire.code, 0, "stderr: {}", wire.stderr);
    let wire_json: serde_json::Value = serde_json::from_str(&wire.stdout).unwrap();
    assert_eq!(
        wire_json,
        serde_json::json!({
            "title": "Intro",
            "starts_at": "2026-05-04T09:00:00.000Z",
            "tags": ["rust", "cli"],
            "kind": "talk"
        })
    );
}

#[test]
fn parse_output_keeps_input_key_order() {
    let fixture = Fixture::new();
    let args = fixture.args(Some(&fixture.path("events.yaml")), None);
    let outcome = run(Direction::Parse, &args, &CliConfig::default(), WIRE);
    let title = outcome.stdout.find("\"title\"").unwrap();
    let starts = outcome.stdout.find("\"startsAt\"").unwrap();
    let kind = outcome.stdout.find("\"kind\"").unwrap();
    assert!(title < starts && starts < kind);
}

#[test]
fn validation_errors_go_to_stderr_with_exit_code_1() {
    let fixture = Fixture::new();
    let args = fixture.args(Some(&fixture.path("events.yaml")), None);
    let outcome = run(
        Direction::Parse,
        &args,
        &CliConfig::default(),
        r#"{"title": 7, "starts_at": "later", "tags": [], "kind": "panel", "room": "A"}"#,
    );
    assert_eq!(outcome.code, 1);
    assert!(outcome.stdout.is_empty());
    assert_eq!(
        outcome.stderr.lines().collect::<Vec<_>>(),
        vec![
            "title: Expected string. Received 7.",
            "starts_at: Expected ISO 8601 date string. Received \"later\".",
            "kind: Expected enum. Received \"panel\".",
            "room: Unexpected key \"room\"",
        ]
    );
}

#[test]
fn config_file_supplies_definitions_and_options() {
    let fixture = Fixture::new();
    let config_path = fixture.path("wireshape.yaml");
    std::fs::write(
        &config_path,
        "definitions: events.yaml\noptions:\n  unrecognizedObjectKeys: strip\n  allowUnrecognizedEnumValues: true\n",
    )
    .unwrap();
    let config = CliConfig::load(&config_path).unwrap();

    let input = fixture.path("event.json");
    std::fs::write(
        &input,
        r#"{"title": "Lab", "starts_at": "2026-05-04", "tags": [], "kind": "panel", "room": "A"}"#,
    )
    .unwrap();

    let args = fixture.args(None, Some(input));
    let outcome = run(Direction::Parse, &args, &config, "");
    assert_eq!(outcome.code, 0, "stderr: {}", outcome.stderr);
    let parsed: serde_json::Value = serde_json::from_str(&outcome.stdout).unwrap();
    assert_eq!(parsed["kind"], "panel");
    assert_eq!(parsed["startsAt"], "2026-05-04T00:00:00.000Z");
    assert!(parsed.get("room").is_none());
}

#[test]
fn skip_validation_flag_passes_input_through() {
    let fixture = Fixture::new();
    let mut args = fixture.args(Some(&fixture.path("events.yaml")), None);
    args.options.skip_validation = true;
    let input = r#"{"title": 7}"#;
    let outcome = run(Direction::Parse, &args, &CliConfig::default(), input);
    assert_eq!(outcome.code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&outcome.stdout).unwrap();
    assert_eq!(parsed, serde_json::json!({"title": 7}));
}

#[test]
fn operational_errors_are_reported() {
    let fixture = Fixture::new();

    let no_definitions = fixture.args(None, None);
    let err = run_transform(
        Direction::Parse,
        &no_definitions,
        &CliConfig::default(),
        &mut "{}".as_bytes(),
        &mut Vec::new(),
        &mut Vec::new(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("no definitions file"));

    let mut unknown_type = fixture.args(Some(&fixture.path("events.yaml")), None);
    unknown_type.type_name = "Venue".to_string();
    let err = run_transform(
        Direction::Parse,
        &unknown_type,
        &CliConfig::default(),
        &mut "{}".as_bytes(),
        &mut Vec::new(),
        &mut Vec::new(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("unknown type 'Venue'"));

    let args = fixture.args(Some(&fixture.path("events.yaml")), None);
    let err = run_transform(
        Direction::Parse,
        &args,
        &CliConfig::default(),
        &mut "not json".as_bytes(),
        &mut Vec::new(),
        &mut Vec::new(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("input is not valid JSON"));
}
