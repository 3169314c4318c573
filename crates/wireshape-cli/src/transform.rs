//! # Parse / Serialize Subcommands
//!
//! Run one named type from a definitions file over a JSON document.
//!
//! ## Usage
//!
//! ```bash
//! # Wire JSON to parsed JSON:
//! wireshape parse --definitions api.yaml --type User response.json
//!
//! # Parsed JSON back to wire JSON, reading stdin:
//! wireshape serialize -d api.yaml -t User < user.json
//! ```
//!
//! The result is printed to stdout as pretty JSON. On validation failure
//! every error is printed to stderr, one per line, and the exit code is 1.
//!
//! Parsed values have no JSON form for dates and sets. `parse` prints
//! them as ISO 8601 strings and arrays; `serialize` restores them from
//! the definitions before running the schema.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use wireshape_schema::{Direction, SchemaOptions, UnrecognizedObjectKeys, Value};

use crate::config::CliConfig;

/// Arguments shared by `parse` and `serialize`.
#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Definitions file (YAML or JSON). Defaults to `definitions` from the config file.
    #[arg(long, short = 'd')]
    pub definitions: Option<PathBuf>,

    /// Name of the type to apply.
    #[arg(long = "type", short = 't', value_name = "NAME")]
    pub type_name: String,

    /// Input JSON file. Reads stdin when omitted or `-`.
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub options: OptionFlags,
}

/// Schema option flags. Each one overrides the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct OptionFlags {
    /// Policy for object keys no property claims: fail, strip or passthrough.
    #[arg(long, value_name = "POLICY")]
    pub unrecognized_keys: Option<UnrecognizedObjectKeys>,

    /// Pass union values with an unknown discriminant through.
    #[arg(long)]
    pub allow_unrecognized_members: bool,

    /// Pass unknown enum values through.
    #[arg(long)]
    pub allow_unrecognized_enum_values: bool,

    /// Log validation failures as warnings and output the input unchanged.
    #[arg(long)]
    pub skip_validation: bool,
}

impl OptionFlags {
    /// `base` with these flags applied on top.
    pub fn apply(&self, mut base: SchemaOptions) -> SchemaOptions {
        if let Some(policy) = self.unrecognized_keys {
            base.unrecognized_object_keys = policy;
        }
        base.allow_unrecognized_union_members |= self.allow_unrecognized_members;
        base.allow_unrecognized_enum_values |= self.allow_unrecognized_enum_values;
        base.skip_validation |= self.skip_validation;
        base
    }
}

/// Execute `parse` (`Direction::Parse`) or `serialize` (`Direction::Json`).
///
/// `stdin` is read only when no input file is given.
pub fn run_transform(
    direction: Direction,
    args: &TransformArgs,
    config: &CliConfig,
    stdin: &mut dyn Read,
    out: &mut dyn Write,
    diagnostics: &mut dyn Write,
) -> Result<u8> {
    let (definitions, registry) = config.load_registry(args.definitions.as_deref())?;
    let opts = args.options.apply(config.options.clone());

    let text = read_input(args.input.as_deref(), stdin)?;
    let input: Value = serde_json::from_str(&text).context("input is not valid JSON")?;

    tracing::info!(
        definitions = %definitions.display(),
        type_name = %args.type_name,
        ?direction,
        "transforming document"
    );

    let result = match direction {
        Direction::Parse => registry.parse(&args.type_name, &input, &opts)?,
        Direction::Json => {
            let hydrated = registry.hydrate(&args.type_name, &input)?;
            registry.json(&args.type_name, &hydrated, &opts)?
        }
    };

    match result {
        Ok(value) => {
            let rendered = serde_json::to_string_pretty(&value).context("failed to render output")?;
            writeln!(out, "{rendered}")?;
            Ok(0)
        }
        Err(errors) => {
            tracing::info!(error_count = errors.len(), "validation failed");
            for error in &errors {
                writeln!(diagnostics, "{error}")?;
            }
            Ok(1)
        }
    }
}

fn read_input(path: Option<&Path>, stdin: &mut dyn Read) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read input: {}", p.display())),
        _ => {
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}
