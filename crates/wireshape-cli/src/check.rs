//! # Check Subcommand
//!
//! Load and compile a definitions file, then list its types. Any problem
//! in the file (syntax, unknown references, non-object bases or union
//! members, looping `extends`) is reported and exits 1.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::config::CliConfig;

/// Arguments for `check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Definitions file (YAML or JSON). Defaults to `definitions` from the config file.
    #[arg(long, short = 'd')]
    pub definitions: Option<PathBuf>,
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs, config: &CliConfig, out: &mut dyn Write) -> Result<u8> {
    let (path, registry) = config.load_registry(args.definitions.as_deref())?;

    writeln!(out, "{}: {} types", path.display(), registry.len())?;
    for name in registry.names() {
        let Some(definition) = registry.definition(name) else {
            continue;
        };
        let optional = if definition.optional { " (optional)" } else { "" };
        writeln!(out, "  {name:<24} {}{optional}", definition.kind.tag())?;
    }
    Ok(0)
}
