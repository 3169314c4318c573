//! # wireshape CLI entry point
//!
//! Parses command-line arguments, loads the optional config file and
//! dispatches to subcommand handlers.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wireshape_cli::check::{run_check, CheckArgs};
use wireshape_cli::config::CliConfig;
use wireshape_cli::transform::{run_transform, TransformArgs};
use wireshape_schema::Direction;

/// wireshape: validate and transform JSON documents with declarative schemas.
#[derive(Parser, Debug)]
#[command(name = "wireshape", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file (YAML or JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a wire document into its parsed form.
    Parse(TransformArgs),

    /// Convert a parsed document back into its wire form.
    Serialize(TransformArgs),

    /// Compile a definitions file and list its types.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level. Stdout carries documents.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    tracing::debug!("wireshape CLI starting");

    let result = CliConfig::resolve(cli.config.as_deref()).and_then(|config| {
        let mut stdout = io::stdout().lock();
        match &cli.command {
            Commands::Parse(args) => run_transform(
                Direction::Parse,
                args,
                &config,
                &mut io::stdin().lock(),
                &mut stdout,
                &mut io::stderr().lock(),
            ),
            Commands::Serialize(args) => run_transform(
                Direction::Json,
                args,
                &config,
                &mut io::stdin().lock(),
                &mut stdout,
                &mut io::stderr().lock(),
            ),
            Commands::Check(args) => run_check(args, &config, &mut stdout),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wireshape_schema::UnrecognizedObjectKeys;

    #[test]
    fn cli_parse_parse_command() {
        let cli = Cli::try_parse_from([
            "wireshape",
            "parse",
            "--definitions",
            "api.yaml",
            "--type",
            "User",
            "user.json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 0);
        if let Commands::Parse(args) = cli.command {
            assert_eq!(args.definitions, Some(PathBuf::from("api.yaml")));
            assert_eq!(args.type_name, "User");
            assert_eq!(args.input, Some(PathBuf::from("user.json")));
            assert!(args.options.unrecognized_keys.is_none());
            assert!(!args.options.skip_validation);
        } else {
            panic!("expected parse command");
        }
    }

    #[test]
    fn cli_parse_serialize_short_flags_and_stdin() {
        let cli = Cli::try_parse_from(["wireshape", "serialize", "-d", "api.yaml", "-t", "Pet"]).unwrap();
        if let Commands::Serialize(args) = cli.command {
            assert_eq!(args.type_name, "Pet");
            assert!(args.input.is_none());
        } else {
            panic!("expected serialize command");
        }
    }

    #[test]
    fn cli_parse_option_flags() {
        let cli = Cli::try_parse_from([
            "wireshape",
            "parse",
            "-t",
            "User",
            "--unrecognized-keys",
            "passthrough",
            "--allow-unrecognized-members",
            "--allow-unrecognized-enum-values",
            "--skip-validation",
        ])
        .unwrap();
        if let Commands::Parse(args) = cli.command {
            assert_eq!(
                args.options.unrecognized_keys,
                Some(UnrecognizedObjectKeys::Passthrough)
            );
            assert!(args.options.allow_unrecognized_members);
            assert!(args.options.allow_unrecognized_enum_values);
            assert!(args.options.skip_validation);
        } else {
            panic!("expected parse command");
        }
    }

    #[test]
    fn cli_parse_rejects_unknown_policy() {
        let result = Cli::try_parse_from([
            "wireshape",
            "parse",
            "-t",
            "User",
            "--unrecognized-keys",
            "ignore",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_requires_type() {
        assert!(Cli::try_parse_from(["wireshape", "parse", "-d", "api.yaml"]).is_err());
    }

    #[test]
    fn cli_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "wireshape",
            "check",
            "-vv",
            "--config",
            "wireshape.yaml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("wireshape.yaml")));
        if let Commands::Check(args) = cli.command {
            assert!(args.definitions.is_none());
        } else {
            panic!("expected check command");
        }
    }
}
