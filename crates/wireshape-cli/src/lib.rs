//! # wireshape-cli: Command-Line Interface
//!
//! Runs the schemas of a definitions file over JSON documents.
//!
//! ## Subcommands
//!
//! - `parse`: wire JSON to parsed JSON
//! - `serialize`: parsed JSON back to wire JSON
//! - `check`: compile a definitions file and list its types
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers here take their
//!   arguments, the loaded [`config::CliConfig`] and explicit
//!   input/output streams, and return an exit code.
//! - Handlers delegate to `wireshape-schema`; no schema logic here.

pub mod check;
pub mod config;
pub mod transform;
