//! # wireshape-core: Foundational Types
//!
//! This crate is the leaf of the wireshape crate graph. It defines the
//! types every schema operates on; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One value model for both sides.** A schema converts a *wire* value
//!    (what a JSON document contains) into a *parsed* value (what
//!    application code works with) and back. Both are [`Value`]s. The
//!    parsed side may additionally hold [`Value::Date`] and [`Value::Set`],
//!    which have no JSON counterpart.
//!
//! 2. **Insertion-ordered objects.** [`Object`] is an `IndexMap`, so
//!    transformed objects keep the key order of their input.
//!
//! 3. **Errors are data.** Validation produces a list of
//!    [`ValidationError`]s, each carrying the breadcrumb path to the
//!    offending value. Nothing in the validation path panics.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `wireshape-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod temporal;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::{JsonError, ParseError, ValidationError, ValidationErrors, WireshapeError};
pub use temporal::{format_iso8601, parse_iso8601};
pub use value::{incorrect_type_message, Object, Value};
