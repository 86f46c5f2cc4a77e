//! JSON Schema generation for CLI output types.
//!
//! Every command that supports `--json` registers its output type here, and
//! the `schema` subcommand prints them.

use schemars::{schema_for, Schema};
use std::collections::BTreeMap;

/// All JSON schemas keyed by command name.
/// BTreeMap keeps the output order stable.
pub fn all_schemas() -> BTreeMap<&'static str, Schema> {
    let mut schemas = BTreeMap::new();

    schemas.insert("seed", schema_for!(crate::seed::SeedReport));
    schemas.insert("stats", schema_for!(crate::cmd::stats::StatsJsonOutput));
    schemas.insert("verify", schema_for!(crate::verify::VerifyReport));

    schemas
}

/// Schema of a single command
pub fn get_schema(command: &str) -> Option<Schema> {
    all_schemas().remove(command)
}

pub fn schema_names() -> Vec<&'static str> {
    all_schemas().keys().copied().collect()
}
