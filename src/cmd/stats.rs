use crate::store::{Store, TableCount};
use schemars::JsonSchema;
use serde::Serialize;
use std::path::PathBuf;

/// JSON output of the stats command
#[derive(Serialize, JsonSchema)]
pub(crate) struct StatsJsonOutput {
    database: String,
    tables: Vec<TableCount>,
    total_rows: u64,
}

pub fn run(database: PathBuf, json: bool) -> anyhow::Result<()> {
    if !database.exists() {
        anyhow::bail!("database does not exist: {}", database.display());
    }

    let store = Store::open(&database)?;
    let tables = store.table_counts()?;
    let total_rows = tables.iter().map(|t| t.rows).sum();

    if json {
        let output = StatsJsonOutput {
            database: database.display().to_string(),
            tables,
            total_rows,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", database.display());
    for t in &tables {
        if t.exists {
            println!("  {:<20} {:>8}", t.table, t.rows);
        } else {
            println!("  {:<20} {:>8}", t.table, "missing");
        }
    }
    println!("  {:<20} {:>8}", "total", total_rows);
    Ok(())
}
