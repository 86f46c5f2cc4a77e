use crate::store::Store;
use std::path::PathBuf;

pub fn run(database: PathBuf, json: bool) -> anyhow::Result<()> {
    if !database.exists() {
        anyhow::bail!("database does not exist: {}", database.display());
    }

    let store = Store::open(&database)?;
    let report = crate::verify::verify(&store)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    if !report.is_clean() {
        anyhow::bail!("{} consistency violations", report.total_violations);
    }
    Ok(())
}
