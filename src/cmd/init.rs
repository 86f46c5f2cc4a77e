use crate::store::Store;
use std::path::PathBuf;

pub fn run(database: PathBuf) -> anyhow::Result<()> {
    let store = Store::open(&database)?;
    let created = store.create_schema()?;

    if created == 0 {
        println!("Schema already present in {}", database.display());
    } else {
        println!("Created {} tables in {}", created, database.display());
    }
    Ok(())
}
