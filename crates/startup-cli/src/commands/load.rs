//! Load command implementation.

use crate::cli::LoadArgs;
use crate::error::Result;
use crate::output::Formatter;
use startup_store::{read_companies_file, LoadReport, SqliteStore};
use tracing::info;

/// Execute the load command.
pub fn execute_load(args: LoadArgs, formatter: &Formatter) -> Result<()> {
    let report = load_file(&args)?;
    println!("{}", formatter.load_report(&report));
    Ok(())
}

fn load_file(args: &LoadArgs) -> Result<LoadReport> {
    let companies = read_companies_file(&args.file)?;
    info!(
        count = companies.len(),
        "Loading {} into {}",
        args.file.display(),
        args.database.display()
    );

    let mut store = SqliteStore::new(&args.database)?;
    Ok(store.load_companies(&companies)?)
}
