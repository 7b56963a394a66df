use anyhow::Result;

use crate::cli::{Cli, DataArgs};

pub fn run(cli: &Cli, args: &DataArgs) -> Result<()> {
    let config = super::config(cli)?;
    let state = super::load(&config, args)?;

    let report = super::dataset(&state)?.join_report();
    log::info!("[cities] {} regions joined, {} without data, {} unused records",
        report.matched, report.missing.len(), report.unused_records);

    for city in state.city_list() {
        println!("{city}");
    }

    Ok(())
}
