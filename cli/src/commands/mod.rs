pub mod chart;
pub mod cities;
pub mod domain;
pub mod render;

use anyhow::Result;
use choropleth::{load_dataset, AppState, Dataset, ViewerConfig};

use crate::cli::{Cli, DataArgs};

pub fn config(cli: &Cli) -> Result<ViewerConfig> {
    match &cli.config {
        Some(path) => ViewerConfig::from_json_file(path),
        None => Ok(ViewerConfig::default()),
    }
}

/// Load both sources into a fresh state, surfacing a failed load as an error.
pub fn load(config: &ViewerConfig, data: &DataArgs) -> Result<AppState> {
    let mut state = AppState::new();
    let ticket = state.begin_load();

    log::info!("[load] boundaries={} demographics={}", data.boundaries, data.demographics);
    let dataset = load_dataset(&config.resolve(&data.boundaries), &config.resolve(&data.demographics), &config.load_options())?;
    state.finish_load(ticket, Ok(dataset));
    Ok(state)
}

pub fn dataset(state: &AppState) -> Result<&Dataset> {
    state.dataset()
        .map(|dataset| dataset.as_ref())
        .ok_or_else(|| anyhow::anyhow!("[load] No dataset loaded"))
}
