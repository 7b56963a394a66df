use anyhow::{anyhow, Context, Result};
use choropleth::{ChartDimensions, PairedBars, ScaleFactory};

use crate::cli::{ChartArgs, Cli};

pub fn run(cli: &Cli, args: &ChartArgs) -> Result<()> {
    let config = super::config(cli)?;
    let out_path = args.output.clone().unwrap_or("./chart.svg".into());

    let state = super::load(&config, &args.data)?;
    let features = super::dataset(&state)?.features();
    let feature = features.iter()
        .find(|f| f.id().is_some_and(|id| id.as_str() == args.region.trim()))
        .ok_or_else(|| anyhow!("[chart] No region with id {:?}", args.region))?;

    let scale = ScaleFactory::new(config.scales.clone()).joint_domain(features, &args.left, &args.right);
    let bars = PairedBars::layout(feature, &args.left, &args.right, &scale, ChartDimensions::default())
        .ok_or_else(|| anyhow!("[chart] Region {} has no values for {} or {}", args.region, args.left, args.right))?;

    log::info!("[chart] writing chart to {}", out_path.display());
    std::fs::write(&out_path, bars.to_svg_string()?)
        .with_context(|| format!("[chart] Failed to write {}", out_path.display()))?;

    Ok(())
}
