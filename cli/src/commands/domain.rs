use anyhow::Result;
use choropleth::{AttributeDomain, ScaleFactory};

use crate::cli::{Cli, DomainArgs};

pub fn run(cli: &Cli, args: &DomainArgs) -> Result<()> {
    let config = super::config(cli)?;
    let state = super::load(&config, &args.data)?;
    let features = super::dataset(&state)?.features();

    let scales = ScaleFactory::new(config.scales.clone());
    let scale = match &args.joint {
        Some(other) => scales.joint_domain(features, &args.attribute, other),
        None => scales.for_attribute(features, &args.attribute),
    };

    match scale.domain() {
        Some(AttributeDomain::Linear { min, max }) => println!("domain: [{min}, {max}]"),
        Some(AttributeDomain::Diverging { min, center, max }) => println!("domain: [{min}, {center}, {max}]"),
        None => println!("domain: empty (no numeric values)"),
    }
    for (value, color) in scale.legend(args.stops) {
        println!("{value}\t{}", color.to_hex());
    }
    println!("no data\t{}", scale.no_data_color().to_hex());

    Ok(())
}
