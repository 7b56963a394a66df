use anyhow::{Context, Result};
use choropleth::{
    write_svg_file, Frame, FrameRequest, Gesture, ScaleFactory, ScaleKind,
};

use crate::cli::{Cli, RenderArgs, ScaleArg};

pub fn run(cli: &Cli, args: &RenderArgs) -> Result<()> {
    let config = super::config(cli)?;
    let out_path = args.output.clone().unwrap_or("./map.svg".into());

    let mut state = super::load(&config, &args.data)?;
    if let Some(city) = &args.city
        && !state.select_city(Some(city.as_str()))
    {
        log::warn!("[render] City {city:?} not found; drawing the full extent");
    }

    let mut controller = config.controller();
    if let Some(path) = &args.gestures {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("[render] Failed to read {}", path.display()))?;
        let gestures: Vec<Gesture> = serde_json::from_str(&text)
            .with_context(|| format!("[render] Invalid gesture list in {}", path.display()))?;
        for gesture in gestures {
            controller.handle(gesture);
        }
    }

    let scale = match (&args.joint, args.scale) {
        (Some(other), _) => ScaleKind::Joint { other: other.clone() },
        (None, ScaleArg::Auto) => ScaleKind::Auto,
        (None, ScaleArg::Sequential) => ScaleKind::Sequential,
        (None, ScaleArg::Diverging) => ScaleKind::Diverging,
        (None, ScaleArg::Quantize) => ScaleKind::Quantize,
    };
    let request = FrameRequest::new(
        args.attribute.clone(),
        args.width.unwrap_or(config.width),
        args.height.unwrap_or(config.height),
    )
        .with_scale(scale)
        .with_padding(config.padding)
        .with_city_property(config.city_property.clone());

    let scales = ScaleFactory::new(config.scales.clone());
    let frame = Frame::build(&state, &scales, &request, controller.transform())?;

    log::info!("[render] writing map to {}", out_path.display());
    write_svg_file(&frame, &out_path)?;

    Ok(())
}
