use anyhow::{anyhow, Result};
use choropleth_core::{DeltaMode, ScaleKind, StateChange};
use wasm_bindgen::JsValue;

pub(crate) fn js_err(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// `WheelEvent.deltaMode`: 0 pixels, 1 lines, 2 pages.
pub(crate) fn parse_delta_mode(mode: u32) -> Result<DeltaMode> {
    match mode {
        0 => Ok(DeltaMode::Pixel),
        1 => Ok(DeltaMode::Line),
        2 => Ok(DeltaMode::Page),
        other => Err(anyhow!("Unknown wheel delta mode {other}. Expected 0 (pixel), 1 (line) or 2 (page)")),
    }
}

pub(crate) fn parse_scale(scale: Option<&str>, joint: Option<String>) -> Result<ScaleKind> {
    if let Some(other) = joint {
        return Ok(ScaleKind::Joint { other });
    }
    match scale.unwrap_or("auto") {
        "auto" => Ok(ScaleKind::Auto),
        "sequential" => Ok(ScaleKind::Sequential),
        "diverging" => Ok(ScaleKind::Diverging),
        "quantize" => Ok(ScaleKind::Quantize),
        other => Err(anyhow!(
            "Unknown scale {other:?}. Expected one of: auto, sequential, diverging, quantize"
        )),
    }
}

/// Name handed to JS observers for each kind of state change.
pub(crate) fn change_kind(change: &StateChange) -> &'static str {
    match change {
        StateChange::SelectedCity(_) => "city",
        StateChange::CityList => "cities",
        StateChange::GeoData => "data",
    }
}

/// Console message for an exception thrown by a JS observer.
pub(crate) fn observer_error_message(kind: &str, detail: Option<String>) -> String {
    let detail = detail.unwrap_or_else(|| "non-error value thrown".to_string());
    format!("[wasm] State observer threw while handling {kind:?}: {detail}")
}
