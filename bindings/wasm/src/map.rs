use anyhow::Result;
use choropleth_core::{
    frame_to_svg, load_dataset, AppState, AttributeDomain, ChartDimensions, Frame, FrameRequest, Gesture,
    PairedBars, ScaleFactory, Source, SubscriptionId, ViewTransform, ViewTransformController, ViewerConfig,
};
use wasm_bindgen::{JsCast, JsValue, prelude::wasm_bindgen};

use crate::common::*;

/// One interactive map surface: state, scales and the zoom/pan controller.
#[wasm_bindgen]
pub struct WasmChoropleth {
    config: ViewerConfig,
    scales: ScaleFactory,
    state: AppState,
    controller: ViewTransformController,
    subscriptions: Vec<Option<SubscriptionId>>,
}

#[wasm_bindgen]
impl WasmChoropleth {
    /// `config`: optional viewer configuration as a JSON string.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<WasmChoropleth, JsValue> {
        let config = match config {
            Some(text) => ViewerConfig::from_json_str(&text).map_err(js_err)?,
            None => ViewerConfig::default(),
        };
        Ok(WasmChoropleth {
            scales: ScaleFactory::new(config.scales.clone()),
            controller: config.controller(),
            config,
            state: AppState::new(),
            subscriptions: Vec::new(),
        })
    }

    /// Replace the dataset with GeoJSON boundaries and a delimited demographic table.
    /// On failure the map shows the error and the previous dataset is gone.
    pub fn load(&mut self, geojson: String, table: String) -> Result<(), JsValue> {
        let ticket = self.state.begin_load();
        let boundaries = Source::bytes("boundaries", geojson.into_bytes());
        let demographics = Source::bytes("demographics", table.into_bytes());

        let result = load_dataset(&boundaries, &demographics, &self.config.load_options());
        let message = result.as_ref().err().map(|e| e.to_string());
        self.state.finish_load(ticket, result);
        self.controller.reset();

        match message {
            Some(message) => Err(js_err(message)),
            None => Ok(()),
        }
    }

    /// Sorted city names as a JS array of strings.
    pub fn cities(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.state.city_list()).map_err(|e| e.into())
    }

    pub fn selected_city(&self) -> Option<String> {
        self.state.selected_city().map(str::to_string)
    }

    /// Select a city (or clear with `undefined`). Returns whether the selection changed.
    pub fn select_city(&mut self, city: Option<String>) -> bool {
        let changed = self.state.select_city(city.as_deref());
        if changed { self.controller.reset() }
        changed
    }

    /// Call `callback(kind)` after every state change; kind is "city", "cities" or "data".
    /// Returns a handle for `off_change`. Exceptions thrown by `callback` are reported
    /// on the console and do not stop other observers.
    pub fn on_change(&mut self, callback: js_sys::Function) -> u32 {
        let id = self.state.subscribe(move |change, _| {
            let kind = change_kind(change);
            if let Err(thrown) = callback.call1(&JsValue::NULL, &JsValue::from_str(kind)) {
                let detail = thrown.as_string()
                    .or_else(|| thrown.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())));
                web_sys::console::error_1(&JsValue::from_str(&observer_error_message(kind, detail)));
            }
        });
        self.subscriptions.push(Some(id));
        (self.subscriptions.len() - 1) as u32
    }

    pub fn off_change(&mut self, handle: u32) -> bool {
        match self.subscriptions.get_mut(handle as usize).and_then(Option::take) {
            Some(id) => self.state.unsubscribe(id),
            None => false,
        }
    }

    /// Apply a wheel event; `delta_mode` is `WheelEvent.deltaMode`.
    pub fn wheel(&mut self, delta_y: f64, delta_mode: u32, x: f64, y: f64) -> Result<JsValue, JsValue> {
        let mode = parse_delta_mode(delta_mode).map_err(js_err)?;
        transform_value(self.controller.handle(Gesture::Wheel { delta_y, mode, pointer: (x, y) }))
    }

    pub fn drag(&mut self, dx: f64, dy: f64) -> Result<JsValue, JsValue> {
        transform_value(self.controller.handle(Gesture::Drag { dx, dy }))
    }

    pub fn pinch(&mut self, ratio: f64, x: f64, y: f64) -> Result<JsValue, JsValue> {
        transform_value(self.controller.handle(Gesture::Pinch { ratio, center: (x, y) }))
    }

    pub fn double_click(&mut self, x: f64, y: f64, shift: bool) -> Result<JsValue, JsValue> {
        transform_value(self.controller.handle(Gesture::DoubleClick { pointer: (x, y), shift }))
    }

    pub fn reset_view(&mut self) -> Result<JsValue, JsValue> {
        self.controller.reset();
        transform_value(self.controller.transform())
    }

    /// Current view transform as `{k, x, y}`.
    pub fn transform(&self) -> Result<JsValue, JsValue> {
        transform_value(self.controller.transform())
    }

    /// SVG document coloring regions by `attribute`.
    /// scale: "auto" (default), "sequential", "diverging" or "quantize"; `joint` overrides it.
    #[wasm_bindgen(js_name = "to_svg")]
    pub fn to_svg(&self, attribute: String, scale: Option<String>, joint: Option<String>, width: Option<f64>, height: Option<f64>) -> Result<String, JsValue> {
        let kind = parse_scale(scale.as_deref(), joint).map_err(js_err)?;
        let request = FrameRequest::new(attribute, width.unwrap_or(self.config.width), height.unwrap_or(self.config.height))
            .with_scale(kind)
            .with_padding(self.config.padding)
            .with_city_property(self.config.city_property.clone());

        let frame = Frame::build(&self.state, &self.scales, &request, self.controller.transform()).map_err(js_err)?;
        frame_to_svg(&frame).map_err(js_err)
    }

    /// Paired bar chart for one region, or `undefined` when it has neither value.
    pub fn chart_svg(&self, region: String, left: String, right: String) -> Result<Option<String>, JsValue> {
        let Some(dataset) = self.state.dataset() else { return Ok(None) };
        let features = dataset.features();
        let Some(feature) = features.iter().find(|f| f.id().is_some_and(|id| id.as_str() == region)) else {
            return Ok(None);
        };

        let scale = self.scales.joint_domain(features, &left, &right);
        PairedBars::layout(feature, &left, &right, &scale, ChartDimensions::default())
            .map(|bars| bars.to_svg_string())
            .transpose()
            .map_err(js_err)
    }

    /// `[min, max]` (or `[min, center, max]`) of the scale used for `attribute`; empty if none.
    pub fn domain(&self, attribute: String) -> Result<Vec<f64>, JsValue> {
        let Some(dataset) = self.state.dataset() else { return Ok(Vec::new()) };
        Ok(match self.scales.for_attribute(dataset.features(), &attribute).domain() {
            Some(AttributeDomain::Linear { min, max }) => vec![min, max],
            Some(AttributeDomain::Diverging { min, center, max }) => vec![min, center, max],
            None => Vec::new(),
        })
    }
}

fn transform_value(transform: ViewTransform) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&transform).map_err(|e| e.into())
}
