//! Mapbox GL bindings.
//!
//! Thin `wasm-bindgen` imports of the `mapboxgl` global loaded by
//! `index.html`, plus a [`MapSurface`] implementation over them. Drawing
//! decisions live in `routedesk::render`; this file only forwards calls.

use routedesk::render::{Bounds, LineLayer, MapSurface, Marker};
use routedesk::{DeskError, DeskResult, MapSettings};
use serde::Serialize;
use serde_json::json;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl, js_name = Map)]
    type GlMap;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "Map", catch)]
    fn new(options: &JsValue) -> Result<GlMap, JsValue>;

    #[wasm_bindgen(method, js_name = addControl)]
    fn add_control(this: &GlMap, control: &GlNavigationControl);

    #[wasm_bindgen(method, js_name = addSource, catch)]
    fn add_source(this: &GlMap, id: &str, source: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = addLayer, catch)]
    fn add_layer(this: &GlMap, layer: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = getLayer)]
    fn get_layer(this: &GlMap, id: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = removeLayer, catch)]
    fn remove_layer(this: &GlMap, id: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = getSource)]
    fn get_source(this: &GlMap, id: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = removeSource, catch)]
    fn remove_source(this: &GlMap, id: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = fitBounds, catch)]
    fn fit_bounds(this: &GlMap, bounds: &JsValue, options: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = isStyleLoaded)]
    fn is_style_loaded(this: &GlMap) -> bool;

    #[wasm_bindgen(method)]
    fn once(this: &GlMap, event: &str, listener: &JsValue);

    #[wasm_bindgen(js_namespace = mapboxgl, js_name = NavigationControl)]
    type GlNavigationControl;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "NavigationControl")]
    fn new() -> GlNavigationControl;

    #[wasm_bindgen(js_namespace = mapboxgl, js_name = Marker)]
    type GlMarker;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "Marker")]
    fn new(options: &JsValue) -> GlMarker;

    #[wasm_bindgen(method, js_name = setLngLat)]
    fn set_lng_lat(this: &GlMarker, lng_lat: &JsValue) -> GlMarker;

    #[wasm_bindgen(method, js_name = setPopup)]
    fn set_popup(this: &GlMarker, popup: &GlPopup) -> GlMarker;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &GlMarker, map: &GlMap) -> GlMarker;

    #[wasm_bindgen(method)]
    fn remove(this: &GlMarker);

    #[wasm_bindgen(js_namespace = mapboxgl, js_name = Popup)]
    type GlPopup;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "Popup")]
    fn new() -> GlPopup;

    #[wasm_bindgen(method, js_name = setHTML)]
    fn set_html(this: &GlPopup, html: &str) -> GlPopup;
}

fn to_js<T: Serialize>(value: &T) -> DeskResult<JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|e| DeskError::malformed("").in_op_with("mapbox.options", e.to_string()))
}

fn map_error(op: &str, e: JsValue) -> DeskError {
    DeskError::transport(format!("{:?}", e)).in_op(format!("mapbox.{}", op))
}

/// `true` when the Mapbox script loaded.
fn library_loaded() -> bool {
    web_sys::window()
        .and_then(|w| js_sys::Reflect::get(&w, &JsValue::from_str("mapboxgl")).ok())
        .is_some_and(|v| !v.is_undefined() && !v.is_null())
}

/// A live Mapbox map bound to one container element.
pub struct MapboxSurface {
    map: GlMap,
    markers: Vec<GlMarker>,
    /// Line layers added by this surface, in insertion order.
    layers: Vec<String>,
}

impl MapboxSurface {
    /// Creates the map, or `None` when the library or token is missing or
    /// initialisation throws. Callers fall back to the text listing.
    pub fn mount(
        container: &web_sys::HtmlElement,
        token: Option<&str>,
        settings: &MapSettings,
    ) -> Option<Self> {
        let token = token?;
        if !library_loaded() {
            log::warn!("mapboxgl is not loaded");
            return None;
        }

        let global = web_sys::window()
            .and_then(|w| js_sys::Reflect::get(&w, &JsValue::from_str("mapboxgl")).ok())?;
        js_sys::Reflect::set(
            &global,
            &JsValue::from_str("accessToken"),
            &JsValue::from_str(token),
        )
        .ok()?;

        let options = js_sys::Object::new();
        let set = |key: &str, value: &JsValue| {
            js_sys::Reflect::set(&options, &JsValue::from_str(key), value).is_ok()
        };
        let center = to_js(&[settings.center_lng, settings.center_lat]).ok()?;
        let ready = set("container", &JsValue::from(container.clone()))
            && set("style", &JsValue::from_str(&settings.style))
            && set("center", &center)
            && set("zoom", &JsValue::from_f64(settings.zoom));
        if !ready {
            return None;
        }

        match GlMap::new(&options) {
            Ok(map) => {
                map.add_control(&GlNavigationControl::new());
                Some(Self {
                    map,
                    markers: Vec::new(),
                    layers: Vec::new(),
                })
            }
            Err(e) => {
                log::warn!("Mapbox initialisation failed: {:?}", e);
                None
            }
        }
    }
}

impl MapboxSurface {
    /// Runs `f` once the style has loaded; sources and layers cannot be
    /// added before that.
    pub fn when_loaded(&self, f: impl FnOnce() + 'static) {
        if self.map.is_style_loaded() {
            f();
        } else {
            self.map.once("load", &Closure::once_into_js(f));
        }
    }
}

impl MapSurface for MapboxSurface {
    fn is_ready(&self) -> bool {
        self.map.is_style_loaded()
    }

    fn clear_markers(&mut self) -> DeskResult<()> {
        for marker in self.markers.drain(..) {
            marker.remove();
        }
        Ok(())
    }

    fn layer_ids(&self) -> Vec<String> {
        self.layers.clone()
    }

    fn remove_layer(&mut self, id: &str) -> DeskResult<()> {
        if !self.map.get_layer(id).is_undefined() {
            self.map
                .remove_layer(id)
                .map_err(|e| map_error("removeLayer", e))?;
        }
        if !self.map.get_source(id).is_undefined() {
            self.map
                .remove_source(id)
                .map_err(|e| map_error("removeSource", e))?;
        }
        self.layers.retain(|l| l != id);
        Ok(())
    }

    fn add_marker(&mut self, marker: &Marker) -> DeskResult<()> {
        let popup = GlPopup::new().set_html(&marker.popup.to_html());
        let gl = GlMarker::new(&to_js(&json!({ "color": marker.color }))?)
            .set_lng_lat(&to_js(&marker.position)?)
            .set_popup(&popup)
            .add_to(&self.map);
        self.markers.push(gl);
        Ok(())
    }

    fn add_line(&mut self, line: &LineLayer) -> DeskResult<()> {
        let source = json!({
            "type": "geojson",
            "data": {
                "type": "Feature",
                "properties": {},
                "geometry": { "type": "LineString", "coordinates": line.coordinates }
            }
        });
        let layer = json!({
            "id": line.id,
            "type": "line",
            "source": line.id,
            "layout": { "line-join": "round", "line-cap": "round" },
            "paint": {
                "line-color": line.color,
                "line-width": line.width,
                "line-opacity": line.opacity
            }
        });
        self.map
            .add_source(&line.id, &to_js(&source)?)
            .map_err(|e| map_error("addSource", e))?;
        self.map
            .add_layer(&to_js(&layer)?)
            .map_err(|e| map_error("addLayer", e))?;
        self.layers.push(line.id.clone());
        Ok(())
    }

    fn fit_bounds(&mut self, bounds: Bounds, padding: u32) -> DeskResult<()> {
        let corners = to_js(&[bounds.south_west, bounds.north_east])?;
        let options = to_js(&json!({ "padding": padding }))?;
        self.map
            .fit_bounds(&corners, &options)
            .map_err(|e| map_error("fitBounds", e))
    }
}
