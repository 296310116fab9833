pub mod error;
pub mod export;
pub mod geodesic;
pub mod gradient;
pub mod i18n;
pub mod options;
pub mod parser;
pub mod profile;
pub mod route;
pub mod sampler;
pub mod track;
pub mod view;

use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

use crate::i18n::{Dictionary, Language};
use crate::options::{ExportOptions, ProfileOptions};
use crate::route::RouteProfile;
use crate::view::Ticket;

pub use crate::error::{FailureKind, TrackError};
pub use crate::route::{RouteState, route_state};
pub use crate::track::{Track, TrackPoint};

/// Build the route state for a GPX string, returned as a JS object.
///
/// Malformed or track-less documents give `{ status: "noData" }`; only bad
/// options are reported as errors.
#[wasm_bindgen(js_name = routeProfile)]
pub fn route_profile(gpx_string: &str, reference: &str, options: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts: ProfileOptions = parse_options(options)?;
    let state = route_state(gpx_string, reference, &opts);
    to_js(&state)
}

/// Build the route state for a GPX string, returned as a JSON string.
#[wasm_bindgen(js_name = routeProfileString)]
pub fn route_profile_string(gpx_string: &str, reference: &str, options: JsValue) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let opts: ProfileOptions = parse_options(options)?;
    let state = route_state(gpx_string, reference, &opts);
    serde_json::to_string(&state).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parse the first track's points strictly, rejecting malformed documents.
#[wasm_bindgen(js_name = parseTrack)]
pub fn parse_track(gpx_string: &str) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let track = parser::parse_track(gpx_string)?;
    to_js(&track.points)
}

/// Convert the first track of a GPX string to a GeoJSON FeatureCollection.
/// Returns an empty collection when there is nothing to draw.
#[wasm_bindgen(js_name = routeGeoJson)]
pub fn route_geojson(gpx_string: &str, options: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts: ExportOptions = parse_options(options)?;
    let track = match parser::parse_track(gpx_string) {
        Ok(track) => track,
        Err(e) => {
            log::warn!("[GeoJson] {:?} failure: {e}", e.kind());
            Default::default()
        }
    };
    geojson_value(&track, &Dictionary::builtin(), &opts)
}

/// Label lookups for the trail view, optionally overridden from JSON.
#[wasm_bindgen(js_name = TrailLabels)]
pub struct JsTrailLabels {
    dict: Dictionary,
}

#[wasm_bindgen(js_class = TrailLabels)]
impl JsTrailLabels {
    #[wasm_bindgen(constructor)]
    pub fn new(overrides_json: Option<String>) -> Result<JsTrailLabels, JsValue> {
        console_error_panic_hook::set_once();

        let mut dict = Dictionary::builtin();
        if let Some(json) = overrides_json {
            let overrides =
                Dictionary::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?;
            dict = dict.merged(overrides);
        }
        Ok(Self { dict })
    }

    /// Unknown language codes use the default language.
    pub fn translate(&self, key: &str, lang: &str) -> String {
        let lang = Language::from_code(lang).unwrap_or_default();
        self.dict.translate(key, lang).to_string()
    }
}

/// One trail detail view. JavaScript fetches; Rust decides whether the result still applies.
#[wasm_bindgen(js_name = TrailView)]
pub struct JsTrailView {
    inner: view::TrailView,
}

#[wasm_bindgen(js_class = TrailView)]
impl JsTrailView {
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<JsTrailView, JsValue> {
        console_error_panic_hook::set_once();

        let opts: ProfileOptions = parse_options(options)?;
        Ok(Self {
            inner: view::TrailView::new(opts),
        })
    }

    /// Start a request; pass the returned ticket back with the response.
    pub fn begin(&mut self, reference: &str) -> u32 {
        self.inner.begin(reference).id()
    }

    /// Returns false when the ticket is stale and the document was ignored.
    pub fn complete(&mut self, ticket: u32, gpx_string: String) -> bool {
        self.inner.complete(Ticket::from(ticket), Ok(gpx_string))
    }

    /// Report a failed fetch. The view falls back to `noData`.
    pub fn fail(&mut self, ticket: u32, message: &str) -> bool {
        let reference = self.inner.pending_reference().unwrap_or_default().to_string();
        self.inner
            .complete(Ticket::from(ticket), Err(TrackError::fetch(reference, message)))
    }

    pub fn unmount(&mut self) {
        self.inner.unmount();
    }

    #[wasm_bindgen(js_name = isPending)]
    pub fn is_pending(&self) -> bool {
        self.inner.is_pending()
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.state())
    }

    /// GeoJSON of the current track, empty when nothing is loaded.
    pub fn geojson(&self, options: JsValue) -> Result<JsValue, JsValue> {
        let opts: ExportOptions = parse_options(options)?;
        geojson_value(self.inner.track(), &Dictionary::builtin(), &opts)
    }
}

fn geojson_value(track: &Track, dict: &Dictionary, opts: &ExportOptions) -> Result<JsValue, JsValue> {
    let fc = match RouteProfile::build(track, "", &ProfileOptions::default()) {
        Some(route) => export::to_feature_collection(track, &route, dict, opts),
        None => geojson::FeatureCollection {
            bbox: None,
            features: Vec::new(),
            foreign_members: None,
        },
    };
    to_js(&fc)
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_options<T: DeserializeOwned + Default>(options: JsValue) -> Result<T, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(T::default())
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
