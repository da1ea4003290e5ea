// hotspot_core: scroll-synchronized hotspot map engine (Rust/WASM).
// All selection logic lives here; the JS view only renders snapshots and forwards events.

mod error;
mod geometry;
mod registry;
mod scroll;
mod selection;
mod types;

use std::sync::Arc;

use tracing::warn;
use wasm_bindgen::prelude::*;

pub use error::HotspotError;
pub use geometry::{anchor_for, centroid_of, contains_point, normalize, region_at, to_pixel};
pub use registry::{HotspotRegistry, MIN_POLYGON_POINTS};
pub use scroll::map_scroll_to_index;
pub use selection::{
    transition, HotspotEvent, ListenerChange, MapContext, PopupContent, SelectionMachine,
    SelectionState, Transition, TransitionOutcome, ViewSnapshot,
};
pub use types::*;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// One mounted hotspot map, exposed to JavaScript.
///
/// # Example JSON Config
/// ```json
/// {
///   "name": "cooling-loop",
///   "diagram": { "width": 1200, "height": 800 },
///   "regions": [
///     {
///       "id": "pump",
///       "title": "Circulation pump",
///       "description": "Moves coolant through the loop",
///       "product_ref": "sku-pump-01",
///       "polygon": [{ "x": 100, "y": 100 }, { "x": 300, "y": 100 }, { "x": 200, "y": 260 }]
///     }
///   ],
///   "settings": { "selection_start": 100, "range_per_region": 30 }
/// }
/// ```
#[wasm_bindgen]
pub struct HotspotMap {
    machine: SelectionMachine,
}

#[wasm_bindgen]
impl HotspotMap {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<HotspotMap, JsValue> {
        let config: HotspotMapConfig = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid hotspot map config: {}", e)))?;

        let (registry, settings) =
            HotspotRegistry::from_config(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let machine = SelectionMachine::new(Arc::new(registry), settings)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(HotspotMap { machine })
    }

    /// Register the "selection complete" callback. Called with the last region id.
    pub fn set_on_complete(&mut self, callback: js_sys::Function) {
        self.machine.set_on_complete(move |id| {
            if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(id.as_str())) {
                warn!(?err, "selection complete callback threw");
            }
        });
    }

    /// Feed a scroll-progress value. Returns `true` when this call completed the selection.
    pub fn on_scroll_progress(&mut self, progress: f64) -> bool {
        self.machine
            .on_scroll_progress(progress)
            .selection_completed
    }

    pub fn on_hover(&mut self, region_id: &str) {
        self.machine.on_hover(region_id);
    }

    pub fn on_hover_end(&mut self) {
        self.machine.on_hover_end();
    }

    /// Returns `true` when the caller must stop propagation of the DOM event.
    pub fn on_click(&mut self, region_id: &str, event_id: u32) -> bool {
        self.machine
            .on_click(region_id, PointerEventId::new(event_id))
            .propagation_stopped
    }

    pub fn on_click_outside(&mut self, event_id: u32) {
        self.machine.on_click_outside(PointerEventId::new(event_id));
    }

    /// Apply a tagged `HotspotEvent` JSON and return the `TransitionOutcome` as JSON.
    pub fn dispatch(&mut self, event_json: &str) -> Result<String, JsValue> {
        let event: HotspotEvent = serde_json::from_str(event_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid event: {}", e)))?;
        let outcome = self.machine.dispatch(&event);

        serde_json::to_string(&outcome)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    pub fn selected_region_id(&self) -> Option<String> {
        self.machine.selected_region_id().map(|id| id.to_string())
    }

    pub fn listens_for_click_outside(&self) -> bool {
        self.machine.listens_for_click_outside()
    }

    /// Current render model as JSON (`ViewSnapshot`).
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.machine.snapshot())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Region under a point given in source pixels.
    pub fn region_at(&self, x: f64, y: f64) -> Option<String> {
        region_at(self.machine.registry(), PixelPoint::new(x, y)).map(|id| id.to_string())
    }

    /// Region under a point given in percent of the rendered image.
    pub fn region_at_percent(&self, x_percent: f64, y_percent: f64) -> Option<String> {
        let registry = self.machine.registry();
        let point = to_pixel(
            AnchorPosition::new(x_percent, y_percent),
            registry.diagram(),
        );
        region_at(registry, point).map(|id| id.to_string())
    }

    /// Back to Idle, as on a fresh mount.
    pub fn reset(&mut self) {
        self.machine.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "name": "demo",
        "diagram": { "width": 200, "height": 200 },
        "regions": [
            { "id": "a", "title": "A", "polygon": [{"x": 0, "y": 0}, {"x": 100, "y": 0}, {"x": 100, "y": 100}, {"x": 0, "y": 100}] },
            { "id": "b", "title": "B", "polygon": [{"x": 100, "y": 100}, {"x": 200, "y": 100}, {"x": 200, "y": 200}, {"x": 100, "y": 200}] }
        ]
    }"#;

    #[test]
    fn map_creation_works() {
        let map = HotspotMap::new(CONFIG);
        assert!(map.is_ok());
    }

    #[test]
    fn scroll_and_click_through_facade() {
        let mut map = HotspotMap::new(CONFIG).expect("Should parse valid config");

        assert!(!map.on_scroll_progress(115.0));
        assert_eq!(map.selected_region_id().as_deref(), Some("a"));
        assert!(map.listens_for_click_outside());

        // default window: 100 + 2 * 30
        assert!(map.on_scroll_progress(160.0));
        assert_eq!(map.selected_region_id().as_deref(), Some("b"));

        assert!(map.on_click("a", 9));
        map.on_click_outside(9);
        assert_eq!(map.selected_region_id().as_deref(), Some("a"));
        map.on_click_outside(10);
        assert_eq!(map.selected_region_id(), None);
    }

    #[test]
    fn snapshot_json_contains_anchor() {
        let mut map = HotspotMap::new(CONFIG).expect("Should parse valid config");
        map.on_hover("a");

        let json = map.snapshot_json().expect("Should serialize snapshot");
        let snapshot: ViewSnapshot = serde_json::from_str(&json).expect("Should parse snapshot");
        assert_eq!(snapshot.anchor_position, Some(AnchorPosition::new(25.0, 25.0)));
        assert_eq!(snapshot.popup.unwrap().title, "A");
    }

    #[test]
    fn dispatch_returns_outcome_json() {
        let mut map = HotspotMap::new(CONFIG).expect("Should parse valid config");
        let json = map
            .dispatch(r#"{"type": "Click", "region_id": "b", "event_id": 1}"#)
            .expect("Should accept event");
        let outcome: TransitionOutcome = serde_json::from_str(&json).unwrap();

        assert!(outcome.propagation_stopped);
        assert_eq!(outcome.click_outside_listener, ListenerChange::Register);
    }

    #[test]
    fn hit_testing_in_both_spaces() {
        let map = HotspotMap::new(CONFIG).expect("Should parse valid config");
        assert_eq!(map.region_at(50.0, 50.0).as_deref(), Some("a"));
        assert_eq!(map.region_at_percent(75.0, 75.0).as_deref(), Some("b"));
        assert_eq!(map.region_at(150.0, 50.0), None);
    }

    // Error paths build a JsValue, which only works on wasm32; see tests/web.rs.
}
