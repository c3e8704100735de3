//! WASM bindings for the pagination engine

use js_sys::{Function, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::document::Document;
use crate::layout::{GeometryProvider, HeightModel, NodeGeometry, PageBudget};
use crate::transaction::{MapEntry, PositionMap, Transaction};
use crate::Paginator;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// WASM-exposed pagination session
///
/// One instance per attached editor. All results cross the boundary as JSON
/// strings or flat u32 buffers; the host keeps its own document and only
/// ships snapshots and edit spans in.
#[wasm_bindgen]
pub struct WasmPaginator {
    paginator: Paginator,
}

#[wasm_bindgen]
impl WasmPaginator {
    /// Create a session with the default page budget (US Letter at 96 DPI)
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            paginator: Paginator::default(),
        }
    }

    /// Create a session with a custom page budget
    #[wasm_bindgen(js_name = withBudget)]
    pub fn with_budget(content_height: u32, min_break_separation: u32) -> Self {
        let budget = PageBudget {
            content_height,
            min_break_separation: min_break_separation as usize,
        };
        Self {
            paginator: Paginator::new(budget, HeightModel::default()),
        }
    }

    /// Install a document snapshot; false when the JSON does not parse
    #[wasm_bindgen(js_name = setDocument)]
    pub fn set_document(&mut self, json: &str) -> bool {
        match Document::from_json(json) {
            Some(document) => {
                self.paginator.replace_document(document);
                true
            }
            None => false,
        }
    }

    /// Record a content change without shipping the snapshot yet
    ///
    /// Hosts that serialize lazily call this per transaction and pass the
    /// snapshot to `flush` instead.
    #[wasm_bindgen(js_name = noteStructuralChange)]
    pub fn note_structural_change(&mut self) {
        self.paginator.apply(&Transaction::Structural);
    }

    /// Re-project the current marks through edit spans
    ///
    /// `spans` is (start, deleted, inserted) triplets in pre-edit positions,
    /// ascending by start. Returns the overlay diff as JSON.
    #[wasm_bindgen(js_name = applyRemap)]
    pub fn apply_remap(&mut self, spans: &[u32]) -> String {
        let mut map = PositionMap::identity();
        for triplet in spans.chunks_exact(3) {
            map.push(MapEntry {
                start: triplet[0] as usize,
                deleted: triplet[1] as usize,
                inserted: triplet[2] as usize,
            });
        }
        let diff = self.paginator.apply(&Transaction::Remap(map));
        to_json(&diff.unwrap_or_default())
    }

    /// Force a full pass at the next flush (paste, settled layout)
    #[wasm_bindgen(js_name = forceRecompute)]
    pub fn force_recompute(&mut self) {
        self.paginator.force_recompute();
    }

    /// Check if a flush would do work
    #[wasm_bindgen(js_name = needsFlush)]
    pub fn needs_flush(&self) -> bool {
        self.paginator.needs_flush()
    }

    /// Run the deferred pass; call from a post-render callback
    ///
    /// `document_json` optionally replaces the snapshot first. `measure` is
    /// an optional callback `position -> {height, marginTop, marginBottom}`
    /// or null; a throwing callback counts as unavailable. Returns the
    /// overlay diff as JSON.
    pub fn flush(&mut self, document_json: Option<String>, measure: Option<Function>) -> String {
        if let Some(json) = document_json {
            if let Some(document) = Document::from_json(&json) {
                self.paginator.replace_document(document);
            }
        }
        let provider = measure.map(JsGeometry::new);
        let diff = match &provider {
            Some(provider) => self.paginator.flush(Some(provider as &dyn GeometryProvider)),
            None => self.paginator.flush(None),
        };
        to_json(&diff.unwrap_or_default())
    }

    /// Current break marks as JSON
    #[wasm_bindgen(js_name = getBreaks)]
    pub fn get_breaks(&self) -> String {
        to_json(&self.paginator.breaks())
    }

    /// Current decorations as JSON
    #[wasm_bindgen(js_name = getDecorations)]
    pub fn get_decorations(&self) -> String {
        to_json(&self.paginator.decorations())
    }

    /// Current marks as a flat (position, page) buffer
    ///
    /// Lands in a Uint32Array without a JSON round trip, for hosts that poll
    /// on every keystroke.
    #[wasm_bindgen(js_name = breaksFlat)]
    pub fn breaks_flat(&self) -> Vec<u32> {
        let breaks = self.paginator.breaks();
        let mut flat = Vec::with_capacity(breaks.len() * 2);
        for mark in breaks {
            flat.push(mark.position as u32);
            flat.push(mark.page_number);
        }
        flat
    }

    /// Get page count
    #[wasm_bindgen(js_name = getPageCount)]
    pub fn get_page_count(&self) -> usize {
        self.paginator.page_count()
    }

    /// Swap the page budget; takes effect at the next flush
    #[wasm_bindgen(js_name = setBudget)]
    pub fn set_budget(&mut self, content_height: u32, min_break_separation: u32) {
        self.paginator.set_budget(PageBudget {
            content_height,
            min_break_separation: min_break_separation as usize,
        });
    }

    /// Swap the height calibration (JSON, partial overrides allowed);
    /// false when the JSON does not parse
    #[wasm_bindgen(js_name = setHeightModel)]
    pub fn set_height_model(&mut self, json: &str) -> bool {
        match serde_json::from_str::<HeightModel>(json) {
            Ok(model) => {
                self.paginator.set_model(model);
                true
            }
            Err(_) => false,
        }
    }

    /// Tear the session down
    pub fn detach(self) {}
}

impl Default for WasmPaginator {
    fn default() -> Self {
        Self::new()
    }
}

/// Geometry queries backed by a host callback
struct JsGeometry {
    measure: Function,
}

impl JsGeometry {
    fn new(measure: Function) -> Self {
        Self { measure }
    }
}

impl GeometryProvider for JsGeometry {
    fn measure(&self, position: usize) -> Option<NodeGeometry> {
        let result = self
            .measure
            .call1(&JsValue::NULL, &JsValue::from_f64(position as f64))
            .ok()?;
        if result.is_null() || result.is_undefined() {
            return None;
        }
        let height = get_f64(&result, "height")?;
        let margin_top = get_f64(&result, "marginTop").unwrap_or(0.0);
        let margin_bottom = get_f64(&result, "marginBottom").unwrap_or(0.0);
        Some(NodeGeometry::new(
            height as f32,
            margin_top as f32,
            margin_bottom as f32,
        ))
    }
}

fn get_f64(value: &JsValue, key: &str) -> Option<f64> {
    Reflect::get(value, &JsValue::from_str(key)).ok()?.as_f64()
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A code block too tall for one page, then a short paragraph
    fn overflowing_doc_json() -> String {
        let code = "x\\n".repeat(60);
        format!(
            r#"{{"type":"doc","content":[
                {{"type":"codeBlock","content":[{{"type":"text","text":"{}"}}]}},
                {{"type":"paragraph","content":[{{"type":"text","text":"after"}}]}}
            ]}}"#,
            code
        )
    }

    #[test]
    fn test_set_document_and_flush() {
        let mut paginator = WasmPaginator::new();
        assert!(!paginator.set_document("not json"));
        assert!(paginator.set_document(&overflowing_doc_json()));
        assert!(paginator.needs_flush());

        let diff = paginator.flush(None, None);
        assert!(diff.contains("\"op\":\"insert\""));
        assert_eq!(paginator.get_page_count(), 2);
        assert_eq!(paginator.breaks_flat(), vec![122, 2]);

        // nothing owed, nothing painted
        let diff = paginator.flush(None, None);
        assert_eq!(diff, "{\"patches\":[]}");
    }

    #[test]
    fn test_apply_remap_triplets() {
        let mut paginator = WasmPaginator::new();
        paginator.set_document(&overflowing_doc_json());
        paginator.flush(None, None);

        let diff = paginator.apply_remap(&[0, 0, 5]);
        assert!(diff.contains("\"op\":\"update\""));
        assert_eq!(paginator.breaks_flat(), vec![127, 2]);
        assert!(!paginator.needs_flush());
    }

    #[test]
    fn test_flush_accepts_late_snapshot() {
        let mut paginator = WasmPaginator::new();
        paginator.note_structural_change();
        let diff = paginator.flush(Some(overflowing_doc_json()), None);
        assert!(diff.contains("\"pageNumber\":2"));
        assert_eq!(paginator.get_page_count(), 2);
    }

    #[test]
    fn test_set_height_model_json() {
        let mut paginator = WasmPaginator::new();
        assert!(paginator.set_height_model(r#"{"defaultHeight":40}"#));
        assert!(!paginator.set_height_model("nope"));
        assert!(paginator.needs_flush());
    }

    #[test]
    fn test_budget_constructor_and_setter() {
        let mut paginator = WasmPaginator::with_budget(2000, 10);
        paginator.set_document(&overflowing_doc_json());
        paginator.flush(None, None);
        assert_eq!(paginator.get_page_count(), 1);

        paginator.set_budget(864, 10);
        paginator.flush(None, None);
        assert_eq!(paginator.get_page_count(), 2);
    }
}
