use wasm_bindgen::prelude::*;

mod handle;

pub use handle::{EditorHandle, HandleResult};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(message: String) -> JsValue {
    JsValue::from_str(&message)
}

/// Editor for one media kit. Structured values cross the boundary as JSON.
#[wasm_bindgen(js_name = MediaKitEditor)]
pub struct MediaKitEditor {
    handle: EditorHandle,
}

#[wasm_bindgen(js_class = MediaKitEditor)]
impl MediaKitEditor {
    #[wasm_bindgen(constructor)]
    pub fn new(
        document_json: Option<String>,
        config_json: Option<String>,
        capabilities_json: Option<String>,
    ) -> Result<MediaKitEditor, JsValue> {
        let handle = EditorHandle::new(
            document_json.as_deref(),
            config_json.as_deref(),
            capabilities_json.as_deref(),
        )
        .map_err(js_error)?;
        Ok(Self { handle })
    }

    /// Current document tree as JSON
    #[wasm_bindgen(js_name = document)]
    pub fn document(&self) -> Result<String, JsValue> {
        self.handle.document_json().map_err(js_error)
    }

    /// Pending editor signals as a JSON array
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&self) -> Result<String, JsValue> {
        self.handle.drain_events().map_err(js_error)
    }

    /// Register (or re-measure) a drop zone
    #[wasm_bindgen(js_name = registerZone)]
    pub fn register_zone(
        &mut self,
        zone_id: &str,
        kind_json: &str,
        geometry_json: &str,
    ) -> Result<(), JsValue> {
        self.handle
            .register_zone(zone_id, kind_json, geometry_json)
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = unregisterZone)]
    pub fn unregister_zone(&mut self, zone_id: &str) -> bool {
        self.handle.unregister_zone(zone_id)
    }

    #[wasm_bindgen(js_name = pointer)]
    pub fn pointer(&mut self, input_json: &str) -> Result<String, JsValue> {
        self.handle.pointer(input_json).map_err(js_error)
    }

    #[wasm_bindgen(js_name = touch)]
    pub fn touch(&mut self, input_json: &str) -> Result<String, JsValue> {
        self.handle.touch(input_json).map_err(js_error)
    }

    #[wasm_bindgen(js_name = key)]
    pub fn key(&mut self, key: &str) -> Result<bool, JsValue> {
        self.handle.key(key).map_err(js_error)
    }

    #[wasm_bindgen(js_name = apply)]
    pub fn apply(&mut self, mutation_json: &str) -> Result<bool, JsValue> {
        self.handle.apply(mutation_json).map_err(js_error)
    }

    #[wasm_bindgen(js_name = dropInto)]
    pub fn drop_into(
        &mut self,
        source_json: &str,
        target_json: &str,
        before: Option<String>,
    ) -> Result<String, JsValue> {
        self.handle
            .drop_into(source_json, target_json, before)
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = undo)]
    pub fn undo(&mut self) -> Result<bool, JsValue> {
        self.handle.undo().map_err(js_error)
    }

    #[wasm_bindgen(js_name = redo)]
    pub fn redo(&mut self) -> Result<bool, JsValue> {
        self.handle.redo().map_err(js_error)
    }

    #[wasm_bindgen(js_name = historyState)]
    pub fn history_state(&self) -> Result<String, JsValue> {
        self.handle.history_state_json().map_err(js_error)
    }

    #[wasm_bindgen(getter, js_name = isDirty)]
    pub fn is_dirty(&self) -> bool {
        self.handle.is_dirty()
    }

    #[wasm_bindgen(getter, js_name = isSaving)]
    pub fn is_saving(&self) -> bool {
        self.handle.is_saving()
    }

    #[wasm_bindgen(getter, js_name = isLoading)]
    pub fn is_loading(&self) -> bool {
        self.handle.is_loading()
    }

    /// Returns the document JSON to persist. Throws while a save is running.
    #[wasm_bindgen(js_name = beginSave)]
    pub fn begin_save(&mut self) -> Result<String, JsValue> {
        self.handle.begin_save().map_err(js_error)
    }

    /// Returns whether the document is still dirty
    #[wasm_bindgen(js_name = completeSave)]
    pub fn complete_save(
        &mut self,
        key: Option<String>,
        error: Option<String>,
    ) -> Result<bool, JsValue> {
        self.handle.complete_save(key, error).map_err(js_error)
    }

    #[wasm_bindgen(js_name = beginLoad)]
    pub fn begin_load(&mut self) -> Result<(), JsValue> {
        self.handle.begin_load().map_err(js_error)
    }

    #[wasm_bindgen(js_name = completeLoad)]
    pub fn complete_load(
        &mut self,
        document_json: Option<String>,
        error: Option<String>,
    ) -> Result<(), JsValue> {
        self.handle
            .complete_load(document_json.as_deref(), error)
            .map_err(js_error)
    }
}
