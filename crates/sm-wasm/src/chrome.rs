//! Bindings to the `chrome.*` extension APIs used by the worker and the
//! content script.

use js_sys::Function;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// `chrome.storage.local.get(defaults, callback)`
    #[wasm_bindgen(js_namespace = ["chrome", "storage", "local"], js_name = get)]
    pub fn storage_local_get(defaults: &JsValue, callback: &Function);

    /// `chrome.storage.local.set(items)`
    #[wasm_bindgen(js_namespace = ["chrome", "storage", "local"], js_name = set)]
    pub fn storage_local_set(items: &JsValue);

    /// `chrome.storage.onChanged.addListener((changes, area) => …)`
    #[wasm_bindgen(js_namespace = ["chrome", "storage", "onChanged"], js_name = addListener)]
    pub fn storage_on_changed(listener: &Function);

    /// `chrome.runtime.sendMessage(message)`
    #[wasm_bindgen(js_namespace = ["chrome", "runtime"], js_name = sendMessage)]
    pub fn runtime_send_message(message: &JsValue);

    /// `chrome.runtime.onMessage.addListener((message) => …)`
    #[wasm_bindgen(js_namespace = ["chrome", "runtime", "onMessage"], js_name = addListener)]
    pub fn runtime_on_message(listener: &Function);

    /// `chrome.tabs.create(properties)`
    #[wasm_bindgen(js_namespace = ["chrome", "tabs"], js_name = create)]
    pub fn tabs_create(properties: &JsValue);
}

/// Serialize `value` into a plain JS object.
pub fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&json)
}

/// `JSON.stringify` a JS value; `None` for values JSON cannot represent.
pub fn to_json(value: &JsValue) -> Option<String> {
    js_sys::JSON::stringify(value).ok()?.as_string()
}
