use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures talking to the browser.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("unexpected {0} element")]
    WrongElement(&'static str),
    #[error("DOM call failed: {0}")]
    Js(String),
}

impl From<JsValue> for HostError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                js_sys::JSON::stringify(&value)
                    .ok()
                    .and_then(|s| s.as_string())
            })
            .unwrap_or_else(|| format!("{value:?}"));
        Self::Js(message)
    }
}

impl From<HostError> for JsValue {
    fn from(error: HostError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}

pub type HostResult<T> = Result<T, HostError>;
