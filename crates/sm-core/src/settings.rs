//! Settings store schema, search-engine presets, and search URL building.

use crate::model::MenuConfiguration;
use crate::text::collapse_whitespace;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_SEARCH_ENGINE_NAME: &str = "google";
pub const DEFAULT_SEARCH_ENGINE_URL: &str = "https://www.google.com/search?q=";
pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";
pub const DEFAULT_SEARCH_BUTTON_TEXT: &str = "Search in Google";
pub const DEFAULT_COPY_BUTTON_TEXT: &str = "Copy";

// ─── Stored options ──────────────────────────────────────────────────────

/// Everything persisted in `storage.local`, with defaults for missing keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoredOptions {
    pub search_engine_name: String,
    #[serde(rename = "searchEngineURL")]
    pub search_engine_url: String,
    pub style_font_family: String,
    pub search_button_text: String,
    pub copy_button_text: String,
    pub enable_dark_theme: bool,
}

impl Default for StoredOptions {
    fn default() -> Self {
        Self {
            search_engine_name: DEFAULT_SEARCH_ENGINE_NAME.to_string(),
            search_engine_url: DEFAULT_SEARCH_ENGINE_URL.to_string(),
            style_font_family: DEFAULT_FONT_FAMILY.to_string(),
            search_button_text: DEFAULT_SEARCH_BUTTON_TEXT.to_string(),
            copy_button_text: DEFAULT_COPY_BUTTON_TEXT.to_string(),
            enable_dark_theme: false,
        }
    }
}

impl StoredOptions {
    /// Decode a `storage.get` result. Missing or mistyped keys keep their
    /// defaults.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Map<String, Value>>(json) {
            Ok(map) => {
                let mut options = Self::default();
                options.merge(map);
                options
            }
            Err(e) => {
                log::warn!("unreadable settings ({e}); using defaults");
                Self::default()
            }
        }
    }

    /// The defaults object passed to `storage.get`.
    pub fn defaults_json() -> String {
        serde_json::to_string(&Self::default()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Apply a `storage.onChanged` change set: `{ key: { newValue } }`.
    ///
    /// Returns true if anything changed.
    pub fn apply_changes(&mut self, changes_json: &str) -> bool {
        let changes: Map<String, Value> = match serde_json::from_str(changes_json) {
            Ok(changes) => changes,
            Err(e) => {
                log::warn!("unreadable settings change ({e})");
                return false;
            }
        };
        let patch: Map<String, Value> = changes
            .into_iter()
            .filter_map(|(key, change)| Some((key, change.get("newValue")?.clone())))
            .collect();
        let before = self.clone();
        self.merge(patch);
        *self != before
    }

    fn merge(&mut self, patch: Map<String, Value>) {
        let mut current = match serde_json::to_value(&*self) {
            Ok(Value::Object(map)) => map,
            _ => return,
        };
        for (key, value) in patch {
            match current.get(&key) {
                // Only overwrite known keys, and only with a value of the same shape.
                Some(old) if same_kind(old, &value) => {
                    current.insert(key, value);
                }
                Some(_) => log::warn!("ignoring setting {key} with unexpected type"),
                None => log::trace!("ignoring unknown setting {key}"),
            }
        }
        match serde_json::from_value(Value::Object(current)) {
            Ok(merged) => *self = merged,
            Err(e) => log::warn!("settings merge failed: {e}"),
        }
    }
}

fn same_kind(a: &Value, b: &Value) -> bool {
    matches!(
        (a, b),
        (Value::String(_), Value::String(_)) | (Value::Bool(_), Value::Bool(_))
    )
}

impl From<&StoredOptions> for MenuConfiguration {
    fn from(options: &StoredOptions) -> Self {
        fn or_default(value: &str, default: &str) -> String {
            if value.trim().is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        }
        Self {
            font_family: or_default(&options.style_font_family, DEFAULT_FONT_FAMILY),
            search_button_label: or_default(&options.search_button_text, DEFAULT_SEARCH_BUTTON_TEXT),
            copy_button_label: or_default(&options.copy_button_text, DEFAULT_COPY_BUTTON_TEXT),
            dark_theme: options.enable_dark_theme,
        }
    }
}

// ─── Search engines ──────────────────────────────────────────────────────

/// Search engine presets offered on the options page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEngine {
    Google,
    Bing,
    Yahoo,
    Baidu,
    Yandex,
    DuckDuckGo,
    /// User-supplied URL prefix.
    Custom,
}

impl SearchEngine {
    pub const ALL: [SearchEngine; 7] = [
        Self::Google,
        Self::Bing,
        Self::Yahoo,
        Self::Baidu,
        Self::Yandex,
        Self::DuckDuckGo,
        Self::Custom,
    ];

    pub fn from_name(name: &str) -> Self {
        match name {
            "google" => Self::Google,
            "bing" => Self::Bing,
            "yahoo" => Self::Yahoo,
            "baidu" => Self::Baidu,
            "yandex" => Self::Yandex,
            "duckduckgo" => Self::DuckDuckGo,
            _ => Self::Custom,
        }
    }

    /// Storage key value (`searchEngineName`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Bing => "bing",
            Self::Yahoo => "yahoo",
            Self::Baidu => "baidu",
            Self::Yandex => "yandex",
            Self::DuckDuckGo => "duckduckgo",
            Self::Custom => "custom",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Bing => "Bing",
            Self::Yahoo => "Yahoo",
            Self::Baidu => "Baidu",
            Self::Yandex => "Yandex",
            Self::DuckDuckGo => "DuckDuckGo",
            Self::Custom => "Custom",
        }
    }

    /// URL prefix for presets; `None` for `Custom`.
    pub fn preset_url(&self) -> Option<&'static str> {
        match self {
            Self::Google => Some("https://www.google.com/search?q="),
            Self::Bing => Some("https://www.bing.com/search?q="),
            Self::Yahoo => Some("https://search.yahoo.com/search?p="),
            Self::Baidu => Some("https://www.baidu.com/s?wd="),
            Self::Yandex => Some("https://yandex.ru/search/?text="),
            Self::DuckDuckGo => Some("https://duckduckgo.com/?q="),
            Self::Custom => None,
        }
    }

    /// Default search button label after picking this engine.
    pub fn button_label(&self) -> String {
        format!("Search in {}", self.display_name())
    }
}

// ─── Options form ────────────────────────────────────────────────────────

/// State of the options page form.
///
/// Restored from the store, edited by the user, then saved back. The URL
/// field is only editable for `SearchEngine::Custom`; presets own it.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionsForm {
    pub engine: SearchEngine,
    pub search_engine_url: String,
    pub font_family: String,
    pub search_button_text: String,
    pub copy_button_text: String,
    pub dark_theme: bool,
}

impl OptionsForm {
    pub fn restore(options: &StoredOptions) -> Self {
        Self {
            engine: SearchEngine::from_name(&options.search_engine_name),
            search_engine_url: options.search_engine_url.clone(),
            font_family: options.style_font_family.clone(),
            search_button_text: options.search_button_text.clone(),
            copy_button_text: options.copy_button_text.clone(),
            dark_theme: options.enable_dark_theme,
        }
    }

    pub fn url_editable(&self) -> bool {
        self.engine.preset_url().is_none()
    }

    /// The engine dropdown changed. Presets fill in their URL; switching to
    /// custom clears it for the user to type. The search label follows.
    pub fn select_engine(&mut self, engine: SearchEngine) {
        self.engine = engine;
        self.search_engine_url = engine.preset_url().unwrap_or_default().to_string();
        self.search_button_text = engine.button_label();
    }

    /// What the store receives on submit.
    pub fn save(&self) -> StoredOptions {
        let search_engine_url = match self.engine.preset_url() {
            Some(url) => url.to_string(),
            None => self.search_engine_url.trim().to_string(),
        };
        StoredOptions {
            search_engine_name: self.engine.name().to_string(),
            search_engine_url,
            style_font_family: self.font_family.trim().to_string(),
            search_button_text: self.search_button_text.clone(),
            copy_button_text: self.copy_button_text.clone(),
            enable_dark_theme: self.dark_theme,
        }
    }
}

/// Build the URL opened for a search: prefix + percent-encoded selection
/// with whitespace runs collapsed.
pub fn search_url(prefix: &str, selected: &str) -> String {
    let query = collapse_whitespace(selected);
    format!("{prefix}{}", urlencoding::encode(&query))
}
