//! Background worker: turns `search` requests into new tabs.

use crate::chrome;
use sm_core::settings::DEFAULT_SEARCH_ENGINE_URL;
use sm_core::{RuntimeMessage, StoredOptions, search_url};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct SearchDefaults {
    #[serde(rename = "searchEngineURL")]
    search_engine_url: &'static str,
}

#[derive(Serialize)]
struct CreateProperties<'a> {
    url: &'a str,
}

pub fn start() {
    let listener = Closure::wrap(Box::new(|message: JsValue| {
        on_runtime_message(&message);
    }) as Box<dyn FnMut(JsValue)>);
    chrome::runtime_on_message(listener.as_ref().unchecked_ref());
    listener.forget();
    log::info!("background worker ready");
}

fn on_runtime_message(message: &JsValue) {
    let Some(RuntimeMessage::Search { selected_string }) =
        chrome::to_json(message).and_then(|json| RuntimeMessage::from_json(&json))
    else {
        log::trace!("ignoring runtime message");
        return;
    };

    let defaults = match chrome::to_js(&SearchDefaults {
        search_engine_url: DEFAULT_SEARCH_ENGINE_URL,
    }) {
        Ok(defaults) => defaults,
        Err(e) => {
            log::error!("search defaults: {e:?}");
            return;
        }
    };
    let callback = Closure::once_into_js(move |stored: JsValue| {
        let options = StoredOptions::from_json(&chrome::to_json(&stored).unwrap_or_default());
        let prefix = if options.search_engine_url.trim().is_empty() {
            DEFAULT_SEARCH_ENGINE_URL
        } else {
            options.search_engine_url.as_str()
        };
        let url = search_url(prefix, &selected_string);
        log::debug!("opening {url}");
        match chrome::to_js(&CreateProperties { url: &url }) {
            Ok(properties) => chrome::tabs_create(&properties),
            Err(e) => log::error!("tab properties: {e:?}"),
        }
    });
    chrome::storage_local_get(&defaults, callback.unchecked_ref());
}
