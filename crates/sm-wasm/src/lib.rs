//! WASM bindings for the selection menu extension.
//!
//! `start_content_script` runs in every frame of every page;
//! `start_background` runs once in the extension's service worker;
//! `start_options` runs on the options page.

mod background;
mod chrome;
mod content;
mod controls;
mod dom;
mod error;
mod frames;
mod logging;
mod menu_view;
mod options_page;
mod timers;

pub use error::{HostError, HostResult};

use sm_core::theme::{ArrowStyle, MenuTheme};
use wasm_bindgen::prelude::*;

/// Attach the content script to the current frame.
///
/// `arrow_style` picks the arrow presentation: `"rotated-square"`, or
/// anything else for the default drop-shadow triangle.
#[wasm_bindgen]
pub fn start_content_script(arrow_style: Option<String>) -> Result<(), JsValue> {
    logging::init();
    let theme = MenuTheme::with_arrow(arrow_style_named(arrow_style.as_deref()));
    content::ContentScript::start(theme)?;
    Ok(())
}

/// Register the background worker's message listener.
#[wasm_bindgen]
pub fn start_background() -> Result<(), JsValue> {
    logging::init();
    background::start();
    Ok(())
}

/// Bind the options page form to the settings store.
#[wasm_bindgen]
pub fn start_options() -> Result<(), JsValue> {
    logging::init();
    options_page::OptionsPage::attach()?;
    Ok(())
}

/// Toggle trace-level console logging.
#[wasm_bindgen]
pub fn debug_logging(enabled: bool) {
    logging::init();
    logging::set_verbose(enabled);
}

fn arrow_style_named(name: Option<&str>) -> ArrowStyle {
    match name {
        Some("rotated-square") => ArrowStyle::RotatedSquare,
        _ => ArrowStyle::DropShadow,
    }
}
