//! The popup's DOM and the collaborators its buttons talk to.

use crate::chrome;
use crate::error::{HostError, HostResult};
use sm_core::theme::{DARK_THEME_CLASS, FONT_FAMILY_PROPERTY, MENU_ELEMENT_ID, MenuTheme};
use sm_core::{MenuConfiguration, RuntimeMessage, Viewport};
use sm_frame::{Clipboard, MenuAction, MenuSize, MenuView, Placement, SearchDispatch};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, EventTarget, HtmlDocument, HtmlElement, HtmlTextAreaElement};

/// `div#selection-menu > ul > li > span` with a search and a copy button.
pub struct WebMenuView {
    document: Document,
    root: HtmlElement,
    search_button: HtmlElement,
    copy_button: HtmlElement,
}

impl WebMenuView {
    /// Build the popup and its stylesheet and append both to `<body>`.
    pub fn build(document: &Document, theme: &MenuTheme, config: &MenuConfiguration) -> HostResult<Self> {
        let body = document.body().ok_or(HostError::NoBody)?;

        let style = document.create_element("style")?;
        style.set_text_content(Some(&theme.stylesheet(&config.font_family)));

        let root = html_element(document, "div")?;
        root.set_id(MENU_ELEMENT_ID);
        root.set_hidden(true);
        let list = document.create_element("ul")?;
        root.append_child(&list)?;

        let button = |label: &str| -> HostResult<HtmlElement> {
            let item = document.create_element("li")?;
            let span = html_element(document, "span")?;
            span.set_text_content(Some(label));
            item.append_child(&span)?;
            list.append_child(&item)?;
            Ok(span)
        };
        let search_button = button(&config.search_button_label)?;
        let copy_button = button(&config.copy_button_label)?;

        body.append_child(&style)?;
        body.append_child(&root)?;

        Ok(Self {
            document: document.clone(),
            root,
            search_button,
            copy_button,
        })
    }

    /// The popup root, for attaching its pointer listeners.
    pub fn root(&self) -> &HtmlElement {
        &self.root
    }

    /// Which button, if any, an event landed on.
    pub fn action_for(&self, target: Option<&EventTarget>) -> Option<MenuAction> {
        let target: &JsValue = target?.as_ref();
        let search: &JsValue = self.search_button.as_ref();
        let copy: &JsValue = self.copy_button.as_ref();
        if target == search {
            Some(MenuAction::Search)
        } else if target == copy {
            Some(MenuAction::Copy)
        } else {
            None
        }
    }

    fn set_style(&self, name: &str, value: &str) {
        if let Err(e) = self.root.style().set_property(name, value) {
            log::warn!("failed to set {name}: {}", HostError::from(e));
        }
    }
}

impl MenuView for WebMenuView {
    fn set_visible(&mut self, visible: bool) {
        self.root.set_hidden(!visible);
    }

    fn measure(&self) -> MenuSize {
        MenuSize {
            width: f64::from(self.root.offset_width()),
            height: f64::from(self.root.offset_height()),
        }
    }

    fn viewport(&self) -> Viewport {
        match self.document.document_element() {
            Some(html) => Viewport {
                width: f64::from(html.client_width()),
                height: f64::from(html.client_height()),
            },
            None => Viewport::default(),
        }
    }

    fn place(&mut self, placement: &Placement) {
        self.set_style("top", &format!("{}px", placement.top));
        self.set_style("left", &format!("{}px", placement.left));
        for (name, value) in placement.arrow_properties() {
            self.set_style(name, &value);
        }
    }

    fn apply_config(&mut self, config: &MenuConfiguration) {
        self.set_style(FONT_FAMILY_PROPERTY, &config.font_family);
        self.search_button
            .set_text_content(Some(&config.search_button_label));
        self.copy_button
            .set_text_content(Some(&config.copy_button_label));
        if let Err(e) = self
            .root
            .class_list()
            .toggle_with_force(DARK_THEME_CLASS, config.dark_theme)
        {
            log::warn!("theme toggle failed: {}", HostError::from(e));
        }
    }
}

fn html_element(document: &Document, tag: &'static str) -> HostResult<HtmlElement> {
    document
        .create_element(tag)?
        .dyn_into()
        .map_err(|_| HostError::WrongElement(tag))
}

// ─── Collaborators ───────────────────────────────────────────────────────

/// Hands searches to the background worker.
pub struct RuntimeSearch;

impl SearchDispatch for RuntimeSearch {
    fn search(&self, selected: &str) {
        let message = RuntimeMessage::Search {
            selected_string: selected.to_string(),
        };
        match js_sys::JSON::parse(&message.to_json()) {
            Ok(value) => chrome::runtime_send_message(&value),
            Err(e) => log::error!("search request failed: {}", HostError::from(e)),
        }
    }
}

/// `navigator.clipboard.writeText`, or a hidden textarea and
/// `execCommand("copy")` where the async API is missing.
pub struct WebClipboard {
    document: Document,
}

impl WebClipboard {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn write_async(&self, text: &str) -> HostResult<bool> {
        let Some(window) = web_sys::window() else {
            return Ok(false);
        };
        let clipboard = js_sys::Reflect::get(&window.navigator(), &JsValue::from_str("clipboard"))?;
        if clipboard.is_undefined() || clipboard.is_null() {
            return Ok(false);
        }
        let write_text: js_sys::Function = js_sys::Reflect::get(&clipboard, &JsValue::from_str("writeText"))?
            .dyn_into()
            .map_err(|_| HostError::Js("clipboard.writeText is not a function".into()))?;
        // Fire and forget; the returned promise is not awaited.
        write_text.call1(&clipboard, &JsValue::from_str(text))?;
        Ok(true)
    }

    fn write_legacy(&self, text: &str) -> HostResult<()> {
        let body = self.document.body().ok_or(HostError::NoBody)?;
        let textarea: HtmlTextAreaElement = self
            .document
            .create_element("textarea")?
            .dyn_into()
            .map_err(|_| HostError::WrongElement("textarea"))?;
        textarea.set_value(text);
        let style = textarea.style();
        style.set_property("position", "fixed")?;
        style.set_property("left", "-9999px")?;
        style.set_property("top", "0")?;
        body.append_child(&textarea)?;
        textarea.select();
        let copied = match self.document.dyn_ref::<HtmlDocument>() {
            Some(html) => html.exec_command("copy"),
            None => Ok(false),
        };
        textarea.remove();
        if !copied? {
            log::warn!("legacy copy command was refused");
        }
        Ok(())
    }
}

impl Clipboard for WebClipboard {
    fn write_text(&self, text: &str) {
        let result = match self.write_async(text) {
            Ok(true) => Ok(()),
            Ok(false) => self.write_legacy(text),
            Err(e) => {
                log::debug!("async clipboard unavailable ({e}); using legacy copy");
                self.write_legacy(text)
            }
        };
        if let Err(e) = result {
            log::error!("copy failed: {e}");
        }
    }
}
