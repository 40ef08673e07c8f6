//! Options page: binds the settings form to `chrome.storage.local`.

use crate::chrome;
use crate::error::{HostError, HostResult};
use sm_core::{OptionsForm, SearchEngine, StoredOptions};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlFormElement, HtmlInputElement, HtmlSelectElement};

const ENGINE_FIELD: &str = "select-search-engine";
const URL_FIELD: &str = "search-engine-url";
const FONT_FIELD: &str = "style-font-family";
const SEARCH_LABEL_FIELD: &str = "search-button-text";
const COPY_LABEL_FIELD: &str = "copy-button-text";
/// Optional checkbox; pages without it keep the stored value.
const DARK_THEME_FIELD: &str = "enable-dark-theme";

pub struct OptionsPage {
    document: Document,
    form: HtmlFormElement,
    /// Last state written to the form.
    state: RefCell<OptionsForm>,
}

impl OptionsPage {
    /// Bind to the first `<form>` of the page.
    pub fn attach() -> HostResult<Rc<Self>> {
        let window = web_sys::window().ok_or(HostError::NoWindow)?;
        let document = window.document().ok_or(HostError::NoDocument)?;
        let form = document
            .forms()
            .item(0)
            .ok_or(HostError::WrongElement("form"))?
            .dyn_into::<HtmlFormElement>()
            .map_err(|_| HostError::WrongElement("form"))?;

        let page = Rc::new(Self {
            document,
            form,
            state: RefCell::new(OptionsForm::restore(&StoredOptions::default())),
        });
        page.fill_engines()?;
        page.listen()?;

        if page.document.ready_state() == "loading" {
            let this = Rc::clone(&page);
            let ready = Closure::once_into_js(move || this.restore());
            page.document
                .add_event_listener_with_callback("DOMContentLoaded", ready.unchecked_ref())?;
        } else {
            page.restore();
        }
        Ok(page)
    }

    fn field(&self, name: &'static str) -> HostResult<Element> {
        self.form
            .query_selector(&format!("[name=\"{name}\"]"))?
            .ok_or(HostError::WrongElement(name))
    }

    fn input(&self, name: &'static str) -> HostResult<HtmlInputElement> {
        self.field(name)?
            .dyn_into()
            .map_err(|_| HostError::WrongElement(name))
    }

    fn engine_select(&self) -> HostResult<HtmlSelectElement> {
        self.field(ENGINE_FIELD)?
            .dyn_into()
            .map_err(|_| HostError::WrongElement(ENGINE_FIELD))
    }

    fn dark_theme_toggle(&self) -> Option<HtmlInputElement> {
        self.input(DARK_THEME_FIELD).ok()
    }

    /// Populate an empty engine dropdown with the presets.
    fn fill_engines(&self) -> HostResult<()> {
        let select = self.engine_select()?;
        if select.length() > 0 {
            return Ok(());
        }
        for engine in SearchEngine::ALL {
            let option = self.document.create_element("option")?;
            option.set_attribute("value", engine.name())?;
            option.set_text_content(Some(engine.display_name()));
            select.append_child(&option)?;
        }
        Ok(())
    }

    fn listen(self: &Rc<Self>) -> HostResult<()> {
        let this = Rc::clone(self);
        let changed = Closure::wrap(Box::new(move |_: Event| {
            if let Err(e) = this.on_engine_changed() {
                log::error!("engine change failed: {e}");
            }
        }) as Box<dyn FnMut(Event)>);
        self.engine_select()?
            .add_event_listener_with_callback("change", changed.as_ref().unchecked_ref())?;
        changed.forget();

        let this = Rc::clone(self);
        let submitted = Closure::wrap(Box::new(move |event: Event| {
            event.prevent_default();
            if let Err(e) = this.save() {
                log::error!("saving options failed: {e}");
            }
        }) as Box<dyn FnMut(Event)>);
        self.form
            .add_event_listener_with_callback("submit", submitted.as_ref().unchecked_ref())?;
        submitted.forget();
        Ok(())
    }

    fn restore(self: &Rc<Self>) {
        let defaults = match js_sys::JSON::parse(&StoredOptions::defaults_json()) {
            Ok(defaults) => defaults,
            Err(e) => {
                log::error!("options defaults: {}", HostError::from(e));
                return;
            }
        };
        let this = Rc::clone(self);
        let loaded = Closure::once_into_js(move |options: JsValue| {
            let stored = StoredOptions::from_json(&chrome::to_json(&options).unwrap_or_default());
            if let Err(e) = this.write(&OptionsForm::restore(&stored)) {
                log::error!("restoring options failed: {e}");
            }
        });
        chrome::storage_local_get(&defaults, loaded.unchecked_ref());
    }

    fn on_engine_changed(&self) -> HostResult<()> {
        let mut form = self.read()?;
        form.select_engine(form.engine);
        log::debug!("engine changed to {}", form.engine.name());
        self.write(&form)
    }

    fn save(&self) -> HostResult<()> {
        let form = self.read()?;
        let items = chrome::to_js(&form.save())?;
        chrome::storage_local_set(&items);
        *self.state.borrow_mut() = form;
        log::info!("options saved");
        Ok(())
    }

    /// Current form contents, on top of the last written state.
    fn read(&self) -> HostResult<OptionsForm> {
        let mut form = self.state.borrow().clone();
        form.engine = SearchEngine::from_name(&self.engine_select()?.value());
        form.search_engine_url = self.input(URL_FIELD)?.value();
        form.font_family = self.input(FONT_FIELD)?.value();
        form.search_button_text = self.input(SEARCH_LABEL_FIELD)?.value();
        form.copy_button_text = self.input(COPY_LABEL_FIELD)?.value();
        if let Some(toggle) = self.dark_theme_toggle() {
            form.dark_theme = toggle.checked();
        }
        Ok(form)
    }

    fn write(&self, form: &OptionsForm) -> HostResult<()> {
        self.engine_select()?.set_value(form.engine.name());
        let url = self.input(URL_FIELD)?;
        url.set_value(&form.search_engine_url);
        url.set_disabled(!form.url_editable());
        self.input(FONT_FIELD)?.set_value(&form.font_family);
        self.input(SEARCH_LABEL_FIELD)?
            .set_value(&form.search_button_text);
        self.input(COPY_LABEL_FIELD)?
            .set_value(&form.copy_button_text);
        if let Some(toggle) = self.dark_theme_toggle() {
            toggle.set_checked(form.dark_theme);
        }
        *self.state.borrow_mut() = form.clone();
        Ok(())
    }
}
