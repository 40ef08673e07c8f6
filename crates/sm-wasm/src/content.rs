//! Content script: one instance per frame.
//!
//! Window-level events go through the `InputEventRouter`; its effects are
//! executed here. Resolved selections and hide requests travel up the frame
//! tree through `FrameRelay`, and the top frame owns the popup.

use crate::chrome;
use crate::controls::{WebMirrorHost, WebStyle, control_kind, probe_quirks, read_control};
use crate::dom::{WebDom, read_selection};
use crate::error::{HostError, HostResult};
use crate::frames::FrameLinks;
use crate::menu_view::{RuntimeSearch, WebClipboard, WebMenuView};
use crate::timers::{SlotTimers, defer};
use sm_core::theme::MenuTheme;
use sm_core::{
    EngineQuirks, MenuConfiguration, SelectionSnapshot, StoredOptions, resolve_control,
    resolve_selection,
};
use sm_frame::relay::decode_message;
use sm_frame::{
    FrameRelay, InputEvent, InputEventRouter, RelayAction, RelayError, RouterEffect,
    SelectionMenuController, TimerSlot,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, KeyboardEvent, MessageEvent, MouseEvent, Window};

type Target = Option<Element>;

/// Window events the router listens to, and whether they are captured.
/// Capturing `scroll` catches nested scrollers, which do not bubble.
const INPUT_EVENTS: &[(&str, bool)] = &[
    ("mousedown", false),
    ("mouseup", false),
    ("scroll", true),
    ("keydown", true),
    ("keyup", true),
    ("resize", true),
    ("input", true),
];

pub struct ContentScript {
    window: Window,
    document: Document,
    links: FrameLinks,
    relay: FrameRelay,
    quirks: EngineQuirks,
    theme: MenuTheme,
    router: RefCell<InputEventRouter>,
    timers: SlotTimers,
    menu: RefCell<Option<SelectionMenuController<WebMenuView>>>,
    options: RefCell<StoredOptions>,
}

impl ContentScript {
    /// Attach to the current frame. Listeners hold the returned script for
    /// the lifetime of the page.
    pub fn start(theme: MenuTheme) -> HostResult<Rc<Self>> {
        let window = web_sys::window().ok_or(HostError::NoWindow)?;
        let document = window.document().ok_or(HostError::NoDocument)?;
        let quirks = probe_quirks(&window, &document).unwrap_or_else(|e| {
            log::warn!("quirk probe failed, assuming defaults: {e}");
            EngineQuirks::default()
        });
        let links = FrameLinks::new(window.clone(), document.clone());
        let relay = FrameRelay::new(links.is_top());

        let script = Rc::new(Self {
            timers: SlotTimers::new(window.clone()),
            window,
            document,
            links,
            relay,
            quirks,
            theme,
            router: RefCell::new(InputEventRouter::default()),
            menu: RefCell::new(None),
            options: RefCell::new(StoredOptions::default()),
        });

        script.install_timers();
        script.listen_input()?;
        script.listen_messages()?;
        if script.relay.is_top() {
            script.load_menu()?;
        }
        log::info!(
            "content script ready ({} frame)",
            if script.relay.is_top() { "top" } else { "child" }
        );
        Ok(script)
    }

    // ─── Input ───────────────────────────────────────────────────────────

    fn install_timers(self: &Rc<Self>) {
        for slot in TimerSlot::ALL {
            let this = Rc::clone(self);
            let callback = Closure::wrap(Box::new(move || {
                this.timers.expired(slot);
                let effects = this.router.borrow_mut().on_timer::<Target>(slot);
                for effect in effects {
                    this.execute(effect);
                }
            }) as Box<dyn FnMut()>);
            self.timers.install(slot, callback);
        }
    }

    fn listen_input(self: &Rc<Self>) -> HostResult<()> {
        for &(name, capture) in INPUT_EVENTS {
            let this = Rc::clone(self);
            let listener = Closure::wrap(Box::new(move |event: Event| {
                if let Some(input) = normalize(name, &event, &this.document) {
                    this.route(input);
                }
            }) as Box<dyn FnMut(Event)>);
            self.window.add_event_listener_with_callback_and_bool(
                name,
                listener.as_ref().unchecked_ref(),
                capture,
            )?;
            listener.forget();
        }
        Ok(())
    }

    fn route(self: &Rc<Self>, input: InputEvent<Target>) {
        log::trace!("input: {}", input.kind());
        let effects = self.router.borrow_mut().handle(input);
        for effect in effects {
            self.execute(effect);
        }
    }

    fn execute(self: &Rc<Self>, effect: RouterEffect<Target>) {
        let result = match effect {
            RouterEffect::Hide => {
                self.dispatch(self.relay.local_hide());
                Ok(())
            }
            RouterEffect::ResolveDeferred(target) => {
                let this = Rc::clone(self);
                defer(&self.window, move || this.resolve_and_post(target.as_ref()))
            }
            RouterEffect::ResolveNow(target) => {
                self.resolve_and_post(target.as_ref());
                Ok(())
            }
            RouterEffect::StartTimer { slot, delay_ms } => self.timers.restart(slot, delay_ms),
        };
        if let Err(e) = result {
            log::error!("input effect failed: {e}");
        }
    }

    // ─── Resolve ─────────────────────────────────────────────────────────

    fn resolve_and_post(&self, target: Option<&Element>) {
        match self.resolve(target) {
            Ok(Some(snapshot)) => self.dispatch(self.relay.local_show(snapshot)),
            Ok(None) => log::trace!("nothing selected"),
            Err(e) => log::error!("selection lookup failed: {e}"),
        }
    }

    /// A focused text control answers for itself; anything else falls back
    /// to the document selection.
    fn resolve(&self, target: Option<&Element>) -> HostResult<Option<SelectionSnapshot>> {
        if let Some((element, kind)) = target.and_then(|el| control_kind(el).map(|kind| (el, kind))) {
            let Some(control) = read_control(element, kind)? else {
                return Ok(None);
            };
            let style = WebStyle::of(&self.window, element)?;
            let host = WebMirrorHost::new(self.document.clone());
            return Ok(resolve_control(&host, &control, &style, self.quirks));
        }
        let Some(selection) = read_selection(&self.window)? else {
            return Ok(None);
        };
        Ok(resolve_selection(&WebDom::new(self.document.clone()), &selection))
    }

    // ─── Relay ───────────────────────────────────────────────────────────

    fn listen_messages(self: &Rc<Self>) -> HostResult<()> {
        let this = Rc::clone(self);
        let listener = Closure::wrap(Box::new(move |event: MessageEvent| {
            this.on_message(&event);
        }) as Box<dyn FnMut(MessageEvent)>);
        self.window
            .add_event_listener_with_callback("message", listener.as_ref().unchecked_ref())?;
        listener.forget();
        Ok(())
    }

    fn on_message(&self, event: &MessageEvent) {
        let Some(json) = chrome::to_json(&event.data()) else {
            return;
        };
        let message = match decode_message(&json) {
            Ok(Some(message)) => message,
            Ok(None) => return,
            Err(e) => {
                log::warn!("{e}");
                return;
            }
        };
        let source = event.source().map(JsValue::from);
        let origin = self.links.origin_of(source.as_ref());
        let routed = self.relay.route(origin, message, || match &source {
            Some(source) => self.links.locate(source),
            None => Err(RelayError::UnknownSourceFrame),
        });
        match routed {
            Ok(action) => self.dispatch(action),
            Err(e) => log::error!("dropping relay message: {e}"),
        }
    }

    fn dispatch(&self, action: RelayAction) {
        match action {
            RelayAction::PostToParent(message) => {
                if let Err(e) = self.links.post_to_parent(&message) {
                    log::error!("postMessage to parent failed: {e}");
                }
            }
            RelayAction::Deliver(message) => match self.menu.borrow_mut().as_mut() {
                Some(menu) => {
                    menu.handle(message);
                }
                None => log::debug!("menu not built yet; dropping {}", message.action()),
            },
            RelayAction::Ignore => {}
        }
    }

    // ─── Menu (top frame) ────────────────────────────────────────────────

    fn load_menu(self: &Rc<Self>) -> HostResult<()> {
        let defaults = js_sys::JSON::parse(&StoredOptions::defaults_json())?;
        let this = Rc::clone(self);
        let loaded = Closure::once_into_js(move |options: JsValue| {
            if let Err(e) = this.build_menu(&options) {
                log::error!("failed to build the menu: {e}");
            }
        });
        chrome::storage_local_get(&defaults, loaded.unchecked_ref());

        let this = Rc::clone(self);
        let changed = Closure::wrap(Box::new(move |changes: JsValue, area: JsValue| {
            if area.as_string().as_deref() == Some("local") {
                this.on_options_changed(&changes);
            }
        }) as Box<dyn FnMut(JsValue, JsValue)>);
        chrome::storage_on_changed(changed.as_ref().unchecked_ref());
        changed.forget();
        Ok(())
    }

    fn build_menu(self: &Rc<Self>, options: &JsValue) -> HostResult<()> {
        let stored = StoredOptions::from_json(&chrome::to_json(options).unwrap_or_default());
        let config = MenuConfiguration::from(&stored);
        *self.options.borrow_mut() = stored;

        let view = WebMenuView::build(&self.document, &self.theme, &config)?;
        self.listen_menu(view.root())?;
        *self.menu.borrow_mut() = Some(SelectionMenuController::new(view, config));
        Ok(())
    }

    /// Pointer events on the popup must not reach the page, or the page's
    /// own handlers (and our router) would clear the selection first.
    fn listen_menu(self: &Rc<Self>, root: &Element) -> HostResult<()> {
        let swallow = Closure::wrap(Box::new(|event: Event| {
            event.prevent_default();
            event.stop_propagation();
        }) as Box<dyn FnMut(Event)>);
        root.add_event_listener_with_callback("mousedown", swallow.as_ref().unchecked_ref())?;
        swallow.forget();

        let this = Rc::clone(self);
        let release = Closure::wrap(Box::new(move |event: Event| {
            event.stop_propagation();
            let mut menu = this.menu.borrow_mut();
            let Some(menu) = menu.as_mut() else {
                return;
            };
            if let Some(action) = menu.view().action_for(event.target().as_ref()) {
                let clipboard = WebClipboard::new(this.document.clone());
                menu.on_action(action, &RuntimeSearch, &clipboard);
            }
        }) as Box<dyn FnMut(Event)>);
        root.add_event_listener_with_callback("mouseup", release.as_ref().unchecked_ref())?;
        release.forget();

        let click = Closure::wrap(Box::new(|event: Event| {
            event.stop_propagation();
        }) as Box<dyn FnMut(Event)>);
        root.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
        click.forget();
        Ok(())
    }

    fn on_options_changed(&self, changes: &JsValue) {
        let Some(json) = chrome::to_json(changes) else {
            return;
        };
        let config = {
            let mut options = self.options.borrow_mut();
            if !options.apply_changes(&json) {
                return;
            }
            MenuConfiguration::from(&*options)
        };
        if let Some(menu) = self.menu.borrow_mut().as_mut() {
            menu.apply_config(config);
        }
    }
}

/// Turn a raw DOM event into the router's vocabulary.
fn normalize(name: &str, event: &Event, document: &Document) -> Option<InputEvent<Target>> {
    let input = match name {
        "mousedown" => InputEvent::mouse_down(event.dyn_ref::<MouseEvent>()?.button()),
        "mouseup" => {
            let target = event.target().and_then(|t| t.dyn_into::<Element>().ok());
            InputEvent::mouse_up(event.dyn_ref::<MouseEvent>()?.button(), target)
        }
        "keydown" => {
            let key = event.dyn_ref::<KeyboardEvent>()?;
            InputEvent::key_down(key.key(), key.code(), key.ctrl_key(), key.meta_key())
        }
        "keyup" => {
            let key = event.dyn_ref::<KeyboardEvent>()?;
            InputEvent::key_up(key.key(), document.active_element())
        }
        "scroll" => InputEvent::Scroll,
        "resize" => InputEvent::Resize,
        "input" => InputEvent::TextInput,
        _ => return None,
    };
    Some(input)
}
