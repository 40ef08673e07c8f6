//! `<input>` / `<textarea>` selections, measured through a mirror `<div>`.

use crate::dom::to_rect;
use crate::error::{HostError, HostResult};
use sm_core::mirror::{ClientBox, ComputedStyle, MirrorError, MirrorHost, MirrorPlan, MountedMirror};
use sm_core::{ControlKind, ControlSelection, Direction, EngineQuirks, Rect};
use wasm_bindgen::JsCast;
use web_sys::{
    CssStyleDeclaration, Document, Element, HtmlElement, HtmlInputElement, HtmlTextAreaElement,
    Window,
};

/// Whether the element is one of the plain-text controls.
pub fn control_kind(element: &Element) -> Option<ControlKind> {
    match element.node_name().as_str() {
        "INPUT" => Some(ControlKind::Input),
        "TEXTAREA" => Some(ControlKind::TextArea),
        _ => None,
    }
}

/// Snapshot a control's value and selection.
///
/// Input types without a selection API (checkbox, number, …) report no
/// offsets and yield `None`.
pub fn read_control(element: &Element, kind: ControlKind) -> HostResult<Option<ControlSelection>> {
    let (value, start, end, direction) = match kind {
        ControlKind::Input => {
            let input = element
                .dyn_ref::<HtmlInputElement>()
                .ok_or(HostError::WrongElement("input"))?;
            (
                input.value(),
                input.selection_start().ok().flatten(),
                input.selection_end().ok().flatten(),
                input.selection_direction().ok().flatten(),
            )
        }
        ControlKind::TextArea => {
            let textarea = element
                .dyn_ref::<HtmlTextAreaElement>()
                .ok_or(HostError::WrongElement("textarea"))?;
            (
                textarea.value(),
                textarea.selection_start()?,
                textarea.selection_end()?,
                textarea.selection_direction()?,
            )
        }
    };
    let (Some(start), Some(end)) = (start, end) else {
        return Ok(None);
    };

    Ok(Some(ControlSelection {
        kind,
        value,
        selection_start: start.min(end),
        selection_end: start.max(end),
        direction: Direction::from_dom(direction.as_deref().unwrap_or("none")),
        bounds: to_rect(&element.get_bounding_client_rect()),
        scroll_left: f64::from(element.scroll_left()),
        scroll_top: f64::from(element.scroll_top()),
    }))
}

/// `getComputedStyle()` result.
pub struct WebStyle(pub CssStyleDeclaration);

impl WebStyle {
    pub fn of(window: &Window, element: &Element) -> HostResult<Self> {
        window
            .get_computed_style(element)?
            .map(Self)
            .ok_or_else(|| HostError::Js("no computed style".into()))
    }
}

impl ComputedStyle for WebStyle {
    fn property(&self, name: &str) -> String {
        self.0.get_property_value(name).unwrap_or_default()
    }
}

/// Probe the engine's textarea defaults once per frame.
pub fn probe_quirks(window: &Window, document: &Document) -> HostResult<EngineQuirks> {
    let body = document.body().ok_or(HostError::NoBody)?;
    let probe = document.create_element("textarea")?;
    body.append_child(&probe)?;
    let overflow = WebStyle::of(window, &probe).map(|style| style.property("overflow-x"));
    probe.remove();
    let quirks = EngineQuirks::probe(&overflow?);
    log::debug!("engine quirks: {quirks:?}");
    Ok(quirks)
}

// ─── Mirror host ─────────────────────────────────────────────────────────

pub struct WebMirrorHost {
    document: Document,
}

impl WebMirrorHost {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn build(&self, plan: &MirrorPlan) -> HostResult<HtmlElement> {
        let body = self.document.body().ok_or(HostError::NoBody)?;
        let div: HtmlElement = self
            .document
            .create_element("div")?
            .dyn_into()
            .map_err(|_| HostError::WrongElement("div"))?;
        div.append_child(&self.document.create_text_node(&plan.text))?;

        let style = div.style();
        for (name, value) in &plan.declarations {
            style.set_property(name, value)?;
        }
        body.append_child(&div)?;
        // Scroll offsets only stick once the element is laid out.
        div.set_scroll_left(plan.scroll_left as i32);
        div.set_scroll_top(plan.scroll_top as i32);
        Ok(div)
    }
}

impl MirrorHost for WebMirrorHost {
    type Mirror = WebMirror;

    fn mount(&self, plan: &MirrorPlan) -> Result<WebMirror, MirrorError> {
        let element = self
            .build(plan)
            .map_err(|e| MirrorError::Mount(e.to_string()))?;
        Ok(WebMirror {
            document: self.document.clone(),
            element,
        })
    }
}

pub struct WebMirror {
    document: Document,
    element: HtmlElement,
}

impl MountedMirror for WebMirror {
    fn caret_rect(&self, offset: u32) -> Option<Rect> {
        let measure = || -> HostResult<Rect> {
            let text = self
                .element
                .first_child()
                .ok_or_else(|| HostError::Js("mirror has no text node".into()))?;
            let range = self.document.create_range()?;
            range.set_start(&text, offset)?;
            range.collapse_with_to_start(true);
            Ok(to_rect(&range.get_bounding_client_rect()))
        };
        match measure() {
            Ok(rect) => rect.measured_caret(),
            Err(e) => {
                log::warn!("mirror caret at {offset} failed: {e}");
                None
            }
        }
    }

    fn client_box(&self) -> ClientBox {
        ClientBox {
            left: f64::from(self.element.client_left()),
            top: f64::from(self.element.client_top()),
            width: f64::from(self.element.client_width()),
            height: f64::from(self.element.client_height()),
        }
    }

    fn unmount(&mut self) {
        self.element.remove();
    }
}
