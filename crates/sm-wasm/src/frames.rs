//! Where this frame sits in the frame tree, and how to talk to its parent.

use crate::controls::WebStyle;
use crate::dom::to_rect;
use crate::error::{HostError, HostResult};
use sm_core::css::px_or_zero;
use sm_core::mirror::ComputedStyle;
use sm_core::{FrameMessage, FrameOffset};
use sm_frame::MessageOrigin;
use sm_frame::relay::{RelayError, find_source_frame};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlIFrameElement, Window};

pub struct FrameLinks {
    window: Window,
    document: Document,
}

impl FrameLinks {
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    fn top(&self) -> Option<JsValue> {
        self.window.top().ok().flatten().map(JsValue::from)
    }

    /// `window.top === window`.
    pub fn is_top(&self) -> bool {
        let this: &JsValue = self.window.as_ref();
        self.top().is_none_or(|top| top == *this)
    }

    pub fn origin_of(&self, source: Option<&JsValue>) -> MessageOrigin {
        match (source, self.top()) {
            (Some(source), Some(top)) if *source == top => MessageOrigin::TopWindow,
            _ => MessageOrigin::Child,
        }
    }

    /// Content-origin offset of the iframe whose window is `source`.
    pub fn locate(&self, source: &JsValue) -> Result<FrameOffset, RelayError> {
        let frames = self.document.get_elements_by_tag_name("iframe");
        let frames = (0..frames.length())
            .filter_map(|i| frames.item(i))
            .filter_map(|element| element.dyn_into::<HtmlIFrameElement>().ok());
        let frame = find_source_frame(frames, source, |frame| {
            frame.content_window().map(JsValue::from)
        })?;

        let (padding_left, padding_top) = match WebStyle::of(&self.window, &frame) {
            Ok(style) => (
                px_or_zero(&style.property("padding-left")),
                px_or_zero(&style.property("padding-top")),
            ),
            Err(e) => {
                log::warn!("iframe padding unavailable: {e}");
                (0.0, 0.0)
            }
        };
        Ok(FrameOffset::from_iframe_box(
            to_rect(&frame.get_bounding_client_rect()),
            f64::from(frame.client_left()),
            f64::from(frame.client_top()),
            padding_left,
            padding_top,
        ))
    }

    /// `window.parent.postMessage(message, "*")`.
    pub fn post_to_parent(&self, message: &FrameMessage) -> HostResult<()> {
        let parent = self.window.parent()?.ok_or(HostError::NoWindow)?;
        let value = js_sys::JSON::parse(&message.to_json())?;
        log::trace!("post {}", message.action());
        parent.post_message(&value, "*")?;
        Ok(())
    }
}
