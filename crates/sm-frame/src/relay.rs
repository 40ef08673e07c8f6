//! Cross-frame relay.
//!
//! Every frame runs the same relay. Local results are always posted to
//! `window.parent`; the top window is its own parent, so its own results
//! come back to it with `window.top` as the source and are delivered to the
//! menu controller there. Messages from child frames are re-expressed in
//! this frame's viewport and posted one level further up.
//!
//! ```text
//! iframe (depth 2) ──show──▶ iframe (depth 1) ──show+offset──▶ top ──show+offset──▶ top (deliver)
//! ```

use sm_core::{FrameMessage, FrameOffset, SelectionSnapshot};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RelayError {
    /// A child message whose source window matches no iframe in this
    /// document. The frame tree changed under us or the message was forged.
    #[error("no iframe in this document owns the message source")]
    UnknownSourceFrame,
    #[error("malformed relay message: {0}")]
    MalformedMessage(String),
}

/// Who posted an inbound message, from the receiving frame's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOrigin {
    /// `event.source === window.top`.
    TopWindow,
    /// Any other window, normally a child frame.
    Child,
}

/// What the host should do with a message.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayAction {
    /// Hand to this frame's menu controller.
    Deliver(FrameMessage),
    /// `window.parent.postMessage(msg, "*")`.
    PostToParent(FrameMessage),
    /// Not for us.
    Ignore,
}

/// Relay role of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRelay {
    is_top: bool,
}

impl FrameRelay {
    pub fn new(is_top: bool) -> Self {
        Self { is_top }
    }

    pub fn is_top(&self) -> bool {
        self.is_top
    }

    /// A local resolve produced a selection.
    pub fn local_show(&self, snapshot: SelectionSnapshot) -> RelayAction {
        RelayAction::PostToParent(FrameMessage::show(snapshot))
    }

    /// A local event wants the menu gone.
    pub fn local_hide(&self) -> RelayAction {
        RelayAction::PostToParent(FrameMessage::Hide)
    }

    /// Route an inbound message.
    ///
    /// `locate` finds the offset of the iframe that posted the message. It
    /// is only called for child `show` messages, and always recomputed: the
    /// document may have changed since the previous message.
    pub fn route(
        &self,
        origin: MessageOrigin,
        message: FrameMessage,
        locate: impl FnOnce() -> Result<FrameOffset, RelayError>,
    ) -> Result<RelayAction, RelayError> {
        let action = match (origin, message) {
            (MessageOrigin::TopWindow, message) if self.is_top => RelayAction::Deliver(message),
            (MessageOrigin::TopWindow, _) => RelayAction::Ignore,
            (MessageOrigin::Child, FrameMessage::Show(request)) => {
                let offset = locate()?;
                let translated = request.translated(offset);
                log::debug!(
                    "relay show: {:?} -> {:?}",
                    request.selection_end,
                    translated.selection_end
                );
                RelayAction::PostToParent(FrameMessage::Show(translated))
            }
            (MessageOrigin::Child, FrameMessage::Hide) => {
                RelayAction::PostToParent(FrameMessage::Hide)
            }
        };
        Ok(action)
    }
}

/// Decode `MessageEvent.data` (as JSON).
///
/// Pages post their own messages too; anything without our `action` tag is
/// `Ok(None)`. A message carrying our tag that does not decode is an error.
pub fn decode_message(json: &str) -> Result<Option<FrameMessage>, RelayError> {
    let Ok(value) = serde_json::from_str::<Value>(json) else {
        return Ok(None);
    };
    let action = match value.get("action").and_then(Value::as_str) {
        Some(action @ ("show" | "hide")) => action.to_string(),
        _ => return Ok(None),
    };
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| RelayError::MalformedMessage(format!("{action}: {e}")))
}

/// Find the child frame whose content window is `source`.
///
/// `frames` is the current document's iframe list in document order;
/// `content_window` yields each frame's window (if it has one).
pub fn find_source_frame<F, W: PartialEq>(
    frames: impl IntoIterator<Item = F>,
    source: &W,
    content_window: impl Fn(&F) -> Option<W>,
) -> Result<F, RelayError> {
    frames
        .into_iter()
        .find(|frame| content_window(frame).as_ref() == Some(source))
        .ok_or(RelayError::UnknownSourceFrame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sm_core::{Direction, Rect, ShowRequest};

    fn show(left: f64, top: f64) -> FrameMessage {
        FrameMessage::Show(ShowRequest {
            selected_string: "text".into(),
            selection_direction: Direction::Forward,
            on_one_line: true,
            selection_end: Rect::new(left, top, left, top + 18.0),
        })
    }

    fn offset() -> Result<FrameOffset, RelayError> {
        Ok(FrameOffset::from_iframe_box(
            Rect::new(50.0, 100.0, 350.0, 300.0),
            2.0,
            2.0,
            3.0,
            3.0,
        ))
    }

    #[test]
    fn child_show_is_translated_upward() {
        let relay = FrameRelay::new(false);
        let action = relay
            .route(MessageOrigin::Child, show(10.0, 20.0), offset)
            .unwrap();
        assert_eq!(action, RelayAction::PostToParent(show(65.0, 125.0)));
    }

    #[test]
    fn top_frame_translates_children_too() {
        let relay = FrameRelay::new(true);
        let action = relay
            .route(MessageOrigin::Child, show(10.0, 20.0), offset)
            .unwrap();
        assert_eq!(action, RelayAction::PostToParent(show(65.0, 125.0)));
    }

    #[test]
    fn hide_is_relayed_without_lookup() {
        let relay = FrameRelay::new(false);
        let action = relay
            .route(MessageOrigin::Child, FrameMessage::Hide, || {
                panic!("hide must not look up the source frame")
            })
            .unwrap();
        assert_eq!(action, RelayAction::PostToParent(FrameMessage::Hide));
    }

    #[test]
    fn top_window_messages_are_delivered_only_in_top() {
        let top = FrameRelay::new(true);
        let sub = FrameRelay::new(false);
        assert_eq!(
            top.route(MessageOrigin::TopWindow, show(1.0, 2.0), offset),
            Ok(RelayAction::Deliver(show(1.0, 2.0)))
        );
        assert_eq!(
            sub.route(MessageOrigin::TopWindow, show(1.0, 2.0), offset),
            Ok(RelayAction::Ignore)
        );
    }

    #[test]
    fn unknown_source_frame_is_an_error() {
        let relay = FrameRelay::new(false);
        let result = relay.route(MessageOrigin::Child, show(0.0, 0.0), || {
            find_source_frame(["a", "b"], &"z", |f| Some(*f)).map(|_| FrameOffset::default())
        });
        assert_eq!(result, Err(RelayError::UnknownSourceFrame));
    }

    #[test]
    fn source_frame_matched_by_window() {
        let frames = [("first", Some(1)), ("detached", None), ("second", Some(2))];
        let found = find_source_frame(frames, &2, |(_, window)| *window).unwrap();
        assert_eq!(found.0, "second");
    }

    #[test]
    fn decode_distinguishes_foreign_from_malformed() {
        assert_eq!(decode_message(r#"{"action":"hide"}"#), Ok(Some(FrameMessage::Hide)));
        assert_eq!(decode_message(r#"{"type":"ping"}"#), Ok(None));
        assert_eq!(decode_message(r#"{"action":"navigate"}"#), Ok(None));
        assert_eq!(decode_message("not json"), Ok(None));
        assert!(matches!(
            decode_message(r#"{"action":"show","selectedString":1}"#),
            Err(RelayError::MalformedMessage(_))
        ));
    }

    #[test]
    fn local_results_always_go_to_parent() {
        let relay = FrameRelay::new(true);
        assert_eq!(relay.local_hide(), RelayAction::PostToParent(FrameMessage::Hide));
    }
}
