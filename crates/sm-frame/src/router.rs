//! Per-frame input routing.
//!
//! Decides, for every window-level event, whether to hide the menu,
//! resolve the selection, or do nothing. The router never touches the DOM
//! or a clock: it returns `RouterEffect`s for the host to execute, and is
//! told about expired timers through `on_timer`.

use crate::debounce::Debouncer;
use crate::input::InputEvent;
use crate::keys::{KeyIntent, KeyMap};
use smallvec::{SmallVec, smallvec};

/// Tunables for the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterConfig {
    /// Quiet period for scroll, resize and input events, in ms.
    pub debounce_ms: u32,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self { debounce_ms: 200 }
    }
}

/// Independent debounce timers, one per high-frequency event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerSlot {
    Scroll,
    Resize,
    TextInput,
}

impl TimerSlot {
    pub const ALL: [TimerSlot; 3] = [Self::Scroll, Self::Resize, Self::TextInput];
}

/// Something the host must do in response to an event.
#[derive(Debug, Clone, PartialEq)]
pub enum RouterEffect<T> {
    /// Ask the top frame to hide the menu.
    Hide,
    /// Resolve the selection around `T` on the next scheduling turn, after
    /// the current event has finished dispatching.
    ResolveDeferred(T),
    /// Resolve the selection around `T` right away.
    ResolveNow(T),
    /// (Re)start the slot's timer, cancelling any pending expiry.
    StartTimer { slot: TimerSlot, delay_ms: u32 },
}

pub type RouterEffects<T> = SmallVec<[RouterEffect<T>; 2]>;

/// Input state machine for one frame.
#[derive(Debug, Clone)]
pub struct InputEventRouter {
    config: RouterConfig,
    is_left_button_down: bool,
    is_scroll_from_click_hold: bool,
    scroll: Debouncer,
    resize: Debouncer,
    text_input: Debouncer,
}

impl Default for InputEventRouter {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}

impl InputEventRouter {
    pub fn new(config: RouterConfig) -> Self {
        Self {
            config,
            is_left_button_down: false,
            is_scroll_from_click_hold: false,
            scroll: Debouncer::new(config.debounce_ms),
            resize: Debouncer::new(config.debounce_ms),
            text_input: Debouncer::new(config.debounce_ms),
        }
    }

    pub fn config(&self) -> RouterConfig {
        self.config
    }

    pub fn is_left_button_down(&self) -> bool {
        self.is_left_button_down
    }

    pub fn is_scroll_from_click_hold(&self) -> bool {
        self.is_scroll_from_click_hold
    }

    /// Route one input event.
    pub fn handle<T>(&mut self, event: InputEvent<T>) -> RouterEffects<T> {
        log::trace!("router: {}", event.kind());
        let primary = event.is_primary_button();
        match event {
            InputEvent::MouseDown { .. } => {
                if primary {
                    self.is_left_button_down = true;
                }
                smallvec![RouterEffect::Hide]
            }
            InputEvent::MouseUp { target, .. } => {
                if !primary {
                    return SmallVec::new();
                }
                self.is_left_button_down = false;
                if self.is_scroll_from_click_hold {
                    log::debug!("release after drag-scroll; not resolving");
                    self.is_scroll_from_click_hold = false;
                    return SmallVec::new();
                }
                smallvec![RouterEffect::ResolveDeferred(target)]
            }
            InputEvent::Scroll => self.debounced(TimerSlot::Scroll),
            InputEvent::Resize => self.debounced(TimerSlot::Resize),
            InputEvent::TextInput => self.debounced(TimerSlot::TextInput),
            InputEvent::KeyDown {
                key,
                code,
                ctrl,
                meta,
            } => match KeyMap::key_down(&key, &code, ctrl, meta) {
                Some(KeyIntent::Hide) => smallvec![RouterEffect::Hide],
                _ => SmallVec::new(),
            },
            InputEvent::KeyUp { key, target } => match KeyMap::key_up(&key) {
                Some(KeyIntent::Resolve) => smallvec![RouterEffect::ResolveNow(target)],
                _ => SmallVec::new(),
            },
        }
    }

    /// A timer started by `RouterEffect::StartTimer` expired.
    pub fn on_timer<T>(&mut self, slot: TimerSlot) -> RouterEffects<T> {
        if !self.debouncer(slot).elapse() {
            return SmallVec::new();
        }
        log::trace!("router: trailing {slot:?}");
        self.fire(slot).into_iter().collect()
    }

    fn debounced<T>(&mut self, slot: TimerSlot) -> RouterEffects<T> {
        let debouncer = self.debouncer(slot);
        let leading = debouncer.call();
        let delay_ms = debouncer.quiet_ms();

        let mut effects = SmallVec::new();
        if leading {
            effects.extend(self.fire(slot));
        }
        effects.push(RouterEffect::StartTimer { slot, delay_ms });
        effects
    }

    /// Run the debounced handler for `slot`.
    fn fire<T>(&mut self, slot: TimerSlot) -> Option<RouterEffect<T>> {
        match slot {
            TimerSlot::Scroll if self.is_left_button_down => {
                self.is_scroll_from_click_hold = true;
                None
            }
            TimerSlot::Scroll | TimerSlot::Resize | TimerSlot::TextInput => {
                Some(RouterEffect::Hide)
            }
        }
    }

    fn debouncer(&mut self, slot: TimerSlot) -> &mut Debouncer {
        match slot {
            TimerSlot::Scroll => &mut self.scroll,
            TimerSlot::Resize => &mut self.resize,
            TimerSlot::TextInput => &mut self.text_input,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    type Effects = RouterEffects<&'static str>;

    fn start(slot: TimerSlot) -> RouterEffect<&'static str> {
        RouterEffect::StartTimer {
            slot,
            delay_ms: 200,
        }
    }

    #[test]
    fn any_press_hides_but_only_primary_arms() {
        let mut router = InputEventRouter::default();
        let effects: Effects = router.handle(InputEvent::mouse_down(2));
        assert_eq!(effects.as_slice(), &[RouterEffect::Hide]);
        assert!(!router.is_left_button_down());

        let effects: Effects = router.handle(InputEvent::mouse_down(0));
        assert_eq!(effects.as_slice(), &[RouterEffect::Hide]);
        assert!(router.is_left_button_down());
    }

    #[test]
    fn primary_release_defers_resolve() {
        let mut router = InputEventRouter::default();
        let _: Effects = router.handle(InputEvent::mouse_down(0));
        let effects = router.handle(InputEvent::mouse_up(0, "p"));
        assert_eq!(effects.as_slice(), &[RouterEffect::ResolveDeferred("p")]);
        assert!(!router.is_left_button_down());
    }

    #[test]
    fn secondary_release_is_ignored() {
        let mut router = InputEventRouter::default();
        let effects = router.handle(InputEvent::mouse_up(2, "p"));
        assert!(effects.is_empty());
    }

    #[test]
    fn scroll_without_button_hides_immediately() {
        let mut router = InputEventRouter::default();
        let effects: Effects = router.handle(InputEvent::Scroll);
        assert_eq!(
            effects.as_slice(),
            &[RouterEffect::Hide, start(TimerSlot::Scroll)]
        );
        // A lone scroll has no trailing call.
        let effects: Effects = router.on_timer(TimerSlot::Scroll);
        assert!(effects.is_empty());
    }

    #[test]
    fn scroll_while_held_suppresses_next_release() {
        let mut router = InputEventRouter::default();
        let _: Effects = router.handle(InputEvent::mouse_down(0));
        let effects: Effects = router.handle(InputEvent::Scroll);
        assert_eq!(effects.as_slice(), &[start(TimerSlot::Scroll)]);
        assert!(router.is_scroll_from_click_hold());

        let effects = router.handle(InputEvent::mouse_up(0, "p"));
        assert!(effects.is_empty());
        assert!(!router.is_scroll_from_click_hold());

        // The flag is one-shot.
        let _: Effects = router.handle(InputEvent::mouse_down(0));
        let effects = router.handle(InputEvent::mouse_up(0, "p"));
        assert_eq!(effects.as_slice(), &[RouterEffect::ResolveDeferred("p")]);
    }

    #[test]
    fn caret_keys_and_select_all_hide() {
        let mut router = InputEventRouter::default();
        let effects: Effects = router.handle(InputEvent::key_down("End", "End", false, false));
        assert_eq!(effects.as_slice(), &[RouterEffect::Hide]);
        let effects: Effects = router.handle(InputEvent::key_down("a", "KeyA", false, true));
        assert_eq!(effects.as_slice(), &[RouterEffect::Hide]);
        let effects: Effects = router.handle(InputEvent::key_down("x", "KeyX", false, false));
        assert!(effects.is_empty());
    }

    #[test]
    fn shift_release_resolves_focused_element() {
        let mut router = InputEventRouter::default();
        let effects = router.handle(InputEvent::key_up("Shift", "textarea"));
        assert_eq!(effects.as_slice(), &[RouterEffect::ResolveNow("textarea")]);
    }

    #[test]
    fn slots_debounce_independently() {
        let mut router = InputEventRouter::default();
        let resize: Effects = router.handle(InputEvent::Resize);
        let input: Effects = router.handle(InputEvent::TextInput);
        assert_eq!(
            resize.as_slice(),
            &[RouterEffect::Hide, start(TimerSlot::Resize)]
        );
        assert_eq!(
            input.as_slice(),
            &[RouterEffect::Hide, start(TimerSlot::TextInput)]
        );
    }

    #[test]
    fn custom_quiet_period_is_used_for_timers() {
        let mut router = InputEventRouter::new(RouterConfig { debounce_ms: 75 });
        let effects: Effects = router.handle(InputEvent::Resize);
        assert_eq!(
            effects.last(),
            Some(&RouterEffect::StartTimer {
                slot: TimerSlot::Resize,
                delay_ms: 75
            })
        );
    }
}
