//! Router behaviour over time.
//!
//! A virtual clock stands in for `setTimeout`: `StartTimer` effects schedule
//! (or reschedule) a slot's expiry, and advancing the clock feeds expired
//! slots back through `on_timer`.

use pretty_assertions::assert_eq;
use sm_frame::{InputEvent, InputEventRouter, RouterEffect, TimerSlot};
use std::collections::HashMap;

type Target = &'static str;

#[derive(Debug, Clone, PartialEq)]
enum Outcome {
    Hide(u64),
    Resolve(u64, Target),
}

struct Harness {
    router: InputEventRouter,
    now: u64,
    timers: HashMap<TimerSlot, u64>,
    outcomes: Vec<Outcome>,
}

impl Harness {
    fn new() -> Self {
        Self {
            router: InputEventRouter::default(),
            now: 0,
            timers: HashMap::new(),
            outcomes: Vec::new(),
        }
    }

    fn event(&mut self, event: InputEvent<Target>) {
        let effects = self.router.handle(event);
        self.apply(effects);
    }

    fn apply(&mut self, effects: impl IntoIterator<Item = RouterEffect<Target>>) {
        for effect in effects {
            match effect {
                RouterEffect::Hide => self.outcomes.push(Outcome::Hide(self.now)),
                RouterEffect::ResolveDeferred(t) | RouterEffect::ResolveNow(t) => {
                    self.outcomes.push(Outcome::Resolve(self.now, t))
                }
                // Restarting replaces any pending expiry, like clearTimeout + setTimeout.
                RouterEffect::StartTimer { slot, delay_ms } => {
                    self.timers.insert(slot, self.now + u64::from(delay_ms));
                }
            }
        }
    }

    fn advance(&mut self, ms: u64) {
        let until = self.now + ms;
        loop {
            let next = self
                .timers
                .iter()
                .filter(|(_, at)| **at <= until)
                .min_by_key(|(_, at)| **at)
                .map(|(slot, at)| (*slot, *at));
            let Some((slot, at)) = next else { break };
            self.timers.remove(&slot);
            self.now = at;
            let effects = self.router.on_timer(slot);
            self.apply(effects);
        }
        self.now = until;
    }

    fn hides(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Hide(_)))
            .count()
    }
}

// ─── Drag-scrolling ──────────────────────────────────────────────────────

#[test]
fn held_button_scroll_burst_never_hides_and_eats_release() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut h = Harness::new();
    h.event(InputEvent::mouse_down(0));
    assert_eq!(h.outcomes, vec![Outcome::Hide(0)]);

    for _ in 0..3 {
        h.advance(50);
        h.event(InputEvent::Scroll);
    }
    // Last scroll at t=150; nothing may hide before t=350.
    h.advance(199);
    assert_eq!(h.hides(), 1);
    h.advance(10);
    assert_eq!(h.hides(), 1);
    assert!(h.router.is_scroll_from_click_hold());

    h.event(InputEvent::mouse_up(0, "page"));
    assert_eq!(h.outcomes, vec![Outcome::Hide(0)]);
    assert!(!h.router.is_scroll_from_click_hold());
}

#[test]
fn release_without_scroll_resolves_target() {
    let mut h = Harness::new();
    h.event(InputEvent::mouse_down(0));
    h.advance(300);
    h.event(InputEvent::mouse_up(0, "paragraph"));
    assert_eq!(
        h.outcomes,
        vec![Outcome::Hide(0), Outcome::Resolve(300, "paragraph")]
    );
}

// ─── Debounced hides ─────────────────────────────────────────────────────

#[test]
fn scroll_burst_hides_on_both_edges() {
    let mut h = Harness::new();
    h.event(InputEvent::Scroll);
    for _ in 0..4 {
        h.advance(50);
        h.event(InputEvent::Scroll);
    }
    // Leading at t=0; last call at t=200.
    h.advance(199);
    assert_eq!(h.outcomes, vec![Outcome::Hide(0)]);
    h.advance(1);
    assert_eq!(h.outcomes, vec![Outcome::Hide(0), Outcome::Hide(400)]);

    // The window is closed; the next scroll is a fresh leading edge.
    h.advance(1000);
    h.event(InputEvent::Scroll);
    assert_eq!(h.outcomes.last(), Some(&Outcome::Hide(1400)));
}

#[test]
fn continuous_resize_is_not_flooded() {
    let mut h = Harness::new();
    for _ in 0..50 {
        h.event(InputEvent::Resize);
        h.advance(16);
    }
    h.advance(500);
    assert_eq!(h.hides(), 2);
}

#[test]
fn typing_hides_once_per_quiet_window() {
    let mut h = Harness::new();
    h.event(InputEvent::TextInput);
    h.advance(250);
    h.event(InputEvent::TextInput);
    h.advance(250);
    assert_eq!(h.outcomes, vec![Outcome::Hide(0), Outcome::Hide(250)]);
}

#[test]
fn scroll_that_starts_after_release_hides() {
    let mut h = Harness::new();
    h.event(InputEvent::mouse_down(0));
    h.event(InputEvent::mouse_up(0, "p"));
    h.event(InputEvent::Scroll);
    assert_eq!(
        h.outcomes,
        vec![Outcome::Hide(0), Outcome::Resolve(0, "p"), Outcome::Hide(0)]
    );
}

// ─── Keyboard ────────────────────────────────────────────────────────────

#[test]
fn keyboard_selection_flow() {
    let mut h = Harness::new();
    h.event(InputEvent::key_down("Shift", "ShiftLeft", false, false));
    h.event(InputEvent::key_down("ArrowRight", "ArrowRight", false, false));
    h.event(InputEvent::key_up("ArrowRight", "input"));
    h.event(InputEvent::key_up("Shift", "input"));
    assert_eq!(
        h.outcomes,
        vec![Outcome::Hide(0), Outcome::Resolve(0, "input")]
    );
}
