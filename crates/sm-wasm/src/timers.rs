//! `setTimeout`-backed timers for the router's debounce slots.

use crate::error::{HostError, HostResult};
use sm_frame::TimerSlot;
use std::cell::RefCell;
use std::collections::HashMap;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

/// One restartable timer per slot. Each slot's callback is created once and
/// reused, so restarting never allocates a new closure.
pub struct SlotTimers {
    window: Window,
    callbacks: RefCell<HashMap<TimerSlot, Closure<dyn FnMut()>>>,
    handles: RefCell<HashMap<TimerSlot, i32>>,
}

impl SlotTimers {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            callbacks: RefCell::new(HashMap::new()),
            handles: RefCell::new(HashMap::new()),
        }
    }

    /// Register what runs when `slot` expires.
    pub fn install(&self, slot: TimerSlot, callback: Closure<dyn FnMut()>) {
        self.callbacks.borrow_mut().insert(slot, callback);
    }

    /// Cancel any pending expiry of `slot` and schedule a new one.
    pub fn restart(&self, slot: TimerSlot, delay_ms: u32) -> HostResult<()> {
        if let Some(handle) = self.handles.borrow_mut().remove(&slot) {
            self.window.clear_timeout_with_handle(handle);
        }
        let callbacks = self.callbacks.borrow();
        let callback = callbacks
            .get(&slot)
            .ok_or_else(|| HostError::Js(format!("no callback for {slot:?}")))?;
        let handle = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                i32::try_from(delay_ms).unwrap_or(i32::MAX),
            )?;
        self.handles.borrow_mut().insert(slot, handle);
        Ok(())
    }

    /// Forget the handle of a timer that just fired.
    pub fn expired(&self, slot: TimerSlot) {
        self.handles.borrow_mut().remove(&slot);
    }
}

/// Run `f` on the next scheduling turn (`setTimeout(f, 0)`).
pub fn defer(window: &Window, f: impl FnOnce() + 'static) -> HostResult<()> {
    let callback = Closure::once_into_js(f);
    window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0)?;
    Ok(())
}
