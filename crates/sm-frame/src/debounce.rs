//! Leading + trailing edge debouncing, driven by an external timer.
//!
//! The first call in a quiet window runs immediately. Further calls inside
//! the window are coalesced into exactly one trailing call, which runs
//! once the quiet period has elapsed after the last of them.
//!
//! The debouncer owns no clock. After every `call` the host (re)starts a
//! timer for `quiet_ms`, cancelling any pending one, and reports its expiry
//! through `elapse`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer {
    quiet_ms: u32,
    /// A quiet window is open (timer running).
    armed: bool,
    /// Calls were swallowed inside the open window.
    pending: bool,
}

impl Debouncer {
    pub fn new(quiet_ms: u32) -> Self {
        Self {
            quiet_ms,
            armed: false,
            pending: false,
        }
    }

    pub fn quiet_ms(&self) -> u32 {
        self.quiet_ms
    }

    /// Register a call. Returns true if it should run now (leading edge).
    pub fn call(&mut self) -> bool {
        if self.armed {
            self.pending = true;
            false
        } else {
            self.armed = true;
            true
        }
    }

    /// The quiet period elapsed. Returns true if a trailing call is due.
    pub fn elapse(&mut self) -> bool {
        let due = self.armed && self.pending;
        self.armed = false;
        self.pending = false;
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_call_fires_once() {
        let mut d = Debouncer::new(200);
        assert!(d.call());
        assert!(!d.elapse());
        // The window closed, so the next call leads again.
        assert!(d.call());
    }

    #[test]
    fn burst_fires_leading_and_one_trailing() {
        let mut d = Debouncer::new(200);
        assert!(d.call());
        assert!(!d.call());
        assert!(!d.call());
        assert!(!d.call());
        assert!(d.elapse());
        // Next burst starts a fresh window.
        assert!(d.call());
    }

    #[test]
    fn stray_elapse_is_harmless() {
        let mut d = Debouncer::new(50);
        assert!(!d.elapse());
        assert!(d.call());
    }
}
