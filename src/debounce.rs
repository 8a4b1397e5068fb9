//! Time-delay wrapper for the search box.  Kept outside the controller so
//! the controller itself stays timer-free.

use std::cell::RefCell;

use gloo_timers::callback::Timeout;

#[derive(Default)]
pub struct Debouncer {
    pending: RefCell<Option<Timeout>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` after `delay_ms`, cancelling whatever was scheduled before.
    pub fn schedule<F>(&self, delay_ms: u32, f: F)
    where
        F: FnOnce() + 'static,
    {
        // Dropping a `Timeout` clears it.
        let previous = self.pending.borrow_mut().replace(Timeout::new(delay_ms, f));
        drop(previous);
    }

    pub fn cancel(&self) {
        self.pending.borrow_mut().take();
    }
}
