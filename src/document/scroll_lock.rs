//! Body scroll locking.

use super::DocumentState;
use std::cell::RefCell;
use std::rc::Weak;

/// Overflow behaviour of the document body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    /// Background content scrolls normally
    #[default]
    Auto,
    /// Background scrolling is suppressed
    Hidden,
}

#[derive(Debug, Default)]
pub(crate) struct ScrollState {
    pub overflow: Overflow,
    depth: usize,
    saved: Option<Overflow>,
}

impl ScrollState {
    fn acquire(&mut self) {
        if self.depth == 0 {
            self.saved = Some(self.overflow);
        }
        self.depth += 1;
        self.overflow = Overflow::Hidden;
    }

    fn release(&mut self) {
        if self.depth == 0 {
            return;
        }
        self.depth -= 1;
        if self.depth == 0 {
            self.overflow = self.saved.take().unwrap_or_default();
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Holds the body at [`Overflow::Hidden`] while alive.
///
/// Locks nest: the overflow seen by the first lock comes back when the last
/// one is released, whatever order they are dropped in.
#[must_use = "dropping the lock releases it immediately"]
#[derive(Debug)]
pub struct ScrollLock {
    state: Weak<RefCell<DocumentState>>,
}

impl ScrollLock {
    pub(crate) fn acquire(state: Weak<RefCell<DocumentState>>) -> Self {
        if let Some(state) = state.upgrade() {
            state.borrow_mut().scroll.acquire();
        }
        Self { state }
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state.borrow_mut().scroll.release();
        }
    }
}
