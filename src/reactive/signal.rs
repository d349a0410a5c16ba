use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::runtime::{flush_effects, try_with_runtime, with_runtime, SignalId};

struct Slot<T> {
    id: SignalId,
    value: RefCell<T>,
}

impl<T> Drop for Slot<T> {
    fn drop(&mut self) {
        try_with_runtime(|rt| rt.dispose_signal(self.id));
    }
}

/// A reactive value owned by the current thread.
///
/// Reading a signal with [`get`](Signal::get) or [`with`](Signal::with) inside an
/// effect subscribes that effect; writing a different value re-runs every
/// subscriber. Writes that leave the value unchanged notify nobody.
///
/// Clones share the same underlying value. Writing a signal from inside its
/// own [`with`](Signal::with) closure panics.
pub struct Signal<T> {
    slot: Rc<Slot<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signal").field(&*self.slot.value.borrow()).finish()
    }
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        let id = with_runtime(|rt| rt.allocate_signal());
        Self {
            slot: Rc::new(Slot {
                id,
                value: RefCell::new(value),
            }),
        }
    }

    /// Borrow the value, subscribing the running effect.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.track();
        self.with_untracked(f)
    }

    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.slot.value.borrow())
    }

    fn track(&self) {
        try_with_runtime(|rt| rt.track_read(self.slot.id));
    }

    fn notify(&self) {
        try_with_runtime(|rt| rt.notify_write(self.slot.id));
        flush_effects();
    }
}

impl<T: Clone> Signal<T> {
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    pub fn get_untracked(&self) -> T {
        self.with_untracked(T::clone)
    }
}

impl<T: PartialEq> Signal<T> {
    /// Store `value`; subscribers re-run only if it differs from the current one.
    pub fn set(&self, value: T) {
        let changed = {
            let mut current = self.slot.value.borrow_mut();
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        };
        if changed {
            self.notify();
        }
    }
}

impl<T: PartialEq + Clone> Signal<T> {
    /// Edit a copy of the value in place and store it back through [`set`](Signal::set).
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut next = self.get_untracked();
        f(&mut next);
        self.set(next);
    }
}

pub fn create_signal<T>(value: T) -> Signal<T> {
    Signal::new(value)
}
