//! This is an internal module that contains utility functionality used by other modules.

use core::{
    ptr,
    sync::atomic::{AtomicPtr, Ordering},
};

use crate::comp::EventHandler;

/// Holds an optional [`EventHandler`] that is written from normal context and read from
/// an interrupt handler. The handler is a single pointer-sized word, so publishing and
/// reading it is one atomic store or load; no lock is involved on either side.
pub(crate) struct HandlerSlot {
    ptr: AtomicPtr<()>,
}

impl HandlerSlot {
    pub(crate) const fn new() -> Self {
        Self {
            ptr: AtomicPtr::new(ptr::null_mut()),
        }
    }

    pub(crate) fn set(&self, handler: Option<EventHandler>) {
        let raw = match handler {
            Some(handler) => handler as *mut (),
            None => ptr::null_mut(),
        };
        self.ptr.store(raw, Ordering::Release);
    }

    pub(crate) fn get(&self) -> Option<EventHandler> {
        let raw = self.ptr.load(Ordering::Acquire);
        if raw.is_null() {
            return None;
        }
        // Only `EventHandler` values cast in `set` are ever stored here.
        Some(unsafe { core::mem::transmute::<*mut (), EventHandler>(raw) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comp::Event;

    fn handler(_event: Event) {}

    #[test]
    fn empty_until_set() {
        let slot = HandlerSlot::new();
        assert!(slot.get().is_none());

        slot.set(Some(handler));
        assert_eq!(slot.get().map(|h| h as usize), Some(handler as usize));

        slot.set(None);
        assert!(slot.get().is_none());
    }
}
