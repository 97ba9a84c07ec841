// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

use event_listener::Event;

use crate::future::block_on;

/// A condition-variable-like rendezvous point.
///
/// Waiters evaluate a condition, register a listener, re-check the condition,
/// and only then block. Because the listener is registered before the final
/// check, a notification sent between the check and the block is not lost.
pub struct WaitCell {
    event: Event,
}

impl WaitCell {
    /// Creates an empty wait cell.
    pub const fn new() -> Self {
        Self {
            event: Event::new(),
        }
    }

    /// Wakes a single waiter, if any is registered.
    pub fn notify_one(&self) {
        self.event.notify(1);
    }

    /// Wakes every registered waiter.
    pub fn notify_all(&self) {
        self.event.notify(usize::MAX);
    }

    /// Blocks the calling thread until `cond` yields a value.
    ///
    /// `cond` is evaluated without any lock held by this cell; callers take
    /// their own locks inside the closure.
    pub fn wait_until<T>(&self, mut cond: impl FnMut() -> Option<T>) -> T {
        loop {
            if let Some(v) = cond() {
                return v;
            }
            let listener = self.event.listen();
            // Re-check after registering so a notify between the first check
            // and `listen()` cannot be missed.
            if let Some(v) = cond() {
                return v;
            }
            block_on(listener);
        }
    }
}

impl Default for WaitCell {
    fn default() -> Self {
        Self::new()
    }
}
