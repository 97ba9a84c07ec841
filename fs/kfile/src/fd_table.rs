// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

use alloc::sync::Arc;

use kerrno::{KError, KResult};
use ksync::Mutex;

use crate::OpenFile;

/// Capacity of a per-process descriptor table.
pub const FD_TABLE_SIZE: usize = 128;

enum Slot {
    Free,
    /// Claimed by an in-flight `open` that has not bound an object yet.
    Reserved,
    Open(Arc<OpenFile>),
}

impl Slot {
    fn is_free(&self) -> bool {
        matches!(self, Slot::Free)
    }
}

struct FdTableInner {
    slots: [Slot; FD_TABLE_SIZE],
    /// Allocation hint; always <= the true lowest free slot.
    next_free: usize,
}

impl FdTableInner {
    fn set_free(&mut self, slot: usize) {
        self.slots[slot] = Slot::Free;
        if slot < self.next_free {
            self.next_free = slot;
        }
    }
}

/// Per-process descriptor table.
///
/// One lock serializes all slot-structure mutations; the payload of each
/// bound [`OpenFile`] is guarded by the object's own lock. When both are
/// needed the table lock is taken first.
pub struct FdTable {
    inner: Mutex<FdTableInner>,
}

impl FdTable {
    /// Creates an empty table.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(FdTableInner {
                slots: [const { Slot::Free }; FD_TABLE_SIZE],
                next_free: 0,
            }),
        }
    }

    /// Reserves the lowest free slot and returns its number.
    ///
    /// The reservation keeps concurrent opens from claiming the same number
    /// while the underlying handle is still being opened. It must be resolved
    /// with [`bind`](Self::bind) or [`cancel_reservation`](Self::cancel_reservation).
    pub fn allocate(&self) -> KResult<usize> {
        let mut inner = self.inner.lock();
        let start = inner.next_free;
        for slot in start..FD_TABLE_SIZE {
            if inner.slots[slot].is_free() {
                debug!("fd_table: reserve slot {slot}");
                inner.slots[slot] = Slot::Reserved;
                // The slot just taken was the lowest free one, so the next
                // free slot can only be above it.
                inner.next_free = slot + 1;
                return Ok(slot);
            }
        }
        Err(KError::TooManyOpenFiles)
    }

    /// Installs `file` into a slot previously returned by [`allocate`](Self::allocate).
    pub fn bind(&self, slot: usize, file: Arc<OpenFile>) -> KResult<()> {
        let mut inner = self.inner.lock();
        match inner.slots.get(slot) {
            Some(Slot::Reserved) => {
                inner.slots[slot] = Slot::Open(file);
                Ok(())
            }
            _ => Err(KError::BadFileDescriptor),
        }
    }

    /// Returns a reserved slot to the free pool without binding anything.
    pub fn cancel_reservation(&self, slot: usize) {
        let mut inner = self.inner.lock();
        if matches!(inner.slots.get(slot), Some(Slot::Reserved)) {
            inner.set_free(slot);
        }
    }

    /// Looks up the open file bound to `slot`.
    pub fn get(&self, slot: usize) -> KResult<Arc<OpenFile>> {
        let inner = self.inner.lock();
        match inner.slots.get(slot) {
            Some(Slot::Open(file)) => Ok(file.clone()),
            _ => Err(KError::BadFileDescriptor),
        }
    }

    /// Releases the object bound to `slot` and clears the slot.
    pub fn release(&self, slot: usize) -> KResult<()> {
        let mut inner = self.inner.lock();
        match inner.slots.get(slot) {
            Some(Slot::Open(_)) => {
                let Slot::Open(file) = core::mem::replace(&mut inner.slots[slot], Slot::Free)
                else {
                    unreachable!()
                };
                inner.set_free(slot);
                drop(inner);
                // Object release happens outside the table lock; the release
                // path may close the vnode, which can block.
                file.release();
                Ok(())
            }
            _ => Err(KError::BadFileDescriptor),
        }
    }

    /// dup2 semantics: makes `new` reference the same object as `old`.
    ///
    /// `old == new` is a no-op success. An occupied `new` is closed first. A
    /// `new` slot reserved by an in-flight open is busy.
    pub fn duplicate(&self, old: usize, new: usize) -> KResult<usize> {
        if old >= FD_TABLE_SIZE || new >= FD_TABLE_SIZE {
            return Err(KError::BadFileDescriptor);
        }
        let mut inner = self.inner.lock();
        let Slot::Open(file) = &inner.slots[old] else {
            return Err(KError::BadFileDescriptor);
        };
        if old == new {
            return Ok(new);
        }
        if matches!(inner.slots[new], Slot::Reserved) {
            // The target belongs to an in-flight open.
            return Err(KError::ResourceBusy);
        }
        debug!("fd_table: dup {old} -> {new}");
        let aliased = file.acquire();
        match core::mem::replace(&mut inner.slots[new], Slot::Open(aliased)) {
            Slot::Free => {
                if inner.next_free == new {
                    // The hint pointed at the slot we just filled; fall back
                    // to a conservative value, corrected on the next close.
                    inner.next_free = new + 1;
                }
            }
            Slot::Open(displaced) => {
                drop(inner);
                displaced.release();
            }
            // Rejected above.
            Slot::Reserved => {}
        }
        Ok(new)
    }

    /// Creates the child's table at fork: every open slot is aliased via
    /// [`OpenFile::acquire`]; reservations are not inherited.
    pub fn fork_table(&self) -> FdTable {
        let inner = self.inner.lock();
        let child = FdTable::new();
        {
            let mut child_inner = child.inner.lock();
            let mut lowest_free = FD_TABLE_SIZE;
            for (i, slot) in inner.slots.iter().enumerate() {
                match slot {
                    Slot::Open(file) => child_inner.slots[i] = Slot::Open(file.acquire()),
                    Slot::Free | Slot::Reserved => {
                        if i < lowest_free {
                            lowest_free = i;
                        }
                    }
                }
            }
            child_inner.next_free = lowest_free;
        }
        drop(inner);
        child
    }

    /// Releases every open slot. Used when the owning process exits.
    pub fn close_all(&self) {
        let mut inner = self.inner.lock();
        let mut released: [Option<Arc<OpenFile>>; FD_TABLE_SIZE] =
            [const { None }; FD_TABLE_SIZE];
        for (i, slot) in inner.slots.iter_mut().enumerate() {
            if let Slot::Open(file) = core::mem::replace(slot, Slot::Free) {
                released[i] = Some(file);
            }
        }
        inner.next_free = 0;
        drop(inner);
        for file in released.into_iter().flatten() {
            file.release();
        }
    }

    /// Number of open slots. Diagnostics only.
    pub fn open_count(&self) -> usize {
        self.inner
            .lock()
            .slots
            .iter()
            .filter(|s| matches!(s, Slot::Open(_)))
            .count()
    }

    /// Current allocation hint. Diagnostics only; always <= the true lowest
    /// free slot.
    pub fn free_hint(&self) -> usize {
        self.inner.lock().next_free
    }

    /// True lowest free slot, or [`FD_TABLE_SIZE`] when full. Diagnostics only.
    pub fn lowest_free(&self) -> usize {
        let inner = self.inner.lock();
        inner
            .slots
            .iter()
            .position(Slot::is_free)
            .unwrap_or(FD_TABLE_SIZE)
    }
}

impl Default for FdTable {
    fn default() -> Self {
        Self::new()
    }
}
