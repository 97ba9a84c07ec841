// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

use alloc::sync::Arc;
use core::sync::atomic::{AtomicUsize, Ordering};

use kerrno::{KError, KResult};
use ksync::Mutex;
use kvnode::VnodeRef;

use crate::OpenFlags;

/// Seek targets for [`OpenFile::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekFrom {
    /// An absolute offset.
    Start(u64),
    /// Relative to the current offset.
    Current(i64),
    /// Relative to end of file (determined by a stat of the vnode).
    End(i64),
}

struct FileState {
    offset: u64,
    flags: OpenFlags,
}

/// Shared, reference-counted state for one open-file instance.
///
/// Every descriptor-table slot aliasing this instance (dup2, fork) holds one
/// logical reference; the underlying vnode is closed exactly once, when the
/// last reference is released. The offset and flags are guarded by the
/// object's own lock, independent of any table lock, so aliased descriptors
/// in different processes never race on offset updates.
pub struct OpenFile {
    vnode: VnodeRef,
    refs: AtomicUsize,
    state: Mutex<FileState>,
}

impl OpenFile {
    /// Creates an open-file object with one reference.
    pub fn new(vnode: VnodeRef, flags: OpenFlags, offset: u64) -> Arc<Self> {
        Arc::new(Self {
            vnode,
            refs: AtomicUsize::new(1),
            state: Mutex::new(FileState { offset, flags }),
        })
    }

    /// Takes an additional reference, for binding into another table slot.
    pub fn acquire(self: &Arc<Self>) -> Arc<Self> {
        self.refs.fetch_add(1, Ordering::Relaxed);
        self.clone()
    }

    /// Drops one reference; at zero, closes the underlying vnode.
    ///
    /// The close runs at most once per object.
    pub fn release(&self) {
        if self.refs.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.vnode.close();
        }
    }

    /// Number of table slots currently bound to this object.
    pub fn ref_count(&self) -> usize {
        self.refs.load(Ordering::Acquire)
    }

    /// The flags this object was opened with.
    pub fn flags(&self) -> OpenFlags {
        self.state.lock().flags
    }

    /// The current offset.
    pub fn offset(&self) -> u64 {
        self.state.lock().offset
    }

    /// Reads at the current offset, advancing it by the bytes transferred.
    ///
    /// The state lock is held across the underlying transfer, so concurrent
    /// operations on aliased descriptors are serialized and each sees the
    /// offset left by the previous one. A short read is not an error.
    pub fn read(&self, buf: &mut [u8]) -> KResult<usize> {
        let mut state = self.state.lock();
        if !state.flags.readable() {
            return Err(KError::PermissionDenied);
        }
        let n = self.vnode.read_at(state.offset, buf)?;
        state.offset += n as u64;
        Ok(n)
    }

    /// Writes at the current offset, advancing it by the bytes transferred.
    pub fn write(&self, buf: &[u8]) -> KResult<usize> {
        let mut state = self.state.lock();
        if !state.flags.writable() {
            return Err(KError::PermissionDenied);
        }
        let n = self.vnode.write_at(state.offset, buf)?;
        state.offset += n as u64;
        Ok(n)
    }

    /// Repositions the offset, returning the resulting absolute offset.
    ///
    /// Results outside `0..=i64::MAX` are rejected, so the new offset always
    /// survives the trip back through a signed return value. The vnode may
    /// veto the new position (non-seekable devices), which is surfaced
    /// verbatim.
    pub fn seek(&self, pos: SeekFrom) -> KResult<u64> {
        let mut state = self.state.lock();
        let new_offset = match pos {
            SeekFrom::Start(off) => off,
            SeekFrom::Current(delta) => state
                .offset
                .checked_add_signed(delta)
                .ok_or(KError::InvalidInput)?,
            SeekFrom::End(delta) => {
                let size = self.vnode.metadata()?.size;
                size.checked_add_signed(delta)
                    .ok_or(KError::InvalidInput)?
            }
        };
        if new_offset > i64::MAX as u64 {
            return Err(KError::InvalidInput);
        }
        self.vnode.check_seek(new_offset)?;
        state.offset = new_offset;
        Ok(new_offset)
    }
}
