// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

//! Vnode-layer interfaces.
//!
//! The file table and the syscall layer consume the filesystem exclusively
//! through the [`Vnode`] and [`Filesystem`] traits defined here. The concrete
//! on-disk filesystem lives behind these traits and is out of scope for the
//! resource core; [`testing`] provides an in-memory implementation.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

use alloc::sync::Arc;

use kerrno::KResult;

pub mod testing;


/// The kind of object a vnode names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// A regular file.
    RegularFile,
    /// A directory.
    Directory,
    /// A character device.
    CharDevice,
}

/// Metadata reported by [`Vnode::metadata`].
#[derive(Debug, Clone, Copy)]
pub struct Metadata {
    /// Size of the object in bytes.
    pub size: u64,
    /// The kind of object.
    pub node_type: NodeType,
}

/// A handle to one filesystem object.
///
/// All operations are positional; the current-offset bookkeeping lives in the
/// open-file layer above. Implementations may block inside `read_at` and
/// `write_at` (device I/O).
pub trait Vnode: Send + Sync {
    /// Returns metadata for this object.
    fn metadata(&self) -> KResult<Metadata>;

    /// Reads into `buf` starting at `offset`, returning the number of bytes
    /// read. A short read is not an error; zero means end of file.
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> KResult<usize>;

    /// Writes `buf` starting at `offset`, returning the number of bytes
    /// written. A short write is not an error.
    fn write_at(&self, offset: u64, buf: &[u8]) -> KResult<usize>;

    /// Asks whether `pos` is an acceptable file position.
    ///
    /// Non-seekable objects (devices, pipes) reject every position.
    fn check_seek(&self, _pos: u64) -> KResult<()> {
        Ok(())
    }

    /// Called exactly once when the last open-file reference is released.
    fn close(&self) {}
}

/// Shared handle to a [`Vnode`].
pub type VnodeRef = Arc<dyn Vnode>;

/// Path-to-vnode resolution, the narrow face of the VFS.
pub trait Filesystem: Send + Sync {
    /// Opens the object at `path`, creating a regular file first when
    /// `create` is set and no object exists.
    fn open(&self, path: &str, create: bool) -> KResult<VnodeRef>;
}
