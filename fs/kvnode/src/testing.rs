// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

//! In-memory filesystem for testing.
//!
//! A `BTreeMap`-backed [`Filesystem`] that does not persist anything, plus a
//! non-seekable device node. Used by the file-table and syscall tests.

use alloc::{
    borrow::ToOwned,
    collections::BTreeMap,
    string::String,
    sync::Arc,
    vec::Vec,
};
use core::sync::atomic::{AtomicUsize, Ordering};

use kerrno::{KError, KResult};
use ksync::Mutex;

use crate::{Filesystem, Metadata, NodeType, Vnode, VnodeRef};

/// A regular file held entirely in memory.
pub struct MemoryNode {
    data: Mutex<Vec<u8>>,
    closes: AtomicUsize,
}

impl MemoryNode {
    /// Creates a node with the given initial contents.
    pub fn new(data: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            data: Mutex::new(data.to_vec()),
            closes: AtomicUsize::new(0),
        })
    }

    /// How many times [`Vnode::close`] has run. The open-file layer must
    /// drive this to exactly 1 per open-file object.
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::Acquire)
    }

    /// Snapshot of the current contents.
    pub fn contents(&self) -> Vec<u8> {
        self.data.lock().clone()
    }
}

impl Vnode for MemoryNode {
    fn metadata(&self) -> KResult<Metadata> {
        Ok(Metadata {
            size: self.data.lock().len() as u64,
            node_type: NodeType::RegularFile,
        })
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> KResult<usize> {
        let data = self.data.lock();
        let offset = offset as usize;
        if offset >= data.len() {
            return Ok(0);
        }
        let n = buf.len().min(data.len() - offset);
        buf[..n].copy_from_slice(&data[offset..offset + n]);
        Ok(n)
    }

    fn write_at(&self, offset: u64, buf: &[u8]) -> KResult<usize> {
        let mut data = self.data.lock();
        let offset = offset as usize;
        if data.len() < offset + buf.len() {
            data.resize(offset + buf.len(), 0);
        }
        data[offset..offset + buf.len()].copy_from_slice(buf);
        Ok(buf.len())
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::AcqRel);
    }
}

/// A character device that refuses to seek and discards writes.
pub struct NullDevice;

impl Vnode for NullDevice {
    fn metadata(&self) -> KResult<Metadata> {
        Ok(Metadata {
            size: 0,
            node_type: NodeType::CharDevice,
        })
    }

    fn read_at(&self, _offset: u64, _buf: &mut [u8]) -> KResult<usize> {
        Ok(0)
    }

    fn write_at(&self, _offset: u64, buf: &[u8]) -> KResult<usize> {
        Ok(buf.len())
    }

    fn check_seek(&self, _pos: u64) -> KResult<()> {
        Err(KError::NotSeekable)
    }
}

/// An in-memory [`Filesystem`] keyed by full path.
pub struct MemoryFs {
    nodes: Mutex<BTreeMap<String, Arc<MemoryNode>>>,
}

impl MemoryFs {
    /// Creates an empty filesystem.
    pub fn new() -> Self {
        Self {
            nodes: Mutex::new(BTreeMap::new()),
        }
    }

    /// Creates `path` with the given contents, replacing any previous node.
    pub fn add_file(&self, path: &str, data: &[u8]) -> Arc<MemoryNode> {
        let node = MemoryNode::new(data);
        self.nodes.lock().insert(path.to_owned(), node.clone());
        node
    }

    /// Looks up an existing node without opening it.
    pub fn node(&self, path: &str) -> Option<Arc<MemoryNode>> {
        self.nodes.lock().get(path).cloned()
    }
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for MemoryFs {
    fn open(&self, path: &str, create: bool) -> KResult<VnodeRef> {
        let mut nodes = self.nodes.lock();
        if let Some(node) = nodes.get(path) {
            return Ok(node.clone());
        }
        if !create {
            return Err(KError::NotFound);
        }
        let node = MemoryNode::new(&[]);
        nodes.insert(path.to_owned(), node.clone());
        Ok(node)
    }
}
