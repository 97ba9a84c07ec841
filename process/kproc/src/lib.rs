// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

//! Process objects and the system-wide process table.
//!
//! A [`Process`] owns its descriptor table and address space and carries its
//! lifecycle state (running or zombie). The [`ProcessTable`] maps pids to
//! processes and records the parent link of every live process; it is the
//! single authority on who may wait for whom.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[macro_use]
extern crate log;

use alloc::sync::Arc;

use kerrno::KResult;

mod process;
mod table;

pub use process::Process;
pub use table::ProcessTable;


/// Process identifier. Pid 1 is the boot process; pids are never reused.
pub type Pid = u32;

/// The virtual address space of a process.
///
/// The resource core only needs one operation: producing the child's copy at
/// fork. Page tables and mappings live behind this trait.
pub trait AddrSpace: Send + Sync {
    /// Clones this address space for a forked child.
    fn fork(&self) -> KResult<Arc<dyn AddrSpace>>;
}

/// Encodes an exit code into the status word reported by `waitpid`.
pub fn wait_status(exit_code: i32) -> i32 {
    (exit_code & 0xff) << 8
}
